use crate::r#match::engine::physics::constants::{ball, goal};
use crate::r#match::engine::physics::{distance_to_segment, flat, flat_distance, kick_power_for_speed};
use crate::r#match::player::state::ActionKind;
use nalgebra::Vector3;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlayerAction {
    MoveTo { target: Vector3<f32> },
    ChaseBall,
    Pass { target_player: u32, power: f32 },
    Shoot { target: Vector3<f32>, power: f32 },
    Dribble { direction: Vector3<f32> },
    Tackle { target_player: u32 },
    Mark { target_player: u32 },
    HoldPosition,
}

impl PlayerAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            PlayerAction::MoveTo { .. } => ActionKind::MoveTo,
            PlayerAction::ChaseBall => ActionKind::ChaseBall,
            PlayerAction::Pass { .. } => ActionKind::Pass,
            PlayerAction::Shoot { .. } => ActionKind::Shoot,
            PlayerAction::Dribble { .. } => ActionKind::Dribble,
            PlayerAction::Tackle { .. } => ActionKind::Tackle,
            PlayerAction::Mark { .. } => ActionKind::Mark,
            PlayerAction::HoldPosition => ActionKind::HoldPosition,
        }
    }

    /// Actions only the current ball owner may perform.
    pub fn requires_possession(&self) -> bool {
        matches!(
            self,
            PlayerAction::Pass { .. } | PlayerAction::Shoot { .. } | PlayerAction::Dribble { .. }
        )
    }
}

/// Point inside the far post, away from the goalkeeper. Without a keeper the
/// post farther from the shooter is chosen.
pub fn shot_aim_point(
    player_pos: &Vector3<f32>,
    goal_pos: &Vector3<f32>,
    goalkeeper_pos: Option<&Vector3<f32>>,
) -> Vector3<f32> {
    let reference = goalkeeper_pos.map(|gk| gk.y).unwrap_or(player_pos.y);

    let side = if reference > goal_pos.y { -1.0 } else { 1.0 };

    Vector3::new(
        goal_pos.x,
        goal_pos.y + side * (goal::HALF_WIDTH - goal::POST_AIM_MARGIN),
        0.0,
    )
}

/// Unit direction from the shooter to [`shot_aim_point`].
pub fn calculate_shot_direction(
    player_pos: &Vector3<f32>,
    goal_pos: &Vector3<f32>,
    goalkeeper_pos: Option<&Vector3<f32>>,
) -> Vector3<f32> {
    let aim = shot_aim_point(player_pos, goal_pos, goalkeeper_pos);
    let direction = flat(&(aim - player_pos));
    let norm = direction.norm();

    if norm > 0.0 {
        direction / norm
    } else {
        Vector3::new(goal_pos.x.signum(), 0.0, 0.0)
    }
}

const PASS_ARRIVAL_SPEED: f32 = 5.5;
const OVERHIT_AT_ZERO_ACCURACY: f32 = 0.2;

/// Kick power that makes a ground pass arrive at a comfortable speed.
/// Poor passers overhit.
pub fn calculate_pass_power(distance: f32, accuracy: f32) -> f32 {
    let distance = distance.max(0.0);
    let speed = (PASS_ARRIVAL_SPEED * PASS_ARRIVAL_SPEED
        + 2.0 * ball::ROLLING_DECELERATION * distance)
        .sqrt();

    let overhit = 1.0 + OVERHIT_AT_ZERO_ACCURACY * (1.0 - accuracy.clamp(0.0, 1.0));

    kick_power_for_speed(speed * overhit)
}

pub fn is_in_shooting_range(player_pos: &Vector3<f32>, goal_pos: &Vector3<f32>, max_range: f32) -> bool {
    flat_distance(player_pos, goal_pos) <= max_range
}

/// Chance-quality estimate in `[0, 0.95]`; doubles as the expected-goals value of a shot.
pub fn shot_quality(
    shooter: &Vector3<f32>,
    goal_pos: &Vector3<f32>,
    shooting: f32,
    blockers: usize,
) -> f32 {
    let distance = flat_distance(shooter, goal_pos);

    let near_post = Vector3::new(goal_pos.x, goal_pos.y + goal::HALF_WIDTH, 0.0) - flat(shooter);
    let far_post = Vector3::new(goal_pos.x, goal_pos.y - goal::HALF_WIDTH, 0.0) - flat(shooter);

    let opening = if near_post.norm() > 0.0 && far_post.norm() > 0.0 {
        near_post.angle(&far_post)
    } else {
        std::f32::consts::PI
    };

    let angle_factor = (opening / 0.6).min(1.0);
    let distance_factor = (-distance / 14.0).exp();
    let skill = 0.55 + 0.45 * (shooting / 100.0).clamp(0.0, 1.0);
    let blocked = 0.8f32.powi(blockers as i32);

    (angle_factor * distance_factor * skill * blocked).clamp(0.0, 0.95)
}

const LANE_WIDTH: f32 = 2.5;

/// Chance a ground pass reaches `to`. Falls with distance and with every
/// opponent standing in the passing lane.
pub fn pass_completion_probability<'a>(
    from: &Vector3<f32>,
    to: &Vector3<f32>,
    passing: f32,
    opponents: impl Iterator<Item = &'a Vector3<f32>>,
) -> f32 {
    let distance = flat_distance(from, to);

    let mut probability = (0.97 - distance / 110.0) * (0.6 + 0.4 * (passing / 100.0).clamp(0.0, 1.0));

    for opponent in opponents {
        let (lane_distance, t) = distance_to_segment(opponent, from, to);

        if lane_distance < LANE_WIDTH && t > 0.05 {
            probability *= 0.45 + 0.55 * (lane_distance / LANE_WIDTH);
        }
    }

    probability.clamp(0.02, 0.98)
}
