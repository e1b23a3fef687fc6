use crate::r#match::engine::physics::flat_distance;
use crate::r#match::{team_frame, GameContext, PlayerRole, PositionBehavior};
use nalgebra::Vector3;

const RUN_AHEAD_OF_BALL: f32 = 6.0;
const DEEPEST_RUN: f32 = 40.0;
const SPACE_RADIUS: f32 = 4.0;
const DRIFT_STRENGTH: f32 = 0.8;

/// Forwards get ahead of the ball in the final third and drift away from
/// the nearest defender.
#[derive(Default)]
pub struct ForwardPositioning {}

impl PositionBehavior for ForwardPositioning {
    fn adjust(&self, _role: PlayerRole, base_target: &Vector3<f32>, ctx: &GameContext) -> Vector3<f32> {
        let direction = ctx.direction();
        let mut target = team_frame(base_target, direction);
        let ball = team_frame(&ctx.ball().position(), direction);

        if ctx.ball().is_owned_by_team() && ball.x > 0.0 {
            target.x = target.x.max((ball.x + RUN_AHEAD_OF_BALL).min(DEEPEST_RUN));
        }

        let world = team_frame(&target, direction);

        if let Some(marker) = ctx.opponents().nearest_to(&world) {
            let distance = flat_distance(&marker.position, &world);

            if distance < SPACE_RADIUS {
                let marker_y = team_frame(&marker.position, direction).y;
                let away = if target.y >= marker_y { 1.0 } else { -1.0 };

                target.y += away * (SPACE_RADIUS - distance) * DRIFT_STRENGTH;
            }
        }

        team_frame(&target, direction)
    }
}
