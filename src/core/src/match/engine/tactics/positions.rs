use crate::r#match::engine::physics::constants::field;
use crate::r#match::{PlayerRole, SquadPlayer};
use itertools::Itertools;
use nalgebra::Vector3;
use std::collections::HashMap;

/// Line depth and lateral spread of each role in the team frame
/// (attacking towards +x, own goal at x = -52.5).
const ROLE_LINES: &[(PlayerRole, f32, f32)] = &[
    (PlayerRole::Goalkeeper, -50.0, 0.0),
    (PlayerRole::CentreBack, -36.0, 12.0),
    (PlayerRole::FullBack, -33.0, 48.0),
    (PlayerRole::DefensiveMidfielder, -24.0, 14.0),
    (PlayerRole::CentralMidfielder, -18.0, 18.0),
    (PlayerRole::AttackingMidfielder, -12.0, 16.0),
    (PlayerRole::Winger, -6.0, 44.0),
    (PlayerRole::Striker, -10.0, 14.0),
];

const MAX_SLOT_WIDTH: f32 = 32.0;

/// How far the block follows the ball up and down the pitch.
const BALL_FOLLOW: f32 = 0.45;
const BALL_LATERAL_FOLLOW: f32 = 0.2;
const IN_POSSESSION_PUSH: f32 = 6.0;
const OUT_OF_POSSESSION_DROP: f32 = 4.0;
/// Metres the block moves per unit of balancer assist above 1.0.
const ASSIST_BLOCK_SHIFT: f32 = 20.0;

/// Kickoff positions keep this distance from the centre spot.
const KICKOFF_CLEARANCE: f32 = field::CENTER_CIRCLE_RADIUS + 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseOfPlay {
    InPossession,
    OutOfPossession,
    Loose,
}

pub struct FormationLayout;

impl FormationLayout {
    /// Team-frame slots for a starting eleven, in the order given. Explicit
    /// positions are kept; the rest spread evenly across their role's line.
    pub fn slots(players: &[SquadPlayer]) -> Vec<Vector3<f32>> {
        let role_counts = players.iter().counts_by(|p| p.role);
        let mut role_seen = HashMap::new();

        players
            .iter()
            .map(|player| {
                let index = role_seen.entry(player.role).or_insert(0usize);
                let current = *index;
                *index += 1;

                match player.position {
                    Some([x, y]) => Vector3::new(x, y, 0.0),
                    None => {
                        let count = role_counts.get(&player.role).copied().unwrap_or(1);
                        Self::default_slot(player.role, current, count)
                    }
                }
            })
            .collect()
    }

    pub fn default_slot(role: PlayerRole, index: usize, count: usize) -> Vector3<f32> {
        let (x, spacing) = ROLE_LINES
            .iter()
            .find(|(r, _, _)| *r == role)
            .map(|(_, x, spacing)| (*x, *spacing))
            .unwrap_or((-20.0, 20.0));

        let y = if count > 1 {
            -spacing / 2.0 + spacing * index as f32 / (count - 1) as f32
        } else {
            0.0
        };

        Vector3::new(x, y.clamp(-MAX_SLOT_WIDTH, MAX_SLOT_WIDTH), 0.0)
    }

    /// Slot used at kickoff: inside the own half and outside the centre circle.
    pub fn kickoff_slot(slot: &Vector3<f32>) -> Vector3<f32> {
        let mut position = Vector3::new(slot.x.min(-0.5), slot.y, 0.0);

        let from_centre = position.norm();
        if from_centre < KICKOFF_CLEARANCE {
            position.x = -(KICKOFF_CLEARANCE * KICKOFF_CLEARANCE - position.y * position.y)
                .max(0.0)
                .sqrt()
                .max(0.5);
        }

        position
    }

    /// Where a player wants to stand given the ball and the phase of play,
    /// in the team frame. `ball` must be in the team frame as well.
    ///
    /// An `assist` above 1.0 (the team losing the possession battle) pushes
    /// the block higher so it can win the ball back earlier.
    pub fn dynamic_target(
        slot: &Vector3<f32>,
        role: PlayerRole,
        ball: &Vector3<f32>,
        phase: PhaseOfPlay,
        assist: f32,
    ) -> Vector3<f32> {
        if role.is_goalkeeper() {
            return *slot;
        }

        let phase_shift = match phase {
            PhaseOfPlay::InPossession => IN_POSSESSION_PUSH,
            PhaseOfPlay::OutOfPossession => -OUT_OF_POSSESSION_DROP,
            PhaseOfPlay::Loose => 0.0,
        };

        let assist_shift = (assist - 1.0) * ASSIST_BLOCK_SHIFT;

        let (min_x, max_x) = Self::depth_limits(role);

        let x = slot.x + ball.x * BALL_FOLLOW + phase_shift + assist_shift;
        let y = slot.y + ball.y * BALL_LATERAL_FOLLOW;

        Vector3::new(
            x.clamp(min_x, max_x),
            y.clamp(-field::HALF_WIDTH + 1.0, field::HALF_WIDTH - 1.0),
            0.0,
        )
    }

    fn depth_limits(role: PlayerRole) -> (f32, f32) {
        match role {
            PlayerRole::Goalkeeper => (-52.0, -36.0),
            PlayerRole::CentreBack => (-47.0, 12.0),
            PlayerRole::FullBack => (-47.0, 25.0),
            PlayerRole::DefensiveMidfielder => (-42.0, 22.0),
            PlayerRole::CentralMidfielder => (-38.0, 32.0),
            PlayerRole::AttackingMidfielder => (-30.0, 40.0),
            PlayerRole::Winger => (-30.0, 46.0),
            PlayerRole::Striker => (-22.0, 46.0),
        }
    }
}
