use crate::r#match::engine::physics::{clamp_to_field, is_finite_vector};
use crate::r#match::{
    DefenderPositioning, ForwardPositioning, GameContext, GoalkeeperPositioning,
    MidfielderPositioning, PlayerFieldPositionGroup, PlayerRole,
};
use nalgebra::Vector3;

/// A role family's overlay on the formation target. Overlays only move the
/// target; they never pick ball actions.
pub trait PositionBehavior {
    fn adjust(&self, role: PlayerRole, base_target: &Vector3<f32>, ctx: &GameContext) -> Vector3<f32>;
}

pub struct PositionBehaviors;

impl PositionBehaviors {
    pub fn adjust_target(role: PlayerRole, base_target: &Vector3<f32>, ctx: &GameContext) -> Vector3<f32> {
        let target = match role.position_group() {
            PlayerFieldPositionGroup::Goalkeeper => {
                GoalkeeperPositioning::default().adjust(role, base_target, ctx)
            }
            PlayerFieldPositionGroup::Defender => {
                DefenderPositioning::default().adjust(role, base_target, ctx)
            }
            PlayerFieldPositionGroup::Midfielder => {
                MidfielderPositioning::default().adjust(role, base_target, ctx)
            }
            PlayerFieldPositionGroup::Forward => {
                ForwardPositioning::default().adjust(role, base_target, ctx)
            }
        };

        if is_finite_vector(&target) {
            clamp_to_field(target)
        } else if is_finite_vector(base_target) {
            clamp_to_field(*base_target)
        } else {
            ctx.player.position
        }
    }
}

/// Pitch coordinates seen by a team attacking towards +x. The mapping is its
/// own inverse.
#[inline]
pub(crate) fn team_frame(position: &Vector3<f32>, direction: f32) -> Vector3<f32> {
    Vector3::new(position.x * direction, position.y * direction, position.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::r#match::engine::physics::constants::field;
    use crate::r#match::{
        AgentTuning, GameTickContext, MatchField, PossessionBalancer, Score, SquadGenerator,
        SquadProfile, TeamSide,
    };

    fn field() -> MatchField {
        let home = SquadGenerator::new(1).generate(1, "Home", &SquadProfile::uniform(70.0));
        let away = SquadGenerator::new(2).generate(2, "Away", &SquadProfile::uniform(70.0));

        MatchField::new(&home, &away)
    }

    #[test]
    fn test_targets_stay_on_pitch() {
        let mut field = field();
        field.ball.state.position = Vector3::new(-45.0, 30.0, 0.0);

        let tick = GameTickContext::new(&field, 0.0, &Score::default());
        let tuning = AgentTuning::default();
        let balancer = PossessionBalancer::new(&tuning);

        for player in &tick.players {
            let ctx = GameContext::new(player, &tick, &tuning, &balancer, None);
            let base = tick.to_world(player.team, &player.slot);

            let target = PositionBehaviors::adjust_target(player.role, &base, &ctx);

            assert!(target.x.abs() <= field::HALF_LENGTH);
            assert!(target.y.abs() <= field::HALF_WIDTH);
        }
    }

    #[test]
    fn test_non_finite_base_falls_back() {
        let field = field();
        let tick = GameTickContext::new(&field, 0.0, &Score::default());
        let tuning = AgentTuning::default();
        let balancer = PossessionBalancer::new(&tuning);

        let striker = tick
            .players
            .iter()
            .find(|p| p.team == TeamSide::Home && p.role == PlayerRole::Striker)
            .unwrap();
        let ctx = GameContext::new(striker, &tick, &tuning, &balancer, None);

        let target = PositionBehaviors::adjust_target(
            PlayerRole::Striker,
            &Vector3::new(f32::NAN, 0.0, 0.0),
            &ctx,
        );

        assert!(is_finite_vector(&target));
    }

    #[test]
    fn test_team_frame_round_trip() {
        let position = Vector3::new(12.0, -7.0, 0.0);

        assert_eq!(team_frame(&team_frame(&position, -1.0), -1.0), position);
        assert_eq!(team_frame(&position, 1.0), position);
    }
}
