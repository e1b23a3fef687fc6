use crate::r#match::{team_frame, GameContext, PlayerRole, PositionBehavior};
use nalgebra::Vector3;

const DEFENSIVE_MIDFIELD_BIAS: f32 = -3.0;
const ATTACKING_MIDFIELD_BIAS: f32 = 3.0;
const BALL_SIDE_SHIFT: f32 = 0.25;
const SUPPORT_DISTANCE: f32 = 25.0;
const SUPPORT_PULL: f32 = 0.2;

/// Midfield sits between the lines, sliding across to the ball side and
/// coming towards a team-mate on the ball who is far away.
#[derive(Default)]
pub struct MidfielderPositioning {}

impl PositionBehavior for MidfielderPositioning {
    fn adjust(&self, role: PlayerRole, base_target: &Vector3<f32>, ctx: &GameContext) -> Vector3<f32> {
        let direction = ctx.direction();
        let base = team_frame(base_target, direction);
        let ball = team_frame(&ctx.ball().position(), direction);

        let bias = match role {
            PlayerRole::DefensiveMidfielder => DEFENSIVE_MIDFIELD_BIAS,
            PlayerRole::AttackingMidfielder => ATTACKING_MIDFIELD_BIAS,
            _ => 0.0,
        };

        let mut target = Vector3::new(base.x + bias, base.y + (ball.y - base.y) * BALL_SIDE_SHIFT, 0.0);

        if ctx.ball().is_owned_by_team() {
            let to_ball = Vector3::new(ball.x - target.x, ball.y - target.y, 0.0);

            if to_ball.norm() > SUPPORT_DISTANCE {
                target += to_ball * SUPPORT_PULL;
            }
        }

        team_frame(&target, direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::r#match::{
        AgentTuning, GameTickContext, MatchField, PossessionBalancer, Score, SquadGenerator,
        SquadProfile, TeamSide,
    };

    #[test]
    fn test_midfield_slides_to_ball_side() {
        let home = SquadGenerator::new(1).generate(1, "Home", &SquadProfile::uniform(70.0));
        let away = SquadGenerator::new(2).generate(2, "Away", &SquadProfile::uniform(70.0));
        let mut field = MatchField::new(&home, &away);
        field.ball.state.position = Vector3::new(0.0, 25.0, 0.0);

        let tick = GameTickContext::new(&field, 0.0, &Score::default());
        let tuning = AgentTuning::default();
        let balancer = PossessionBalancer::new(&tuning);

        let midfielder = tick
            .players
            .iter()
            .find(|p| p.team == TeamSide::Home && p.role == PlayerRole::DefensiveMidfielder)
            .unwrap();
        let ctx = GameContext::new(midfielder, &tick, &tuning, &balancer, None);
        let base = Vector3::new(-20.0, 0.0, 0.0);

        let target = MidfielderPositioning::default().adjust(midfielder.role, &base, &ctx);

        assert!(target.y > 0.0);
        assert!(target.x < base.x);
    }
}
