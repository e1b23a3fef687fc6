use crate::r#match::engine::physics::constants::{field, goal};
use crate::r#match::{GameContext, PlayerRole, PositionBehavior};
use nalgebra::Vector3;

const BASE_DEPTH: f32 = 1.5;
/// Extra depth when the ball is deep in the opponent half.
const SWEEPER_DEPTH: f32 = 6.0;
const DANGER_DISTANCE: f32 = 22.0;
const RUSH_FACTOR: f32 = 0.35;
const MAX_RUSH_DEPTH: f32 = 7.0;
const POST_MARGIN: f32 = 0.5;

/// Keeper stands on the line between ball and goal centre, off the line
/// when the ball is far away and coming out to narrow the angle when a
/// threat gets close.
#[derive(Default)]
pub struct GoalkeeperPositioning {}

impl PositionBehavior for GoalkeeperPositioning {
    fn adjust(&self, _role: PlayerRole, _base_target: &Vector3<f32>, ctx: &GameContext) -> Vector3<f32> {
        let own_goal = ctx.own_goal();
        let ball = ctx.ball().position();
        let direction = ctx.direction();

        let to_ball = Vector3::new(ball.x - own_goal.x, ball.y - own_goal.y, 0.0);
        let distance = to_ball.norm();

        let depth = if distance < DANGER_DISTANCE && !ctx.ball().is_owned_by_team() {
            (distance * RUSH_FACTOR).clamp(BASE_DEPTH, MAX_RUSH_DEPTH)
        } else {
            // 0 at own goal line, 1 at the far one
            let advance = ((ctx.forward(&ball) + field::HALF_LENGTH) / field::LENGTH).clamp(0.0, 1.0);
            BASE_DEPTH + SWEEPER_DEPTH * advance
        };

        let bisector = if distance > 1e-3 {
            to_ball / distance
        } else {
            Vector3::new(direction, 0.0, 0.0)
        };

        // never step behind the line or wider than the posts
        let forward_component = (bisector.x * direction).max(0.3);
        let x = own_goal.x + direction * forward_component * depth;
        let y = (bisector.y * depth).clamp(-(goal::HALF_WIDTH - POST_MARGIN), goal::HALF_WIDTH - POST_MARGIN);

        Vector3::new(x, y, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::r#match::{
        AgentTuning, GameTickContext, MatchField, PossessionBalancer, Score, SquadGenerator,
        SquadProfile, TeamSide,
    };

    fn keeper_target(ball: Vector3<f32>) -> Vector3<f32> {
        let home = SquadGenerator::new(1).generate(1, "Home", &SquadProfile::uniform(70.0));
        let away = SquadGenerator::new(2).generate(2, "Away", &SquadProfile::uniform(70.0));
        let mut field = MatchField::new(&home, &away);
        field.ball.state.position = ball;

        let tick = GameTickContext::new(&field, 0.0, &Score::default());
        let tuning = AgentTuning::default();
        let balancer = PossessionBalancer::new(&tuning);
        let keeper = tick
            .players
            .iter()
            .find(|p| p.team == TeamSide::Home && p.role.is_goalkeeper())
            .unwrap();
        let ctx = GameContext::new(keeper, &tick, &tuning, &balancer, None);

        GoalkeeperPositioning::default().adjust(keeper.role, &keeper.slot, &ctx)
    }

    #[test]
    fn test_keeper_stays_between_posts() {
        let target = keeper_target(Vector3::new(-40.0, 30.0, 0.0));

        assert!(target.y.abs() <= goal::HALF_WIDTH);
        assert!(target.y > 0.0);
        assert!(target.x > -field::HALF_LENGTH);
    }

    #[test]
    fn test_keeper_comes_off_line_for_close_threat() {
        let far = keeper_target(Vector3::new(-10.0, 0.0, 0.0));
        let close = keeper_target(Vector3::new(-36.0, 0.0, 0.0));
        let deep = keeper_target(Vector3::new(-50.0, 0.0, 0.0));

        // ball in midfield: sweeping position, threat: narrowing, on the line: stay home
        assert!(close.x > deep.x);
        assert!(far.x > -field::HALF_LENGTH + BASE_DEPTH);
    }
}
