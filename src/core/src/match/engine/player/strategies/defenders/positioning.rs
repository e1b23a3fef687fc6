use crate::r#match::{team_frame, GameContext, PlayerRole, PositionBehavior};
use nalgebra::Vector3;

/// Metres the back line keeps goal-side of the ball when defending.
const GOAL_SIDE_MARGIN: f32 = 8.0;
const FULL_BACK_WIDTH: f32 = 1.15;
const CENTRE_BACK_TUCK: f32 = 0.15;
const DEEPEST_LINE: f32 = -47.0;

#[derive(Default)]
pub struct DefenderPositioning {}

impl PositionBehavior for DefenderPositioning {
    fn adjust(&self, role: PlayerRole, base_target: &Vector3<f32>, ctx: &GameContext) -> Vector3<f32> {
        let direction = ctx.direction();
        let base = team_frame(base_target, direction);
        let ball = team_frame(&ctx.ball().position(), direction);

        let mut x = base.x;
        let mut y = base.y;

        if !ctx.ball().is_owned_by_team() {
            x = x.min(ball.x - GOAL_SIDE_MARGIN).max(DEEPEST_LINE);
        }

        match role {
            PlayerRole::FullBack if ctx.ball().is_owned_by_team() => y *= FULL_BACK_WIDTH,
            PlayerRole::CentreBack => y += (ball.y - y) * CENTRE_BACK_TUCK,
            _ => {}
        }

        team_frame(&Vector3::new(x, y, 0.0), direction)
    }
}
