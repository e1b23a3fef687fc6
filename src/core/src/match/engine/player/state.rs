use nalgebra::Vector3;
use serde::Serialize;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    MoveTo,
    ChaseBall,
    Pass,
    Shoot,
    Dribble,
    Tackle,
    Mark,
    #[default]
    HoldPosition,
}

impl Display for ActionKind {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let name = match self {
            ActionKind::MoveTo => "MoveTo",
            ActionKind::ChaseBall => "ChaseBall",
            ActionKind::Pass => "Pass",
            ActionKind::Shoot => "Shoot",
            ActionKind::Dribble => "Dribble",
            ActionKind::Tackle => "Tackle",
            ActionKind::Mark => "Mark",
            ActionKind::HoldPosition => "HoldPosition",
        };

        write!(f, "{name}")
    }
}

/// Dynamic state of one player; only player physics and the action executor write it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlayerState {
    pub position: Vector3<f32>,
    pub velocity: Vector3<f32>,
    /// Heading in radians, 0 pointing towards +x.
    pub facing: f32,
    /// 1.0 fresh, 0.0 exhausted.
    pub stamina: f32,
    /// Seconds the player is unable to act, after a failed tackle or being tackled.
    pub cooldown: f32,
    pub action: ActionKind,
    /// Seconds since `action` was last changed.
    pub action_time: f32,
}

impl PlayerState {
    pub fn at(position: Vector3<f32>) -> Self {
        PlayerState {
            position,
            velocity: Vector3::zeros(),
            facing: 0.0,
            stamina: 1.0,
            cooldown: 0.0,
            action: ActionKind::HoldPosition,
            action_time: 0.0,
        }
    }

    pub fn set_action(&mut self, action: ActionKind) {
        if self.action != action {
            self.action = action;
            self.action_time = 0.0;
        }
    }

    /// Restart placement: keeps stamina, clears motion and cooldowns.
    pub fn reset_to(&mut self, position: Vector3<f32>, facing: f32) {
        self.position = position;
        self.velocity = Vector3::zeros();
        self.facing = facing;
        self.cooldown = 0.0;
        self.action = ActionKind::HoldPosition;
        self.action_time = 0.0;
    }

    #[inline]
    pub fn is_deactivated(&self) -> bool {
        self.cooldown > 0.0
    }
}
