use crate::r#match::engine::physics::constants::field;
use crate::r#match::player::state::PlayerState;
use crate::r#match::{PlayerAttributes, PlayerFieldPositionGroup, PlayerRole, SquadPlayer};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamSide {
    Home,
    Away,
}

impl TeamSide {
    #[inline]
    pub fn opponent(&self) -> TeamSide {
        match self {
            TeamSide::Home => TeamSide::Away,
            TeamSide::Away => TeamSide::Home,
        }
    }
}

impl Display for TeamSide {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            TeamSide::Home => write!(f, "home"),
            TeamSide::Away => write!(f, "away"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MatchPlayer {
    pub id: u32,
    pub name: String,
    pub team: TeamSide,
    pub role: PlayerRole,
    pub attributes: PlayerAttributes,
    pub state: PlayerState,
    /// Formation slot in the team frame, attacking towards +x.
    pub slot: Vector3<f32>,
    pub yellow_cards: u8,
    pub is_active: bool,
}

impl MatchPlayer {
    pub fn from_squad(player: &SquadPlayer, team: TeamSide, slot: Vector3<f32>) -> Self {
        MatchPlayer {
            id: player.id,
            name: player.name.clone(),
            team,
            role: player.role,
            attributes: player.attributes,
            state: PlayerState::at(Vector3::zeros()),
            slot,
            yellow_cards: 0,
            is_active: true,
        }
    }

    #[inline]
    pub fn position_group(&self) -> PlayerFieldPositionGroup {
        self.role.position_group()
    }

    #[inline]
    pub fn position(&self) -> Vector3<f32> {
        self.state.position
    }

    /// Takes the player out of play and parks him on the nearest touchline.
    pub fn send_off(&mut self) {
        let side = if self.state.position.y >= 0.0 { 1.0 } else { -1.0 };

        self.is_active = false;
        self.state.position = Vector3::new(
            self.state.position.x.clamp(-field::HALF_LENGTH, field::HALF_LENGTH),
            side * field::HALF_WIDTH,
            0.0,
        );
        self.state.velocity = Vector3::zeros();
        self.state.cooldown = 0.0;
    }
}
