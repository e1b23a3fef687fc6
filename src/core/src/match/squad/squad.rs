use crate::r#match::engine::physics::constants::field;
use crate::r#match::{PlayerAttributes, PlayerRole};
use crate::MatchError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const STARTERS_COUNT: usize = 11;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SquadPlayer {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    pub role: PlayerRole,
    /// Formation slot in the team frame: attacking towards +x, own half at x <= 0.
    #[serde(default)]
    pub position: Option<[f32; 2]>,
    pub attributes: PlayerAttributes,
}

impl SquadPlayer {
    pub fn new(id: u32, role: PlayerRole, attributes: PlayerAttributes) -> Self {
        SquadPlayer {
            id,
            name: format!("Player {id}"),
            role,
            position: None,
            attributes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSquad {
    pub team_id: u32,
    pub team_name: String,
    #[serde(alias = "starters")]
    pub main_squad: Vec<SquadPlayer>,
    #[serde(default)]
    pub substitutes: Vec<SquadPlayer>,
}

impl MatchSquad {
    pub fn validate(&self) -> Result<(), MatchError> {
        if self.main_squad.len() != STARTERS_COUNT {
            return Err(MatchError::InvalidSquadSize {
                team_id: self.team_id,
                count: self.main_squad.len(),
            });
        }

        let goalkeepers = self
            .main_squad
            .iter()
            .filter(|p| p.role.is_goalkeeper())
            .count();

        if goalkeepers != 1 {
            return Err(MatchError::InvalidGoalkeeperCount {
                team_id: self.team_id,
                count: goalkeepers,
            });
        }

        for player in self.main_squad.iter().chain(self.substitutes.iter()) {
            player.attributes.validate(player.id)?;

            if let Some([x, y]) = player.position {
                let inside_own_half = x.is_finite()
                    && y.is_finite()
                    && (-field::HALF_LENGTH..=0.0).contains(&x)
                    && (-field::HALF_WIDTH..=field::HALF_WIDTH).contains(&y);

                if !inside_own_half {
                    return Err(MatchError::InvalidPosition {
                        player_id: player.id,
                        x,
                        y,
                    });
                }
            }
        }

        Ok(())
    }

    /// Validates both squads and checks that no player id is shared.
    pub fn validate_pair(home: &MatchSquad, away: &MatchSquad) -> Result<(), MatchError> {
        if home.team_id == away.team_id {
            return Err(MatchError::SameTeam {
                team_id: home.team_id,
            });
        }

        home.validate()?;
        away.validate()?;

        let mut seen = BTreeSet::new();

        for squad in [home, away] {
            for player in squad.main_squad.iter().chain(squad.substitutes.iter()) {
                if !seen.insert(player.id) {
                    return Err(MatchError::DuplicatePlayer {
                        player_id: player.id,
                    });
                }
            }
        }

        Ok(())
    }
}
