use crate::MatchError;
use serde::{Deserialize, Serialize};

pub const ATTRIBUTE_MIN: f32 = 0.0;
pub const ATTRIBUTE_MAX: f32 = 100.0;

/// Static player ratings on a 0..=100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerAttributes {
    pub pace: f32,
    pub shooting: f32,
    pub passing: f32,
    pub dribbling: f32,
    pub defending: f32,
    pub physical: f32,
    pub stamina: f32,
}

impl Default for PlayerAttributes {
    fn default() -> Self {
        PlayerAttributes::uniform(50.0)
    }
}

impl PlayerAttributes {
    pub fn uniform(value: f32) -> Self {
        PlayerAttributes {
            pace: value,
            shooting: value,
            passing: value,
            dribbling: value,
            defending: value,
            physical: value,
            stamina: value,
        }
    }

    pub fn with_attack(mut self, value: f32) -> Self {
        self.shooting = value;
        self.passing = value;
        self.dribbling = value;
        self
    }

    pub fn validate(&self, player_id: u32) -> Result<(), MatchError> {
        for (attribute, value) in self.named() {
            if !value.is_finite() || !(ATTRIBUTE_MIN..=ATTRIBUTE_MAX).contains(&value) {
                return Err(MatchError::InvalidAttribute {
                    player_id,
                    attribute,
                    value,
                });
            }
        }

        Ok(())
    }

    fn named(&self) -> [(&'static str, f32); 7] {
        [
            ("pace", self.pace),
            ("shooting", self.shooting),
            ("passing", self.passing),
            ("dribbling", self.dribbling),
            ("defending", self.defending),
            ("physical", self.physical),
            ("stamina", self.stamina),
        ]
    }

    /// Keeper handling is modelled from defending and physical ratings.
    #[inline]
    pub fn goalkeeping(&self) -> f32 {
        0.7 * self.defending + 0.3 * self.physical
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayerRole {
    #[serde(rename = "GK")]
    Goalkeeper,
    #[serde(rename = "CB")]
    CentreBack,
    #[serde(rename = "FB", alias = "LB", alias = "RB", alias = "LWB", alias = "RWB")]
    FullBack,
    #[serde(rename = "DM", alias = "CDM")]
    DefensiveMidfielder,
    #[serde(rename = "CM", alias = "LM", alias = "RM")]
    CentralMidfielder,
    #[serde(rename = "CAM", alias = "AM")]
    AttackingMidfielder,
    #[serde(rename = "WG", alias = "LW", alias = "RW")]
    Winger,
    #[serde(rename = "ST", alias = "CF")]
    Striker,
}

impl PlayerRole {
    pub fn position_group(&self) -> PlayerFieldPositionGroup {
        match self {
            PlayerRole::Goalkeeper => PlayerFieldPositionGroup::Goalkeeper,
            PlayerRole::CentreBack | PlayerRole::FullBack => PlayerFieldPositionGroup::Defender,
            PlayerRole::DefensiveMidfielder
            | PlayerRole::CentralMidfielder
            | PlayerRole::AttackingMidfielder => PlayerFieldPositionGroup::Midfielder,
            PlayerRole::Winger | PlayerRole::Striker => PlayerFieldPositionGroup::Forward,
        }
    }

    pub fn is_goalkeeper(&self) -> bool {
        *self == PlayerRole::Goalkeeper
    }

    /// Players who mark opponents when the ball is lost.
    pub fn is_defensive(&self) -> bool {
        matches!(
            self,
            PlayerRole::CentreBack | PlayerRole::FullBack | PlayerRole::DefensiveMidfielder
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum PlayerFieldPositionGroup {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
}

impl PlayerFieldPositionGroup {
    /// Ordering used when two players are equally close to a loose ball.
    #[inline]
    pub fn priority(&self) -> u8 {
        match self {
            PlayerFieldPositionGroup::Goalkeeper => 0,
            PlayerFieldPositionGroup::Defender => 1,
            PlayerFieldPositionGroup::Midfielder => 2,
            PlayerFieldPositionGroup::Forward => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_bounds() {
        assert!(PlayerAttributes::uniform(0.0).validate(1).is_ok());
        assert!(PlayerAttributes::uniform(100.0).validate(1).is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let mut attributes = PlayerAttributes::uniform(60.0);
        attributes.dribbling = 101.0;

        assert_eq!(
            attributes.validate(9),
            Err(MatchError::InvalidAttribute {
                player_id: 9,
                attribute: "dribbling",
                value: 101.0
            })
        );
    }

    #[test]
    fn test_role_aliases() {
        let role: PlayerRole = serde_json::from_str("\"LB\"").unwrap();
        assert_eq!(role, PlayerRole::FullBack);

        let role: PlayerRole = serde_json::from_str("\"CF\"").unwrap();
        assert_eq!(role, PlayerRole::Striker);
    }

    #[test]
    fn test_position_group_priority_order() {
        assert!(
            PlayerFieldPositionGroup::Goalkeeper.priority()
                < PlayerFieldPositionGroup::Defender.priority()
        );
        assert!(
            PlayerFieldPositionGroup::Midfielder.priority()
                < PlayerFieldPositionGroup::Forward.priority()
        );
    }
}
