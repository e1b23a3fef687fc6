use crate::r#match::engine::rng::MatchRng;
use crate::r#match::{MatchSquad, PlayerAttributes, PlayerRole, SquadPlayer};
use serde::{Deserialize, Serialize};

/// 4-3-3 starting roles in shirt order.
const STARTING_ROLES: [PlayerRole; 11] = [
    PlayerRole::Goalkeeper,
    PlayerRole::FullBack,
    PlayerRole::CentreBack,
    PlayerRole::CentreBack,
    PlayerRole::FullBack,
    PlayerRole::DefensiveMidfielder,
    PlayerRole::CentralMidfielder,
    PlayerRole::CentralMidfielder,
    PlayerRole::Winger,
    PlayerRole::Striker,
    PlayerRole::Winger,
];

const SUBSTITUTE_ROLES: [PlayerRole; 5] = [
    PlayerRole::Goalkeeper,
    PlayerRole::CentreBack,
    PlayerRole::CentralMidfielder,
    PlayerRole::Winger,
    PlayerRole::Striker,
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SquadProfile {
    pub base: f32,
    #[serde(default)]
    pub spread: f32,
    /// Overrides shooting, passing and dribbling for every outfield player.
    #[serde(default)]
    pub attack: Option<f32>,
}

impl SquadProfile {
    pub fn uniform(base: f32) -> Self {
        SquadProfile {
            base,
            spread: 0.0,
            attack: None,
        }
    }

    pub fn with_attack(mut self, attack: f32) -> Self {
        self.attack = Some(attack);
        self
    }
}

pub struct SquadGenerator {
    rng: MatchRng,
}

impl SquadGenerator {
    pub fn new(seed: u64) -> Self {
        SquadGenerator {
            rng: MatchRng::seed_from(seed),
        }
    }

    /// Player ids are `team_id * 100 + shirt`, so squads built for different
    /// team ids never collide.
    pub fn generate(&mut self, team_id: u32, team_name: &str, profile: &SquadProfile) -> MatchSquad {
        let main_squad = STARTING_ROLES
            .iter()
            .enumerate()
            .map(|(idx, role)| self.player(team_id * 100 + idx as u32 + 1, *role, profile))
            .collect();

        let substitutes = SUBSTITUTE_ROLES
            .iter()
            .enumerate()
            .map(|(idx, role)| self.player(team_id * 100 + 12 + idx as u32, *role, profile))
            .collect();

        MatchSquad {
            team_id,
            team_name: team_name.to_string(),
            main_squad,
            substitutes,
        }
    }

    fn player(&mut self, id: u32, role: PlayerRole, profile: &SquadProfile) -> SquadPlayer {
        let mut attributes = PlayerAttributes {
            pace: self.rating(profile),
            shooting: self.rating(profile),
            passing: self.rating(profile),
            dribbling: self.rating(profile),
            defending: self.rating(profile),
            physical: self.rating(profile),
            stamina: self.rating(profile),
        };

        if let Some(attack) = profile.attack {
            if !role.is_goalkeeper() {
                attributes = attributes.with_attack(attack.clamp(0.0, 100.0));
            }
        }

        SquadPlayer::new(id, role, attributes)
    }

    fn rating(&mut self, profile: &SquadProfile) -> f32 {
        if profile.spread <= 0.0 {
            return profile.base.clamp(0.0, 100.0);
        }

        self.rng
            .range(profile.base - profile.spread, profile.base + profile.spread)
            .clamp(0.0, 100.0)
    }
}
