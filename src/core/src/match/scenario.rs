use crate::r#match::{MatchEventType, TeamSide};
use crate::MatchError;
use serde::{Deserialize, Serialize};

pub const MIN_NARRATIVE_MULTIPLIER: f32 = 0.25;
pub const MAX_NARRATIVE_MULTIPLIER: f32 = 4.0;

/// One storyline nudge, e.g. "the away striker is more dangerous after minute 70".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeBoost {
    /// Inclusive start, exclusive end, in match minutes.
    pub minute_range: [u32; 2],
    pub event_type: MatchEventType,
    #[serde(default)]
    pub team: Option<TeamSide>,
    #[serde(default)]
    pub actor: Option<u32>,
    pub probability_boost: f32,
}

impl NarrativeBoost {
    fn applies(&self, event_type: MatchEventType, team: TeamSide, actor: Option<u32>, minute: u32) -> bool {
        self.event_type == event_type
            && minute >= self.minute_range[0]
            && minute < self.minute_range[1]
            && self.team.is_none_or(|t| t == team)
            && self.actor.is_none_or(|a| Some(a) == actor)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NarrativeScenario {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub boosts: Vec<NarrativeBoost>,
}

impl NarrativeScenario {
    pub fn validate(&self) -> Result<(), MatchError> {
        for boost in &self.boosts {
            if !boost.probability_boost.is_finite() || boost.probability_boost <= 0.0 {
                return Err(MatchError::InvalidConfig(format!(
                    "narrative boost for {:?} must be positive, got {}",
                    boost.event_type, boost.probability_boost
                )));
            }

            if boost.minute_range[0] > boost.minute_range[1] {
                return Err(MatchError::InvalidConfig(format!(
                    "narrative minute range {:?} is reversed",
                    boost.minute_range
                )));
            }
        }

        Ok(())
    }

    /// Product of every matching boost, clamped. Pure: never draws randomness.
    pub fn multiplier(
        &self,
        event_type: MatchEventType,
        team: TeamSide,
        actor: Option<u32>,
        minute: u32,
    ) -> f32 {
        self.boosts
            .iter()
            .filter(|boost| boost.applies(event_type, team, actor, minute))
            .map(|boost| boost.probability_boost)
            .product::<f32>()
            .clamp(MIN_NARRATIVE_MULTIPLIER, MAX_NARRATIVE_MULTIPLIER)
    }
}

/// Multiplier for an optional scenario; exactly 1.0 when there is none.
pub fn narrative_multiplier(
    scenario: Option<&NarrativeScenario>,
    event_type: MatchEventType,
    team: TeamSide,
    actor: Option<u32>,
    minute: u32,
) -> f32 {
    scenario
        .map(|s| s.multiplier(event_type, team, actor, minute))
        .unwrap_or(1.0)
}
