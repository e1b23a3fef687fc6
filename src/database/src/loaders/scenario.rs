use crate::LoadError;
use log::info;
use match_core::NarrativeScenario;
use std::path::Path;

const STATIC_SCENARIO_JSON: &str = include_str!("../../data/scenario.json");

pub struct ScenarioLoader;

impl ScenarioLoader {
    pub fn bundled() -> Result<NarrativeScenario, LoadError> {
        Self::parse(STATIC_SCENARIO_JSON)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<NarrativeScenario, LoadError> {
        let path = path.as_ref();

        let json = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let scenario = Self::parse(&json)?;

        info!(
            "scenario loaded from {}: {} boosts",
            path.display(),
            scenario.boosts.len()
        );

        Ok(scenario)
    }

    pub fn parse(json: &str) -> Result<NarrativeScenario, LoadError> {
        let scenario: NarrativeScenario = serde_json::from_str(json)?;

        scenario.validate()?;

        Ok(scenario)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use match_core::{MatchEventType, TeamSide};

    #[test]
    fn test_bundled_scenario() {
        let scenario = ScenarioLoader::bundled().unwrap();

        assert_eq!(scenario.boosts.len(), 3);
        assert!((scenario.multiplier(MatchEventType::Shot, TeamSide::Away, None, 75) - 1.3).abs() < 1e-6);
        assert_eq!(scenario.multiplier(MatchEventType::Shot, TeamSide::Home, None, 75), 1.0);
    }

    #[test]
    fn test_empty_object_is_neutral() {
        let scenario = ScenarioLoader::parse("{}").unwrap();

        assert_eq!(scenario, NarrativeScenario::default());
    }

    #[test]
    fn test_negative_boost_is_rejected() {
        let json = r#"{ "boosts": [ { "minute_range": [0, 90], "event_type": "goal", "probability_boost": -1.0 } ] }"#;

        assert!(matches!(ScenarioLoader::parse(json), Err(LoadError::Validation(_))));
    }

    #[test]
    fn test_round_trip_through_file() {
        let path = std::env::temp_dir().join(format!("scenario-{}.json", std::process::id()));
        std::fs::write(&path, STATIC_SCENARIO_JSON).unwrap();

        let loaded = ScenarioLoader::from_path(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, ScenarioLoader::bundled().unwrap());
    }
}
