use crate::LoadError;
use log::info;
use match_core::MatchSquad;
use serde::Deserialize;
use std::path::Path;

const STATIC_SQUADS_JSON: &str = include_str!("../../data/squads.json");

#[derive(Deserialize)]
pub struct FixtureEntity {
    pub home: MatchSquad,
    pub away: MatchSquad,
}

pub struct SquadLoader;

impl SquadLoader {
    /// The two squads shipped with the crate.
    pub fn bundled() -> Result<FixtureEntity, LoadError> {
        Self::parse(STATIC_SQUADS_JSON)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<FixtureEntity, LoadError> {
        let path = path.as_ref();

        let json = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let fixture = Self::parse(&json)?;

        info!(
            "squads loaded from {}: {} vs {}",
            path.display(),
            fixture.home.team_name,
            fixture.away.team_name
        );

        Ok(fixture)
    }

    pub fn parse(json: &str) -> Result<FixtureEntity, LoadError> {
        let fixture: FixtureEntity = serde_json::from_str(json)?;

        MatchSquad::validate_pair(&fixture.home, &fixture.away)?;

        Ok(fixture)
    }
}
