use thiserror::Error;

/// Fatal input problems. Reported before the first tick; a match never starts
/// with a squad or configuration that fails these checks.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
    #[error("team {team_id} has {count} starters, expected 11")]
    InvalidSquadSize { team_id: u32, count: usize },

    #[error("team {team_id} has {count} goalkeepers among starters, expected exactly 1")]
    InvalidGoalkeeperCount { team_id: u32, count: usize },

    #[error("player {player_id}: attribute `{attribute}` = {value} is outside 0..=100")]
    InvalidAttribute {
        player_id: u32,
        attribute: &'static str,
        value: f32,
    },

    #[error("player id {player_id} appears more than once")]
    DuplicatePlayer { player_id: u32 },

    #[error("player {player_id}: formation position ({x}, {y}) is outside the own half")]
    InvalidPosition { player_id: u32, x: f32, y: f32 },

    #[error("both squads use team id {team_id}")]
    SameTeam { team_id: u32 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
