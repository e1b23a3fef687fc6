use thiserror::Error;

/// A decision could not be made from the snapshot. The simulation recovers
/// by holding the player in place for the tick.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecisionError {
    #[error("player {player_id} has a non-finite position or velocity")]
    NonFiniteState { player_id: u32 },

    #[error("ball state is non-finite while player {player_id} decides")]
    NonFiniteBall { player_id: u32 },
}
