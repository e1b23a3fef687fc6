use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchState {
    NotStarted,
    FirstHalf,
    HalfTime,
    SecondHalf,
    Finished,
}

impl MatchState {
    #[inline]
    pub fn is_playing(&self) -> bool {
        matches!(self, MatchState::FirstHalf | MatchState::SecondHalf)
    }

    /// Teams change ends once this state is over.
    pub fn need_swap_squads(&self) -> bool {
        *self == MatchState::FirstHalf
    }
}
