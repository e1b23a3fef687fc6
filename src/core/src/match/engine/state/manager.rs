use crate::r#match::engine::physics::constants::player;
use crate::r#match::{MatchContext, MatchField, MatchState};

pub struct StateManager {
    current_state: MatchState,
}

impl Default for StateManager {
    fn default() -> Self {
        Self::new()
    }
}

impl StateManager {
    pub fn new() -> Self {
        StateManager {
            current_state: MatchState::NotStarted,
        }
    }

    pub fn current(&self) -> MatchState {
        self.current_state
    }

    pub fn next(&mut self) -> Option<MatchState> {
        let next_state: MatchState = Self::get_next_state(self.current_state);

        match next_state {
            MatchState::Finished => {
                self.current_state = MatchState::Finished;
                None
            }
            _ => {
                self.current_state = next_state;
                Some(self.current_state)
            }
        }
    }

    fn get_next_state(current_state: MatchState) -> MatchState {
        match current_state {
            MatchState::NotStarted => MatchState::FirstHalf,
            MatchState::FirstHalf => MatchState::HalfTime,
            MatchState::HalfTime => MatchState::SecondHalf,
            MatchState::SecondHalf => MatchState::Finished,
            MatchState::Finished => MatchState::Finished,
        }
    }

    pub fn handle_state_finish(context: &mut MatchContext, field: &mut MatchField) {
        if context.state.need_swap_squads() {
            field.swap_squads();
        }

        match context.state {
            MatchState::FirstHalf => {
                Self::play_rest_time(field);
            }
            MatchState::HalfTime => {
                context.reset_period_time();
            }
            _ => {}
        }
    }

    fn play_rest_time(field: &mut MatchField) {
        field.players.iter_mut().for_each(|p| {
            p.state.stamina = (p.state.stamina + player::HALF_TIME_RECOVERY).min(1.0);
        })
    }
}
