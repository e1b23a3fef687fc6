use crate::r#match::{MatchState, TeamSide};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Score {
    pub home: u32,
    pub away: u32,
}

impl Score {
    pub fn new() -> Self {
        Score::default()
    }

    pub fn increment(&mut self, team: TeamSide) {
        match team {
            TeamSide::Home => self.home += 1,
            TeamSide::Away => self.away += 1,
        }
    }

    pub fn get(&self, team: TeamSide) -> u32 {
        match team {
            TeamSide::Home => self.home,
            TeamSide::Away => self.away,
        }
    }
}

/// Integer tick clock; seconds are always derived, never accumulated.
#[derive(Debug, Clone, Copy)]
pub struct MatchTime {
    pub ticks: u64,
    pub dt: f32,
}

impl MatchTime {
    pub fn new(dt: f32) -> Self {
        MatchTime { ticks: 0, dt }
    }

    #[inline]
    pub fn increment(&mut self, ticks: u64) -> u64 {
        self.ticks += ticks;
        self.ticks
    }

    #[inline]
    pub fn seconds(&self) -> f32 {
        (self.ticks as f64 * self.dt as f64) as f32
    }

    #[inline]
    pub fn minute(&self) -> u32 {
        (self.seconds() / 60.0) as u32
    }
}

pub struct MatchContext {
    pub state: MatchState,
    pub time: MatchTime,
    pub score: Score,

    period_ticks: u64,
    /// First half takes the odd tick when the total does not split evenly.
    half_ticks: [u64; 2],
    period: usize,

    pub(crate) logging_enabled: bool,
}

impl MatchContext {
    pub fn new(dt: f32, total_ticks: u64) -> Self {
        MatchContext {
            state: MatchState::NotStarted,
            time: MatchTime::new(dt),
            score: Score::new(),
            period_ticks: 0,
            half_ticks: [total_ticks - total_ticks / 2, total_ticks / 2],
            period: 0,
            logging_enabled: false,
        }
    }

    /// True while the current half still has a tick to play. Advances both clocks.
    pub fn increment_time(&mut self) -> bool {
        if self.is_period_over() {
            return false;
        }

        self.period_ticks += 1;
        self.time.increment(1);

        true
    }

    pub fn is_period_over(&self) -> bool {
        self.period_ticks >= self.half_ticks[self.period]
    }

    /// Starts the clock for the second half.
    pub fn reset_period_time(&mut self) {
        self.period_ticks = 0;
        self.period = 1;
    }

    pub fn enable_logging(&mut self) {
        self.logging_enabled = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialization() {
        let match_time = MatchTime::new(0.1);
        assert_eq!(match_time.ticks, 0);
        assert_eq!(match_time.seconds(), 0.0);
    }

    #[test]
    fn test_increment() {
        let mut match_time = MatchTime::new(0.1);

        let incremented_time = match_time.increment(10);
        assert_eq!(match_time.ticks, 10);
        assert_eq!(incremented_time, 10);

        let incremented_time_again = match_time.increment(5);
        assert_eq!(match_time.ticks, 15);
        assert_eq!(incremented_time_again, 15);
        assert!((match_time.seconds() - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_seconds_do_not_drift() {
        let mut match_time = MatchTime::new(0.1);
        match_time.increment(54_000);

        assert_eq!(match_time.seconds(), 5400.0);
        assert_eq!(match_time.minute(), 90);
    }

    #[test]
    fn test_period_ends_after_half_the_ticks() {
        let mut context = MatchContext::new(0.1, 10);

        let played = std::iter::from_fn(|| context.increment_time().then_some(())).count();
        assert_eq!(played, 5);
        assert!(context.is_period_over());

        context.reset_period_time();
        assert!(context.increment_time());
        assert_eq!(context.time.ticks, 6);
    }

    #[test]
    fn test_odd_tick_goes_to_first_half() {
        let mut context = MatchContext::new(0.1, 7);

        let first = std::iter::from_fn(|| context.increment_time().then_some(())).count();
        context.reset_period_time();
        let second = std::iter::from_fn(|| context.increment_time().then_some(())).count();

        assert_eq!((first, second), (4, 3));
        assert_eq!(context.time.ticks, 7);
    }

    #[test]
    fn test_single_tick_match_is_played() {
        let mut context = MatchContext::new(0.1, 1);

        assert!(context.increment_time());
        assert!(!context.increment_time());

        context.reset_period_time();
        assert!(!context.increment_time());
        assert_eq!(context.time.ticks, 1);
    }

    #[test]
    fn test_score_increment() {
        let mut score = Score::new();
        score.increment(TeamSide::Away);
        score.increment(TeamSide::Away);

        assert_eq!(score.get(TeamSide::Away), 2);
        assert_eq!(score.home, 0);
    }
}
