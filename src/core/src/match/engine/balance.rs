use crate::r#match::{AgentTuning, TeamSide};
use std::collections::VecDeque;

/// Share band both teams sit in when possession counts as balanced.
const BALANCED_SHARE_LOW: f64 = 0.30;
const BALANCED_SHARE_HIGH: f64 = 0.70;

/// Tracks who has the ball over the match and over a trailing window, and
/// turns the imbalance into a bounded assist for the team that is behind.
///
/// Owned by the simulation and handed to each decision by reference.
#[derive(Debug, Clone)]
pub struct PossessionBalancer {
    home_seconds: f64,
    away_seconds: f64,
    loose_seconds: f64,
    balanced_seconds: f64,

    window: VecDeque<(Option<TeamSide>, f64)>,
    window_capacity: f64,
    window_total: f64,
    window_home: f64,
    window_away: f64,

    gain: f32,
    min_factor: f32,
    max_factor: f32,
    high_water: f32,
}

impl PossessionBalancer {
    pub fn new(tuning: &AgentTuning) -> Self {
        PossessionBalancer {
            home_seconds: 0.0,
            away_seconds: 0.0,
            loose_seconds: 0.0,
            balanced_seconds: 0.0,
            window: VecDeque::new(),
            window_capacity: tuning.balance_window_seconds as f64,
            window_total: 0.0,
            window_home: 0.0,
            window_away: 0.0,
            gain: tuning.balance_gain,
            min_factor: tuning.min_assist_factor,
            max_factor: tuning.max_assist_factor,
            high_water: tuning.dominance_high_water,
        }
    }

    /// Credits `dt` seconds to the owning team, or to loose play.
    pub fn record(&mut self, owner: Option<TeamSide>, dt: f32) {
        let dt = dt as f64;

        match owner {
            Some(TeamSide::Home) => {
                self.home_seconds += dt;
                self.window_home += dt;
            }
            Some(TeamSide::Away) => {
                self.away_seconds += dt;
                self.window_away += dt;
            }
            None => self.loose_seconds += dt,
        }

        self.window.push_back((owner, dt));
        self.window_total += dt;

        while self.window_total > self.window_capacity {
            match self.window.pop_front() {
                Some((team, seconds)) => {
                    self.window_total -= seconds;
                    match team {
                        Some(TeamSide::Home) => self.window_home -= seconds,
                        Some(TeamSide::Away) => self.window_away -= seconds,
                        None => {}
                    }
                }
                None => break,
            }
        }

        if self.is_balanced() {
            self.balanced_seconds += dt;
        }
    }

    /// Home minus away share of owned time in the trailing window, in `[-1, 1]`.
    pub fn possession_balance(&self) -> f32 {
        let owned = self.window_home + self.window_away;

        if owned <= f64::EPSILON {
            return 0.0;
        }

        (((self.window_home - self.window_away) / owned) as f32).clamp(-1.0, 1.0)
    }

    pub fn dominant_team(&self) -> Option<TeamSide> {
        let share = (self.possession_balance() + 1.0) / 2.0;

        if share > self.high_water {
            Some(TeamSide::Home)
        } else if 1.0 - share > self.high_water {
            Some(TeamSide::Away)
        } else {
            None
        }
    }

    /// Bounded multiplicative help: above 1.0 for the team losing the
    /// possession battle, below 1.0 for the team winning it.
    pub fn assist_factor(&self, team: TeamSide) -> f32 {
        let balance = match team {
            TeamSide::Home => self.possession_balance(),
            TeamSide::Away => -self.possession_balance(),
        };

        (1.0 - self.gain * balance).clamp(self.min_factor, self.max_factor)
    }

    /// Scales the pass-quality cutoff: the dominant team needs safer
    /// passes, the team chasing the ball takes more risk.
    pub fn pass_caution(&self, team: TeamSide) -> f32 {
        1.0 / self.assist_factor(team)
    }

    fn is_balanced(&self) -> bool {
        let owned = self.home_seconds + self.away_seconds;

        if owned <= f64::EPSILON {
            return true;
        }

        let share = self.home_seconds / owned;
        (BALANCED_SHARE_LOW..=BALANCED_SHARE_HIGH).contains(&share)
    }

    pub fn time_in_balance(&self) -> f64 {
        self.balanced_seconds
    }

    pub fn home_seconds(&self) -> f64 {
        self.home_seconds
    }

    pub fn away_seconds(&self) -> f64 {
        self.away_seconds
    }

    pub fn loose_seconds(&self) -> f64 {
        self.loose_seconds
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.home_seconds + self.away_seconds + self.loose_seconds
    }

    /// Cumulative possession share of a team in percent; 50 before anyone had the ball.
    pub fn possession_percent(&self, team: TeamSide) -> f64 {
        let owned = self.home_seconds + self.away_seconds;

        if owned <= f64::EPSILON {
            return 50.0;
        }

        let seconds = match team {
            TeamSide::Home => self.home_seconds,
            TeamSide::Away => self.away_seconds,
        };

        seconds / owned * 100.0
    }
}
