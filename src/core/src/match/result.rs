use crate::r#match::{MatchEventLog, MatchStatistics, Score};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PerformanceMetrics {
    /// Simulated seconds per wall-clock second.
    pub simulation_speed: f64,
    pub ticks: u64,
    pub elapsed_ms: u64,
    pub simulated_seconds: f64,
}

impl PerformanceMetrics {
    pub fn new(ticks: u64, simulated_seconds: f64, elapsed_ms: u64) -> Self {
        let simulation_speed = if elapsed_ms > 0 {
            simulated_seconds / (elapsed_ms as f64 / 1000.0)
        } else {
            0.0
        };

        PerformanceMetrics {
            simulation_speed,
            ticks,
            elapsed_ms,
            simulated_seconds,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub home_team_id: u32,
    pub away_team_id: u32,
    pub seed: u64,
    pub final_score: Score,
    pub events: MatchEventLog,
    pub statistics: MatchStatistics,
    pub performance: PerformanceMetrics,
    /// The run was cancelled before full time.
    pub terminated_early: bool,
}

impl MatchResult {
    pub fn home_goals(&self) -> u32 {
        self.final_score.home
    }

    pub fn away_goals(&self) -> u32 {
        self.final_score.away
    }

    /// Outcome without the wall-clock section, for comparing runs.
    pub fn outcome_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&(&self.final_score, &self.events, &self.statistics))
    }
}
