use crate::MatchError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MATCH_DURATION_SECONDS: f32 = 90.0 * 60.0;
pub const DEFAULT_TICK_SECONDS: f32 = 0.1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub duration_seconds: f32,
    pub dt: f32,
    pub enable_agents: bool,
    pub enable_position_behaviors: bool,
    pub collect_statistics: bool,
    pub verbose: bool,
    pub seed: u64,
    pub tuning: AgentTuning,
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig {
            duration_seconds: DEFAULT_MATCH_DURATION_SECONDS,
            dt: DEFAULT_TICK_SECONDS,
            enable_agents: true,
            enable_position_behaviors: true,
            collect_statistics: true,
            verbose: false,
            seed: 0,
            tuning: AgentTuning::default(),
        }
    }
}

impl MatchConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Played time is rounded to whole ticks of `dt`.
    pub fn with_duration(mut self, duration_seconds: f32) -> Self {
        self.duration_seconds = duration_seconds;
        self
    }

    pub fn validate(&self) -> Result<(), MatchError> {
        if !self.duration_seconds.is_finite() || self.duration_seconds < 0.0 {
            return Err(MatchError::InvalidConfig(format!(
                "duration_seconds must be a non-negative number, got {}",
                self.duration_seconds
            )));
        }

        if !self.dt.is_finite() || self.dt <= 0.0 || self.dt > 1.0 {
            return Err(MatchError::InvalidConfig(format!(
                "dt must be in (0, 1], got {}",
                self.dt
            )));
        }

        self.tuning.validate()
    }

    /// Whole ticks of simulated play, `duration_seconds / dt` rounded. An
    /// odd tick is played in the first half.
    pub fn total_ticks(&self) -> u64 {
        (self.duration_seconds / self.dt).round() as u64
    }
}

/// Every threshold the decision, execution and balancing layers read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentTuning {
    pub defender_engagement_radius: f32,
    pub midfielder_engagement_radius: f32,
    pub forward_engagement_radius: f32,
    pub goalkeeper_engagement_radius: f32,

    pub tackle_radius: f32,
    /// Chance per tick that a defender in reach goes to ground.
    pub tackle_attempt_rate: f32,
    pub pressers: usize,
    /// A new carrier is not challenged until he has had the ball this long.
    pub challenge_settle_seconds: f32,

    pub shot_range: f32,
    pub shot_quality_cutoff: f32,
    pub close_range_shot_distance: f32,

    pub pass_quality_cutoff: f32,
    pub min_pass_distance: f32,
    pub max_pass_distance: f32,
    pub max_hold_seconds: f32,
    pub pass_tempo: f32,
    /// Lowest completion chance a pressured carrier will still risk.
    pub forced_pass_min_completion: f32,

    pub pressure_radius: f32,
    pub marking_radius: f32,
    pub mark_distance: f32,
    pub press_distance: f32,
    pub arrival_tolerance: f32,

    pub failed_tackle_cooldown: f32,
    pub tackled_cooldown: f32,
    pub foul_base_rate: f32,

    pub balance_window_seconds: f32,
    pub balance_gain: f32,
    pub min_assist_factor: f32,
    pub max_assist_factor: f32,
    pub dominance_high_water: f32,

    pub restart_jitter_radius: f32,
    pub restart_protection_seconds: f32,
}

impl Default for AgentTuning {
    fn default() -> Self {
        AgentTuning {
            defender_engagement_radius: 18.0,
            midfielder_engagement_radius: 22.0,
            forward_engagement_radius: 18.0,
            goalkeeper_engagement_radius: 12.0,

            tackle_radius: 2.0,
            tackle_attempt_rate: 0.12,
            pressers: 2,
            challenge_settle_seconds: 0.5,

            shot_range: 26.0,
            shot_quality_cutoff: 0.10,
            close_range_shot_distance: 11.0,

            pass_quality_cutoff: 0.35,
            min_pass_distance: 4.0,
            max_pass_distance: 42.0,
            max_hold_seconds: 3.5,
            pass_tempo: 0.025,
            forced_pass_min_completion: 0.6,

            pressure_radius: 3.5,
            marking_radius: 14.0,
            mark_distance: 2.0,
            press_distance: 1.0,
            arrival_tolerance: 1.0,

            failed_tackle_cooldown: 1.2,
            tackled_cooldown: 0.6,
            foul_base_rate: 0.10,

            balance_window_seconds: 90.0,
            balance_gain: 0.5,
            min_assist_factor: 0.8,
            max_assist_factor: 1.2,
            dominance_high_water: 0.70,

            restart_jitter_radius: 2.0,
            restart_protection_seconds: 1.0,
        }
    }
}

impl AgentTuning {
    pub fn validate(&self) -> Result<(), MatchError> {
        let radii = [
            ("defender_engagement_radius", self.defender_engagement_radius),
            ("midfielder_engagement_radius", self.midfielder_engagement_radius),
            ("forward_engagement_radius", self.forward_engagement_radius),
            ("goalkeeper_engagement_radius", self.goalkeeper_engagement_radius),
            ("tackle_radius", self.tackle_radius),
            ("shot_range", self.shot_range),
            ("max_pass_distance", self.max_pass_distance),
            ("pressure_radius", self.pressure_radius),
            ("marking_radius", self.marking_radius),
            ("balance_window_seconds", self.balance_window_seconds),
        ];

        if let Some((name, value)) = radii
            .iter()
            .find(|(_, value)| !value.is_finite() || *value <= 0.0)
        {
            return Err(MatchError::InvalidConfig(format!(
                "{name} must be positive, got {value}"
            )));
        }

        let rates = [
            ("tackle_attempt_rate", self.tackle_attempt_rate),
            ("pass_tempo", self.pass_tempo),
            ("forced_pass_min_completion", self.forced_pass_min_completion),
            ("foul_base_rate", self.foul_base_rate),
            ("dominance_high_water", self.dominance_high_water),
        ];

        if let Some((name, value)) = rates
            .iter()
            .find(|(_, value)| !(0.0..=1.0).contains(value))
        {
            return Err(MatchError::InvalidConfig(format!(
                "{name} must be within 0..=1, got {value}"
            )));
        }

        if !(self.min_assist_factor > 0.0
            && self.min_assist_factor <= 1.0
            && self.max_assist_factor >= 1.0)
        {
            return Err(MatchError::InvalidConfig(format!(
                "assist factor bounds must bracket 1.0, got [{}, {}]",
                self.min_assist_factor, self.max_assist_factor
            )));
        }

        if !self.challenge_settle_seconds.is_finite() || self.challenge_settle_seconds < 0.0 {
            return Err(MatchError::InvalidConfig(
                "challenge_settle_seconds must be non-negative".to_string(),
            ));
        }

        if !self.restart_jitter_radius.is_finite() || self.restart_jitter_radius < 0.0 {
            return Err(MatchError::InvalidConfig(
                "restart_jitter_radius must be non-negative".to_string(),
            ));
        }

        Ok(())
    }

    pub fn engagement_radius(&self, group: crate::PlayerFieldPositionGroup) -> f32 {
        use crate::PlayerFieldPositionGroup::*;

        match group {
            Goalkeeper => self.goalkeeper_engagement_radius,
            Defender => self.defender_engagement_radius,
            Midfielder => self.midfielder_engagement_radius,
            Forward => self.forward_engagement_radius,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(MatchConfig::default().validate().is_ok());
    }

    #[test]
    fn test_total_ticks() {
        let config = MatchConfig::default().with_duration(300.0);
        assert_eq!(config.total_ticks(), 3000);

        let config = MatchConfig::default().with_duration(0.0);
        assert_eq!(config.total_ticks(), 0);

        let config = MatchConfig::default().with_duration(0.1);
        assert_eq!(config.total_ticks(), 1);

        let config = MatchConfig::default().with_duration(30.1);
        assert_eq!(config.total_ticks(), 301);
    }

    #[test]
    fn test_rejects_bad_dt() {
        let mut config = MatchConfig::default();
        config.dt = 0.0;
        assert!(matches!(config.validate(), Err(MatchError::InvalidConfig(_))));

        config.dt = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_assist_bounds() {
        let mut config = MatchConfig::default();
        config.tuning.max_assist_factor = 0.9;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: MatchConfig =
            serde_json::from_str(r#"{ "seed": 7, "duration_seconds": 600 }"#).unwrap();

        assert_eq!(config.seed, 7);
        assert_eq!(config.duration_seconds, 600.0);
        assert_eq!(config.dt, DEFAULT_TICK_SECONDS);
        assert_eq!(config.tuning, AgentTuning::default());
    }
}
