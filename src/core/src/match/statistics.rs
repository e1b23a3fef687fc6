use crate::r#match::{
    ActionOutcome, MatchEventLog, MatchEventType, PassResolution, PossessionBalancer, TeamSide,
};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TeamStatistics {
    pub goals: u32,
    pub shots: u32,
    pub shots_on_target: u32,
    pub expected_goals: f32,
    pub possession_percent: f64,
    pub possession_seconds: f64,
    pub passes_attempted: u32,
    pub passes_completed: u32,
    pub passes_intercepted: u32,
    pub passes_misplaced: u32,
    pub tackles_attempted: u32,
    pub tackles_won: u32,
    pub fouls: u32,
    pub yellow_cards: u32,
    pub red_cards: u32,
    pub corners: u32,
    pub throw_ins: u32,
    pub goal_kicks: u32,
}

impl TeamStatistics {
    pub fn pass_accuracy(&self) -> f32 {
        if self.passes_attempted == 0 {
            return 0.0;
        }

        self.passes_completed as f32 / self.passes_attempted as f32
    }

    fn count_events(&mut self, events: &MatchEventLog, team: TeamSide) {
        let count = |event_type| events.count(event_type, team) as u32;

        self.goals = count(MatchEventType::Goal);
        self.shots = count(MatchEventType::Shot);
        self.shots_on_target = count(MatchEventType::ShotOnTarget);
        self.fouls = count(MatchEventType::Foul);
        self.yellow_cards = count(MatchEventType::YellowCard);
        self.red_cards = count(MatchEventType::RedCard);
        self.corners = count(MatchEventType::Corner);
        self.throw_ins = count(MatchEventType::ThrowIn);
        self.goal_kicks = count(MatchEventType::GoalKick);
    }
}

/// Per-team counters plus match-level possession accounting. Action counters
/// are recorded as the match runs; event counts are taken from the log when
/// the match ends.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchStatistics {
    pub home: TeamStatistics,
    pub away: TeamStatistics,
    pub loose_ball_seconds: f64,
    pub elapsed_seconds: f64,
    /// Seconds during which neither team dominated the trailing window.
    pub time_in_balance: f64,
    pub possession_changes: u32,
    pub anomalies: u32,
}

impl MatchStatistics {
    pub fn team(&self, team: TeamSide) -> &TeamStatistics {
        match team {
            TeamSide::Home => &self.home,
            TeamSide::Away => &self.away,
        }
    }

    pub fn team_mut(&mut self, team: TeamSide) -> &mut TeamStatistics {
        match team {
            TeamSide::Home => &mut self.home,
            TeamSide::Away => &mut self.away,
        }
    }

    pub fn record_outcome(&mut self, team: TeamSide, outcome: &ActionOutcome) {
        let stats = self.team_mut(team);

        match *outcome {
            ActionOutcome::PassPlayed { .. } => stats.passes_attempted += 1,
            ActionOutcome::ShotOnTarget { xg }
            | ActionOutcome::ShotBlocked { xg }
            | ActionOutcome::ShotWide { xg } => stats.expected_goals += xg,
            ActionOutcome::TackleWon { .. } => {
                stats.tackles_attempted += 1;
                stats.tackles_won += 1;
            }
            ActionOutcome::TackleFailed { .. } => stats.tackles_attempted += 1,
        }
    }

    pub fn record_pass(&mut self, team: TeamSide, resolution: PassResolution) {
        let stats = self.team_mut(team);

        match resolution {
            PassResolution::Complete => stats.passes_completed += 1,
            PassResolution::Intercepted => stats.passes_intercepted += 1,
            PassResolution::Misplaced => stats.passes_misplaced += 1,
        }
    }

    pub fn finalize(&mut self, events: &MatchEventLog, balancer: &PossessionBalancer, anomalies: u32) {
        self.home.count_events(events, TeamSide::Home);
        self.away.count_events(events, TeamSide::Away);

        self.possession_changes = (events.count(MatchEventType::PossessionChange, TeamSide::Home)
            + events.count(MatchEventType::PossessionChange, TeamSide::Away))
            as u32;

        self.home.possession_seconds = balancer.home_seconds();
        self.away.possession_seconds = balancer.away_seconds();
        self.home.possession_percent = balancer.possession_percent(TeamSide::Home);
        self.away.possession_percent = balancer.possession_percent(TeamSide::Away);

        self.loose_ball_seconds = balancer.loose_seconds();
        self.elapsed_seconds = balancer.elapsed_seconds();
        self.time_in_balance = balancer.time_in_balance();
        self.anomalies = anomalies;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::r#match::{AgentTuning, FoulSeverity, MatchEvent};

    #[test]
    fn test_outcomes_accumulate() {
        let mut stats = MatchStatistics::default();

        stats.record_outcome(TeamSide::Home, &ActionOutcome::PassPlayed { receiver: 2 });
        stats.record_outcome(TeamSide::Home, &ActionOutcome::ShotWide { xg: 0.1 });
        stats.record_outcome(TeamSide::Home, &ActionOutcome::ShotOnTarget { xg: 0.25 });
        stats.record_outcome(
            TeamSide::Away,
            &ActionOutcome::TackleFailed {
                victim: 1,
                foul: Some(FoulSeverity::Careless),
            },
        );
        stats.record_pass(TeamSide::Home, PassResolution::Complete);

        assert_eq!(stats.home.passes_attempted, 1);
        assert_eq!(stats.home.pass_accuracy(), 1.0);
        assert!((stats.home.expected_goals - 0.35).abs() < 1e-6);
        assert_eq!(stats.away.tackles_attempted, 1);
        assert_eq!(stats.away.tackles_won, 0);
    }

    #[test]
    fn test_finalize_counts_events_and_possession() {
        let tuning = AgentTuning::default();
        let mut balancer = PossessionBalancer::new(&tuning);
        for _ in 0..30 {
            balancer.record(Some(TeamSide::Home), 0.1);
        }
        for _ in 0..10 {
            balancer.record(None, 0.1);
        }

        let mut events = MatchEventLog::new();
        events.push(MatchEvent::new(1.0, MatchEventType::Shot, TeamSide::Away, Some(20)));
        events.push(MatchEvent::new(2.0, MatchEventType::Corner, TeamSide::Away, None));
        events.push(MatchEvent::new(3.0, MatchEventType::PossessionChange, TeamSide::Home, Some(3)));

        let mut stats = MatchStatistics::default();
        stats.finalize(&events, &balancer, 2);

        assert_eq!(stats.away.shots, 1);
        assert_eq!(stats.away.corners, 1);
        assert_eq!(stats.possession_changes, 1);
        assert_eq!(stats.anomalies, 2);
        assert!((stats.home.possession_seconds + stats.away.possession_seconds + stats.loose_ball_seconds
            - stats.elapsed_seconds)
            .abs()
            < 1e-6);
    }
}
