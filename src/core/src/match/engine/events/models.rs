use crate::r#match::TeamSide;
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchEventType {
    Goal,
    Shot,
    ShotOnTarget,
    Corner,
    ThrowIn,
    GoalKick,
    Foul,
    YellowCard,
    RedCard,
    PossessionChange,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchEvent {
    /// Seconds of play since kickoff.
    pub time: f32,
    pub minute: u32,
    pub event_type: MatchEventType,
    pub team: TeamSide,
    pub actor: Option<u32>,
}

impl MatchEvent {
    pub fn new(time: f32, event_type: MatchEventType, team: TeamSide, actor: Option<u32>) -> Self {
        MatchEvent {
            time,
            minute: minute_of(time),
            event_type,
            team,
            actor,
        }
    }
}

#[inline]
pub fn minute_of(time: f32) -> u32 {
    (time.max(0.0) / 60.0) as u32
}

/// Append-only, chronologically ordered record of a match.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MatchEventLog {
    events: Vec<MatchEvent>,
}

impl MatchEventLog {
    pub fn new() -> Self {
        MatchEventLog { events: Vec::new() }
    }

    pub fn push(&mut self, event: MatchEvent) {
        debug!("Match event: {:?}", event);

        self.events.push(event);
    }

    pub fn extend(&mut self, events: Vec<MatchEvent>) {
        for event in events {
            self.push(event);
        }
    }

    pub fn events(&self) -> &[MatchEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn count(&self, event_type: MatchEventType, team: TeamSide) -> usize {
        self.events
            .iter()
            .filter(|e| e.event_type == event_type && e.team == team)
            .count()
    }

    pub fn into_vec(self) -> Vec<MatchEvent> {
        self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minute_of() {
        assert_eq!(minute_of(0.0), 0);
        assert_eq!(minute_of(59.9), 0);
        assert_eq!(minute_of(60.0), 1);
        assert_eq!(minute_of(5399.9), 89);
    }

    #[test]
    fn test_log_counts() {
        let mut log = MatchEventLog::new();
        log.push(MatchEvent::new(10.0, MatchEventType::Shot, TeamSide::Home, Some(9)));
        log.push(MatchEvent::new(11.0, MatchEventType::Goal, TeamSide::Home, Some(9)));
        log.push(MatchEvent::new(30.0, MatchEventType::Shot, TeamSide::Away, Some(20)));

        assert_eq!(log.len(), 3);
        assert_eq!(log.count(MatchEventType::Shot, TeamSide::Home), 1);
        assert_eq!(log.count(MatchEventType::Goal, TeamSide::Away), 0);
    }

    #[test]
    fn test_event_serializes_snake_case() {
        let event = MatchEvent::new(61.0, MatchEventType::ShotOnTarget, TeamSide::Away, None);
        let json = serde_json::to_string(&event).unwrap();

        assert!(json.contains("\"event_type\":\"shot_on_target\""));
        assert!(json.contains("\"team\":\"away\""));
        assert!(json.contains("\"minute\":1"));
    }
}
