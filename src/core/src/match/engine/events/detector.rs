use crate::r#match::engine::physics::constants::{ball, field, goal};
use crate::r#match::{
    ActionOutcome, Ball, FoulSeverity, MatchEvent, MatchEventType, MatchPlayer, Restart, TeamSide,
};
use log::debug;
use nalgebra::Vector3;

/// Everything one observation found: events to log, the restart to apply,
/// a scoring team and the disciplinary consequences.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Detection {
    pub events: Vec<MatchEvent>,
    pub restart: Option<Restart>,
    pub goal: Option<TeamSide>,
    pub booked: Vec<u32>,
    pub sent_off: Vec<u32>,
}

impl Detection {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.restart.is_none()
    }
}

/// Turns what happened in a tick into match events and restarts.
#[derive(Debug, Clone, Default)]
pub struct EventDetector {
    last_owner_team: Option<TeamSide>,
}

impl EventDetector {
    pub fn new() -> Self {
        EventDetector::default()
    }

    /// Checks whether the ball left the pitch between `previous` and its
    /// current position. The goal line is checked before the touchlines.
    pub fn detect_ball(
        &self,
        previous: &Vector3<f32>,
        ball: &Ball,
        home_direction: f32,
        time: f32,
    ) -> Detection {
        let current = ball.position();
        let mut detection = Detection::default();

        let goal_line = field::HALF_LENGTH + ball::RADIUS;
        let touchline = field::HALF_WIDTH + ball::RADIUS;

        let last_touch = ball.last_touch;

        if current.x.abs() > goal_line {
            let end = current.x.signum();

            // the team attacking this end
            let attacking = if end == home_direction.signum() {
                TeamSide::Home
            } else {
                TeamSide::Away
            };
            let defending = attacking.opponent();

            let crossing = goal_line_crossing(previous, &current);

            if crossing.y.abs() <= goal::HALF_WIDTH && crossing.z <= goal::HEIGHT {
                let scorer = last_touch
                    .filter(|touch| touch.team == attacking)
                    .map(|touch| touch.player_id);

                detection.events.push(MatchEvent::new(time, MatchEventType::Goal, attacking, scorer));
                detection.goal = Some(attacking);
                detection.restart = Some(Restart::Kickoff);

                debug!("Goal for {:?} at {:.1}s", attacking, time);
            } else if last_touch.is_some_and(|touch| touch.team == defending) {
                detection.events.push(MatchEvent::new(time, MatchEventType::Corner, attacking, None));
                detection.restart = Some(Restart::Corner {
                    team: attacking,
                    position: current,
                });
            } else {
                detection.events.push(MatchEvent::new(time, MatchEventType::GoalKick, defending, None));
                detection.restart = Some(Restart::GoalKick { team: defending });
            }

            return detection;
        }

        if current.y.abs() > touchline {
            let team = match last_touch {
                Some(touch) => touch.team.opponent(),
                // untouched ball: the side whose half it is in
                None => {
                    if current.x * home_direction <= 0.0 {
                        TeamSide::Home
                    } else {
                        TeamSide::Away
                    }
                }
            };

            detection.events.push(MatchEvent::new(time, MatchEventType::ThrowIn, team, None));
            detection.restart = Some(Restart::ThrowIn {
                team,
                position: current,
            });
        }

        detection
    }

    /// Events that follow directly from an executed action: shots, fouls
    /// and cards. A second yellow card brings a red.
    pub fn on_outcome(
        &self,
        outcome: &ActionOutcome,
        actor: &MatchPlayer,
        victim: Option<&MatchPlayer>,
        time: f32,
    ) -> Detection {
        let mut detection = Detection::default();

        match *outcome {
            ActionOutcome::ShotOnTarget { .. } => {
                detection.events.push(MatchEvent::new(time, MatchEventType::Shot, actor.team, Some(actor.id)));
                detection.events.push(MatchEvent::new(
                    time,
                    MatchEventType::ShotOnTarget,
                    actor.team,
                    Some(actor.id),
                ));
            }
            ActionOutcome::ShotBlocked { .. } | ActionOutcome::ShotWide { .. } => {
                detection.events.push(MatchEvent::new(time, MatchEventType::Shot, actor.team, Some(actor.id)));
            }
            ActionOutcome::TackleFailed {
                foul: Some(severity),
                ..
            } => {
                detection.events.push(MatchEvent::new(time, MatchEventType::Foul, actor.team, Some(actor.id)));

                match severity {
                    FoulSeverity::Careless => {}
                    FoulSeverity::Reckless => {
                        detection.events.push(MatchEvent::new(
                            time,
                            MatchEventType::YellowCard,
                            actor.team,
                            Some(actor.id),
                        ));
                        detection.booked.push(actor.id);

                        if actor.yellow_cards >= 1 {
                            detection.events.push(MatchEvent::new(
                                time,
                                MatchEventType::RedCard,
                                actor.team,
                                Some(actor.id),
                            ));
                            detection.sent_off.push(actor.id);
                        }
                    }
                    FoulSeverity::ExcessiveForce => {
                        detection.events.push(MatchEvent::new(
                            time,
                            MatchEventType::RedCard,
                            actor.team,
                            Some(actor.id),
                        ));
                        detection.sent_off.push(actor.id);
                    }
                }

                let position = victim.map(|v| v.position()).unwrap_or_else(|| actor.position());

                detection.restart = Some(Restart::FreeKick {
                    team: actor.team.opponent(),
                    position,
                });

                debug!("Foul by {} ({:?})", actor.id, severity);
            }
            ActionOutcome::PassPlayed { .. }
            | ActionOutcome::TackleWon { .. }
            | ActionOutcome::TackleFailed { foul: None, .. } => {}
        }

        detection
    }

    /// A possession change is logged when a team gains the ball that the
    /// other team held last. Loose spells in between do not reset it.
    pub fn observe_possession(&mut self, ball: &Ball, time: f32) -> Option<MatchEvent> {
        let team = ball.owner_team?;
        let previous = self.last_owner_team.replace(team);

        match previous {
            Some(previous) if previous != team => Some(MatchEvent::new(
                time,
                MatchEventType::PossessionChange,
                team,
                ball.current_owner,
            )),
            _ => None,
        }
    }
}

/// Where the ball passed the goal-line plane on its way from `previous` to
/// `current`.
fn goal_line_crossing(previous: &Vector3<f32>, current: &Vector3<f32>) -> Vector3<f32> {
    let line = current.x.signum() * field::HALF_LENGTH;
    let dx = current.x - previous.x;

    if dx.abs() < 1e-6 {
        return *current;
    }

    let t = ((line - previous.x) / dx).clamp(0.0, 1.0);

    previous + (current - previous) * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::r#match::{BallState, PlayerAttributes, PlayerRole, SquadPlayer};

    fn ball_at(position: Vector3<f32>, last_touch: Option<(u32, TeamSide)>) -> Ball {
        let state = BallState {
            position,
            velocity: Vector3::zeros(),
        };

        let mut ball = Ball::at(position);
        ball.state = state;
        if let Some((id, team)) = last_touch {
            ball.kick(id, team, state, None);
        }
        ball
    }

    fn player(id: u32, team: TeamSide, yellow_cards: u8) -> MatchPlayer {
        let squad_player = SquadPlayer::new(id, PlayerRole::CentreBack, PlayerAttributes::uniform(60.0));
        let mut player = MatchPlayer::from_squad(&squad_player, team, Vector3::zeros());
        player.yellow_cards = yellow_cards;
        player
    }

    #[test]
    fn test_goal_between_posts() {
        let detector = EventDetector::new();
        let ball = ball_at(Vector3::new(52.8, 1.0, 0.5), Some((9, TeamSide::Home)));

        let detection = detector.detect_ball(&Vector3::new(52.0, 1.0, 0.5), &ball, 1.0, 100.0);

        assert_eq!(detection.goal, Some(TeamSide::Home));
        assert_eq!(detection.restart, Some(Restart::Kickoff));
        assert_eq!(detection.events[0].actor, Some(9));
    }

    #[test]
    fn test_goal_credited_after_swap() {
        let detector = EventDetector::new();
        let ball = ball_at(Vector3::new(52.8, 0.0, 0.2), Some((20, TeamSide::Away)));

        // second half: away attacks +x
        let detection = detector.detect_ball(&Vector3::new(52.0, 0.0, 0.2), &ball, -1.0, 3000.0);

        assert_eq!(detection.goal, Some(TeamSide::Away));
    }

    #[test]
    fn test_over_the_bar_is_goal_kick() {
        let detector = EventDetector::new();
        let ball = ball_at(Vector3::new(53.0, 0.0, 3.0), Some((9, TeamSide::Home)));

        let detection = detector.detect_ball(&Vector3::new(52.0, 0.0, 3.0), &ball, 1.0, 10.0);

        assert_eq!(detection.goal, None);
        assert_eq!(detection.restart, Some(Restart::GoalKick { team: TeamSide::Away }));
    }

    #[test]
    fn test_defender_touch_gives_corner() {
        let detector = EventDetector::new();
        let ball = ball_at(Vector3::new(-53.0, 15.0, 0.0), Some((4, TeamSide::Home)));

        let detection = detector.detect_ball(&Vector3::new(-52.0, 15.0, 0.0), &ball, 1.0, 10.0);

        assert!(matches!(
            detection.restart,
            Some(Restart::Corner {
                team: TeamSide::Away,
                ..
            })
        ));
        assert_eq!(detection.events[0].event_type, MatchEventType::Corner);
    }

    #[test]
    fn test_touchline_gives_throw_in_to_other_team() {
        let detector = EventDetector::new();
        let ball = ball_at(Vector3::new(10.0, -34.5, 0.0), Some((7, TeamSide::Away)));

        let detection = detector.detect_ball(&Vector3::new(10.0, -33.8, 0.0), &ball, 1.0, 10.0);

        assert!(matches!(
            detection.restart,
            Some(Restart::ThrowIn {
                team: TeamSide::Home,
                ..
            })
        ));
    }

    #[test]
    fn test_ball_in_play_detects_nothing() {
        let detector = EventDetector::new();
        let ball = ball_at(Vector3::new(52.55, 10.0, 0.0), None);

        assert!(detector.detect_ball(&Vector3::new(52.0, 10.0, 0.0), &ball, 1.0, 1.0).is_empty());
    }

    #[test]
    fn test_second_yellow_sends_off() {
        let detector = EventDetector::new();
        let actor = player(3, TeamSide::Home, 1);
        let victim = player(30, TeamSide::Away, 0);

        let detection = detector.on_outcome(
            &ActionOutcome::TackleFailed {
                victim: 30,
                foul: Some(FoulSeverity::Reckless),
            },
            &actor,
            Some(&victim),
            600.0,
        );

        let types: Vec<_> = detection.events.iter().map(|e| e.event_type).collect();
        assert_eq!(
            types,
            vec![MatchEventType::Foul, MatchEventType::YellowCard, MatchEventType::RedCard]
        );
        assert_eq!(detection.sent_off, vec![3]);
        assert!(matches!(
            detection.restart,
            Some(Restart::FreeKick {
                team: TeamSide::Away,
                ..
            })
        ));
    }

    #[test]
    fn test_shot_on_target_logs_both_events() {
        let detector = EventDetector::new();
        let actor = player(9, TeamSide::Away, 0);

        let detection = detector.on_outcome(&ActionOutcome::ShotOnTarget { xg: 0.3 }, &actor, None, 60.0);

        assert_eq!(detection.events.len(), 2);
        assert_eq!(detection.events[1].event_type, MatchEventType::ShotOnTarget);
        assert_eq!(detection.restart, None);
    }

    #[test]
    fn test_possession_change_only_between_teams() {
        let mut detector = EventDetector::new();
        let mut ball = Ball::default();

        ball.gain(1, TeamSide::Home);
        assert!(detector.observe_possession(&ball, 1.0).is_none());

        ball.gain(2, TeamSide::Home);
        assert!(detector.observe_possession(&ball, 2.0).is_none());

        ball.release();
        assert!(detector.observe_possession(&ball, 3.0).is_none());

        ball.gain(20, TeamSide::Away);
        let event = detector.observe_possession(&ball, 4.0).unwrap();
        assert_eq!(event.event_type, MatchEventType::PossessionChange);
        assert_eq!(event.team, TeamSide::Away);
        assert_eq!(event.actor, Some(20));
    }
}
