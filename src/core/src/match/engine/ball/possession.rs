use crate::r#match::engine::ball::ball::{Ball, BallFlight};
use crate::r#match::engine::ball::events::BallEvent;
use crate::r#match::engine::physics::constants::{
    ball as ball_constants, field, goal, player as player_constants,
};
use crate::r#match::engine::physics::{distance_to_segment, flat, is_in_penalty_area};
use crate::r#match::{narrative_multiplier, MatchEventType, MatchPlayer, MatchRng, NarrativeScenario, TeamSide};
use itertools::Itertools;
use log::debug;
use nalgebra::{Rotation3, Vector3};

/// Speed a failed first touch leaves on the ball.
const DEFLECTION_DAMPING: f32 = 0.45;
const DEFLECTION_SPREAD: f32 = 0.8;

/// Share of keeper saves on hard shots that are pushed wide of a post.
const KEEPER_PARRY_SHARE: f32 = 0.35;
const PARRY_DAMPING: f32 = 0.5;
const PARRY_LIFT: f32 = 1.5;
const PARRY_MIN_WIDE: f32 = 1.5;
const PARRY_MAX_WIDE: f32 = 6.0;

pub struct PossessionEnvironment<'a> {
    pub home_direction: f32,
    pub scenario: Option<&'a NarrativeScenario>,
    pub minute: u32,
}

/// Decides who, if anyone, takes a free ball at the end of a tick.
pub struct PossessionResolver;

impl PossessionResolver {
    /// Looks at the path the ball travelled this tick, from `previous_position`
    /// to where it is now. Among players who could reach it, the nearest gets
    /// the touch, then the lower role priority, then the lower id. At most one
    /// player ends up owning the ball.
    pub fn resolve(
        ball: &mut Ball,
        previous_position: &Vector3<f32>,
        players: &[MatchPlayer],
        env: &PossessionEnvironment,
        rng: &mut MatchRng,
    ) -> Vec<BallEvent> {
        let mut events = Vec::new();

        if ball.is_owned() {
            return events;
        }

        let current = ball.position();
        let is_shot = matches!(ball.flight, Some(BallFlight::Shot { .. }));

        let protected_team = ball
            .protection
            .and_then(|protection| players.iter().find(|p| p.id == protection.taker))
            .map(|taker| taker.team);

        let candidate = players
            .iter()
            .filter(|p| p.is_active && !p.state.is_deactivated() && !ball.is_ignored(p.id))
            .filter(|p| protected_team.is_none_or(|team| team == p.team))
            .filter_map(|p| {
                let (distance, t) = distance_to_segment(&p.state.position, previous_position, &current);
                let height = previous_position.z + (current.z - previous_position.z) * t;
                let (radius, reach_height) = Self::reach(p, is_shot, env.home_direction);

                (distance <= radius && height <= reach_height).then_some((p, distance))
            })
            .sorted_by(|(a, a_distance), (b, b_distance)| {
                a_distance
                    .total_cmp(b_distance)
                    .then(a.position_group().priority().cmp(&b.position_group().priority()))
                    .then(a.id.cmp(&b.id))
            })
            .next();

        let Some((player, _)) = candidate else {
            return events;
        };

        let speed = ball.state.velocity.norm();

        if speed > ball_constants::AUTO_CONTROL_SPEED {
            let keeper = Self::is_keeper_in_box(player, env.home_direction);

            let probability = if keeper {
                let shooter = match ball.flight {
                    Some(BallFlight::Shot { shooter, .. }) => Some(shooter),
                    _ => None,
                };
                let goal_boost = narrative_multiplier(
                    env.scenario,
                    MatchEventType::Goal,
                    player.team.opponent(),
                    shooter,
                    env.minute,
                );

                (0.40 + 0.5 * player.attributes.goalkeeping() / 100.0
                    - (speed - ball_constants::AUTO_CONTROL_SPEED) * 0.01)
                    / goal_boost
            } else {
                0.25 + 0.6 * player.attributes.dribbling / 100.0
                    - (speed - ball_constants::AUTO_CONTROL_SPEED) * 0.02
            };

            if !rng.chance(probability.clamp(0.05, 0.95)) {
                let event = if keeper {
                    // the ball carries on past him
                    ball.ignore_player(player.id);

                    BallEvent::KeeperBeaten {
                        player_id: player.id,
                    }
                } else {
                    let velocity = Self::deflected_velocity(&ball.state.velocity, rng);
                    ball.deflect(player.id, player.team, velocity);

                    BallEvent::Deflected {
                        player_id: player.id,
                        team: player.team,
                    }
                };

                debug!("Ball event: {:?}", event);
                events.push(event);

                return events;
            }

            if let (true, Some(BallFlight::Shot { shooter, team, .. })) = (keeper, ball.flight) {
                if team != player.team && rng.chance(KEEPER_PARRY_SHARE) {
                    let velocity = Self::parried_velocity(player, &current, speed, env.home_direction, rng);
                    ball.deflect(player.id, player.team, velocity);

                    let event = BallEvent::ShotStopped {
                        shooter,
                        player_id: player.id,
                        team: player.team,
                    };

                    debug!("Ball event: {:?}", event);
                    events.push(event);

                    return events;
                }
            }
        }

        let flight = ball.flight;

        ball.gain(player.id, player.team);
        ball.state.velocity = flat(&player.state.velocity);
        ball.state.position.z = 0.0;

        events.push(BallEvent::Gained {
            player_id: player.id,
            team: player.team,
        });

        match flight {
            Some(BallFlight::Pass { passer, team, .. }) if team == player.team => {
                events.push(BallEvent::PassCompleted {
                    passer,
                    receiver: player.id,
                    team,
                });
            }
            Some(BallFlight::Pass { passer, .. }) => {
                events.push(BallEvent::PassIntercepted {
                    passer,
                    player_id: player.id,
                    team: player.team,
                });
            }
            Some(BallFlight::Shot { shooter, team, .. }) if team != player.team => {
                events.push(BallEvent::ShotStopped {
                    shooter,
                    player_id: player.id,
                    team: player.team,
                });
            }
            _ => {}
        }

        for event in &events {
            debug!("Ball event: {:?}", event);
        }

        events
    }

    fn reach(player: &MatchPlayer, is_shot: bool, home_direction: f32) -> (f32, f32) {
        if Self::is_keeper_in_box(player, home_direction) {
            let radius = if is_shot {
                player_constants::KEEPER_CATCH_RADIUS + player_constants::KEEPER_DIVE_REACH
            } else {
                player_constants::KEEPER_CATCH_RADIUS
            };

            return (radius, player_constants::KEEPER_REACH_HEIGHT);
        }

        (player_constants::CONTROL_RADIUS, player_constants::CONTROL_HEIGHT)
    }

    fn is_keeper_in_box(player: &MatchPlayer, home_direction: f32) -> bool {
        if !player.role.is_goalkeeper() {
            return false;
        }

        let direction = match player.team {
            TeamSide::Home => home_direction,
            TeamSide::Away => -home_direction,
        };

        is_in_penalty_area(&player.state.position, -direction * field::HALF_LENGTH)
    }

    /// Pushed out towards the goal line, wide of the nearer post.
    fn parried_velocity(
        keeper: &MatchPlayer,
        ball: &Vector3<f32>,
        speed: f32,
        home_direction: f32,
        rng: &mut MatchRng,
    ) -> Vector3<f32> {
        let direction = match keeper.team {
            TeamSide::Home => home_direction,
            TeamSide::Away => -home_direction,
        };
        let goal_line = -direction * field::HALF_LENGTH;

        let side = if ball.y.abs() > 1e-3 {
            ball.y.signum()
        } else if rng.chance(0.5) {
            1.0
        } else {
            -1.0
        };

        // crosses the line at the target, never between the posts
        let target = Vector3::new(
            goal_line,
            side * (goal::HALF_WIDTH + rng.range(PARRY_MIN_WIDE, PARRY_MAX_WIDE)),
            0.0,
        );

        let heading = (target - flat(ball))
            .try_normalize(1e-6)
            .unwrap_or_else(|| Vector3::new(-direction, 0.0, 0.0));

        let mut velocity = heading * speed * PARRY_DAMPING;
        velocity.z = PARRY_LIFT;
        velocity
    }

    fn deflected_velocity(velocity: &Vector3<f32>, rng: &mut MatchRng) -> Vector3<f32> {
        let angle = rng.triangular(DEFLECTION_SPREAD);
        let rotation = Rotation3::from_axis_angle(&Vector3::z_axis(), angle);

        let mut deflected = rotation * (velocity * DEFLECTION_DAMPING);
        deflected.z = deflected.z.max(0.0);

        deflected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::r#match::{BallState, PlayerAttributes, PlayerRole, SquadPlayer};

    fn player(id: u32, team: TeamSide, role: PlayerRole, x: f32, y: f32) -> MatchPlayer {
        let squad_player = SquadPlayer::new(id, role, PlayerAttributes::uniform(70.0));
        let mut player = MatchPlayer::from_squad(&squad_player, team, Vector3::zeros());
        player.state.position = Vector3::new(x, y, 0.0);
        player
    }

    fn env() -> PossessionEnvironment<'static> {
        PossessionEnvironment {
            home_direction: 1.0,
            scenario: None,
            minute: 0,
        }
    }

    fn loose_ball_at(x: f32, y: f32) -> Ball {
        Ball::at(Vector3::new(x, y, 0.0))
    }

    #[test]
    fn test_slow_ball_is_controlled_by_nearest() {
        let players = vec![
            player(1, TeamSide::Home, PlayerRole::CentralMidfielder, 0.5, 0.0),
            player(2, TeamSide::Away, PlayerRole::CentralMidfielder, -0.9, 0.0),
        ];
        let mut ball = loose_ball_at(0.0, 0.0);
        let mut rng = MatchRng::seed_from(1);

        let events = PossessionResolver::resolve(&mut ball, &Vector3::zeros(), &players, &env(), &mut rng);

        assert_eq!(ball.current_owner, Some(1));
        assert_eq!(ball.owner_team, Some(TeamSide::Home));
        assert_eq!(
            events,
            vec![BallEvent::Gained {
                player_id: 1,
                team: TeamSide::Home
            }]
        );
    }

    #[test]
    fn test_tie_break_by_role_then_id() {
        let players = vec![
            player(9, TeamSide::Home, PlayerRole::Striker, 1.0, 0.0),
            player(5, TeamSide::Away, PlayerRole::CentreBack, -1.0, 0.0),
        ];
        let mut ball = loose_ball_at(0.0, 0.0);
        let mut rng = MatchRng::seed_from(1);

        PossessionResolver::resolve(&mut ball, &Vector3::zeros(), &players, &env(), &mut rng);
        assert_eq!(ball.current_owner, Some(5));

        let players = vec![
            player(8, TeamSide::Home, PlayerRole::CentralMidfielder, 0.0, 1.0),
            player(4, TeamSide::Away, PlayerRole::CentralMidfielder, 0.0, -1.0),
        ];
        let mut ball = loose_ball_at(0.0, 0.0);

        PossessionResolver::resolve(&mut ball, &Vector3::zeros(), &players, &env(), &mut rng);
        assert_eq!(ball.current_owner, Some(4));
    }

    #[test]
    fn test_kicker_is_ignored() {
        let players = vec![player(1, TeamSide::Home, PlayerRole::CentralMidfielder, 0.2, 0.0)];
        let mut ball = loose_ball_at(0.0, 0.0);
        ball.kick(1, TeamSide::Home, BallState::at_rest(Vector3::zeros()), None);
        let mut rng = MatchRng::seed_from(1);

        let events = PossessionResolver::resolve(&mut ball, &Vector3::zeros(), &players, &env(), &mut rng);

        assert!(events.is_empty());
        assert!(!ball.is_owned());
    }

    #[test]
    fn test_ball_out_of_reach_stays_loose() {
        let players = vec![player(1, TeamSide::Home, PlayerRole::CentralMidfielder, 5.0, 0.0)];
        let mut ball = loose_ball_at(0.0, 0.0);
        let mut rng = MatchRng::seed_from(1);

        PossessionResolver::resolve(&mut ball, &Vector3::zeros(), &players, &env(), &mut rng);
        assert!(!ball.is_owned());

        // high ball passes over the head
        let mut ball = Ball::at(Vector3::zeros());
        ball.state.position = Vector3::new(5.0, 0.0, 3.0);
        PossessionResolver::resolve(&mut ball, &Vector3::new(4.0, 0.0, 3.0), &players, &env(), &mut rng);
        assert!(!ball.is_owned());
    }

    #[test]
    fn test_path_sweep_catches_fast_pass() {
        let players = vec![player(2, TeamSide::Home, PlayerRole::Winger, 10.0, 0.5)];
        let mut ball = Ball::default();
        ball.kick(
            1,
            TeamSide::Home,
            BallState {
                position: Vector3::new(12.0, 0.0, 0.0),
                velocity: Vector3::new(12.0, 0.0, 0.0),
            },
            Some(BallFlight::Pass {
                passer: 1,
                receiver: 2,
                team: TeamSide::Home,
            }),
        );
        let mut rng = MatchRng::seed_from(3);

        let events =
            PossessionResolver::resolve(&mut ball, &Vector3::new(8.0, 0.0, 0.0), &players, &env(), &mut rng);

        assert_eq!(ball.current_owner, Some(2));
        assert!(events.contains(&BallEvent::PassCompleted {
            passer: 1,
            receiver: 2,
            team: TeamSide::Home
        }));
    }

    #[test]
    fn test_interception_is_reported() {
        let players = vec![player(30, TeamSide::Away, PlayerRole::CentreBack, 10.0, 0.0)];
        let mut ball = Ball::default();
        ball.kick(
            1,
            TeamSide::Home,
            BallState {
                position: Vector3::new(10.0, 0.0, 0.0),
                velocity: Vector3::new(8.0, 0.0, 0.0),
            },
            Some(BallFlight::Pass {
                passer: 1,
                receiver: 2,
                team: TeamSide::Home,
            }),
        );
        let mut rng = MatchRng::seed_from(3);

        let events =
            PossessionResolver::resolve(&mut ball, &Vector3::new(9.0, 0.0, 0.0), &players, &env(), &mut rng);

        assert_eq!(ball.owner_team, Some(TeamSide::Away));
        assert!(events.contains(&BallEvent::PassIntercepted {
            passer: 1,
            player_id: 30,
            team: TeamSide::Away
        }));
    }

    #[test]
    fn test_keeper_sometimes_parries_hard_shot_wide() {
        let mut parried = 0;
        let mut held = 0;

        for seed in 0..200 {
            let players = vec![player(1, TeamSide::Away, PlayerRole::Goalkeeper, 50.0, 1.0)];
            let mut ball = Ball::default();
            ball.kick(
                9,
                TeamSide::Home,
                BallState {
                    position: Vector3::new(50.5, 1.0, 0.5),
                    velocity: Vector3::new(25.0, 0.0, 0.0),
                },
                Some(BallFlight::Shot {
                    shooter: 9,
                    team: TeamSide::Home,
                    xg: 0.3,
                }),
            );
            let mut rng = MatchRng::seed_from(seed);

            let events =
                PossessionResolver::resolve(&mut ball, &Vector3::new(49.0, 1.0, 0.5), &players, &env(), &mut rng);

            if ball.current_owner == Some(1) {
                held += 1;
            } else if events.contains(&BallEvent::ShotStopped {
                shooter: 9,
                player_id: 1,
                team: TeamSide::Away,
            }) {
                parried += 1;

                assert_eq!(ball.last_touch.map(|t| t.team), Some(TeamSide::Away));
                assert!(ball.flight.is_none());
                assert!(ball.state.velocity.x > 0.0);
                assert!(ball.state.velocity.y > 0.0);
            }
        }

        assert!(parried > 10, "parried {parried}");
        assert!(held > parried, "held {held}, parried {parried}");
    }
}
