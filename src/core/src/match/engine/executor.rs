use crate::r#match::engine::physics::constants::{field, goal};
use crate::r#match::engine::physics::{
    clamp_to_field, distance_to_segment, flat, flat_distance, is_in_penalty_area, kick_speed,
};
use crate::r#match::{
    narrative_multiplier, shot_quality, AgentTuning, Ball, BallFlight, BallPhysics, BallState,
    MatchEventType, MatchPlayer, MatchRng, NarrativeScenario, PlayerAction, PlayerState,
    PossessionBalancer, SteeringBehavior, TeamSide,
};
use log::debug;
use nalgebra::{Rotation3, Vector3};
use serde::Serialize;

const PASS_ANGLE_NOISE: f32 = 0.12;
const PASS_MAX_LEAD_SECONDS: f32 = 1.5;

const SHOT_NOISE_BASE: f32 = 0.02;
const SHOT_NOISE_SKILL: f32 = 0.10;
/// Triangular amplitude giving the requested standard deviation.
const TRIANGULAR_SPREAD: f32 = 2.45;
const SHOT_LOFT_MIN: f32 = 0.02;
const SHOT_LOFT_MAX: f32 = 0.12;
const SHOT_BLOCK_RANGE: f32 = 6.0;
const SHOT_BLOCK_WIDTH: f32 = 1.0;
const SHOT_BLOCK_CHANCE: f32 = 0.5;
const SHOT_BLOCKER_LANE: f32 = 1.5;
const SHOT_PROJECTION_SECONDS: f32 = 3.0;

const DRIBBLE_SPEED_FACTOR: f32 = 0.8;
const ARRIVE_SLOWING_DISTANCE: f32 = 3.0;
const MARK_SLOWING_DISTANCE: f32 = 2.0;

const TACKLE_BASE: f32 = 0.42;
const TACKLE_SKILL_WEIGHT: f32 = 0.6;
const TACKLE_MIN_PROBABILITY: f32 = 0.08;
const TACKLE_MAX_PROBABILITY: f32 = 0.9;
const TACKLED_SPEED_FACTOR: f32 = 0.3;
const LUNGE_SPEED: f32 = 2.0;

const EXCESSIVE_FORCE_SHARE: f32 = 0.005;
const RECKLESS_SHARE: f32 = 0.12;
/// A player already on a yellow card goes in less recklessly.
const BOOKED_RECKLESS_FACTOR: f32 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FoulSeverity {
    Careless,
    Reckless,
    ExcessiveForce,
}

/// What an executed action did. Pass completion is only known once the
/// ball is controlled, so a pass reports `PassPlayed` here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActionOutcome {
    PassPlayed { receiver: u32 },
    ShotOnTarget { xg: f32 },
    ShotBlocked { xg: f32 },
    ShotWide { xg: f32 },
    TackleWon { victim: u32 },
    TackleFailed { victim: u32, foul: Option<FoulSeverity> },
}

impl ActionOutcome {
    pub fn is_shot(&self) -> bool {
        matches!(
            self,
            ActionOutcome::ShotOnTarget { .. }
                | ActionOutcome::ShotBlocked { .. }
                | ActionOutcome::ShotWide { .. }
        )
    }
}

/// How a pass ended, reported by the engine from ball control and restarts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassResolution {
    Complete,
    Intercepted,
    Misplaced,
}

pub struct ExecutionContext<'a> {
    pub tuning: &'a AgentTuning,
    pub balancer: &'a PossessionBalancer,
    pub scenario: Option<&'a NarrativeScenario>,
    pub home_direction: f32,
    pub minute: u32,
    pub dt: f32,
}

impl ExecutionContext<'_> {
    fn direction(&self, team: TeamSide) -> f32 {
        match team {
            TeamSide::Home => self.home_direction,
            TeamSide::Away => -self.home_direction,
        }
    }

    fn narrative(&self, event_type: MatchEventType, player: &MatchPlayer) -> f32 {
        narrative_multiplier(self.scenario, event_type, player.team, Some(player.id), self.minute)
    }
}

/// New values produced by one action. Nothing is written in place; the
/// simulation applies the result.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub actor: PlayerState,
    pub desired_velocity: Vector3<f32>,
    pub ball: Ball,
    pub outcome: Option<ActionOutcome>,
    /// Other players whose state the action changed.
    pub affected: Vec<(u32, PlayerState)>,
}

impl ExecutionResult {
    fn movement(actor: &MatchPlayer, ball: &Ball, desired_velocity: Vector3<f32>) -> Self {
        ExecutionResult {
            actor: actor.state,
            desired_velocity,
            ball: ball.clone(),
            outcome: None,
            affected: Vec::new(),
        }
    }
}

pub struct ActionExecutor;

impl ActionExecutor {
    /// Applies a decided action. Actions the player may not perform right now
    /// (ball actions without the ball, a tackle on someone without it, any
    /// action while recovering) turn into plain movement.
    pub fn execute(
        action: &PlayerAction,
        actor: &MatchPlayer,
        ball: &Ball,
        players: &[MatchPlayer],
        ctx: &ExecutionContext,
        rng: &mut MatchRng,
    ) -> ExecutionResult {
        let mut result = if !actor.is_active || actor.state.is_deactivated() {
            ExecutionResult::movement(actor, ball, Vector3::zeros())
        } else if action.requires_possession() && !ball.is_owned_by(actor.id) {
            let fallback = if ball.is_owned() {
                SteeringBehavior::Brake
            } else {
                SteeringBehavior::Pursuit {
                    target: ball.position(),
                    target_velocity: ball.state.velocity,
                }
            };

            ExecutionResult::movement(actor, ball, fallback.calculate(actor).velocity)
        } else {
            match *action {
                PlayerAction::Pass {
                    target_player,
                    power,
                } => Self::pass(actor, ball, players, target_player, power, ctx, rng),
                PlayerAction::Shoot { target, power } => {
                    Self::shoot(actor, ball, players, &target, power, ctx, rng)
                }
                PlayerAction::Tackle { target_player } => {
                    Self::tackle(actor, ball, players, target_player, ctx, rng)
                }
                _ => ExecutionResult::movement(actor, ball, Self::steer(action, actor, ball, players, ctx)),
            }
        };

        result.actor.set_action(action.kind());

        if let Some(outcome) = &result.outcome {
            debug!("Player {} {:?}: {:?}", actor.id, action.kind(), outcome);
        }

        result
    }

    fn steer(
        action: &PlayerAction,
        actor: &MatchPlayer,
        ball: &Ball,
        players: &[MatchPlayer],
        ctx: &ExecutionContext,
    ) -> Vector3<f32> {
        let behavior = match *action {
            PlayerAction::MoveTo { target } => SteeringBehavior::Arrive {
                target: clamp_to_field(target),
                slowing_distance: ARRIVE_SLOWING_DISTANCE,
            },
            PlayerAction::ChaseBall => SteeringBehavior::Pursuit {
                target: ball.position(),
                target_velocity: ball.state.velocity,
            },
            PlayerAction::Dribble { direction } => SteeringBehavior::Run {
                direction,
                speed_factor: DRIBBLE_SPEED_FACTOR,
            },
            PlayerAction::Mark { target_player } | PlayerAction::Tackle { target_player } => {
                match players.iter().find(|p| p.id == target_player && p.is_active) {
                    Some(target) => {
                        let own_goal = Vector3::new(-ctx.direction(actor.team) * field::HALF_LENGTH, 0.0, 0.0);
                        let goal_side = flat(&(own_goal - target.position()));

                        let distance = if ball.is_owned_by(target.id) {
                            ctx.tuning.press_distance
                        } else {
                            ctx.tuning.mark_distance
                        };

                        let guard = match goal_side.try_normalize(1e-6) {
                            Some(towards_goal) => target.position() + towards_goal * distance,
                            None => target.position(),
                        };

                        SteeringBehavior::Arrive {
                            target: clamp_to_field(guard),
                            slowing_distance: MARK_SLOWING_DISTANCE,
                        }
                    }
                    None => SteeringBehavior::Brake,
                }
            }
            PlayerAction::Pass { .. } | PlayerAction::Shoot { .. } | PlayerAction::HoldPosition => {
                SteeringBehavior::Brake
            }
        };

        behavior.calculate(actor).velocity
    }

    fn pass(
        actor: &MatchPlayer,
        ball: &Ball,
        players: &[MatchPlayer],
        target_player: u32,
        power: f32,
        ctx: &ExecutionContext,
        rng: &mut MatchRng,
    ) -> ExecutionResult {
        let receiver = players
            .iter()
            .find(|p| p.id == target_player && p.id != actor.id && p.team == actor.team && p.is_active);

        let Some(receiver) = receiver else {
            return ExecutionResult::movement(actor, ball, Vector3::zeros());
        };

        let from = flat(&ball.position());
        let distance = flat_distance(&from, &receiver.position());
        let speed = kick_speed(power).max(1.0);

        // lead the receiver by roughly the time the ball needs to get there
        let lead_time = (distance / (speed * 0.75)).min(PASS_MAX_LEAD_SECONDS);
        let lead = clamp_to_field(receiver.position() + flat(&receiver.state.velocity) * lead_time);

        let direction = match flat(&(lead - from)).try_normalize(1e-6) {
            Some(direction) => direction,
            None => Vector3::new(actor.state.facing.cos(), actor.state.facing.sin(), 0.0),
        };

        let noise = (1.0 - actor.attributes.passing / 100.0).clamp(0.0, 1.0) * PASS_ANGLE_NOISE
            / ctx.balancer.assist_factor(actor.team);
        let direction = rotate(&direction, rng.triangular(noise));

        let kicked = BallPhysics::apply_impulse(&BallState::at_rest(from), &direction, power);

        let mut next_ball = ball.clone();
        next_ball.kick(
            actor.id,
            actor.team,
            kicked,
            Some(BallFlight::Pass {
                passer: actor.id,
                receiver: receiver.id,
                team: actor.team,
            }),
        );

        ExecutionResult {
            actor: actor.state,
            desired_velocity: Vector3::zeros(),
            ball: next_ball,
            outcome: Some(ActionOutcome::PassPlayed {
                receiver: receiver.id,
            }),
            affected: Vec::new(),
        }
    }

    fn shoot(
        actor: &MatchPlayer,
        ball: &Ball,
        players: &[MatchPlayer],
        target: &Vector3<f32>,
        power: f32,
        ctx: &ExecutionContext,
        rng: &mut MatchRng,
    ) -> ExecutionResult {
        let from = flat(&ball.position());
        let goal_x = ctx.direction(actor.team) * field::HALF_LENGTH;
        let goal_centre = Vector3::new(goal_x, 0.0, 0.0);

        let aim = match flat(&(target - from)).try_normalize(1e-6) {
            Some(direction) => direction,
            None => Vector3::new(goal_x.signum(), 0.0, 0.0),
        };

        let opponents = || players.iter().filter(|p| p.is_active && p.team != actor.team);

        let blockers = opponents()
            .filter(|p| !p.role.is_goalkeeper())
            .filter(|p| {
                let (lane_distance, t) = distance_to_segment(&p.position(), &from, &goal_centre);
                lane_distance < SHOT_BLOCKER_LANE && t > 0.0
            })
            .count();

        let xg = shot_quality(&from, &goal_centre, actor.attributes.shooting, blockers);

        let sigma = (SHOT_NOISE_BASE
            + (1.0 - actor.attributes.shooting / 100.0).clamp(0.0, 1.0) * SHOT_NOISE_SKILL)
            / ctx.narrative(MatchEventType::ShotOnTarget, actor);

        let horizontal = rotate(&aim, rng.triangular(sigma * TRIANGULAR_SPREAD));
        let loft = rng.range(SHOT_LOFT_MIN, SHOT_LOFT_MAX);
        let direction = Vector3::new(horizontal.x, horizontal.y, loft);

        let kicked = BallPhysics::apply_impulse(&BallState::at_rest(from), &direction, power);

        let mut next_ball = ball.clone();
        next_ball.kick(
            actor.id,
            actor.team,
            kicked,
            Some(BallFlight::Shot {
                shooter: actor.id,
                team: actor.team,
                xg,
            }),
        );

        let block_end = from + horizontal * SHOT_BLOCK_RANGE;
        let blocker = opponents()
            .filter(|p| !p.role.is_goalkeeper())
            .filter_map(|p| {
                let (lane_distance, t) = distance_to_segment(&p.position(), &from, &block_end);
                (lane_distance <= SHOT_BLOCK_WIDTH && t > 0.0).then_some((p, t))
            })
            .min_by(|(a, a_t), (b, b_t)| a_t.total_cmp(b_t).then(a.id.cmp(&b.id)))
            .map(|(p, _)| p);

        if let Some(blocker) = blocker {
            if rng.chance(SHOT_BLOCK_CHANCE) {
                let rebound = rotate(&(-flat(&kicked.velocity) * 0.3), rng.triangular(1.0));

                next_ball.state.position = Vector3::new(blocker.position().x, blocker.position().y, 0.0);
                next_ball.deflect(blocker.id, blocker.team, rebound);

                return ExecutionResult {
                    actor: actor.state,
                    desired_velocity: Vector3::zeros(),
                    ball: next_ball,
                    outcome: Some(ActionOutcome::ShotBlocked { xg }),
                    affected: Vec::new(),
                };
            }
        }

        let on_target = BallPhysics::line_crossing(&kicked, goal_x, SHOT_PROJECTION_SECONDS, ctx.dt)
            .is_some_and(|crossing| crossing.y.abs() <= goal::HALF_WIDTH && crossing.z <= goal::HEIGHT);

        let outcome = if on_target {
            ActionOutcome::ShotOnTarget { xg }
        } else {
            ActionOutcome::ShotWide { xg }
        };

        ExecutionResult {
            actor: actor.state,
            desired_velocity: Vector3::zeros(),
            ball: next_ball,
            outcome: Some(outcome),
            affected: Vec::new(),
        }
    }

    fn tackle(
        actor: &MatchPlayer,
        ball: &Ball,
        players: &[MatchPlayer],
        target_player: u32,
        ctx: &ExecutionContext,
        rng: &mut MatchRng,
    ) -> ExecutionResult {
        let victim = players
            .iter()
            .find(|p| p.id == target_player && p.team != actor.team && p.is_active);

        let chase = PlayerAction::Tackle { target_player };

        let Some(victim) = victim else {
            return ExecutionResult::movement(actor, ball, Vector3::zeros());
        };

        let distance = flat_distance(&actor.position(), &victim.position());
        let own_goal_x = -ctx.direction(victim.team) * field::HALF_LENGTH;

        let illegal = !ball.is_owned_by(victim.id)
            || ball.is_protected()
            || distance > ctx.tuning.tackle_radius
            || (victim.role.is_goalkeeper() && is_in_penalty_area(&victim.position(), own_goal_x));

        if illegal {
            return ExecutionResult::movement(actor, ball, Self::steer(&chase, actor, ball, players, ctx));
        }

        let attributes = &victim.attributes;
        let skill_gap = actor.attributes.defending - (0.7 * attributes.dribbling + 0.3 * attributes.physical);

        let distance_factor = 1.0 - 0.4 * (distance / ctx.tuning.tackle_radius).clamp(0.0, 1.0);

        // challenges from behind succeed less often
        let approach = flat(&(actor.position() - victim.position())).try_normalize(1e-6);
        let facing = Vector3::new(victim.state.facing.cos(), victim.state.facing.sin(), 0.0);
        let angle_factor = approach.map(|a| 0.85 + 0.15 * a.dot(&facing)).unwrap_or(1.0);

        let probability = ((TACKLE_BASE + skill_gap / 100.0 * TACKLE_SKILL_WEIGHT)
            * distance_factor
            * angle_factor
            * ctx.balancer.assist_factor(actor.team)
            * ctx.narrative(MatchEventType::PossessionChange, actor))
        .clamp(TACKLE_MIN_PROBABILITY, TACKLE_MAX_PROBABILITY);

        let mut actor_state = actor.state;
        let mut next_ball = ball.clone();

        if rng.chance(probability) {
            let mut victim_state = victim.state;
            victim_state.velocity *= TACKLED_SPEED_FACTOR;
            victim_state.cooldown = ctx.tuning.tackled_cooldown;

            next_ball.gain(actor.id, actor.team);

            return ExecutionResult {
                actor: actor_state,
                desired_velocity: Vector3::zeros(),
                ball: next_ball,
                outcome: Some(ActionOutcome::TackleWon { victim: victim.id }),
                affected: vec![(victim.id, victim_state)],
            };
        }

        actor_state.cooldown = ctx.tuning.failed_tackle_cooldown;

        let lunge = flat(&(victim.position() - actor.position()))
            .try_normalize(1e-6)
            .map(|d| d * LUNGE_SPEED)
            .unwrap_or_else(Vector3::zeros);
        actor_state.velocity = lunge;

        let foul_probability = ctx.tuning.foul_base_rate
            * (1.5 - actor.attributes.defending / 100.0)
            * ctx.narrative(MatchEventType::Foul, actor);

        let foul = if rng.chance(foul_probability) {
            let roll = rng.unit();
            let excessive = EXCESSIVE_FORCE_SHARE * ctx.narrative(MatchEventType::RedCard, actor);
            let booked = if actor.yellow_cards > 0 { BOOKED_RECKLESS_FACTOR } else { 1.0 };
            let reckless = RECKLESS_SHARE * booked * ctx.narrative(MatchEventType::YellowCard, actor);

            Some(if roll < excessive {
                FoulSeverity::ExcessiveForce
            } else if roll < excessive + reckless {
                FoulSeverity::Reckless
            } else {
                FoulSeverity::Careless
            })
        } else {
            None
        };

        ExecutionResult {
            actor: actor_state,
            desired_velocity: Vector3::zeros(),
            ball: next_ball,
            outcome: Some(ActionOutcome::TackleFailed {
                victim: victim.id,
                foul,
            }),
            affected: Vec::new(),
        }
    }
}

/// Turns a horizontal direction about the vertical axis.
fn rotate(direction: &Vector3<f32>, angle: f32) -> Vector3<f32> {
    Rotation3::from_axis_angle(&Vector3::z_axis(), angle) * direction
}
