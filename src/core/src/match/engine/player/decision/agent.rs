use crate::r#match::engine::physics::constants::field;
use crate::r#match::engine::physics::{distance_to_segment, is_finite_vector, is_in_penalty_area};
use crate::r#match::{
    calculate_pass_power, is_in_shooting_range, pass_completion_probability, shot_aim_point,
    shot_quality, DecisionError, FormationLayout, GameContext, MatchEventType, MatchRng,
    PhaseOfPlay, PlayerAction, PlayerSnapshot, PositionBehaviors,
};
#[cfg(feature = "match-logs")]
use log::trace;
use nalgebra::Vector3;

const SHOT_POWER_BASE: f32 = 78.0;
const SHOT_POWER_SKILL: f32 = 0.2;
const SHOT_LANE_WIDTH: f32 = 1.5;

const PROGRESS_SCALE: f32 = 40.0;
const MIN_PROGRESS_FACTOR: f32 = 0.2;
const MAX_PROGRESS_FACTOR: f32 = 1.5;
const BACK_PASS_TO_KEEPER_FACTOR: f32 = 0.3;

const KEEPER_HOLD_SECONDS: f32 = 1.5;

const DRIBBLE_AWARENESS: f32 = 6.0;
const TOUCHLINE_MARGIN: f32 = 6.0;
const TOUCHLINE_PUSH: f32 = 0.8;

const MIN_TACKLE_ATTEMPT: f32 = 0.01;

/// Rule-based policy for one player. Every call returns exactly one action;
/// the order of the checks is the priority order.
pub struct DecisionAgent;

impl DecisionAgent {
    pub fn decide(ctx: &GameContext, rng: &mut MatchRng) -> Result<PlayerAction, DecisionError> {
        let player = ctx.player;

        if !is_finite_vector(&player.position) || !is_finite_vector(&player.velocity) {
            return Err(DecisionError::NonFiniteState {
                player_id: player.id,
            });
        }

        if !ctx.tick.ball.state.is_finite() {
            return Err(DecisionError::NonFiniteBall {
                player_id: player.id,
            });
        }

        if !player.is_active || player.cooldown > 0.0 {
            return Ok(PlayerAction::HoldPosition);
        }

        let action = if ctx.has_ball() {
            Self::with_ball(ctx, rng)
        } else if ctx.ball().is_owned_by_opponents() {
            Self::against_carrier(ctx, rng).unwrap_or_else(|| Self::positional(ctx))
        } else if !ctx.ball().is_owned() {
            Self::loose_ball(ctx).unwrap_or_else(|| Self::positional(ctx))
        } else {
            Self::positional(ctx)
        };

        #[cfg(feature = "match-logs")]
        trace!("Player {} decided {:?}", player.id, action);

        Ok(action)
    }

    fn with_ball(ctx: &GameContext, rng: &mut MatchRng) -> PlayerAction {
        let player = ctx.player;
        let tuning = ctx.tuning;

        if player.role.is_goalkeeper() {
            return Self::distribute(ctx);
        }

        if let Some(shot) = Self::shot(ctx) {
            return shot;
        }

        let pressured = ctx.opponents().exists(tuning.pressure_radius);
        let over_budget = ctx.tick.ball.owned_for >= tuning.max_hold_seconds;

        if pressured || over_budget {
            // only a safe pass, otherwise shield it and carry on
            if let Some((receiver, _)) = Self::best_pass(ctx, tuning.forced_pass_min_completion) {
                return Self::pass_to(ctx, receiver);
            }
        } else if let Some((receiver, value)) = Self::best_pass(ctx, 0.0) {
            let cutoff = tuning.pass_quality_cutoff * ctx.balancer.pass_caution(player.team);

            if value > cutoff && rng.chance(tuning.pass_tempo) {
                return Self::pass_to(ctx, receiver);
            }
        }

        PlayerAction::Dribble {
            direction: Self::dribble_direction(ctx),
        }
    }

    fn shot(ctx: &GameContext) -> Option<PlayerAction> {
        let player = ctx.player;
        let tuning = ctx.tuning;
        let goal = ctx.attacking_goal();

        if !is_in_shooting_range(&player.position, &goal, tuning.shot_range) {
            return None;
        }

        let blockers = ctx
            .opponents()
            .all()
            .filter(|p| !p.role.is_goalkeeper())
            .filter(|p| {
                let (distance, t) = distance_to_segment(&p.position, &player.position, &goal);
                distance < SHOT_LANE_WIDTH && t > 0.0
            })
            .count();

        let quality = shot_quality(&player.position, &goal, player.attributes.shooting, blockers)
            * ctx.narrative(MatchEventType::Shot);

        let close = player.distance_to(&goal) < tuning.close_range_shot_distance;

        if quality < tuning.shot_quality_cutoff && !close {
            return None;
        }

        let keeper = ctx.opponents().goalkeeper().map(|gk| gk.position);

        Some(PlayerAction::Shoot {
            target: shot_aim_point(&player.position, &goal, keeper.as_ref()),
            power: (SHOT_POWER_BASE + player.attributes.shooting * SHOT_POWER_SKILL).min(100.0),
        })
    }

    /// Best team-mate by forward progress times completion chance, among
    /// passes at least `min_completion` likely to arrive.
    fn best_pass<'a>(ctx: &GameContext<'a>, min_completion: f32) -> Option<(&'a PlayerSnapshot, f32)> {
        let player = ctx.player;
        let tuning = ctx.tuning;
        let my_progress = ctx.forward(&player.position);

        ctx.teammates()
            .all()
            .filter_map(|mate| {
                let distance = player.distance_to(&mate.position);

                if distance < tuning.min_pass_distance || distance > tuning.max_pass_distance {
                    return None;
                }

                let completion = pass_completion_probability(
                    &player.position,
                    &mate.position,
                    player.attributes.passing,
                    ctx.opponents().all().map(|o| &o.position),
                );

                if completion < min_completion {
                    return None;
                }

                let progress = ctx.forward(&mate.position) - my_progress;
                let progress_factor =
                    (0.5 + progress / PROGRESS_SCALE).clamp(MIN_PROGRESS_FACTOR, MAX_PROGRESS_FACTOR);

                let keeper_factor = if mate.role.is_goalkeeper() {
                    BACK_PASS_TO_KEEPER_FACTOR
                } else {
                    1.0
                };

                Some((mate, completion * progress_factor * keeper_factor))
            })
            .max_by(|(a, a_value), (b, b_value)| a_value.total_cmp(b_value).then(b.id.cmp(&a.id)))
    }

    fn pass_to(ctx: &GameContext, receiver: &PlayerSnapshot) -> PlayerAction {
        let distance = ctx.player.distance_to(&receiver.position);

        PlayerAction::Pass {
            target_player: receiver.id,
            power: calculate_pass_power(distance, ctx.player.attributes.passing / 100.0),
        }
    }

    /// Keeper holds a caught ball briefly, then plays it to the best option or
    /// the most advanced team-mate.
    fn distribute(ctx: &GameContext) -> PlayerAction {
        if ctx.tick.ball.owned_for < KEEPER_HOLD_SECONDS && !ctx.is_restart_protected() {
            return PlayerAction::HoldPosition;
        }

        if let Some((receiver, _)) = Self::best_pass(ctx, 0.0) {
            return Self::pass_to(ctx, receiver);
        }

        let furthest = ctx
            .teammates()
            .all()
            .max_by(|a, b| {
                ctx.forward(&a.position)
                    .total_cmp(&ctx.forward(&b.position))
                    .then(b.id.cmp(&a.id))
            });

        match furthest {
            Some(receiver) => Self::pass_to(ctx, receiver),
            None => PlayerAction::Dribble {
                direction: Self::dribble_direction(ctx),
            },
        }
    }

    /// Towards goal, bent away from close opponents and the touchline.
    fn dribble_direction(ctx: &GameContext) -> Vector3<f32> {
        let player = ctx.player;
        let mut direction = Vector3::new(ctx.direction(), 0.0, 0.0);

        for opponent in ctx.opponents().nearby(DRIBBLE_AWARENESS) {
            let away = Vector3::new(
                player.position.x - opponent.position.x,
                player.position.y - opponent.position.y,
                0.0,
            );
            let distance = away.norm();

            if distance > 1e-3 {
                direction += away / distance * ((DRIBBLE_AWARENESS - distance) / DRIBBLE_AWARENESS);
            }
        }

        if player.position.y.abs() > field::HALF_WIDTH - TOUCHLINE_MARGIN {
            direction.y -= player.position.y.signum() * TOUCHLINE_PUSH;
        }

        direction
            .try_normalize(1e-6)
            .unwrap_or_else(|| Vector3::new(ctx.direction(), 0.0, 0.0))
    }

    /// Opponent on the ball: tackle if close enough, otherwise the nearest
    /// players close him down. `None` leaves the player to positional play.
    fn against_carrier(ctx: &GameContext, rng: &mut MatchRng) -> Option<PlayerAction> {
        let player = ctx.player;
        let tuning = ctx.tuning;
        let carrier = ctx.opponents().with_ball()?;

        let distance = player.distance_to(&carrier.position);

        let keeper_in_box = carrier.role.is_goalkeeper()
            && is_in_penalty_area(&carrier.position, ctx.attacking_goal().x);

        let settled = ctx.tick.ball.owned_for >= tuning.challenge_settle_seconds;

        if distance <= tuning.tackle_radius && settled && !ctx.is_restart_protected() && !keeper_in_box {
            let attempt = (tuning.tackle_attempt_rate
                * (0.5 + player.attributes.defending / 100.0)
                * ctx.assist_factor()
                * ctx.narrative(MatchEventType::PossessionChange))
            .clamp(MIN_TACKLE_ATTEMPT, 1.0);

            if rng.chance(attempt) {
                return Some(PlayerAction::Tackle {
                    target_player: carrier.id,
                });
            }

            return Some(PlayerAction::Mark {
                target_player: carrier.id,
            });
        }

        if player.role.is_goalkeeper() {
            return None;
        }

        let is_presser = ctx
            .teammates()
            .ranked_by_distance(&carrier.position)
            .into_iter()
            .filter(|p| !p.role.is_goalkeeper())
            .take(tuning.pressers)
            .any(|p| p.id == player.id);

        is_presser.then_some(PlayerAction::Mark {
            target_player: carrier.id,
        })
    }

    /// Nearest eligible player chases; others join when the ball is within
    /// their role's engagement radius. The intended receiver of a pass
    /// always goes to meet it.
    fn loose_ball(ctx: &GameContext) -> Option<PlayerAction> {
        let player = ctx.player;
        let ball = ctx.ball().position();

        if ctx.ball().is_pass_to_me() {
            return Some(PlayerAction::ChaseBall);
        }

        let ball_in_own_box = ctx.in_own_penalty_area(&ball);

        if player.role.is_goalkeeper() && !ball_in_own_box {
            return None;
        }

        let chasers: Vec<_> = ctx
            .teammates()
            .ranked_by_distance(&ball)
            .into_iter()
            .filter(|p| !p.role.is_goalkeeper() || ball_in_own_box)
            .take(2)
            .collect();

        let nearest = chasers.first().is_some_and(|p| p.id == player.id);
        let engaged = chasers.iter().any(|p| p.id == player.id)
            && ctx.ball().distance() <= ctx.tuning.engagement_radius(player.position_group());

        (nearest || engaged).then_some(PlayerAction::ChaseBall)
    }

    fn positional(ctx: &GameContext) -> PlayerAction {
        let player = ctx.player;

        if player.role.is_defensive() && ctx.ball().is_owned_by_opponents() {
            if let Some(target_player) = Self::marking_target(ctx) {
                return PlayerAction::Mark { target_player };
            }
        }

        let target = Self::target_position(ctx);

        if player.distance_to(&target) <= ctx.tuning.arrival_tolerance {
            PlayerAction::HoldPosition
        } else {
            PlayerAction::MoveTo { target }
        }
    }

    /// Formation target for the current phase of play, with the role
    /// overlay applied when enabled.
    pub fn target_position(ctx: &GameContext) -> Vector3<f32> {
        let player = ctx.player;

        let phase = if ctx.ball().is_owned_by_team() {
            PhaseOfPlay::InPossession
        } else if ctx.ball().is_owned_by_opponents() {
            PhaseOfPlay::OutOfPossession
        } else {
            PhaseOfPlay::Loose
        };

        let ball = ctx.ball().position();
        let direction = ctx.direction();
        let ball_team_frame = Vector3::new(ball.x * direction, ball.y * direction, 0.0);

        let target = FormationLayout::dynamic_target(
            &player.slot,
            player.role,
            &ball_team_frame,
            phase,
            ctx.assist_factor(),
        );
        let base = ctx.tick.to_world(player.team, &target);

        if ctx.position_behaviors {
            PositionBehaviors::adjust_target(player.role, &base, ctx)
        } else {
            base
        }
    }

    /// Most dangerous opponent near this defender that no team-mate is
    /// closer to.
    fn marking_target(ctx: &GameContext) -> Option<u32> {
        let player = ctx.player;
        let own_goal = ctx.own_goal();
        let carrier = ctx.tick.ball.current_owner;

        ctx.opponents()
            .all()
            .filter(|o| !o.role.is_goalkeeper() && Some(o.id) != carrier)
            .filter(|o| player.distance_to(&o.position) <= ctx.tuning.marking_radius)
            .filter(|o| {
                let mine = player.distance_to(&o.position);

                ctx.teammates()
                    .all()
                    .filter(|t| t.role.is_defensive())
                    .all(|t| {
                        let theirs = t.distance_to(&o.position);
                        theirs > mine || (theirs == mine && t.id > player.id)
                    })
            })
            .min_by(|a, b| {
                a.distance_to(&own_goal)
                    .total_cmp(&b.distance_to(&own_goal))
                    .then(a.id.cmp(&b.id))
            })
            .map(|o| o.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::r#match::{
        AgentTuning, GameTickContext, MatchField, PlayerRole, PossessionBalancer, Score,
        SquadGenerator, SquadProfile, TeamSide,
    };

    fn field() -> MatchField {
        let home = SquadGenerator::new(1).generate(1, "Home", &SquadProfile::uniform(70.0));
        let away = SquadGenerator::new(2).generate(2, "Away", &SquadProfile::uniform(70.0));

        MatchField::new(&home, &away)
    }

    fn find(field: &MatchField, team: TeamSide, role: PlayerRole) -> u32 {
        field
            .players
            .iter()
            .find(|p| p.team == team && p.role == role)
            .map(|p| p.id)
            .unwrap()
    }

    fn decide(field: &MatchField, player_id: u32, rng: &mut MatchRng) -> Result<PlayerAction, DecisionError> {
        decide_with(field, player_id, &AgentTuning::default(), rng)
    }

    fn decide_with(
        field: &MatchField,
        player_id: u32,
        tuning: &AgentTuning,
        rng: &mut MatchRng,
    ) -> Result<PlayerAction, DecisionError> {
        let tick = GameTickContext::new(field, 0.0, &Score::default());
        let balancer = PossessionBalancer::new(tuning);
        let player = tick.player(player_id).unwrap();

        let ctx = GameContext::new(player, &tick, tuning, &balancer, None);
        DecisionAgent::decide(&ctx, rng)
    }

    #[test]
    fn test_cooldown_holds_position() {
        let mut field = field();
        let id = find(&field, TeamSide::Home, PlayerRole::CentralMidfielder);
        field.get_player_mut(id).unwrap().state.cooldown = 0.5;

        let action = decide(&field, id, &mut MatchRng::seed_from(1)).unwrap();
        assert_eq!(action, PlayerAction::HoldPosition);
    }

    #[test]
    fn test_non_finite_state_is_an_error() {
        let mut field = field();
        let id = find(&field, TeamSide::Home, PlayerRole::Striker);
        field.get_player_mut(id).unwrap().state.position.x = f32::NAN;

        let result = decide(&field, id, &mut MatchRng::seed_from(1));
        assert_eq!(result, Err(DecisionError::NonFiniteState { player_id: id }));
    }

    #[test]
    fn test_close_range_carrier_shoots() {
        let mut field = field();
        let id = find(&field, TeamSide::Home, PlayerRole::Striker);
        let position = Vector3::new(45.0, 0.0, 0.0);

        field.get_player_mut(id).unwrap().state.position = position;
        field.ball.state.position = position;
        field.ball.gain(id, TeamSide::Home);

        let action = decide(&field, id, &mut MatchRng::seed_from(1)).unwrap();
        assert!(matches!(action, PlayerAction::Shoot { .. }));
    }

    #[test]
    fn test_carrier_far_from_goal_never_shoots() {
        let mut field = field();
        let id = find(&field, TeamSide::Home, PlayerRole::CentreBack);
        let position = Vector3::new(-30.0, 5.0, 0.0);

        field.get_player_mut(id).unwrap().state.position = position;
        field.ball.state.position = position;
        field.ball.gain(id, TeamSide::Home);

        let mut rng = MatchRng::seed_from(3);
        for _ in 0..50 {
            let action = decide(&field, id, &mut rng).unwrap();
            assert!(matches!(
                action,
                PlayerAction::Pass { .. } | PlayerAction::Dribble { .. }
            ));
        }
    }

    #[test]
    fn test_pressured_carrier_releases_ball() {
        let mut field = field();
        let id = find(&field, TeamSide::Home, PlayerRole::CentralMidfielder);
        let opponent = find(&field, TeamSide::Away, PlayerRole::CentralMidfielder);
        let position = Vector3::new(-5.0, 10.0, 0.0);

        field.get_player_mut(id).unwrap().state.position = position;
        field.get_player_mut(opponent).unwrap().state.position = Vector3::new(-3.5, 10.0, 0.0);
        field.ball.state.position = position;
        field.ball.gain(id, TeamSide::Home);

        let tuning = AgentTuning {
            forced_pass_min_completion: 0.0,
            ..AgentTuning::default()
        };

        let action = decide_with(&field, id, &tuning, &mut MatchRng::seed_from(1)).unwrap();
        assert!(matches!(action, PlayerAction::Pass { .. }));
    }

    #[test]
    fn test_defender_in_reach_sometimes_tackles() {
        let mut field = field();
        let carrier = find(&field, TeamSide::Away, PlayerRole::Striker);
        let defender = find(&field, TeamSide::Home, PlayerRole::CentreBack);

        field.get_player_mut(carrier).unwrap().state.position = Vector3::new(-30.0, 0.0, 0.0);
        field.get_player_mut(defender).unwrap().state.position = Vector3::new(-31.0, 0.0, 0.0);
        field.ball.state.position = Vector3::new(-30.0, 0.0, 0.0);
        field.ball.gain(carrier, TeamSide::Away);
        field.ball.owned_for = 1.0;

        let mut rng = MatchRng::seed_from(9);
        let mut tackles = 0;

        for _ in 0..100 {
            match decide(&field, defender, &mut rng).unwrap() {
                PlayerAction::Tackle { target_player } => {
                    assert_eq!(target_player, carrier);
                    tackles += 1;
                }
                PlayerAction::Mark { target_player } => assert_eq!(target_player, carrier),
                other => panic!("unexpected {other:?}"),
            }
        }

        assert!(tackles > 0);
        assert!(tackles < 100);
    }

    #[test]
    fn test_new_carrier_is_not_challenged_at_once() {
        let mut field = field();
        let carrier = find(&field, TeamSide::Away, PlayerRole::Striker);
        let defender = find(&field, TeamSide::Home, PlayerRole::CentreBack);

        field.get_player_mut(carrier).unwrap().state.position = Vector3::new(-30.0, 0.0, 0.0);
        field.get_player_mut(defender).unwrap().state.position = Vector3::new(-31.0, 0.0, 0.0);
        field.ball.state.position = Vector3::new(-30.0, 0.0, 0.0);
        field.ball.gain(carrier, TeamSide::Away);
        field.ball.owned_for = 0.2;

        let mut rng = MatchRng::seed_from(9);

        for _ in 0..100 {
            assert_eq!(
                decide(&field, defender, &mut rng).unwrap(),
                PlayerAction::Mark { target_player: carrier }
            );
        }
    }

    #[test]
    fn test_pressured_carrier_without_safe_pass_keeps_ball() {
        let mut field = field();
        let id = find(&field, TeamSide::Home, PlayerRole::CentralMidfielder);
        let opponent = find(&field, TeamSide::Away, PlayerRole::CentralMidfielder);
        let position = Vector3::new(-5.0, 10.0, 0.0);

        field.get_player_mut(id).unwrap().state.position = position;
        field.get_player_mut(opponent).unwrap().state.position = Vector3::new(-3.5, 10.0, 0.0);
        field.ball.state.position = position;
        field.ball.gain(id, TeamSide::Home);

        let tuning = AgentTuning {
            forced_pass_min_completion: 0.99,
            ..AgentTuning::default()
        };

        let mut rng = MatchRng::seed_from(1);
        for _ in 0..20 {
            let action = decide_with(&field, id, &tuning, &mut rng).unwrap();
            assert!(matches!(action, PlayerAction::Dribble { .. }), "{action:?}");
        }
    }

    #[test]
    fn test_nearest_player_chases_loose_ball() {
        let mut field = field();
        let id = find(&field, TeamSide::Home, PlayerRole::Striker);
        let position = field.get_player(id).unwrap().position();
        field.ball.state.position = position + Vector3::new(1.0, 0.0, 0.0);

        let action = decide(&field, id, &mut MatchRng::seed_from(1)).unwrap();
        assert_eq!(action, PlayerAction::ChaseBall);
    }

    #[test]
    fn test_keeper_ignores_loose_ball_outside_box() {
        let mut field = field();
        let keeper = find(&field, TeamSide::Home, PlayerRole::Goalkeeper);
        field.ball.state.position = Vector3::new(-30.0, 0.0, 0.0);

        let action = decide(&field, keeper, &mut MatchRng::seed_from(1)).unwrap();
        assert_ne!(action, PlayerAction::ChaseBall);
    }

    #[test]
    fn test_far_player_moves_to_formation_target() {
        let mut field = field();
        let id = find(&field, TeamSide::Away, PlayerRole::Striker);
        field.ball.state.position = Vector3::new(30.0, -30.0, 0.0);
        let carrier = find(&field, TeamSide::Home, PlayerRole::Winger);
        field.get_player_mut(carrier).unwrap().state.position = Vector3::new(30.0, -30.0, 0.0);
        field.ball.gain(carrier, TeamSide::Home);

        let action = decide(&field, id, &mut MatchRng::seed_from(1)).unwrap();
        assert!(matches!(
            action,
            PlayerAction::MoveTo { .. } | PlayerAction::HoldPosition
        ));
    }
}
