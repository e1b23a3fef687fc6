use crate::r#match::engine::physics::clamp_to_field;
use crate::r#match::{
    ActionExecutor, ActionOutcome, BallEvent, BallFlight, BallPhysics, DecisionAgent, EventDetector, Detection,
    ExecutionContext, GameContext, GameTickContext, MatchConfig, MatchContext, MatchEventLog,
    MatchField, MatchResult, MatchRng, MatchSquad, MatchState, MatchStatistics, NarrativeScenario,
    PassResolution, PerformanceMetrics, PlayerAction, PlayerPhysics, PossessionBalancer,
    PossessionEnvironment, PossessionResolver, StateManager, TeamSide,
};
use crate::MatchError;
use log::{debug, info, warn};
use nalgebra::Vector3;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

pub struct FootballEngine;

impl FootballEngine {
    /// Plays a full match. Inputs are validated first; nothing runs if they
    /// are malformed.
    pub fn play(
        home_squad: &MatchSquad,
        away_squad: &MatchSquad,
        config: &MatchConfig,
        scenario: Option<&NarrativeScenario>,
    ) -> Result<MatchResult, MatchError> {
        let mut simulation = MatchSimulation::new(home_squad, away_squad, config, scenario)?;

        Ok(simulation.run())
    }

    /// Independent matches, one per seed, played in parallel. Results come
    /// back in seed order.
    pub fn play_batch(
        home_squad: &MatchSquad,
        away_squad: &MatchSquad,
        config: &MatchConfig,
        scenario: Option<&NarrativeScenario>,
        seeds: &[u64],
    ) -> Result<Vec<MatchResult>, MatchError> {
        MatchSquad::validate_pair(home_squad, away_squad)?;
        config.validate()?;

        seeds
            .par_iter()
            .map(|&seed| {
                let config = config.clone().with_seed(seed);
                Self::play(home_squad, away_squad, &config, scenario)
            })
            .collect()
    }
}

/// A match that can be advanced tick by tick.
pub struct MatchSimulation {
    field: MatchField,
    context: MatchContext,
    state_manager: StateManager,
    config: MatchConfig,
    scenario: Option<NarrativeScenario>,

    rng: MatchRng,
    balancer: PossessionBalancer,
    detector: EventDetector,
    events: MatchEventLog,
    statistics: MatchStatistics,
    anomalies: u32,

    /// Desired velocity per player, in `field.players` order.
    desired: Vec<Vector3<f32>>,
    elapsed: Duration,
    terminated_early: bool,
}

impl MatchSimulation {
    pub fn new(
        home_squad: &MatchSquad,
        away_squad: &MatchSquad,
        config: &MatchConfig,
        scenario: Option<&NarrativeScenario>,
    ) -> Result<Self, MatchError> {
        MatchSquad::validate_pair(home_squad, away_squad)?;
        config.validate()?;

        if let Some(scenario) = scenario {
            scenario.validate()?;
        }

        let field = MatchField::new(home_squad, away_squad);
        let mut context = MatchContext::new(config.dt, config.total_ticks());

        if config.verbose {
            context.enable_logging();
        }

        info!(
            "Match {} vs {} (seed {}, {} ticks)",
            home_squad.team_name,
            away_squad.team_name,
            config.seed,
            config.total_ticks()
        );

        Ok(MatchSimulation {
            desired: vec![Vector3::zeros(); field.players.len()],
            field,
            context,
            state_manager: StateManager::new(),
            config: config.clone(),
            scenario: scenario.cloned(),
            rng: MatchRng::seed_from(config.seed),
            balancer: PossessionBalancer::new(&config.tuning),
            detector: EventDetector::new(),
            events: MatchEventLog::new(),
            statistics: MatchStatistics::default(),
            anomalies: 0,
            elapsed: Duration::ZERO,
            terminated_early: false,
        })
    }

    pub fn field(&self) -> &MatchField {
        &self.field
    }

    #[cfg(test)]
    pub(crate) fn field_mut(&mut self) -> &mut MatchField {
        &mut self.field
    }

    /// Scores for `team` and restarts from the centre as a real goal would.
    #[cfg(test)]
    pub(crate) fn award_goal(&mut self, team: TeamSide) {
        self.apply_detection(Detection {
            goal: Some(team),
            restart: Some(crate::r#match::Restart::Kickoff),
            ..Detection::default()
        });
    }

    pub fn state(&self) -> MatchState {
        self.context.state
    }

    pub fn context(&self) -> &MatchContext {
        &self.context
    }

    pub fn events(&self) -> &MatchEventLog {
        &self.events
    }

    pub fn balancer(&self) -> &PossessionBalancer {
        &self.balancer
    }

    pub fn anomalies(&self) -> u32 {
        self.anomalies
    }

    /// Plays one tick, moving through the match states as halves end.
    /// Returns false once the match is finished.
    pub fn step(&mut self) -> bool {
        let started = Instant::now();
        let running = self.advance();
        self.elapsed += started.elapsed();

        running
    }

    fn advance(&mut self) -> bool {
        loop {
            if self.context.state.is_playing() && self.context.increment_time() {
                self.game_tick();
                return true;
            }

            if !matches!(self.context.state, MatchState::NotStarted | MatchState::Finished) {
                StateManager::handle_state_finish(&mut self.context, &mut self.field);
            }

            match self.state_manager.next() {
                Some(state) => {
                    self.context.state = state;

                    if state.is_playing() {
                        self.field
                            .restart_kickoff(&mut self.rng, self.config.tuning.restart_jitter_radius);
                        self.desired.fill(Vector3::zeros());
                    }

                    info!("Match state: {:?}", state);
                }
                None => {
                    self.context.state = MatchState::Finished;
                    return false;
                }
            }
        }
    }

    pub fn run(&mut self) -> MatchResult {
        while self.step() {}

        self.result()
    }

    /// Runs until full time or until `cancel` is set. Cancellation is only
    /// observed between ticks.
    pub fn run_until(&mut self, cancel: &AtomicBool) -> MatchResult {
        while !cancel.load(Ordering::Relaxed) {
            if !self.step() {
                return self.result();
            }
        }

        if self.context.state != MatchState::Finished {
            self.terminated_early = true;
            info!("Match cancelled at {:.1}s", self.context.time.seconds());
        }

        self.result()
    }

    pub fn result(&self) -> MatchResult {
        let mut statistics = self.statistics.clone();
        statistics.finalize(&self.events, &self.balancer, self.anomalies);

        let ticks = self.context.time.ticks;
        let simulated_seconds = ticks as f64 * self.config.dt as f64;

        let result = MatchResult {
            home_team_id: self.field.home_team_id,
            away_team_id: self.field.away_team_id,
            seed: self.config.seed,
            final_score: self.context.score,
            events: self.events.clone(),
            statistics,
            performance: PerformanceMetrics::new(ticks, simulated_seconds, self.elapsed.as_millis() as u64),
            terminated_early: self.terminated_early,
        };

        info!(
            "Final score {} {} - {} {}",
            self.field.home_team_name, result.final_score.home, result.final_score.away, self.field.away_team_name
        );

        result
    }

    fn game_tick(&mut self) {
        let dt = self.config.dt;
        let time = self.context.time.seconds();
        let minute = self.context.time.minute();

        let tick_context = GameTickContext::new(&self.field, time, &self.context.score);

        let actions = self.decide(&tick_context);

        for (index, action) in actions {
            self.execute(index, &action, time, minute);
        }

        self.move_players(dt);
        self.play_ball(dt, time, minute);

        self.balancer.record(self.field.ball.owner_team, dt);
    }

    /// Every active player decides from the same snapshot. The team that
    /// decides and acts first alternates from tick to tick.
    fn decide(&mut self, tick_context: &GameTickContext) -> Vec<(usize, PlayerAction)> {
        let first = if self.context.time.ticks % 2 == 0 {
            TeamSide::Home
        } else {
            TeamSide::Away
        };

        let order = self
            .field
            .players
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_active && p.team == first)
            .chain(
                self.field
                    .players
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.is_active && p.team != first),
            )
            .map(|(index, _)| index)
            .collect::<Vec<_>>();

        let mut actions = Vec::with_capacity(order.len());

        for index in order {
            let Some(snapshot) = tick_context.players.get(index) else {
                continue;
            };

            let ctx = GameContext::new(
                snapshot,
                tick_context,
                &self.config.tuning,
                &self.balancer,
                self.scenario.as_ref(),
            )
            .with_position_behaviors(self.config.enable_position_behaviors);

            let action = if self.config.enable_agents {
                match DecisionAgent::decide(&ctx, &mut self.rng) {
                    Ok(action) => action,
                    Err(error) => {
                        self.anomalies += 1;
                        warn!("Decision failed, holding position: {}", error);

                        PlayerAction::HoldPosition
                    }
                }
            } else {
                PlayerAction::MoveTo {
                    target: DecisionAgent::target_position(&ctx),
                }
            };

            actions.push((index, action));
        }

        actions
    }

    fn execute(&mut self, index: usize, action: &PlayerAction, time: f32, minute: u32) {
        let ctx = ExecutionContext {
            tuning: &self.config.tuning,
            balancer: &self.balancer,
            scenario: self.scenario.as_ref(),
            home_direction: self.field.home_direction,
            minute,
            dt: self.config.dt,
        };

        let actor = &self.field.players[index];

        // an earlier action this tick may have sent the player off
        if !actor.is_active {
            return;
        }

        let result = ActionExecutor::execute(
            action,
            actor,
            &self.field.ball,
            &self.field.players,
            &ctx,
            &mut self.rng,
        );

        let team = actor.team;

        self.field.players[index].state = result.actor;
        self.desired[index] = result.desired_velocity;
        self.field.ball = result.ball;

        for (player_id, state) in result.affected {
            if let Some(player) = self.field.get_player_mut(player_id) {
                player.state = state;
            }
        }

        let Some(outcome) = result.outcome else {
            return;
        };

        if self.config.collect_statistics {
            self.statistics.record_outcome(team, &outcome);
        }

        let victim_id = match outcome {
            ActionOutcome::TackleWon { victim } | ActionOutcome::TackleFailed { victim, .. } => Some(victim),
            _ => None,
        };

        let actor = &self.field.players[index];
        let victim = victim_id.and_then(|id| self.field.get_player(id));

        let detection = self.detector.on_outcome(&outcome, actor, victim, time);
        self.apply_detection(detection);
    }

    fn move_players(&mut self, dt: f32) {
        for (player, desired) in self.field.players.iter_mut().zip(self.desired.iter()) {
            if !player.is_active {
                continue;
            }

            player.state = PlayerPhysics::step(&player.state, desired, dt, &player.attributes);
        }
    }

    fn play_ball(&mut self, dt: f32, time: f32, minute: u32) {
        let previous = self.field.ball.position();

        self.field.ball.tick_timers(dt);

        let owner_state = self
            .field
            .ball
            .current_owner
            .and_then(|id| self.field.get_player(id))
            .map(|p| (p.state.position, p.state.facing, p.state.velocity));

        self.field.ball.advance(owner_state, dt);

        if !self.field.ball.state.is_finite() {
            self.anomalies += 1;
            warn!("Ball state became non-finite at {:.1}s, recovered", time);
        }
        self.field.ball.state = BallPhysics::sanitize(&self.field.ball.state);

        let env = PossessionEnvironment {
            home_direction: self.field.home_direction,
            scenario: self.scenario.as_ref(),
            minute,
        };

        let ball_events = PossessionResolver::resolve(
            &mut self.field.ball,
            &previous,
            &self.field.players,
            &env,
            &mut self.rng,
        );

        if self.config.collect_statistics {
            for event in &ball_events {
                match *event {
                    BallEvent::PassCompleted { team, .. } => {
                        self.statistics.record_pass(team, PassResolution::Complete)
                    }
                    BallEvent::PassIntercepted { passer, .. } => {
                        if let Some(passer) = self.field.get_player(passer) {
                            self.statistics.record_pass(passer.team, PassResolution::Intercepted);
                        }
                    }
                    _ => {}
                }
            }
        }

        if self.field.ball.is_owned() {
            // a controlled ball is never out of play
            let position = self.field.ball.position();
            self.field.ball.state.position = clamp_to_field(position);
        } else {
            let detection =
                self.detector
                    .detect_ball(&previous, &self.field.ball, self.field.home_direction, time);
            self.apply_detection(detection);
        }

        if let Some(event) = self.detector.observe_possession(&self.field.ball, time) {
            self.events.push(event);
        }
    }

    fn apply_detection(&mut self, detection: Detection) {
        if detection.is_empty() {
            return;
        }

        for player_id in &detection.booked {
            if let Some(player) = self.field.get_player_mut(*player_id) {
                player.yellow_cards += 1;
            }
        }

        for player_id in &detection.sent_off {
            self.field.send_off(*player_id);
            info!("Player {} sent off", player_id);
        }

        if let Some(team) = detection.goal {
            self.context.score.increment(team);

            info!(
                "Goal {:?} at {:.1}s, score {}-{}",
                team,
                self.context.time.seconds(),
                self.context.score.home,
                self.context.score.away
            );
        }

        self.events.extend(detection.events);

        if let Some(restart) = detection.restart {
            if let Some(BallFlight::Pass { team, .. }) = self.field.ball.flight {
                if self.config.collect_statistics {
                    self.statistics.record_pass(team, PassResolution::Misplaced);
                }
            }

            if self.context.logging_enabled {
                debug!("Restart {:?} at {:.1}s", restart, self.context.time.seconds());
            }

            self.field.restart(restart, &self.config.tuning, &mut self.rng);
            self.desired.fill(Vector3::zeros());
        }
    }
}
