use crate::r#match::engine::physics::constants::field;
use crate::r#match::engine::physics::{flat_distance, is_in_penalty_area};
use crate::r#match::events::MatchEventType;
use crate::r#match::{
    narrative_multiplier, AgentTuning, BallFlight, BallState, MatchField, NarrativeScenario,
    PlayerAttributes, PlayerFieldPositionGroup, PlayerRole, PossessionBalancer, Score, TeamSide,
};
use itertools::Itertools;
use nalgebra::Vector3;

#[derive(Debug, Clone)]
pub struct PlayerSnapshot {
    pub id: u32,
    pub team: TeamSide,
    pub role: PlayerRole,
    pub position: Vector3<f32>,
    pub velocity: Vector3<f32>,
    pub facing: f32,
    pub attributes: PlayerAttributes,
    pub stamina: f32,
    pub cooldown: f32,
    pub is_active: bool,
    /// Formation slot in the team frame, attacking towards +x.
    pub slot: Vector3<f32>,
}

impl PlayerSnapshot {
    #[inline]
    pub fn position_group(&self) -> PlayerFieldPositionGroup {
        self.role.position_group()
    }

    #[inline]
    pub fn distance_to(&self, point: &Vector3<f32>) -> f32 {
        flat_distance(&self.position, point)
    }
}

#[derive(Debug, Clone)]
pub struct BallMetadata {
    pub state: BallState,
    pub current_owner: Option<u32>,
    pub owner_team: Option<TeamSide>,
    pub last_touch_team: Option<TeamSide>,
    pub owned_for: f32,
    pub flight: Option<BallFlight>,
    /// Restart taker while set-piece protection lasts.
    pub protected_taker: Option<u32>,
}

impl From<&MatchField> for BallMetadata {
    fn from(field: &MatchField) -> Self {
        let ball = &field.ball;

        BallMetadata {
            state: ball.state,
            current_owner: ball.current_owner,
            owner_team: ball.owner_team,
            last_touch_team: ball.last_touch.map(|t| t.team),
            owned_for: ball.owned_for,
            flight: ball.flight,
            protected_taker: ball.protection.map(|p| p.taker),
        }
    }
}

/// Read-only picture of the pitch at the start of a tick. Every decision in
/// the tick reads the same snapshot.
#[derive(Debug, Clone)]
pub struct GameTickContext {
    pub players: Vec<PlayerSnapshot>,
    pub ball: BallMetadata,
    pub home_direction: f32,
    pub time: f32,
    pub minute: u32,
    pub score: Score,
}

impl GameTickContext {
    pub fn new(field: &MatchField, time: f32, score: &Score) -> Self {
        let players = field
            .players
            .iter()
            .map(|p| PlayerSnapshot {
                id: p.id,
                team: p.team,
                role: p.role,
                position: p.state.position,
                velocity: p.state.velocity,
                facing: p.state.facing,
                attributes: p.attributes,
                stamina: p.state.stamina,
                cooldown: p.state.cooldown,
                is_active: p.is_active,
                slot: p.slot,
            })
            .collect();

        GameTickContext {
            players,
            ball: BallMetadata::from(field),
            home_direction: field.home_direction,
            time,
            minute: (time / 60.0) as u32,
            score: *score,
        }
    }

    pub fn player(&self, id: u32) -> Option<&PlayerSnapshot> {
        self.players.iter().find(|p| p.id == id)
    }

    /// +1.0 when `team` attacks towards +x.
    #[inline]
    pub fn direction(&self, team: TeamSide) -> f32 {
        match team {
            TeamSide::Home => self.home_direction,
            TeamSide::Away => -self.home_direction,
        }
    }

    pub fn attacking_goal(&self, team: TeamSide) -> Vector3<f32> {
        Vector3::new(self.direction(team) * field::HALF_LENGTH, 0.0, 0.0)
    }

    pub fn own_goal(&self, team: TeamSide) -> Vector3<f32> {
        Vector3::new(-self.direction(team) * field::HALF_LENGTH, 0.0, 0.0)
    }

    /// Team-frame slot to pitch coordinates. Both teams mirror through the
    /// centre spot, so equal formations are point-symmetric.
    pub fn to_world(&self, team: TeamSide, slot: &Vector3<f32>) -> Vector3<f32> {
        let direction = self.direction(team);
        Vector3::new(slot.x * direction, slot.y * direction, 0.0)
    }
}

/// Per-decision view: one player, the shared tick snapshot and match-level
/// aggregates. Built fresh for every decision.
pub struct GameContext<'a> {
    pub player: &'a PlayerSnapshot,
    pub tick: &'a GameTickContext,
    pub tuning: &'a AgentTuning,
    pub balancer: &'a PossessionBalancer,
    pub scenario: Option<&'a NarrativeScenario>,
    pub position_behaviors: bool,
}

impl<'a> GameContext<'a> {
    pub fn new(
        player: &'a PlayerSnapshot,
        tick: &'a GameTickContext,
        tuning: &'a AgentTuning,
        balancer: &'a PossessionBalancer,
        scenario: Option<&'a NarrativeScenario>,
    ) -> Self {
        GameContext {
            player,
            tick,
            tuning,
            balancer,
            scenario,
            position_behaviors: true,
        }
    }

    pub fn with_position_behaviors(mut self, enabled: bool) -> Self {
        self.position_behaviors = enabled;
        self
    }

    #[inline]
    pub fn team(&self) -> TeamSide {
        self.player.team
    }

    #[inline]
    pub fn direction(&self) -> f32 {
        self.tick.direction(self.player.team)
    }

    pub fn attacking_goal(&self) -> Vector3<f32> {
        self.tick.attacking_goal(self.player.team)
    }

    pub fn own_goal(&self) -> Vector3<f32> {
        self.tick.own_goal(self.player.team)
    }

    /// Distance along the attacking direction; larger is closer to the opponent goal.
    #[inline]
    pub fn forward(&self, position: &Vector3<f32>) -> f32 {
        position.x * self.direction()
    }

    pub fn in_own_penalty_area(&self, position: &Vector3<f32>) -> bool {
        is_in_penalty_area(position, self.own_goal().x)
    }

    pub fn has_ball(&self) -> bool {
        self.tick.ball.current_owner == Some(self.player.id)
    }

    pub fn ball(&self) -> BallOperationsImpl<'a> {
        BallOperationsImpl::new(self.tick, self.player)
    }

    pub fn teammates(&self) -> PlayerTeammatesOperationsImpl<'a> {
        PlayerTeammatesOperationsImpl::new(self.tick, self.player)
    }

    pub fn opponents(&self) -> PlayerOpponentsOperationsImpl<'a> {
        PlayerOpponentsOperationsImpl::new(self.tick, self.player)
    }

    pub fn assist_factor(&self) -> f32 {
        self.balancer.assist_factor(self.player.team)
    }

    pub fn narrative(&self, event_type: MatchEventType) -> f32 {
        narrative_multiplier(
            self.scenario,
            event_type,
            self.player.team,
            Some(self.player.id),
            self.tick.minute,
        )
    }

    pub fn is_restart_protected(&self) -> bool {
        self.tick.ball.protected_taker.is_some()
    }
}

#[derive(Clone, Copy)]
pub struct BallOperationsImpl<'a> {
    tick: &'a GameTickContext,
    player: &'a PlayerSnapshot,
}

impl<'a> BallOperationsImpl<'a> {
    pub fn new(tick: &'a GameTickContext, player: &'a PlayerSnapshot) -> Self {
        BallOperationsImpl { tick, player }
    }

    pub fn position(self) -> Vector3<f32> {
        self.tick.ball.state.position
    }

    pub fn velocity(self) -> Vector3<f32> {
        self.tick.ball.state.velocity
    }

    pub fn distance(self) -> f32 {
        self.player.distance_to(&self.tick.ball.state.position)
    }

    pub fn is_owned(self) -> bool {
        self.tick.ball.current_owner.is_some()
    }

    pub fn owner(self) -> Option<&'a PlayerSnapshot> {
        self.tick.ball.current_owner.and_then(|id| self.tick.player(id))
    }

    pub fn is_owned_by_team(self) -> bool {
        self.tick.ball.owner_team == Some(self.player.team)
    }

    pub fn is_owned_by_opponents(self) -> bool {
        self.tick.ball.owner_team == Some(self.player.team.opponent())
    }

    /// A pass from a teammate is travelling to this player.
    pub fn is_pass_to_me(self) -> bool {
        matches!(self.tick.ball.flight, Some(BallFlight::Pass { receiver, .. }) if receiver == self.player.id)
    }

    pub fn in_own_half(self) -> bool {
        self.tick.ball.state.position.x * self.tick.direction(self.player.team) <= 0.0
    }
}

#[derive(Clone, Copy)]
pub struct PlayerTeammatesOperationsImpl<'a> {
    tick: &'a GameTickContext,
    player: &'a PlayerSnapshot,
}

impl<'a> PlayerTeammatesOperationsImpl<'a> {
    pub fn new(tick: &'a GameTickContext, player: &'a PlayerSnapshot) -> Self {
        PlayerTeammatesOperationsImpl { tick, player }
    }

    /// Active teammates, the player himself excluded.
    pub fn all(self) -> impl Iterator<Item = &'a PlayerSnapshot> + 'a {
        let (id, team) = (self.player.id, self.player.team);

        self.tick
            .players
            .iter()
            .filter(move |p| p.is_active && p.team == team && p.id != id)
    }

    pub fn nearby(self, distance: f32) -> impl Iterator<Item = &'a PlayerSnapshot> + 'a {
        let position = self.player.position;

        self.all()
            .filter(move |p| p.distance_to(&position) <= distance)
    }

    /// Active players of the team, the player included, nearest to `point` first.
    /// Ties resolve by id so the order is deterministic.
    pub fn ranked_by_distance(self, point: &Vector3<f32>) -> Vec<&'a PlayerSnapshot> {
        let team = self.player.team;
        let point = *point;

        self.tick
            .players
            .iter()
            .filter(|p| p.is_active && p.team == team)
            .sorted_by(|a, b| {
                a.distance_to(&point)
                    .total_cmp(&b.distance_to(&point))
                    .then(a.id.cmp(&b.id))
            })
            .collect()
    }
}

#[derive(Clone, Copy)]
pub struct PlayerOpponentsOperationsImpl<'a> {
    tick: &'a GameTickContext,
    player: &'a PlayerSnapshot,
}

impl<'a> PlayerOpponentsOperationsImpl<'a> {
    pub fn new(tick: &'a GameTickContext, player: &'a PlayerSnapshot) -> Self {
        PlayerOpponentsOperationsImpl { tick, player }
    }

    pub fn all(self) -> impl Iterator<Item = &'a PlayerSnapshot> + 'a {
        let team = self.player.team;

        self.tick
            .players
            .iter()
            .filter(move |p| p.is_active && p.team != team)
    }

    pub fn with_ball(self) -> Option<&'a PlayerSnapshot> {
        let owner = self.tick.ball.current_owner?;

        self.all().find(|p| p.id == owner)
    }

    pub fn nearby(self, distance: f32) -> impl Iterator<Item = &'a PlayerSnapshot> + 'a {
        let position = self.player.position;

        self.all()
            .filter(move |p| p.distance_to(&position) <= distance)
    }

    pub fn exists(self, distance: f32) -> bool {
        self.nearby(distance).next().is_some()
    }

    pub fn nearest_to(self, point: &Vector3<f32>) -> Option<&'a PlayerSnapshot> {
        self.all()
            .min_by(|a, b| a.distance_to(point).total_cmp(&b.distance_to(point)))
    }

    pub fn goalkeeper(self) -> Option<&'a PlayerSnapshot> {
        self.all().find(|p| p.role.is_goalkeeper())
    }
}
