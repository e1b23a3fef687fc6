use crate::r#match::engine::ball::physics::{BallPhysics, BallState};
use crate::r#match::TeamSide;
use nalgebra::Vector3;

/// Seconds a kicker cannot touch his own kick again.
pub const KICK_IGNORE_SECONDS: f32 = 0.35;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallTouch {
    pub player_id: u32,
    pub team: TeamSide,
}

/// What the ball is doing since its last kick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BallFlight {
    Pass {
        passer: u32,
        receiver: u32,
        team: TeamSide,
    },
    Shot {
        shooter: u32,
        team: TeamSide,
        xg: f32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KickIgnore {
    pub player_id: u32,
    pub remaining: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RestartProtection {
    pub taker: u32,
    pub remaining: f32,
}

#[derive(Debug, Clone)]
pub struct Ball {
    pub state: BallState,
    pub current_owner: Option<u32>,
    pub owner_team: Option<TeamSide>,
    pub previous_owner: Option<u32>,
    pub last_touch: Option<BallTouch>,
    /// Seconds the current owner has had the ball.
    pub owned_for: f32,
    pub ignore: Option<KickIgnore>,
    pub flight: Option<BallFlight>,
    pub protection: Option<RestartProtection>,
}

impl Default for Ball {
    fn default() -> Self {
        Ball::at(Vector3::zeros())
    }
}

impl Ball {
    pub fn at(position: Vector3<f32>) -> Self {
        Ball {
            state: BallState::at_rest(position),
            current_owner: None,
            owner_team: None,
            previous_owner: None,
            last_touch: None,
            owned_for: 0.0,
            ignore: None,
            flight: None,
            protection: None,
        }
    }

    #[inline]
    pub fn position(&self) -> Vector3<f32> {
        self.state.position
    }

    #[inline]
    pub fn is_owned(&self) -> bool {
        self.current_owner.is_some()
    }

    pub fn is_owned_by(&self, player_id: u32) -> bool {
        self.current_owner == Some(player_id)
    }

    /// Hands the ball to a player. The previous owner is remembered and any
    /// pass or shot in flight ends.
    pub fn gain(&mut self, player_id: u32, team: TeamSide) {
        if self.current_owner != Some(player_id) {
            self.previous_owner = self.current_owner.or(self.last_touch.map(|t| t.player_id));
            self.owned_for = 0.0;
        }

        self.current_owner = Some(player_id);
        self.owner_team = Some(team);
        self.last_touch = Some(BallTouch { player_id, team });
        self.flight = None;
        self.ignore = None;
        self.state.velocity.z = 0.0;
    }

    /// Ball leaves the owner's feet with `state` as its new motion.
    pub fn kick(&mut self, kicker: u32, team: TeamSide, state: BallState, flight: Option<BallFlight>) {
        self.previous_owner = Some(kicker);
        self.current_owner = None;
        self.owner_team = None;
        self.owned_for = 0.0;
        self.last_touch = Some(BallTouch {
            player_id: kicker,
            team,
        });
        self.ignore_player(kicker);
        self.flight = flight;
        self.protection = None;
        self.state = state;
    }

    /// Ball knocked loose by a touch that is not a controlled kick.
    pub fn deflect(&mut self, toucher: u32, team: TeamSide, velocity: Vector3<f32>) {
        if let Some(owner) = self.current_owner {
            self.previous_owner = Some(owner);
        }

        self.current_owner = None;
        self.owner_team = None;
        self.owned_for = 0.0;
        self.last_touch = Some(BallTouch {
            player_id: toucher,
            team,
        });
        self.ignore_player(toucher);
        self.flight = None;
        self.state.velocity = velocity;
    }

    pub fn release(&mut self) {
        self.current_owner = None;
        self.owner_team = None;
        self.owned_for = 0.0;
    }

    pub fn ignore_player(&mut self, player_id: u32) {
        self.ignore = Some(KickIgnore {
            player_id,
            remaining: KICK_IGNORE_SECONDS,
        });
    }

    pub fn is_ignored(&self, player_id: u32) -> bool {
        self.ignore.is_some_and(|i| i.player_id == player_id)
    }

    pub fn is_protected(&self) -> bool {
        self.protection.is_some()
    }

    /// Counts down the per-touch timers.
    pub fn tick_timers(&mut self, dt: f32) {
        if self.current_owner.is_some() {
            self.owned_for += dt;
        }

        self.ignore = self.ignore.and_then(|i| {
            let remaining = i.remaining - dt;
            (remaining > 0.0).then_some(KickIgnore { remaining, ..i })
        });

        self.protection = self.protection.and_then(|p| {
            let remaining = p.remaining - dt;
            (remaining > 0.0).then_some(RestartProtection { remaining, ..p })
        });
    }

    /// Dead ball at `position`, nobody in possession.
    pub fn place(&mut self, position: Vector3<f32>) {
        self.state = BallState::at_rest(position);
        self.current_owner = None;
        self.owner_team = None;
        self.owned_for = 0.0;
        self.ignore = None;
        self.flight = None;
        self.protection = None;
    }

    /// Moves the ball one tick: carried by its owner or flying free.
    pub fn advance(&mut self, owner_state: Option<(Vector3<f32>, f32, Vector3<f32>)>, dt: f32) {
        self.state = match (self.current_owner, owner_state) {
            (Some(_), Some((position, facing, velocity))) => BallPhysics::carry(&position, facing, &velocity),
            _ => BallPhysics::step(&self.state, dt),
        };
    }
}
