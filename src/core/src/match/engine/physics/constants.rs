//! Metric units throughout: metres, seconds, m/s, m/s^2.
//! The pitch origin is the centre spot, x runs goal to goal and y touchline to touchline.

pub mod field {
    pub const LENGTH: f32 = 105.0;
    pub const WIDTH: f32 = 68.0;
    pub const HALF_LENGTH: f32 = LENGTH / 2.0;
    pub const HALF_WIDTH: f32 = WIDTH / 2.0;

    pub const PENALTY_AREA_DEPTH: f32 = 16.5;
    pub const PENALTY_AREA_HALF_WIDTH: f32 = 20.16;
    pub const GOAL_AREA_DEPTH: f32 = 5.5;
    pub const CENTER_CIRCLE_RADIUS: f32 = 9.15;
}

pub mod goal {
    pub const HALF_WIDTH: f32 = 3.66;
    pub const HEIGHT: f32 = 2.44;
    /// Distance inside the posts the shooter aims for.
    pub const POST_AIM_MARGIN: f32 = 0.5;
}

pub mod ball {
    pub const RADIUS: f32 = 0.11;
    pub const GRAVITY: f32 = 9.81;
    pub const RESTITUTION: f32 = 0.5;
    /// Horizontal speed kept through a bounce.
    pub const BOUNCE_FRICTION: f32 = 0.8;
    /// Below this rebound speed the ball stops bouncing and starts rolling.
    pub const MIN_BOUNCE_SPEED: f32 = 1.0;
    pub const ROLLING_DECELERATION: f32 = 2.6;
    /// Fraction of horizontal speed lost per second of flight.
    pub const AIR_DRAG: f32 = 0.02;
    pub const GROUND_HEIGHT: f32 = 0.05;
    pub const STOP_SPEED: f32 = 0.15;

    pub const MAX_SPEED: f32 = 40.0;
    pub const MAX_VERTICAL_SPEED: f32 = 20.0;
    pub const MAX_HEIGHT: f32 = 30.0;
    pub const MAX_KICK_SPEED: f32 = 32.0;

    pub const CARRY_OFFSET: f32 = 0.6;
    /// Balls slower than this are brought under control without a roll.
    pub const AUTO_CONTROL_SPEED: f32 = 16.0;
}

pub mod player {
    pub const MIN_TOP_SPEED: f32 = 6.8;
    pub const MAX_TOP_SPEED: f32 = 9.6;
    pub const MIN_ACCELERATION: f32 = 4.0;
    pub const MAX_ACCELERATION: f32 = 7.5;
    pub const DECELERATION: f32 = 9.0;
    pub const HARD_SPEED_CAP: f32 = 10.5;

    pub const CONTROL_RADIUS: f32 = 1.2;
    pub const CONTROL_HEIGHT: f32 = 1.8;
    pub const KEEPER_CATCH_RADIUS: f32 = 2.0;
    /// Extra lateral reach a keeper gets against shots.
    pub const KEEPER_DIVE_REACH: f32 = 1.5;
    pub const KEEPER_REACH_HEIGHT: f32 = 2.6;

    pub const FATIGUE_THRESHOLD: f32 = 0.35;
    pub const FATIGUE_SPEED_FLOOR: f32 = 0.75;
    /// Stamina lost per second at full sprint by a 0-rated player.
    pub const STAMINA_DRAIN: f32 = 0.0009;
    pub const STAMINA_RECOVERY: f32 = 0.0015;
    /// Exertion below this share of top speed recovers stamina.
    pub const RECOVERY_INTENSITY: f32 = 0.35;
    pub const HALF_TIME_RECOVERY: f32 = 0.15;

    pub const FACING_MIN_SPEED: f32 = 0.3;
}

pub mod tolerance {
    pub const EPSILON: f32 = 1e-4;
    pub const ARRIVAL: f32 = 0.5;
}
