use crate::r#match::engine::physics::constants::{ball, field};
use crate::r#match::engine::physics::{flat, is_finite_vector, kick_speed, limit_magnitude};
use nalgebra::Vector3;
use serde::Serialize;

/// Position and velocity of the ball; `z` is height above the pitch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BallState {
    pub position: Vector3<f32>,
    pub velocity: Vector3<f32>,
}

impl Default for BallState {
    fn default() -> Self {
        BallState::at_rest(Vector3::zeros())
    }
}

impl BallState {
    pub fn at_rest(position: Vector3<f32>) -> Self {
        BallState {
            position: Vector3::new(position.x, position.y, 0.0),
            velocity: Vector3::zeros(),
        }
    }

    #[inline]
    pub fn is_on_ground(&self) -> bool {
        self.position.z <= ball::GROUND_HEIGHT && self.velocity.z <= 0.0
    }

    #[inline]
    pub fn horizontal_speed(&self) -> f32 {
        flat(&self.velocity).norm()
    }

    pub fn is_finite(&self) -> bool {
        is_finite_vector(&self.position) && is_finite_vector(&self.velocity)
    }
}

pub struct BallPhysics;

impl BallPhysics {
    /// Advances a free ball by `dt`: gravity and bounces in the air, rolling
    /// friction on the ground, speeds capped.
    pub fn step(state: &BallState, dt: f32) -> BallState {
        let mut position = state.position;
        let mut velocity = state.velocity;

        if state.is_on_ground() {
            position.z = 0.0;
            velocity.z = 0.0;

            let speed = flat(&velocity).norm();
            if speed > 0.0 {
                let next_speed = speed - ball::ROLLING_DECELERATION * dt;

                if next_speed <= ball::STOP_SPEED {
                    velocity = Vector3::zeros();
                } else {
                    velocity *= next_speed / speed;
                }
            }

            position += velocity * dt;
        } else {
            velocity.z -= ball::GRAVITY * dt;

            let drag = (1.0 - ball::AIR_DRAG * dt).max(0.0);
            velocity.x *= drag;
            velocity.y *= drag;

            position += velocity * dt;

            if position.z <= 0.0 {
                position.z = 0.0;

                if velocity.z < 0.0 {
                    let rebound = -velocity.z * ball::RESTITUTION;

                    velocity.z = if rebound > ball::MIN_BOUNCE_SPEED {
                        rebound
                    } else {
                        0.0
                    };

                    velocity.x *= ball::BOUNCE_FRICTION;
                    velocity.y *= ball::BOUNCE_FRICTION;
                }
            }
        }

        Self::capped(BallState { position, velocity })
    }

    /// Sets the ball moving along `direction` with the launch speed of `power`.
    /// A vertical component in `direction` lofts the ball.
    pub fn apply_impulse(state: &BallState, direction: &Vector3<f32>, power: f32) -> BallState {
        let norm = direction.norm();
        if !norm.is_finite() || norm <= 0.0 {
            return *state;
        }

        let velocity = direction / norm * kick_speed(power);

        Self::capped(BallState {
            position: state.position,
            velocity,
        })
    }

    /// Ball at the feet of a dribbling player, never outside the pitch.
    pub fn carry(owner_position: &Vector3<f32>, facing: f32, owner_velocity: &Vector3<f32>) -> BallState {
        let offset = Vector3::new(facing.cos(), facing.sin(), 0.0) * ball::CARRY_OFFSET;
        let position = owner_position + offset;

        BallState {
            position: Vector3::new(
                position.x.clamp(-field::HALF_LENGTH, field::HALF_LENGTH),
                position.y.clamp(-field::HALF_WIDTH, field::HALF_WIDTH),
                0.0,
            ),
            velocity: flat(owner_velocity),
        }
    }

    /// Future positions of a free ball, one per `dt`, for `horizon` seconds.
    pub fn project(state: &BallState, horizon: f32, dt: f32) -> Vec<BallState> {
        let steps = (horizon / dt).ceil().max(0.0) as usize;

        let mut trajectory = Vec::with_capacity(steps);
        let mut current = *state;

        for _ in 0..steps {
            current = Self::step(&current, dt);
            trajectory.push(current);
        }

        trajectory
    }

    /// Where the projected path first crosses the vertical plane `x = line_x`,
    /// interpolated between samples.
    pub fn line_crossing(state: &BallState, line_x: f32, horizon: f32, dt: f32) -> Option<Vector3<f32>> {
        let mut previous = state.position;

        for next in Self::project(state, horizon, dt) {
            let before = previous.x - line_x;
            let after = next.position.x - line_x;

            if before == 0.0 || before.signum() != after.signum() {
                let span = next.position.x - previous.x;
                let t = if span.abs() > 0.0 {
                    ((line_x - previous.x) / span).clamp(0.0, 1.0)
                } else {
                    0.0
                };

                return Some(previous + (next.position - previous) * t);
            }

            if next.velocity.norm() <= 0.0 {
                return None;
            }

            previous = next.position;
        }

        None
    }

    /// Replaces non-finite components and pulls an escaped ball back into range.
    pub fn sanitize(state: &BallState) -> BallState {
        let position = if is_finite_vector(&state.position) {
            state.position
        } else {
            Vector3::zeros()
        };

        let velocity = if is_finite_vector(&state.velocity) {
            state.velocity
        } else {
            Vector3::zeros()
        };

        Self::capped(BallState {
            position: Vector3::new(
                position.x.clamp(-field::LENGTH, field::LENGTH),
                position.y.clamp(-field::WIDTH, field::WIDTH),
                position.z,
            ),
            velocity,
        })
    }

    fn capped(state: BallState) -> BallState {
        let mut position = state.position;
        let mut velocity = state.velocity;

        position.z = position.z.clamp(0.0, ball::MAX_HEIGHT);

        let horizontal = limit_magnitude(flat(&velocity), ball::MAX_SPEED);
        velocity.x = horizontal.x;
        velocity.y = horizontal.y;
        velocity.z = velocity
            .z
            .clamp(-ball::MAX_VERTICAL_SPEED, ball::MAX_VERTICAL_SPEED);

        if position.z >= ball::MAX_HEIGHT && velocity.z > 0.0 {
            velocity.z = 0.0;
        }

        BallState { position, velocity }
    }
}
