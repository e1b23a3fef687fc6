use crate::r#match::engine::physics::constants::{field, player};
use crate::r#match::engine::physics::{
    acceleration, clamp_to_field, fatigue_factor, flat, is_finite_vector, limit_magnitude,
    top_speed,
};
use crate::r#match::player::state::PlayerState;
use crate::r#match::PlayerAttributes;
use nalgebra::Vector3;

pub struct PlayerPhysics;

impl PlayerPhysics {
    /// Moves a player one tick towards `desired_velocity`. Acceleration and
    /// deceleration are limited by the player's ratings, speed by pace and
    /// fatigue. The result is always finite and inside the pitch.
    pub fn step(
        state: &PlayerState,
        desired_velocity: &Vector3<f32>,
        dt: f32,
        attributes: &PlayerAttributes,
    ) -> PlayerState {
        let mut next = Self::sanitize(state);

        let top = top_speed(attributes.pace);
        let max_speed = (top * fatigue_factor(next.stamina)).min(player::HARD_SPEED_CAP);

        let desired = if is_finite_vector(desired_velocity) {
            limit_magnitude(flat(desired_velocity), max_speed)
        } else {
            Vector3::zeros()
        };

        let braking = desired.norm() < next.velocity.norm();
        let accel_limit = if braking {
            player::DECELERATION
        } else {
            acceleration(attributes.pace, attributes.physical)
        };

        let delta = limit_magnitude(desired - next.velocity, accel_limit * dt);

        next.velocity = limit_magnitude(next.velocity + delta, max_speed);
        next.position += next.velocity * dt;

        Self::clamp_bounds(&mut next);

        let speed = next.velocity.norm();
        if speed > player::FACING_MIN_SPEED {
            next.facing = next.velocity.y.atan2(next.velocity.x);
        }

        next.stamina = Self::stamina(next.stamina, speed / top, dt, attributes.stamina);
        next.cooldown = (next.cooldown - dt).max(0.0);
        next.action_time += dt;

        next
    }

    fn stamina(current: f32, intensity: f32, dt: f32, endurance: f32) -> f32 {
        let intensity = intensity.clamp(0.0, 1.0);

        let value = if intensity > player::RECOVERY_INTENSITY {
            let endurance_factor = 1.3 - 0.6 * (endurance / 100.0).clamp(0.0, 1.0);
            current - player::STAMINA_DRAIN * intensity * intensity * endurance_factor * dt
        } else {
            let rest = (player::RECOVERY_INTENSITY - intensity) / player::RECOVERY_INTENSITY;
            current + player::STAMINA_RECOVERY * rest * dt
        };

        value.clamp(0.0, 1.0)
    }

    fn clamp_bounds(state: &mut PlayerState) {
        let clamped = clamp_to_field(state.position);

        if clamped.x != state.position.x {
            state.velocity.x = 0.0;
        }

        if clamped.y != state.position.y {
            state.velocity.y = 0.0;
        }

        state.position = clamped;
        state.position.z = 0.0;
    }

    fn sanitize(state: &PlayerState) -> PlayerState {
        let mut clean = *state;

        if !is_finite_vector(&clean.position) {
            clean.position = Vector3::zeros();
            clean.velocity = Vector3::zeros();
        }

        if !is_finite_vector(&clean.velocity) {
            clean.velocity = Vector3::zeros();
        }

        if !clean.facing.is_finite() {
            clean.facing = 0.0;
        }

        if !clean.stamina.is_finite() {
            clean.stamina = 1.0;
        }

        if !clean.cooldown.is_finite() {
            clean.cooldown = 0.0;
        }

        clean.position.x = clean.position.x.clamp(-field::HALF_LENGTH, field::HALF_LENGTH);
        clean.position.y = clean.position.y.clamp(-field::HALF_WIDTH, field::HALF_WIDTH);
        clean.velocity.z = 0.0;

        clean
    }
}
