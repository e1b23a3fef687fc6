use crate::r#match::engine::physics::{fatigue_factor, flat, limit_magnitude, top_speed};
use crate::r#match::MatchPlayer;
use nalgebra::Vector3;

/// Desired-velocity generators. Physics applies the acceleration limits, so
/// every behaviour only decides where the player wants to go and how fast.
pub enum SteeringBehavior {
    Seek {
        target: Vector3<f32>,
    },
    Arrive {
        target: Vector3<f32>,
        slowing_distance: f32,
    },
    Pursuit {
        target: Vector3<f32>,
        target_velocity: Vector3<f32>,
    },
    Flee {
        target: Vector3<f32>,
    },
    Run {
        direction: Vector3<f32>,
        speed_factor: f32,
    },
    Brake,
}

impl SteeringBehavior {
    pub fn calculate(&self, player: &MatchPlayer) -> SteeringOutput {
        let max_speed = top_speed(player.attributes.pace) * fatigue_factor(player.state.stamina);
        let position = player.state.position;

        let velocity = match self {
            SteeringBehavior::Seek { target } => Self::towards(&position, target, max_speed),
            SteeringBehavior::Arrive {
                target,
                slowing_distance,
            } => {
                let to_target = flat(&(target - position));
                let distance = to_target.norm();

                const ARRIVAL_DEADZONE: f32 = 0.3;
                if distance < ARRIVAL_DEADZONE {
                    Vector3::zeros()
                } else {
                    let safe_slowing_distance = slowing_distance.max(1.0);
                    let desired_speed = if distance < safe_slowing_distance {
                        max_speed * (distance / safe_slowing_distance)
                    } else {
                        max_speed
                    };

                    to_target / distance * desired_speed
                }
            }
            SteeringBehavior::Pursuit {
                target,
                target_velocity,
            } => {
                let distance = flat(&(target - position)).norm();

                // lead the target by the time it takes to close the gap
                let look_ahead = (distance / max_speed.max(1.0)).min(1.5);
                let predicted = target + flat(target_velocity) * look_ahead;

                Self::towards(&position, &predicted, max_speed)
            }
            SteeringBehavior::Flee { target } => {
                let away = flat(&(position - target));
                let norm = away.norm();

                if norm > 0.0 {
                    away / norm * max_speed
                } else {
                    Vector3::zeros()
                }
            }
            SteeringBehavior::Run {
                direction,
                speed_factor,
            } => {
                let direction = flat(direction);
                let norm = direction.norm();

                if norm > 0.0 {
                    direction / norm * max_speed * speed_factor.clamp(0.0, 1.0)
                } else {
                    Vector3::zeros()
                }
            }
            SteeringBehavior::Brake => Vector3::zeros(),
        };

        let velocity = limit_magnitude(velocity, max_speed);

        let rotation = if velocity.x != 0.0 || velocity.y != 0.0 {
            velocity.y.atan2(velocity.x)
        } else {
            player.state.facing
        };

        SteeringOutput { velocity, rotation }
    }

    fn towards(position: &Vector3<f32>, target: &Vector3<f32>, speed: f32) -> Vector3<f32> {
        let to_target = flat(&(target - position));
        let norm = to_target.norm();

        if norm > 0.0 {
            to_target / norm * speed
        } else {
            Vector3::zeros()
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SteeringOutput {
    pub velocity: Vector3<f32>,
    pub rotation: f32,
}
