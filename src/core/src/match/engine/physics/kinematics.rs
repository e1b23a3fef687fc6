use crate::r#match::engine::physics::constants::{ball, field, player};
use nalgebra::Vector3;

#[inline]
fn rating(value: f32) -> f32 {
    (value / 100.0).clamp(0.0, 1.0)
}

/// Top running speed for a pace rating.
pub fn top_speed(pace: f32) -> f32 {
    player::MIN_TOP_SPEED + (player::MAX_TOP_SPEED - player::MIN_TOP_SPEED) * rating(pace)
}

pub fn acceleration(pace: f32, physical: f32) -> f32 {
    let blend = 0.6 * rating(pace) + 0.4 * rating(physical);

    player::MIN_ACCELERATION + (player::MAX_ACCELERATION - player::MIN_ACCELERATION) * blend
}

const KICK_CURVE: f32 = 0.15;

/// Launch speed for a kick power on the 0..=100 scale. Close to linear with
/// mild diminishing returns at the top.
pub fn kick_speed(power: f32) -> f32 {
    let p = rating(power);

    ball::MAX_KICK_SPEED * p * (1.0 + KICK_CURVE - KICK_CURVE * p)
}

/// Inverse of [`kick_speed`].
pub fn kick_power_for_speed(speed: f32) -> f32 {
    let speed = speed.clamp(0.0, ball::MAX_KICK_SPEED);

    let a = KICK_CURVE;
    let b = 1.0 + KICK_CURVE;
    let discriminant = b * b - 4.0 * a * speed / ball::MAX_KICK_SPEED;

    let p = (b - discriminant.max(0.0).sqrt()) / (2.0 * a);

    (p * 100.0).clamp(0.0, 100.0)
}

/// Multiplier on top speed once stamina runs low.
pub fn fatigue_factor(stamina: f32) -> f32 {
    if stamina >= player::FATIGUE_THRESHOLD {
        return 1.0;
    }

    let ratio = (stamina / player::FATIGUE_THRESHOLD).clamp(0.0, 1.0);

    player::FATIGUE_SPEED_FLOOR + (1.0 - player::FATIGUE_SPEED_FLOOR) * ratio
}

pub fn clamp_to_field(position: Vector3<f32>) -> Vector3<f32> {
    Vector3::new(
        position.x.clamp(-field::HALF_LENGTH, field::HALF_LENGTH),
        position.y.clamp(-field::HALF_WIDTH, field::HALF_WIDTH),
        position.z,
    )
}

pub fn is_inside_field(position: &Vector3<f32>) -> bool {
    position.x.abs() <= field::HALF_LENGTH && position.y.abs() <= field::HALF_WIDTH
}

/// True when `position` lies in the penalty area in front of the goal at `goal_x`.
pub fn is_in_penalty_area(position: &Vector3<f32>, goal_x: f32) -> bool {
    (position.x - goal_x).abs() <= field::PENALTY_AREA_DEPTH
        && position.y.abs() <= field::PENALTY_AREA_HALF_WIDTH
}

/// Horizontal projection, height dropped.
#[inline]
pub fn flat(vector: &Vector3<f32>) -> Vector3<f32> {
    Vector3::new(vector.x, vector.y, 0.0)
}

#[inline]
pub fn flat_distance(a: &Vector3<f32>, b: &Vector3<f32>) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;

    (dx * dx + dy * dy).sqrt()
}

pub fn limit_magnitude(vector: Vector3<f32>, max: f32) -> Vector3<f32> {
    let norm = vector.norm();

    if norm > max && norm > 0.0 {
        vector * (max / norm)
    } else {
        vector
    }
}

pub fn is_finite_vector(vector: &Vector3<f32>) -> bool {
    vector.x.is_finite() && vector.y.is_finite() && vector.z.is_finite()
}

/// Horizontal distance from `point` to the segment `a..b`, with the segment
/// parameter of the closest point.
pub fn distance_to_segment(point: &Vector3<f32>, a: &Vector3<f32>, b: &Vector3<f32>) -> (f32, f32) {
    let ab = flat(&(b - a));
    let ap = flat(&(point - a));
    let length_squared = ab.norm_squared();

    let t = if length_squared > 0.0 {
        (ap.dot(&ab) / length_squared).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let closest = a + (b - a) * t;

    (flat_distance(point, &closest), t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_speed_range() {
        assert_eq!(top_speed(0.0), player::MIN_TOP_SPEED);
        assert_eq!(top_speed(100.0), player::MAX_TOP_SPEED);
        assert!(top_speed(60.0) < top_speed(61.0));
        assert_eq!(top_speed(140.0), player::MAX_TOP_SPEED);
    }

    #[test]
    fn test_acceleration_monotonic() {
        assert!(acceleration(50.0, 50.0) < acceleration(60.0, 50.0));
        assert!(acceleration(50.0, 50.0) < acceleration(50.0, 60.0));
        assert!(acceleration(100.0, 100.0) <= player::MAX_ACCELERATION + 1e-5);
        assert!(acceleration(0.0, 0.0) >= player::MIN_ACCELERATION - 1e-5);
    }

    #[test]
    fn test_kick_speed_monotonic_and_bounded() {
        let mut last = -1.0;
        for power in 0..=100 {
            let speed = kick_speed(power as f32);
            assert!(speed > last);
            last = speed;
        }

        assert!((kick_speed(100.0) - ball::MAX_KICK_SPEED).abs() < 1e-3);
        assert_eq!(kick_speed(0.0), 0.0);
    }

    #[test]
    fn test_kick_power_inverse() {
        for power in [5.0, 25.0, 50.0, 75.0, 99.0] {
            let back = kick_power_for_speed(kick_speed(power));
            assert!((back - power).abs() < 0.01, "{power} -> {back}");
        }
    }

    #[test]
    fn test_fatigue_factor() {
        assert_eq!(fatigue_factor(1.0), 1.0);
        assert_eq!(fatigue_factor(player::FATIGUE_THRESHOLD), 1.0);
        assert_eq!(fatigue_factor(0.0), player::FATIGUE_SPEED_FLOOR);
        assert!(fatigue_factor(0.1) < fatigue_factor(0.2));
    }

    #[test]
    fn test_clamp_to_field() {
        let clamped = clamp_to_field(Vector3::new(70.0, -50.0, 0.0));

        assert_eq!(clamped.x, field::HALF_LENGTH);
        assert_eq!(clamped.y, -field::HALF_WIDTH);
        assert!(is_inside_field(&clamped));
        assert!(!is_inside_field(&Vector3::new(53.0, 0.0, 0.0)));
    }

    #[test]
    fn test_distance_to_segment() {
        let a = Vector3::new(0.0, 0.0, 0.0);
        let b = Vector3::new(10.0, 0.0, 0.0);

        let (distance, t) = distance_to_segment(&Vector3::new(5.0, 2.0, 0.0), &a, &b);
        assert!((distance - 2.0).abs() < 1e-5);
        assert!((t - 0.5).abs() < 1e-5);

        let (distance, t) = distance_to_segment(&Vector3::new(-3.0, 4.0, 0.0), &a, &b);
        assert!((distance - 5.0).abs() < 1e-5);
        assert_eq!(t, 0.0);
    }
}
