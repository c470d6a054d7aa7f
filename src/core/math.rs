// Math utilities shared by device backends and action controls

use glam::Vec2;

/// Clamp a value between min and max
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Remap a raw analog reading from the device's physical range.
///
/// Symmetric axes (sticks) land in [-1, 1], non-symmetric ones (triggers) in [0, 1].
pub fn fix_up_analog(value: f32, min: f32, max: f32, symmetric: bool) -> f32 {
    let range = min.abs() + max.abs();
    if range <= 0.0 {
        return 0.0;
    }

    let value = clamp(value, min, max) - min;
    let value = value / (range * if symmetric { 0.5 } else { 1.0 });

    if symmetric {
        value - 1.0
    } else {
        value
    }
}

/// Apply a radial dead zone to a single axis value.
///
/// Values inside the zone read 0, values outside are rescaled so the output
/// still reaches 1.0 at full deflection.
pub fn apply_dead_zone(value: f32, dead_zone: f32) -> f32 {
    if dead_zone <= 0.0 {
        return value;
    }
    if dead_zone >= 1.0 {
        return 0.0;
    }

    let magnitude = value.abs();
    if magnitude < dead_zone {
        return 0.0;
    }

    let sign = if value < 0.0 { -1.0 } else { 1.0 };
    (value - sign * dead_zone) / (1.0 - dead_zone)
}

/// Scaled radial dead zone for one stick component.
///
/// `partner` is the other component of the stick; only `value` is rescaled.
pub fn apply_radial_dead_zone(value: f32, partner: f32, dead_zone: f32) -> f32 {
    if dead_zone <= 0.0 {
        return value;
    }
    if dead_zone >= 1.0 {
        return 0.0;
    }

    let magnitude = (value * value + partner * partner).sqrt();
    if magnitude < dead_zone {
        0.0
    } else {
        (value / magnitude) * ((magnitude - dead_zone) / (1.0 - dead_zone))
    }
}

/// Keep `pos` within `radius` of `origin`
pub fn clamp_to_radius(origin: Vec2, pos: Vec2, radius: f32) -> Vec2 {
    let offset = pos - origin;
    if offset.length() > radius {
        origin + offset.normalize_or_zero() * radius
    } else {
        pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(5.0, 0.0, 10.0), 5.0);
        assert_eq!(clamp(-5.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp(15.0, 0.0, 10.0), 10.0);
    }

    #[test]
    fn test_fix_up_analog_symmetric() {
        assert_relative_eq!(fix_up_analog(-32768.0, -32768.0, 32768.0, true), -1.0);
        assert_relative_eq!(fix_up_analog(0.0, -32768.0, 32768.0, true), 0.0);
        assert_relative_eq!(fix_up_analog(32768.0, -32768.0, 32768.0, true), 1.0);
    }

    #[test]
    fn test_fix_up_analog_unsigned_range() {
        // Xbox Series sticks report 0..65536
        assert_relative_eq!(fix_up_analog(32768.0, 0.0, 65536.0, true), 0.0);
        assert_relative_eq!(fix_up_analog(65536.0, 0.0, 65536.0, true), 1.0);
    }

    #[test]
    fn test_fix_up_analog_trigger() {
        assert_relative_eq!(fix_up_analog(0.0, 0.0, 255.0, false), 0.0);
        assert_relative_eq!(fix_up_analog(255.0, 0.0, 255.0, false), 1.0);
        assert_relative_eq!(fix_up_analog(300.0, 0.0, 255.0, false), 1.0);
    }

    #[test]
    fn test_fix_up_analog_empty_range() {
        assert_eq!(fix_up_analog(10.0, 0.0, 0.0, true), 0.0);
    }

    #[test]
    fn test_apply_dead_zone() {
        assert_eq!(apply_dead_zone(0.1, 0.15), 0.0);
        assert_eq!(apply_dead_zone(-0.1, 0.15), 0.0);
        assert_relative_eq!(apply_dead_zone(1.0, 0.15), 1.0);
        assert_relative_eq!(apply_dead_zone(-1.0, 0.15), -1.0);
        assert_relative_eq!(apply_dead_zone(0.5, 0.0), 0.5);
    }

    #[test]
    fn test_radial_dead_zone() {
        assert_eq!(apply_radial_dead_zone(0.1, 0.05, 0.15), 0.0);
        // Inside on one axis but outside as a vector
        assert!(apply_radial_dead_zone(0.1, 0.9, 0.15) > 0.0);
        assert_relative_eq!(apply_radial_dead_zone(1.0, 0.0, 0.15), 1.0);
        assert_relative_eq!(apply_radial_dead_zone(0.5, 0.3, 0.0), 0.5);
    }

    #[test]
    fn test_clamp_to_radius() {
        let origin = Vec2::new(10.0, 10.0);
        let inside = Vec2::new(12.0, 10.0);
        assert_eq!(clamp_to_radius(origin, inside, 5.0), inside);

        let outside = clamp_to_radius(origin, Vec2::new(30.0, 10.0), 5.0);
        assert_relative_eq!(outside.x, 15.0);
        assert_relative_eq!(outside.y, 10.0);
    }
}
