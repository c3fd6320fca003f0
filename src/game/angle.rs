//! Angle normalization and bounded rotation

use std::f32::consts::{PI, TAU};

/// Unit vector in the direction of (dx, dy), or the zero vector for (0, 0)
pub fn normalize(dx: f32, dy: f32) -> (f32, f32) {
    let len = dx.hypot(dy);
    if len == 0.0 {
        return (0.0, 0.0);
    }
    (dx / len, dy / len)
}

/// Map any finite angle into (-π, π]
pub fn wrap_angle(angle: f32) -> f32 {
    if angle > -PI && angle <= PI {
        return angle;
    }
    let a = angle.rem_euclid(TAU);
    if a > PI {
        a - TAU
    } else {
        a
    }
}

/// Rotate `current` towards `target` by at most `max_delta` radians along
/// the shorter arc.
pub fn rotate_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    let max_delta = max_delta.max(0.0);
    let delta = wrap_angle(target - current);
    if delta.abs() <= max_delta {
        // Land exactly on the target instead of accumulating rounding error
        return wrap_angle(target);
    }
    wrap_angle(current + max_delta.copysign(delta))
}

/// Absolute shortest angular distance between two angles
pub fn angle_between(a: f32, b: f32) -> f32 {
    wrap_angle(b - a).abs()
}
