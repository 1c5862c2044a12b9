//! Easing curves and interpolation for camera moves.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Easing function type. Named in config as `linear`, `quad_in_out` or
/// `cubic_in_out`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Constant velocity (no easing).
    Linear,
    /// Slow start and end. Used by zoom transitions.
    #[default]
    QuadInOut,
    /// Stronger slow start and end.
    CubicInOut,
}

impl Easing {
    /// Apply the easing function to a normalized time value `t`, clamped to [0, 1].
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// Linearly interpolate between two values.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Linearly interpolate between two Vec3 values.
#[inline]
pub fn lerp_vec3(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a + (b - a) * t
}

/// Interpolate Vec3 with easing.
#[inline]
pub fn ease_vec3(a: Vec3, b: Vec3, t: f32, easing: Easing) -> Vec3 {
    lerp_vec3(a, b, easing.apply(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_in_out_endpoints_and_midpoint() {
        assert_eq!(Easing::QuadInOut.apply(0.0), 0.0);
        assert_eq!(Easing::QuadInOut.apply(1.0), 1.0);
        assert!((Easing::QuadInOut.apply(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn quad_in_out_is_symmetric() {
        for i in 0..=10 {
            let t = i as f32 / 10.0;
            let a = Easing::QuadInOut.apply(t);
            let b = 1.0 - Easing::QuadInOut.apply(1.0 - t);
            assert!((a - b).abs() < 1e-5, "asymmetric at {}", t);
        }
    }

    #[test]
    fn quad_in_out_slow_start() {
        assert!((Easing::QuadInOut.apply(0.25) - 0.125).abs() < 1e-6);
        assert!((Easing::QuadInOut.apply(0.75) - 0.875).abs() < 1e-6);
    }

    #[test]
    fn input_is_clamped() {
        assert_eq!(Easing::QuadInOut.apply(-1.0), 0.0);
        assert_eq!(Easing::QuadInOut.apply(3.0), 1.0);
    }

    #[test]
    fn cubic_is_steeper_than_quad_mid_move() {
        assert!(Easing::CubicInOut.apply(0.25) < Easing::QuadInOut.apply(0.25));
        assert!(Easing::CubicInOut.apply(0.75) > Easing::QuadInOut.apply(0.75));
    }

    #[test]
    fn ease_vec3_interpolates() {
        let r = ease_vec3(Vec3::ZERO, Vec3::new(2.0, 4.0, 6.0), 0.5, Easing::Linear);
        assert!((r - Vec3::new(1.0, 2.0, 3.0)).length() < 1e-6);
        assert!((lerp(10.0, 20.0, 0.25) - 12.5).abs() < 1e-6);
    }
}
