//! Frame-rate independent exponential smoothing.
//!
//! Each step closes `1 - exp(-rate * dt)` of the remaining distance, so two
//! steps of `dt` land exactly where one step of `2 * dt` would.

use glam::Vec3;

/// Values that can be linearly blended toward a target.
pub trait Damp: Copy {
    fn lerp_toward(self, target: Self, alpha: f32) -> Self;
}

impl Damp for f32 {
    fn lerp_toward(self, target: Self, alpha: f32) -> Self {
        self + (target - self) * alpha
    }
}

impl Damp for Vec3 {
    fn lerp_toward(self, target: Self, alpha: f32) -> Self {
        self.lerp(target, alpha)
    }
}

/// Fraction of the remaining distance closed in `dt` seconds at `rate` (1/s).
///
/// Always in [0, 1]; a non-positive or non-finite rate or dt gives 0.
#[inline]
pub fn damp_factor(rate: f32, dt: f32) -> f32 {
    if !(rate > 0.0 && dt > 0.0) || rate.is_nan() || dt.is_nan() {
        return 0.0;
    }
    // exp(-inf) is 0, so huge rates or stalls snap without overshoot
    (1.0 - (-rate * dt).exp()).clamp(0.0, 1.0)
}

/// One smoothing step from `current` toward `target`.
#[inline]
pub fn step<T: Damp>(current: T, target: T, rate: f32, dt: f32) -> T {
    current.lerp_toward(target, damp_factor(rate, dt))
}

/// Exponential follower with a fixed decay rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DampedFollower {
    rate: f32,
}

impl DampedFollower {
    /// Create a follower; negative or NaN rates are stored as 0 (no movement).
    pub fn new(rate: f32) -> Self {
        Self {
            rate: if rate > 0.0 { rate } else { 0.0 },
        }
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    pub fn follow<T: Damp>(&self, current: T, target: T, dt: f32) -> T {
        step(current, target, self.rate, dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_rate_does_not_move() {
        assert_eq!(step(1.0_f32, 5.0, 0.0, 0.1), 1.0);
        assert_eq!(DampedFollower::new(-3.0).follow(1.0_f32, 5.0, 0.1), 1.0);
    }

    #[test]
    fn huge_rate_snaps_to_target() {
        let next = step(Vec3::ZERO, Vec3::new(3.0, 4.0, 5.0), 1e6, 1.0);
        assert_eq!(next, Vec3::new(3.0, 4.0, 5.0));
    }

    #[test]
    fn stall_never_overshoots() {
        let next = step(0.0_f32, 10.0, 7.0, 3600.0);
        assert!(next <= 10.0);
        assert!((next - 10.0).abs() < 1e-5);
    }

    #[test]
    fn invalid_dt_is_ignored() {
        assert_eq!(step(2.0_f32, 8.0, 7.0, f32::NAN), 2.0);
        assert_eq!(step(2.0_f32, 8.0, 7.0, -0.5), 2.0);
        assert_eq!(damp_factor(7.0, f32::INFINITY), 1.0);
    }

    #[test]
    fn split_steps_match_single_step() {
        let whole = step(0.0_f32, 1.0, 8.0, 0.1);
        let halves = step(step(0.0_f32, 1.0, 8.0, 0.05), 1.0, 8.0, 0.05);
        assert!((whole - halves).abs() < 1e-6);
    }

    #[test]
    fn distance_shrinks_monotonically() {
        let target = Vec3::new(10.0, -4.0, 2.0);
        let mut current = Vec3::ZERO;
        let mut last = current.distance(target);
        // one second at 60 fps
        for _ in 0..60 {
            current = step(current, target, 7.0, 1.0 / 60.0);
            let distance = current.distance(target);
            assert!(distance < last);
            last = distance;
        }
        assert!(last < 0.02);
    }
}
