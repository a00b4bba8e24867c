use rand::Rng;

use crate::animation::easing::Easing;

/// Vertical travel above and below the resting height.
pub const HOVER_AMPLITUDE: f32 = 0.2;
/// Full up-and-down cycle length in seconds, sampled per frame.
pub const HOVER_PERIOD_RANGE: std::ops::Range<f32> = 10.0..15.0;

/// Endless yoyo bobbing around a resting height.
///
/// Each leg between the low and high points is shaped with
/// [`Easing::QuadraticInOut`]. The cycle is phase-shifted so that `t = 0`
/// sits at the resting height on the way up, which makes every multiple of
/// the period land back on `base_y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverAnimation {
    pub base_y: f32,
    pub period: f32,
}

impl HoverAnimation {
    pub fn new(base_y: f32, period: f32) -> Self {
        Self { base_y, period }
    }

    pub fn random(base_y: f32, rng: &mut impl Rng) -> Self {
        Self::new(base_y, rng.gen_range(HOVER_PERIOD_RANGE))
    }

    pub fn offset(&self, t: f32) -> f32 {
        let phase = (t / self.period + 0.25).rem_euclid(1.0);

        let normalized = if phase < 0.5 {
            -1.0 + 2.0 * Easing::QuadraticInOut.evaluate(phase * 2.0)
        } else {
            1.0 - 2.0 * Easing::QuadraticInOut.evaluate((phase - 0.5) * 2.0)
        };

        self.base_y + HOVER_AMPLITUDE * normalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_starts_at_rest_and_rises_first() {
        let hover = HoverAnimation::new(0.4, 12.0);
        assert!((hover.offset(0.0) - 0.4).abs() < 1e-6);
        assert!(hover.offset(1.0) > 0.4);
    }

    #[test]
    fn test_returns_to_rest_at_period_boundaries() {
        let hover = HoverAnimation::new(1.7, 13.3);

        for cycle in 1..=20 {
            let t = cycle as f32 * hover.period;
            assert!(
                (hover.offset(t) - 1.7).abs() < 1e-4,
                "cycle {cycle}: {}",
                hover.offset(t)
            );
        }
    }

    #[test]
    fn test_stays_within_amplitude() {
        let hover = HoverAnimation::new(-0.5, 10.0);

        let peak = hover.offset(2.5);
        let trough = hover.offset(7.5);
        assert!((peak - (-0.3)).abs() < 1e-5);
        assert!((trough - (-0.7)).abs() < 1e-5);

        for step in 0..1000 {
            let y = hover.offset(step as f32 * 0.037);
            assert!(y >= -0.7 - 1e-5 && y <= -0.3 + 1e-5);
        }
    }

    #[test]
    fn test_is_continuous() {
        let hover = HoverAnimation::new(0.0, 11.0);
        let dt = 1.0 / 120.0;

        for step in 0..(11.0 * 120.0) as usize {
            let t = step as f32 * dt;
            let jump = (hover.offset(t + dt) - hover.offset(t)).abs();
            assert!(jump < 0.01, "jump of {jump} at t={t}");
        }
    }

    #[test]
    fn test_random_period_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let hover = HoverAnimation::random(0.0, &mut rng);
            assert!(HOVER_PERIOD_RANGE.contains(&hover.period));
        }
    }
}
