//! Easing curves for time-driven interpolation.

/// Easing function variants for animation curves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    /// Quadratic ease-in-out (slow start, slow end). Used for hover bobbing.
    QuadraticInOut,
    /// Cubic ease-out (fast start, long settle). Used for camera moves.
    CubicOut,
}

impl Easing {
    /// Evaluate the easing function at time t.
    ///
    /// Input t is clamped to [0.0, 1.0].
    /// Returns the eased value, also in [0.0, 1.0].
    #[inline]
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Easing::QuadraticInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    let omt = 1.0 - t;
                    1.0 - 2.0 * omt * omt
                }
            }
            Easing::CubicOut => {
                let omt = 1.0 - t;
                1.0 - omt * omt * omt
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 2] = [Easing::QuadraticInOut, Easing::CubicOut];

    #[test]
    fn test_endpoints() {
        for easing in ALL {
            assert_eq!(easing.evaluate(0.0), 0.0, "{easing:?}");
            assert_eq!(easing.evaluate(1.0), 1.0, "{easing:?}");
        }
    }

    #[test]
    fn test_input_clamping() {
        for easing in ALL {
            assert_eq!(easing.evaluate(-0.5), 0.0);
            assert_eq!(easing.evaluate(1.5), 1.0);
        }
    }

    #[test]
    fn test_monotonic() {
        for easing in ALL {
            let mut previous = 0.0;
            for step in 1..=100 {
                let value = easing.evaluate(step as f32 / 100.0);
                assert!(value >= previous, "{easing:?} decreased at step {step}");
                previous = value;
            }
        }
    }

    #[test]
    fn test_quadratic_in_out_is_symmetric() {
        let easing = Easing::QuadraticInOut;
        assert_eq!(easing.evaluate(0.5), 0.5);
        assert_eq!(easing.evaluate(0.25), 0.125);
        assert!((easing.evaluate(0.75) - 0.875).abs() < 1e-6);
    }

    #[test]
    fn test_cubic_out_front_loads_progress() {
        let result = Easing::CubicOut.evaluate(0.5);
        assert!((result - 0.875).abs() < 1e-6, "got {result}");
    }
}
