use glam::{Quat, Vec3};

use crate::animation::easing::Easing;

pub trait Interpolate: Copy {
    fn interpolate(self, to: Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn interpolate(self, to: Self, t: f32) -> Self {
        self + (to - self) * t
    }
}

impl Interpolate for Vec3 {
    fn interpolate(self, to: Self, t: f32) -> Self {
        self.lerp(to, t)
    }
}

impl Interpolate for Quat {
    /// Shortest-arc spherical interpolation.
    fn interpolate(self, to: Self, t: f32) -> Self {
        self.slerp(to, t)
    }
}

/// Interpolation from `from` to `to` that is a pure function of time:
/// `value(now) = interpolate(from, to, easing((now - start) / duration))`.
#[derive(Debug, Clone, Copy)]
pub struct Tween<T: Interpolate> {
    pub from: T,
    pub to: T,
    pub start_time: f32,
    pub duration: f32,
    pub easing: Easing,
}

impl<T: Interpolate> Tween<T> {
    pub fn new(from: T, to: T, start_time: f32, duration: f32, easing: Easing) -> Self {
        Self {
            from,
            to,
            start_time,
            duration,
            easing,
        }
    }

    /// Linear progress in [0, 1].
    pub fn progress(&self, now: f32) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }

        ((now - self.start_time) / self.duration).clamp(0.0, 1.0)
    }

    pub fn is_finished(&self, now: f32) -> bool {
        self.progress(now) >= 1.0
    }

    pub fn sample(&self, now: f32) -> T {
        let progress = self.progress(now);

        if progress >= 1.0 {
            return self.to;
        }

        self.from.interpolate(self.to, self.easing.evaluate(progress))
    }
}
