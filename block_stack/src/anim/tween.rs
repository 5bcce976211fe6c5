//! Scalar tweening: eased interpolation of one value over a fixed duration.

use std::time::Duration;

use bevy::math::curve::{Curve, EaseFunction, EasingCurve};

/// Interpolates `from → to` over `duration`, advanced explicitly by frame deltas.
#[derive(Clone, Debug)]
pub struct Tween {
    curve: EasingCurve<f32>,
    from: f32,
    to: f32,
    duration: Duration,
    elapsed: Duration,
}

impl Tween {
    /// Eases out quadratically unless another curve is chosen.
    pub fn new(from: f32, to: f32, duration: Duration) -> Self {
        Self {
            curve: EasingCurve::new(from, to, EaseFunction::QuadraticOut),
            from,
            to,
            duration,
            elapsed: Duration::ZERO,
        }
    }

    pub fn with_easing(mut self, ease: EaseFunction) -> Self {
        self.curve = EasingCurve::new(self.from, self.to, ease);
        self
    }

    /// Moves the clock forward and returns the eased value at the new time.
    pub fn advance(&mut self, delta: Duration) -> f32 {
        self.elapsed = (self.elapsed + delta).min(self.duration);
        self.value()
    }

    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        self.elapsed.as_secs_f32() / self.duration.as_secs_f32()
    }

    pub fn value(&self) -> f32 {
        if self.finished() {
            return self.to;
        }
        self.curve.sample_clamped(self.progress())
    }

    pub fn finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}
