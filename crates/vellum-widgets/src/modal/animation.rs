#![forbid(unsafe_code)]

//! Numeric interpolation for modal transitions.
//!
//! [`MotionValue`] is an `f32` that can be retargeted at any time; a new
//! target starts a fresh [`Tween`] from wherever the value currently is, so
//! reversing mid-flight never jumps. [`HeightTransition`] layers the
//! "snap on the first measurement" rule on top.

use web_time::Duration;

use vellum_runtime::hooks::FirstRun;

/// Easing curve applied to normalized progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalEasing {
    Linear,
    EaseOut,
    #[default]
    EaseInOut,
}

impl ModalEasing {
    /// Map progress `t` in `[0, 1]` through the curve.
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }
}

/// Fixed-duration interpolation between two values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    from: f32,
    to: f32,
    duration: Duration,
    elapsed: Duration,
    easing: ModalEasing,
}

impl Tween {
    #[must_use]
    pub fn new(from: f32, to: f32, duration: Duration, easing: ModalEasing) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: Duration::ZERO,
            easing,
        }
    }

    /// Normalized progress in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    /// Current interpolated value.
    #[must_use]
    pub fn sample(&self) -> f32 {
        if self.is_finished() {
            return self.to;
        }
        let eased = self.easing.apply(self.progress());
        self.from + (self.to - self.from) * eased
    }

    pub fn advance(&mut self, dt: Duration) {
        self.elapsed = (self.elapsed + dt).min(self.duration);
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    #[must_use]
    pub fn target(&self) -> f32 {
        self.to
    }
}

/// An animatable scalar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionValue {
    value: f32,
    tween: Option<Tween>,
}

impl MotionValue {
    #[must_use]
    pub const fn new(value: f32) -> Self {
        Self { value, tween: None }
    }

    /// Current value.
    #[must_use]
    pub fn get(&self) -> f32 {
        self.value
    }

    /// Where the value is heading (or sits, when idle).
    #[must_use]
    pub fn target(&self) -> f32 {
        self.tween.map_or(self.value, |t| t.target())
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    /// Start animating from the current value toward `target`.
    pub fn animate_to(&mut self, target: f32, duration: Duration, easing: ModalEasing) {
        if target == self.target() && (self.is_animating() || self.value == target) {
            return;
        }
        if duration.is_zero() {
            self.jump(target);
            return;
        }
        self.tween = Some(Tween::new(self.value, target, duration, easing));
    }

    /// Set the value immediately, cancelling any animation.
    pub fn jump(&mut self, value: f32) {
        self.value = value;
        self.tween = None;
    }

    /// Advance time. Returns `true` while still animating.
    pub fn tick(&mut self, dt: Duration) -> bool {
        let Some(tween) = self.tween.as_mut() else {
            return false;
        };
        tween.advance(dt);
        self.value = tween.sample();
        if tween.is_finished() {
            self.tween = None;
        }
        self.tween.is_some()
    }
}

/// Wrapper height that follows measured content.
///
/// The first target snaps; later changes tween over `duration`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightTransition {
    value: MotionValue,
    first: FirstRun,
    duration: Duration,
}

impl HeightTransition {
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            value: MotionValue::new(0.0),
            first: FirstRun::Uninitialized,
            duration,
        }
    }

    /// Follow a new measured height.
    pub fn set_target(&mut self, height: f32) {
        if self.first.observe() {
            self.value.jump(height);
        } else {
            self.value
                .animate_to(height, self.duration, ModalEasing::EaseInOut);
        }
    }

    /// Current height, or `None` before the first measurement.
    #[must_use]
    pub fn current(&self) -> Option<f32> {
        self.first.is_active().then(|| self.value.get())
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.value.is_animating()
    }

    pub fn tick(&mut self, dt: Duration) -> bool {
        self.value.tick(dt)
    }
}
