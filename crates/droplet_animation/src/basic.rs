//! Declarative single-property animations
//!
//! A [`BasicAnimation`] says "move property `key` to `to` over `duration`";
//! the rendering backend owns the presentation and samples it every frame
//! with [`BasicAnimation::value_at`].

use crate::easing::Easing;

/// Duration used when none is given (matches the platform default)
pub const DEFAULT_DURATION_MS: f32 = 250.0;

/// Values that can be blended by an animation
pub trait Animatable: Clone {
    /// Blend toward `to` by `t` (0.0 = self, 1.0 = to)
    fn interpolate(&self, to: &Self, t: f32) -> Self;
}

impl Animatable for f32 {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        self + (to - self) * t
    }
}

/// What the animation presents outside its active interval
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FillMode {
    /// Show the model value before and after
    #[default]
    None,
    /// Keep the final value after the animation ends
    Forwards,
    /// Show the initial value during the begin delay
    Backwards,
    /// Apply both forwards and backwards fill
    Both,
}

impl FillMode {
    fn fills_forwards(self) -> bool {
        matches!(self, FillMode::Forwards | FillMode::Both)
    }

    fn fills_backwards(self) -> bool {
        matches!(self, FillMode::Backwards | FillMode::Both)
    }
}

/// Animation of one property of a layer toward a target value
#[derive(Clone, Debug, PartialEq)]
pub struct BasicAnimation<K, V> {
    key: K,
    to: V,
    duration_ms: f32,
    delay_ms: f32,
    easing: Easing,
    fill_mode: FillMode,
    removed_on_completion: bool,
}

impl<K: Copy, V> BasicAnimation<K, V> {
    pub fn new(key: K, to: V) -> Self {
        Self {
            key,
            to,
            duration_ms: DEFAULT_DURATION_MS,
            delay_ms: 0.0,
            easing: Easing::Linear,
            fill_mode: FillMode::None,
            removed_on_completion: true,
        }
    }

    /// Set duration
    pub fn duration(mut self, duration_ms: f32) -> Self {
        self.duration_ms = duration_ms.max(0.0);
        self
    }

    /// Set delay before animation starts
    pub fn delay(mut self, delay_ms: f32) -> Self {
        self.delay_ms = delay_ms.max(0.0);
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn fill_mode(mut self, fill_mode: FillMode) -> Self {
        self.fill_mode = fill_mode;
        self
    }

    /// Keep the animation attached after it finishes
    pub fn retain_on_completion(mut self) -> Self {
        self.removed_on_completion = false;
        self
    }

    /// Shorthand for an animation that holds its final value until removed
    pub fn hold(self) -> Self {
        self.fill_mode(FillMode::Forwards).retain_on_completion()
    }

    pub fn key(&self) -> K {
        self.key
    }

    pub fn to_value(&self) -> &V {
        &self.to
    }

    pub fn duration_ms(&self) -> f32 {
        self.duration_ms
    }

    pub fn delay_ms(&self) -> f32 {
        self.delay_ms
    }

    /// Get total duration including delay
    pub fn total_duration_ms(&self) -> f32 {
        self.delay_ms + self.duration_ms
    }

    pub fn fill(&self) -> FillMode {
        self.fill_mode
    }

    pub fn removed_on_completion(&self) -> bool {
        self.removed_on_completion
    }

    /// Eased progress `elapsed_ms` after the animation was added, or `None`
    /// when the animation presents nothing and the model value shows through
    pub fn progress_at(&self, elapsed_ms: f32) -> Option<f32> {
        let local = elapsed_ms - self.delay_ms;
        if local < 0.0 {
            return self.fill_mode.fills_backwards().then_some(0.0);
        }
        if local >= self.duration_ms {
            let holds = !self.removed_on_completion && self.fill_mode.fills_forwards();
            return holds.then_some(1.0);
        }
        Some(self.easing.apply(local / self.duration_ms))
    }

    pub fn is_finished_at(&self, elapsed_ms: f32) -> bool {
        elapsed_ms >= self.total_duration_ms()
    }
}

impl<K: Copy, V: Animatable> BasicAnimation<K, V> {
    /// Presented value starting from `from`
    pub fn value_at(&self, from: &V, elapsed_ms: f32) -> Option<V> {
        self.progress_at(elapsed_ms)
            .map(|t| from.interpolate(&self.to, t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq)]
    enum Key {
        Opacity,
    }

    #[test]
    fn test_hold_keeps_final_value() {
        let fade = BasicAnimation::new(Key::Opacity, 0.0f32).duration(100.0).hold();
        assert_eq!(fade.key(), Key::Opacity);
        assert_eq!(fade.value_at(&1.0, 50.0), Some(0.5));
        assert_eq!(fade.value_at(&1.0, 100.0), Some(0.0));
        assert_eq!(fade.value_at(&1.0, 10_000.0), Some(0.0));
        assert!(fade.is_finished_at(100.0));
    }

    #[test]
    fn test_removed_animation_presents_model_value_after_end() {
        let fade = BasicAnimation::new(Key::Opacity, 0.0f32).duration(100.0);
        assert_eq!(fade.value_at(&1.0, 150.0), None);
    }

    #[test]
    fn test_delay_without_backwards_fill() {
        let fade = BasicAnimation::new(Key::Opacity, 0.0f32)
            .duration(100.0)
            .delay(100.0)
            .hold();
        assert_eq!(fade.progress_at(50.0), None);
        assert_eq!(fade.progress_at(150.0), Some(0.5));
        assert_eq!(fade.total_duration_ms(), 200.0);
    }

    #[test]
    fn test_backwards_fill_during_delay() {
        let fade = BasicAnimation::new(Key::Opacity, 0.0f32)
            .delay(50.0)
            .fill_mode(FillMode::Both);
        assert_eq!(fade.progress_at(10.0), Some(0.0));
    }

    #[test]
    fn test_zero_duration_snaps() {
        let snap = BasicAnimation::new(Key::Opacity, 0.0f32).duration(0.0).hold();
        assert_eq!(snap.value_at(&1.0, 0.0), Some(0.0));
    }
}
