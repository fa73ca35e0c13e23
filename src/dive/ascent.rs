//! Smoothed ascent rate
//!
//! Vertical velocity is noisy frame to frame. The tracker keeps a rolling
//! average over roughly one second of fixed ticks.

/// Rolling ascent rate in m/s, positive when moving up
#[derive(Debug, Clone, Default)]
pub struct AscentRateTracker {
    rate: f32,
    changed: bool,
}

impl AscentRateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    /// Whether the last update moved the rate
    pub fn changed(&self) -> bool {
        self.changed
    }

    /// Fold one fixed-tick velocity sample into the rate
    ///
    /// Equivalent to an N-sample moving average with `N = 1 / fixed_dt`.
    pub fn update(&mut self, vertical_velocity: f32, fixed_dt: f32) -> f32 {
        if fixed_dt <= 0.0 || !vertical_velocity.is_finite() {
            self.changed = false;
            return self.rate;
        }

        let samples = (1.0 / fixed_dt).max(1.0);
        let next = (self.rate * (samples - 1.0) + vertical_velocity) / samples;

        self.changed = next != self.rate;
        self.rate = next;
        self.rate
    }

    pub fn reset(&mut self) {
        self.changed = self.rate != 0.0;
        self.rate = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_converges_to_constant_velocity() {
        let mut tracker = AscentRateTracker::new();
        for _ in 0..500 {
            tracker.update(5.0, 0.02);
        }
        assert!((tracker.rate() - 5.0).abs() < 0.01);
    }

    #[test]
    fn test_single_sample_weight() {
        let mut tracker = AscentRateTracker::new();
        // 50 ticks per second -> one sample moves the rate by 1/50
        let rate = tracker.update(10.0, 0.02);
        assert!((rate - 0.2).abs() < 1e-5);
        assert!(tracker.changed());
    }

    #[test]
    fn test_large_step_uses_raw_velocity() {
        let mut tracker = AscentRateTracker::new();
        assert_eq!(tracker.update(-3.0, 2.0), -3.0);
    }

    #[test]
    fn test_no_change_notification_when_steady() {
        let mut tracker = AscentRateTracker::new();
        tracker.update(0.0, 0.02);
        assert!(!tracker.changed());
    }

    #[test]
    fn test_bad_input_is_ignored() {
        let mut tracker = AscentRateTracker::new();
        tracker.update(4.0, 0.5);
        let before = tracker.rate();
        assert_eq!(tracker.update(f32::NAN, 0.02), before);
        assert_eq!(tracker.update(1.0, 0.0), before);
        assert!(!tracker.changed());
    }
}
