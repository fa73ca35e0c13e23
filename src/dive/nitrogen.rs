//! Nitrogen saturation and safe depth
//!
//! Saturation is a 0-100 buffer that fills while deep and drains near the
//! surface. Only once the buffer is full does the safe depth start to chase
//! a fraction of the current depth. On the way back the safe depth has to
//! clear before saturation drains, so the diver pays off the worse debt first.
//!
//! The accumulator runs on a leaky-bucket timer: elapsed time is collected
//! and the update fires once per `UPDATE_INTERVAL`, carrying the remainder.

use crate::core::constants::{
    ACCUMULATION_SCALAR, FAST_EMPTY_DEPTH_RATIO, FAST_EMPTY_MULTIPLIER, GRACE_DEPTH,
    MAX_CATCH_UP_FIRES, MAX_CURVE_DEPTH, MAX_SATURATION, SAFE_DEPTH_DISABLE_DEPTH,
    SAFE_DEPTH_ENABLE_DEPTH, SAFE_DEPTH_RATIO, SAFE_DEPTH_TOLERANCE, SATURATION_PER_METRE,
    SATURATION_TOLERANCE, UPDATE_INTERVAL,
};
use crate::core::curve::{approach, DiveCurves};
use serde::{Deserialize, Serialize};

/// Persisted nitrogen state of one diver
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NitrogenState {
    /// 0.0 = clear, 100.0 = buffer full
    pub saturation: f32,
    /// Depth above which ascending is penalised (metres)
    pub safe_depth: f32,
}

impl NitrogenState {
    /// Build a state, clamping both fields into range
    pub fn new(saturation: f32, safe_depth: f32) -> Self {
        let mut state = Self {
            saturation,
            safe_depth,
        };
        state.clamp();
        state
    }

    pub fn is_saturated(&self) -> bool {
        self.saturation >= MAX_SATURATION
    }

    /// Inject nitrogen; whatever overflows the buffer worsens safe depth
    pub fn add_nitrogen(&mut self, amount: f32) {
        if !amount.is_finite() || amount <= 0.0 {
            return;
        }

        let headroom = MAX_SATURATION - self.saturation;
        if headroom >= amount {
            self.saturation += amount;
        } else {
            self.saturation = MAX_SATURATION;
            self.safe_depth += amount - headroom.max(0.0);
        }
        self.clamp();
    }

    /// Remove nitrogen, draining the safe-depth portion before saturation
    pub fn remove_nitrogen(&mut self, amount: f32) {
        if !amount.is_finite() || amount <= 0.0 {
            return;
        }

        let safe_portion = (self.safe_depth - GRACE_DEPTH + 1.0).max(0.0);
        let from_safe_depth = amount.min(safe_portion);
        self.safe_depth = (self.safe_depth - from_safe_depth).max(0.0);

        let remainder = amount - from_safe_depth;
        if remainder > 0.0 {
            self.saturation = (self.saturation - remainder).max(0.0);
        }
        self.clamp();
    }

    fn clamp(&mut self) {
        self.saturation = if self.saturation.is_finite() {
            self.saturation.clamp(0.0, MAX_SATURATION)
        } else {
            0.0
        };
        self.safe_depth = if self.safe_depth.is_finite() {
            self.safe_depth.max(0.0)
        } else {
            0.0
        };
    }
}

/// Edge of the safe-depth indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SafeDepthTransition {
    Enabled,
    Disabled,
}

/// Saturation the buffer is heading for at `depth`
pub fn target_saturation(depth: f32, safe_depth: f32) -> f32 {
    if depth <= GRACE_DEPTH && safe_depth == 0.0 {
        0.0
    } else if safe_depth > GRACE_DEPTH / 2.0 {
        MAX_SATURATION
    } else {
        ((depth - GRACE_DEPTH) * SATURATION_PER_METRE).clamp(0.0, MAX_SATURATION)
    }
}

/// Normalised time fed to the nitrogen rate curve
pub fn nitrogen_curve_time(depth: f32) -> f32 {
    if depth <= 2.0 * GRACE_DEPTH {
        GRACE_DEPTH / 100.0
    } else {
        GRACE_DEPTH / 50.0 + depth / MAX_CURVE_DEPTH
    }
}

/// Drives `NitrogenState` from the current depth
#[derive(Debug, Clone, Default)]
pub struct NitrogenAccumulator {
    state: NitrogenState,
    elapsed: f32,
    safe_depth_active: bool,
}

impl NitrogenAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from saved state
    pub fn with_state(state: NitrogenState) -> Self {
        let state = NitrogenState::new(state.saturation, state.safe_depth);
        Self {
            state,
            elapsed: 0.0,
            safe_depth_active: state.safe_depth > SAFE_DEPTH_ENABLE_DEPTH,
        }
    }

    pub fn state(&self) -> NitrogenState {
        self.state
    }

    pub fn state_mut(&mut self) -> &mut NitrogenState {
        &mut self.state
    }

    pub fn is_safe_depth_active(&self) -> bool {
        self.safe_depth_active
    }

    pub fn add_nitrogen(&mut self, amount: f32) {
        self.state.add_nitrogen(amount);
    }

    pub fn remove_nitrogen(&mut self, amount: f32) {
        self.state.remove_nitrogen(amount);
    }

    /// Collect elapsed time and return how many updates are due
    ///
    /// At most `MAX_CATCH_UP_FIRES` per call; time beyond that is dropped.
    pub fn advance(&mut self, dt: f32) -> u32 {
        if !dt.is_finite() || dt <= 0.0 {
            return 0;
        }
        self.elapsed += dt;
        if self.elapsed < UPDATE_INTERVAL {
            return 0;
        }

        let due = (self.elapsed / UPDATE_INTERVAL).floor();
        self.elapsed = self.elapsed.rem_euclid(UPDATE_INTERVAL);
        if due > MAX_CATCH_UP_FIRES as f32 {
            tracing::debug!("Dropping {} accumulator updates after a long frame", due);
            return MAX_CATCH_UP_FIRES;
        }
        due as u32
    }

    /// One accumulator update at `depth`
    ///
    /// `equipment_modifier` only applies while the safe depth is worsening.
    pub fn fire(&mut self, depth: f32, equipment_modifier: f32, curves: &DiveCurves) {
        let depth = depth.max(0.0);
        self.update_saturation(depth, curves);
        self.update_safe_depth(depth, equipment_modifier, curves);
    }

    fn update_saturation(&mut self, depth: f32, curves: &DiveCurves) {
        let target = target_saturation(depth, self.state.safe_depth);
        if (self.state.saturation - target).abs() <= SATURATION_TOLERANCE {
            self.state.saturation = target;
            return;
        }

        let rate = curves.nitrogen_rate.evaluate(nitrogen_curve_time(depth));
        let mut saturation = approach(self.state.saturation, target, rate, UPDATE_INTERVAL);
        if (saturation - target).abs() <= SATURATION_TOLERANCE {
            saturation = target;
        }
        self.state.saturation = saturation.clamp(0.0, MAX_SATURATION);
    }

    fn update_safe_depth(&mut self, depth: f32, equipment_modifier: f32, curves: &DiveCurves) {
        let previous = self.state.safe_depth;
        let mut target = if self.state.is_saturated() {
            SAFE_DEPTH_RATIO * depth
        } else {
            0.0
        };

        let mut rate_multiplier = 1.0;
        if target <= GRACE_DEPTH && previous <= FAST_EMPTY_DEPTH_RATIO * GRACE_DEPTH {
            rate_multiplier = FAST_EMPTY_MULTIPLIER;
            target = 0.0;
        }

        let modifier = if target > previous {
            equipment_modifier
        } else {
            1.0
        };
        let intensity = curves.intensity.evaluate(depth / MAX_CURVE_DEPTH);
        let rate = modifier * intensity * ACCUMULATION_SCALAR * rate_multiplier;

        let mut safe_depth = approach(previous, target, rate, UPDATE_INTERVAL);
        if (safe_depth - target).abs() <= SAFE_DEPTH_TOLERANCE {
            safe_depth = target;
        }
        self.state.safe_depth = safe_depth.max(0.0);
    }

    /// Report a safe-depth indicator edge since the last poll, if any
    pub fn poll_transition(&mut self) -> Option<SafeDepthTransition> {
        let safe_depth = self.state.safe_depth;
        if !self.safe_depth_active && safe_depth > SAFE_DEPTH_ENABLE_DEPTH {
            self.safe_depth_active = true;
            Some(SafeDepthTransition::Enabled)
        } else if self.safe_depth_active && safe_depth < SAFE_DEPTH_DISABLE_DEPTH {
            self.safe_depth_active = false;
            Some(SafeDepthTransition::Disabled)
        } else {
            None
        }
    }

    /// Clear everything, e.g. on player death
    pub fn reset(&mut self) {
        self.state = NitrogenState::default();
        self.elapsed = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(acc: &mut NitrogenAccumulator, depth: f32, seconds: f32, modifier: f32) {
        let curves = DiveCurves::default();
        let fires = acc.advance(seconds);
        for _ in 0..fires {
            acc.fire(depth, modifier, &curves);
        }
    }

    #[test]
    fn test_add_nitrogen_overflows_into_safe_depth() {
        let mut state = NitrogenState::new(90.0, 0.0);
        state.add_nitrogen(20.0);
        assert_eq!(state, NitrogenState::new(100.0, 10.0));
    }

    #[test]
    fn test_add_nitrogen_within_headroom() {
        let mut state = NitrogenState::new(40.0, 0.0);
        state.add_nitrogen(25.0);
        assert_eq!(state.saturation, 65.0);
        assert_eq!(state.safe_depth, 0.0);
    }

    #[test]
    fn test_remove_nitrogen_drains_safe_depth_first() {
        let mut state = NitrogenState::new(50.0, 15.0);
        state.remove_nitrogen(3.0);
        assert_eq!(state.safe_depth, 12.0);
        assert_eq!(state.saturation, 50.0);
    }

    #[test]
    fn test_remove_nitrogen_spills_into_saturation() {
        let mut state = NitrogenState::new(50.0, 15.0);
        // safe portion is 15 - 10 + 1 = 6
        state.remove_nitrogen(10.0);
        assert_eq!(state.safe_depth, 9.0);
        assert_eq!(state.saturation, 46.0);

        state.remove_nitrogen(500.0);
        assert_eq!(state.saturation, 0.0);
        assert!(state.safe_depth >= 0.0);
    }

    #[test]
    fn test_bad_amounts_are_ignored() {
        let mut state = NitrogenState::new(50.0, 20.0);
        state.add_nitrogen(-5.0);
        state.add_nitrogen(f32::NAN);
        state.remove_nitrogen(-5.0);
        assert_eq!(state, NitrogenState::new(50.0, 20.0));
    }

    #[test]
    fn test_target_saturation_rules() {
        assert_eq!(target_saturation(5.0, 0.0), 0.0);
        assert_eq!(target_saturation(5.0, 6.0), 100.0);
        assert_eq!(target_saturation(13.0, 0.0), 30.0);
        assert_eq!(target_saturation(50.0, 0.0), 100.0);
        assert_eq!(target_saturation(8.0, 3.0), 0.0);
    }

    #[test]
    fn test_nitrogen_curve_time() {
        assert_eq!(nitrogen_curve_time(15.0), 0.1);
        assert!((nitrogen_curve_time(1000.0) - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_leaky_bucket_carries_remainder() {
        let mut acc = NitrogenAccumulator::new();
        assert_eq!(acc.advance(0.125), 0);
        assert_eq!(acc.advance(0.125), 1);
        assert_eq!(acc.advance(0.375), 1);
        assert_eq!(acc.advance(0.125), 1);
        assert_eq!(acc.advance(1.0), 4);
        assert_eq!(acc.advance(-1.0), 0);
    }

    #[test]
    fn test_huge_frame_is_capped() {
        let mut acc = NitrogenAccumulator::new();
        assert_eq!(acc.advance(1.0e8), MAX_CATCH_UP_FIRES);
        assert_eq!(acc.advance(5.0e6), MAX_CATCH_UP_FIRES);
        assert_eq!(acc.advance(f32::MAX), MAX_CATCH_UP_FIRES);
        assert_eq!(acc.advance(f32::INFINITY), 0);

        // Remainder stays within one interval, so normal ticking resumes
        let mut fires = 0;
        for _ in 0..8 {
            fires += acc.advance(0.125);
        }
        assert_eq!(fires, 4);
    }

    #[test]
    fn test_surface_stays_clear() {
        let mut acc = NitrogenAccumulator::new();
        run(&mut acc, 5.0, 60.0, 1.0);
        assert_eq!(acc.state(), NitrogenState::default());
    }

    #[test]
    fn test_deep_dive_fills_then_worsens_safe_depth() {
        let mut acc = NitrogenAccumulator::new();
        let curves = DiveCurves::default();
        let mut saw_full_before_safe_depth = false;

        for _ in 0..2400 {
            let before = acc.state();
            acc.fire(200.0, 1.0, &curves);
            let after = acc.state();
            if after.safe_depth > before.safe_depth {
                assert!(before.is_saturated() || after.is_saturated());
                saw_full_before_safe_depth = true;
            }
        }

        assert!(saw_full_before_safe_depth);
        assert_eq!(acc.state().saturation, 100.0);
        assert!((acc.state().safe_depth - 150.0).abs() < 0.5);
    }

    #[test]
    fn test_safe_depth_clears_before_saturation_drains() {
        let mut acc = NitrogenAccumulator::with_state(NitrogenState::new(100.0, 40.0));
        let curves = DiveCurves::default();

        let mut cleared = false;
        for _ in 0..4000 {
            acc.fire(0.0, 1.0, &curves);
            let state = acc.state();
            if state.saturation < 100.0 {
                assert!(state.safe_depth <= GRACE_DEPTH / 2.0);
            }
            if state == NitrogenState::default() {
                cleared = true;
                break;
            }
        }
        assert!(cleared);
    }

    #[test]
    fn test_equipment_modifier_slows_worsening_only() {
        let curves = DiveCurves::default();

        let mut plain = NitrogenAccumulator::with_state(NitrogenState::new(100.0, 20.0));
        let mut suited = plain.clone();
        plain.fire(300.0, 1.0, &curves);
        suited.fire(300.0, 0.55, &curves);
        assert!(suited.state().safe_depth < plain.state().safe_depth);

        let mut plain = NitrogenAccumulator::with_state(NitrogenState::new(100.0, 80.0));
        let mut suited = plain.clone();
        plain.fire(40.0, 1.0, &curves);
        suited.fire(40.0, 0.55, &curves);
        assert_eq!(suited.state().safe_depth, plain.state().safe_depth);
    }

    #[test]
    fn test_fast_emptying_near_surface() {
        let curves = DiveCurves::default();
        // 14 m is within 1.5x grace depth, 16 m is not
        let mut shallow = NitrogenAccumulator::with_state(NitrogenState::new(100.0, 14.0));
        let mut deep = NitrogenAccumulator::with_state(NitrogenState::new(100.0, 16.0));

        shallow.fire(12.0, 1.0, &curves);
        deep.fire(12.0, 1.0, &curves);

        let shallow_fraction = (14.0 - shallow.state().safe_depth) / 14.0;
        let deep_fraction = (16.0 - deep.state().safe_depth) / 16.0;
        assert!(shallow_fraction > 3.0 * deep_fraction);
        // the slow path still heads for 0.75 * 12 = 9 m rather than zero
        assert!(deep.state().safe_depth > 9.0);
    }

    #[test]
    fn test_transition_edges() {
        let mut acc = NitrogenAccumulator::new();
        assert_eq!(acc.poll_transition(), None);

        acc.state_mut().safe_depth = 10.0;
        assert_eq!(acc.poll_transition(), None);

        acc.state_mut().safe_depth = 10.5;
        assert_eq!(acc.poll_transition(), Some(SafeDepthTransition::Enabled));
        assert_eq!(acc.poll_transition(), None);

        acc.state_mut().safe_depth = 3.0;
        assert_eq!(acc.poll_transition(), None);

        acc.state_mut().safe_depth = 2.9;
        assert_eq!(acc.poll_transition(), Some(SafeDepthTransition::Disabled));
        assert!(!acc.is_safe_depth_active());
    }

    #[test]
    fn test_reset_clears_state() {
        let mut acc = NitrogenAccumulator::with_state(NitrogenState::new(100.0, 60.0));
        acc.advance(0.2);
        acc.reset();
        assert_eq!(acc.state(), NitrogenState::default());
        assert_eq!(acc.advance(0.1), 0);
        assert_eq!(acc.poll_transition(), Some(SafeDepthTransition::Disabled));
    }
}
