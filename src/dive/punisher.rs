//! Fast-ascent punishment
//!
//! Independent of depth-driven accumulation: a diver who shoots upward
//! builds danger time, gets warned, and after a grace period has nitrogen
//! forced into the buffer on a fixed cooldown. The forced amount ramps up
//! the longer the ascent is sustained.
//!
//! Ascent-rate bands:
//! - `<= ASCENT_RESET_THRESHOLD`: danger decays, cooldown clears
//! - up to `ASCENT_WARN_THRESHOLD`: danger held
//! - up to `ASCENT_DAMAGE_THRESHOLD`: danger grows, warning only
//! - above: danger grows, warning, punishment once past the grace time

use crate::core::constants::{
    ASCENT_DAMAGE_THRESHOLD, ASCENT_GRACE_TIME, ASCENT_RESET_THRESHOLD, ASCENT_WARN_THRESHOLD,
    BAROTRAUMA_DAMAGE_PER_SEC, EXCESS_DEPTH_NITROGEN_RATE, FLAT_NITROGEN_PER_SEC,
    PUNISH_INTERVAL, PUNISH_RAMP_UP, SAFE_DEPTH_NITROGEN_RATE,
};
use crate::core::curve::Curve;
use crate::dive::nitrogen::NitrogenAccumulator;

/// Per-tick readings the punisher needs
#[derive(Debug, Clone, Copy)]
pub struct AscentInput {
    /// Smoothed ascent rate, positive when rising (m/s)
    pub ascent_rate: f32,
    pub depth: f32,
    pub protected: bool,
    pub dt: f32,
}

/// What one punisher update did
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AscentOutcome {
    /// An "ascending too fast" warning should be offered to the throttle
    pub warn: bool,
    /// Nitrogen injected through `add_nitrogen`
    pub nitrogen_added: f32,
    /// Direct damage the host should apply
    pub damage: f32,
}

/// Nitrogen per second forced in while punished at full ramp
pub fn punishment_nitrogen_per_sec(depth: f32, safe_depth: f32) -> f32 {
    (depth - safe_depth) * EXCESS_DEPTH_NITROGEN_RATE
        + safe_depth * SAFE_DEPTH_NITROGEN_RATE
        + FLAT_NITROGEN_PER_SEC
}

#[derive(Debug, Clone, Default)]
pub struct FastAscentPunisher {
    danger_time: f32,
    cooldown: f32,
}

impl FastAscentPunisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn danger_time(&self) -> f32 {
        self.danger_time
    }

    pub fn update(
        &mut self,
        input: AscentInput,
        nitrogen: &mut NitrogenAccumulator,
        ramp: &Curve,
    ) -> AscentOutcome {
        let dt = if input.dt.is_finite() { input.dt.max(0.0) } else { 0.0 };
        let rate = input.ascent_rate;

        if input.protected || input.depth <= 0.0 || !(rate > ASCENT_RESET_THRESHOLD) {
            self.danger_time = (self.danger_time - dt).max(0.0);
            self.cooldown = 0.0;
            return AscentOutcome::default();
        }

        if rate <= ASCENT_WARN_THRESHOLD {
            return AscentOutcome::default();
        }

        self.danger_time += dt;
        let mut outcome = AscentOutcome {
            warn: true,
            ..AscentOutcome::default()
        };

        if rate <= ASCENT_DAMAGE_THRESHOLD || self.danger_time <= ASCENT_GRACE_TIME {
            return outcome;
        }

        self.cooldown -= dt;
        if self.cooldown > 0.0 {
            return outcome;
        }
        // A long frame can only buy one punishment
        self.cooldown = (self.cooldown + PUNISH_INTERVAL).max(0.0);

        let sustained = self.danger_time - ASCENT_GRACE_TIME;
        let multiplier = ramp.evaluate(sustained);
        let state = nitrogen.state();

        let per_sec = punishment_nitrogen_per_sec(input.depth, state.safe_depth);
        let amount = per_sec * multiplier * PUNISH_INTERVAL;
        nitrogen.add_nitrogen(amount);
        outcome.nitrogen_added = amount.max(0.0);

        if sustained >= PUNISH_RAMP_UP && input.depth < state.safe_depth {
            outcome.damage = BAROTRAUMA_DAMAGE_PER_SEC * PUNISH_INTERVAL * multiplier;
        }

        tracing::debug!(
            "Fast ascent punished at {:.2} m/s after {:.2}s: +{:.2} nitrogen, {:.2} damage",
            rate,
            self.danger_time,
            outcome.nitrogen_added,
            outcome.damage
        );

        outcome
    }

    /// Forget accumulated danger, e.g. on player death
    pub fn reset(&mut self) {
        self.danger_time = 0.0;
        self.cooldown = 0.0;
    }
}
