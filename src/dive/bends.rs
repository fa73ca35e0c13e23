//! Decompression sickness damage
//!
//! Evaluated once per accumulator fire. While a saturated diver sits more
//! than a metre above an active safe depth, every fire warns and every
//! eighth fire (two seconds) hurts. After a hit the safe depth jumps up
//! toward the surface so the next hit is not immediate.

use crate::core::constants::{
    bends_damage_ticks, BENDS_MARGIN, BENDS_MINOR_EXCESS, BENDS_MODERATE_EXCESS, GRACE_DEPTH,
    HEALTH_FLOOR,
};
use crate::core::curve::Curve;
use crate::core::types::Difficulty;
use crate::dive::nitrogen::NitrogenState;
use rand::Rng;

/// Per-fire readings the damage model needs
#[derive(Debug, Clone, Copy)]
pub struct BendsInput {
    pub depth: f32,
    pub protected: bool,
    pub difficulty: Difficulty,
    pub current_health: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BendsOutcome {
    /// Conditions not met
    Clear,
    /// Qualifying fire between damage ticks
    Warning,
    /// Damage tick; amount already clamped to the health floor
    Damage(f32),
}

/// Whether the diver is currently building bends
pub fn is_bending(depth: f32, state: &NitrogenState, protected: bool) -> bool {
    !protected
        && depth < state.safe_depth - BENDS_MARGIN
        && state.safe_depth > GRACE_DEPTH
        && state.is_saturated()
}

/// Raw damage for `excess` metres above safe depth, `roll` in `[0, 1)`
pub fn bends_damage(difficulty: Difficulty, excess: f32, roll: f32) -> f32 {
    let mut base = difficulty.bends_base_damage();
    if excess < BENDS_MINOR_EXCESS {
        base /= 4.0;
    } else if excess < BENDS_MODERATE_EXCESS {
        base /= 2.0;
    }
    base + roll * base + excess
}

/// Limit `damage` so health never drops below `HEALTH_FLOOR`
pub fn clamp_to_health_floor(damage: f32, current_health: f32) -> f32 {
    if !damage.is_finite() || !current_health.is_finite() {
        return 0.0;
    }
    damage.min(current_health - HEALTH_FLOOR).max(0.0)
}

/// Safe depth left after a damage tick; never deeper than before
pub fn recovered_safe_depth(depth: f32, safe_depth: f32, recovery: &Curve) -> f32 {
    let floor = depth.min(GRACE_DEPTH);
    floor.max(recovery.evaluate(safe_depth)).min(safe_depth).max(0.0)
}

#[derive(Debug, Clone, Default)]
pub struct BendsDamageModel {
    qualifying_ticks: u32,
}

impl BendsDamageModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn qualifying_ticks(&self) -> u32 {
        self.qualifying_ticks
    }

    pub fn evaluate<R: Rng>(
        &mut self,
        input: BendsInput,
        state: &mut NitrogenState,
        recovery: &Curve,
        rng: &mut R,
    ) -> BendsOutcome {
        if !is_bending(input.depth, state, input.protected) {
            self.qualifying_ticks = 0;
            return BendsOutcome::Clear;
        }

        self.qualifying_ticks += 1;
        if self.qualifying_ticks < bends_damage_ticks() {
            return BendsOutcome::Warning;
        }
        self.qualifying_ticks = 0;

        let excess = state.safe_depth - input.depth;
        let roll: f32 = rng.gen_range(0.0..1.0);
        let raw = bends_damage(input.difficulty, excess, roll);
        let damage = clamp_to_health_floor(raw, input.current_health);

        let previous = state.safe_depth;
        state.safe_depth = recovered_safe_depth(input.depth, previous, recovery);

        tracing::debug!(
            "Bends at {:.1}m ({:.1}m over): {:.1} damage ({:.1} raw), safe depth {:.1} -> {:.1}",
            input.depth,
            excess,
            damage,
            raw,
            previous,
            state.safe_depth
        );

        BendsOutcome::Damage(damage)
    }

    pub fn reset(&mut self) {
        self.qualifying_ticks = 0;
    }
}
