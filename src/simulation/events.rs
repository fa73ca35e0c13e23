//! Events returned to the host from each entry point
//!
//! HUD, audio and UI layers consume these. Ordering within one batch is
//! not meaningful.

use crate::core::types::DamageTag;
use crate::dive::WarningCategory;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DiveEvent {
    /// Safe depth rose past the grace depth; show the indicator
    SafeDepthEnabled { safe_depth: f32 },
    /// Safe depth fell back near the surface; hide the indicator
    SafeDepthDisabled,
    /// A warning passed the throttle and should be displayed
    Warning { category: WarningCategory, clock: f64 },
    /// Health was taken through the host's health sink
    Damaged { amount: f32, tag: DamageTag },
    /// Smoothed ascent rate moved
    AscentRateChanged { rate: f32 },
    /// State wiped after player death
    Reset,
}

impl DiveEvent {
    pub fn is_warning(&self, category: WarningCategory) -> bool {
        matches!(self, DiveEvent::Warning { category: c, .. } if *c == category)
    }
}
