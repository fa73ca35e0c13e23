//! Safe-depth status classification for HUD consumers

use crate::core::constants::{APPROACH_MARGIN, APPROACH_RATIO, BENDS_MARGIN};
use serde::{Deserialize, Serialize};

/// Where the diver sits relative to the safe depth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SafeDepthStatus {
    /// Comfortably deeper than the safe depth
    Safe,
    /// Close to the safe depth
    Approaching,
    /// Shallower than the safe depth
    Exceeded,
}

/// Classify `depth` against `safe_depth`
///
/// Exceeded starts one metre above the safe depth, matching the bends trigger.
pub fn classify(depth: f32, safe_depth: f32) -> SafeDepthStatus {
    if depth < safe_depth - BENDS_MARGIN {
        return SafeDepthStatus::Exceeded;
    }

    let margin = depth - safe_depth;
    let near_ratio = safe_depth > 0.0 && margin / safe_depth < APPROACH_RATIO;

    if margin < APPROACH_MARGIN || near_ratio {
        SafeDepthStatus::Approaching
    } else {
        SafeDepthStatus::Safe
    }
}
