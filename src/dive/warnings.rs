//! Rate-limited player warnings
//!
//! Every category remembers when it was last shown on the session clock.
//! The display mode decides how often a category may repeat, and a global
//! floor stops the same message from stacking regardless of mode.

use crate::core::config::WarningIntervals;
use crate::core::constants::{OCCASIONAL_INTERVAL_FACTOR, WARNING_MIN_DELAY};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Kinds of warning this core raises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WarningCategory {
    AscendingTooFast,
    SafeDepthExceeded,
    DecompressionSickness,
    NitrogenSaturated,
}

impl WarningCategory {
    pub fn all() -> &'static [WarningCategory] {
        &[
            WarningCategory::AscendingTooFast,
            WarningCategory::SafeDepthExceeded,
            WarningCategory::DecompressionSickness,
            WarningCategory::NitrogenSaturated,
        ]
    }
}

/// How often warnings are shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DisplayMode {
    Never,
    /// Once per category, ever
    Introductory,
    /// At ten times the category interval
    Occasional,
    #[default]
    Always,
}

/// Persisted last-shown time of one category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WarningRecord {
    pub category: WarningCategory,
    pub last_shown: f64,
}

#[derive(Debug, Clone)]
pub struct WarningThrottle {
    mode: DisplayMode,
    intervals: WarningIntervals,
    last_shown: AHashMap<WarningCategory, f64>,
}

impl WarningThrottle {
    pub fn new(mode: DisplayMode, intervals: WarningIntervals) -> Self {
        Self {
            mode,
            intervals,
            last_shown: AHashMap::new(),
        }
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: DisplayMode) {
        self.mode = mode;
    }

    pub fn last_shown(&self, category: WarningCategory) -> f64 {
        self.last_shown.get(&category).copied().unwrap_or(0.0)
    }

    /// Decide whether `category` may be shown at `now`, recording it if so
    ///
    /// A category with no record has never been shown and passes in every
    /// mode but `Never`.
    pub fn try_show(&mut self, category: WarningCategory, now: f64) -> bool {
        let Some(last) = self.last_shown.get(&category).copied() else {
            if self.mode == DisplayMode::Never {
                return false;
            }
            self.last_shown.insert(category, now);
            return true;
        };

        let elapsed = now - last;
        if elapsed < WARNING_MIN_DELAY {
            return false;
        }

        let interval = self.intervals.interval(category);
        let allowed = match self.mode {
            DisplayMode::Never | DisplayMode::Introductory => false,
            DisplayMode::Occasional => elapsed > interval * OCCASIONAL_INTERVAL_FACTOR,
            DisplayMode::Always => elapsed > interval,
        };

        if allowed {
            self.last_shown.insert(category, now.max(last));
        }
        allowed
    }

    /// Snapshot for save data, in category order
    pub fn records(&self) -> Vec<WarningRecord> {
        WarningCategory::all()
            .iter()
            .map(|&category| WarningRecord {
                category,
                last_shown: self.last_shown(category),
            })
            .collect()
    }

    pub fn restore(&mut self, records: &[WarningRecord]) {
        self.last_shown.clear();
        for record in records {
            if record.last_shown.is_finite() && record.last_shown > 0.0 {
                let entry = self.last_shown.entry(record.category).or_insert(0.0);
                *entry = entry.max(record.last_shown);
            }
        }
    }
}
