//! Player-facing decompression options
//!
//! Fixed physiology lives in `core::constants`. This is the part a game
//! exposes in its options menu or ships in a data file, loaded from TOML.

use crate::core::error::{DiveError, Result};
use crate::core::types::Difficulty;
use crate::dive::warnings::{DisplayMode, WarningCategory};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Per-category repeat intervals for warnings (seconds)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarningIntervals {
    pub ascending_too_fast: f64,
    pub safe_depth_exceeded: f64,
    pub decompression_sickness: f64,
    pub nitrogen_saturated: f64,
}

impl Default for WarningIntervals {
    fn default() -> Self {
        Self {
            ascending_too_fast: 5.0,
            safe_depth_exceeded: 6.0,
            decompression_sickness: 10.0,
            nitrogen_saturated: 60.0,
        }
    }
}

impl WarningIntervals {
    pub fn interval(&self, category: WarningCategory) -> f64 {
        match category {
            WarningCategory::AscendingTooFast => self.ascending_too_fast,
            WarningCategory::SafeDepthExceeded => self.safe_depth_exceeded,
            WarningCategory::DecompressionSickness => self.decompression_sickness,
            WarningCategory::NitrogenSaturated => self.nitrogen_saturated,
        }
    }
}

/// Warning display options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarningConfig {
    /// How chatty warnings are
    pub mode: DisplayMode,
    pub intervals: WarningIntervals,
}

/// Complete decompression configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecompressionConfig {
    /// Master switch; when off only the ascent rate keeps updating
    pub enabled: bool,

    /// Raw difficulty index (0 = Normal, 1 = Hard, 2 = Deadly)
    ///
    /// Kept raw so a bad data file is reported instead of silently defaulted.
    pub difficulty: u8,

    pub warnings: WarningConfig,

    /// Equipment key -> per-difficulty accumulation multipliers
    ///
    /// Lower values slow down how fast safe depth worsens.
    pub equipment: AHashMap<String, Vec<f32>>,

    /// Seed for the bends damage roll; random when absent
    pub seed: Option<u64>,
}

impl Default for DecompressionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            difficulty: 0,
            warnings: WarningConfig::default(),
            equipment: AHashMap::new(),
            seed: None,
        }
    }
}

impl DecompressionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: DecompressionConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!("Loaded decompression config from {}", path.display());
        Ok(config)
    }

    pub fn difficulty(&self) -> Result<Difficulty> {
        Difficulty::try_from(self.difficulty)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        self.difficulty()?;

        for category in WarningCategory::all() {
            let interval = self.warnings.intervals.interval(*category);
            if !interval.is_finite() || interval < 0.0 {
                return Err(DiveError::InvalidConfig(format!(
                    "warning interval for {:?} must be a non-negative number, got {}",
                    category, interval
                )));
            }
        }

        for (key, modifiers) in &self.equipment {
            if modifiers.is_empty() {
                return Err(DiveError::InvalidConfig(format!(
                    "equipment '{}' has no modifiers",
                    key
                )));
            }
            if let Some(bad) = modifiers.iter().find(|m| !(**m > 0.0 && **m <= 2.0)) {
                return Err(DiveError::InvalidConfig(format!(
                    "equipment '{}' modifier {} outside (0, 2]",
                    key, bad
                )));
            }
        }

        Ok(())
    }
}
