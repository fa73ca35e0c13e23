//! Save data for the decompression state
//!
//! Flat numeric record: nitrogen state, the session clock and one
//! last-shown time per warning category. Everything else is rebuilt.

use crate::core::error::Result;
use crate::dive::{NitrogenState, WarningRecord};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    pub saturation: f32,
    pub safe_depth: f32,
    /// Session clock the warning times are measured on
    #[serde(default)]
    pub clock: f64,
    #[serde(default)]
    pub warnings: Vec<WarningRecord>,
}

impl SaveData {
    pub fn nitrogen(&self) -> NitrogenState {
        NitrogenState::new(self.saturation, self.safe_depth)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        tracing::info!("Saved decompression state to {}", path.display());
        Ok(())
    }

    pub fn read_from(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let data = Self::from_json(&json)?;
        tracing::info!("Loaded decompression state from {}", path.display());
        Ok(data)
    }
}
