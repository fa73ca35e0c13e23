//! Core type definitions used throughout the codebase

use crate::core::constants::{BENDS_DAMAGE_DEADLY, BENDS_DAMAGE_NORMAL};
use crate::core::error::DiveError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Game difficulty tiers, ordered from mildest to harshest
///
/// The discriminant doubles as the index into per-difficulty tables.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Difficulty {
    #[default]
    Normal,
    Hard,
    Deadly,
}

impl Difficulty {
    pub fn all() -> &'static [Difficulty] {
        &[Difficulty::Normal, Difficulty::Hard, Difficulty::Deadly]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Base bends damage for this tier before excess and random scaling
    pub fn bends_base_damage(self) -> f32 {
        match self {
            Difficulty::Normal | Difficulty::Hard => BENDS_DAMAGE_NORMAL,
            Difficulty::Deadly => BENDS_DAMAGE_DEADLY,
        }
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = DiveError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(Difficulty::Normal),
            1 => Ok(Difficulty::Hard),
            2 => Ok(Difficulty::Deadly),
            other => Err(DiveError::InvalidDifficulty(other)),
        }
    }
}

/// Why health was taken away
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageTag {
    /// Sustained time above the safe depth while saturated
    Decompression,
    /// Dangerously fast ascent after the safe depth is already exceeded
    Barotrauma,
}

/// Identifier of an equipped item that alters nitrogen accumulation
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EquipmentKey(pub String);

impl EquipmentKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EquipmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EquipmentKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}
