//! Equipment modifier registry
//!
//! Maps an equipped item to per-difficulty multipliers on how fast safe
//! depth worsens. Content code registers entries at startup; the
//! accumulator only ever reads.

use crate::core::error::{DiveError, Result};
use crate::core::types::{Difficulty, EquipmentKey};
use ahash::AHashMap;

#[derive(Debug, Clone, Default)]
pub struct EquipmentModifierTable {
    modifiers: AHashMap<EquipmentKey, Vec<f32>>,
}

impl EquipmentModifierTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table pre-filled with the stock dive gear
    pub fn with_defaults() -> Self {
        let mut table = Self::new();
        let stock: [(&str, &[f32]); 3] = [
            ("reinforced_dive_suit", &[0.85, 0.9, 0.95]),
            ("rebreather", &[0.75, 0.8, 0.85]),
            ("pressure_compensating_suit", &[0.55, 0.65, 0.75]),
        ];
        for (key, values) in stock {
            table.modifiers.insert(EquipmentKey::new(key), values.to_vec());
        }
        table
    }

    /// Register or replace the multipliers for `key`, ordered by difficulty
    pub fn register(&mut self, key: EquipmentKey, modifiers: Vec<f32>) -> Result<()> {
        if modifiers.is_empty() {
            return Err(DiveError::InvalidArgument(format!(
                "equipment '{}' needs at least one modifier",
                key
            )));
        }
        if let Some(bad) = modifiers.iter().find(|m| !m.is_finite() || **m <= 0.0) {
            return Err(DiveError::InvalidArgument(format!(
                "equipment '{}' modifier must be positive, got {}",
                key, bad
            )));
        }
        self.modifiers.insert(key, modifiers);
        Ok(())
    }

    /// Register every entry of a config equipment table
    pub fn extend_from<'a, I>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'a String, &'a Vec<f32>)>,
    {
        for (key, values) in entries {
            self.register(EquipmentKey::new(key.as_str()), values.clone())?;
        }
        Ok(())
    }

    pub fn contains(&self, key: &EquipmentKey) -> bool {
        self.modifiers.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.modifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
    }

    /// Multiplier for `key` at `difficulty`
    ///
    /// Tiers past the end of the registered array use the last entry.
    pub fn lookup(&self, key: &EquipmentKey, difficulty: Difficulty) -> Option<f32> {
        let values = self.modifiers.get(key)?;
        let idx = difficulty.index().min(values.len() - 1);
        Some(values[idx])
    }
}
