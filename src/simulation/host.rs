//! What the host game must supply each tick
//!
//! All reads are synchronous values for the current tick. Until
//! `is_ready` returns true, every update is skipped.

use crate::core::types::{DamageTag, EquipmentKey};

/// Receiver of damage dealt by this core
pub trait HealthSink {
    fn current_health(&self) -> f32;
    fn take_damage(&mut self, amount: f32, tag: DamageTag);
}

pub trait DiveHost {
    /// Whether depth, equipment and health providers are available yet
    fn is_ready(&self) -> bool;

    /// Metres below the surface, 0 when out of the water
    fn depth(&self) -> f32;

    /// Vertical velocity in m/s, positive when moving up
    fn vertical_velocity(&self) -> f32;

    /// Item whose accumulation modifier applies, if any
    fn equipped_modifier_key(&self) -> Option<EquipmentKey>;

    /// Inside a vehicle or base where bends cannot build
    fn is_in_protected_space(&self) -> bool;

    fn health(&mut self) -> &mut dyn HealthSink;
}

/// Plain health pool, enough for headless runs and tests
#[derive(Debug, Clone)]
pub struct HealthPool {
    pub health: f32,
    pub max_health: f32,
    /// Damage received, by tag
    pub decompression_damage: f32,
    pub barotrauma_damage: f32,
}

impl HealthPool {
    pub fn new(max_health: f32) -> Self {
        Self {
            health: max_health,
            max_health,
            decompression_damage: 0.0,
            barotrauma_damage: 0.0,
        }
    }

    pub fn total_damage(&self) -> f32 {
        self.decompression_damage + self.barotrauma_damage
    }
}

impl Default for HealthPool {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl HealthSink for HealthPool {
    fn current_health(&self) -> f32 {
        self.health
    }

    fn take_damage(&mut self, amount: f32, tag: DamageTag) {
        let amount = amount.max(0.0);
        self.health = (self.health - amount).max(0.0);
        match tag {
            DamageTag::Decompression => self.decompression_damage += amount,
            DamageTag::Barotrauma => self.barotrauma_damage += amount,
        }
    }
}
