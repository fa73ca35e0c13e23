//! Simulation context - owns every piece of decompression state
//!
//! The host drives it through three entry points:
//! - `on_fixed_tick`: constant-step physics tick, feeds the ascent tracker
//! - `on_variable_tick`: frame tick, runs punishment, accumulation and bends
//! - `on_player_death`: unconditional reset, applied immediately
//!
//! Each call returns the events it produced. All calls must come from a
//! single sequencing point; the context holds no locks.

use crate::core::config::DecompressionConfig;
use crate::core::constants::MAX_FRAME_TIME;
use crate::core::curve::DiveCurves;
use crate::core::error::Result;
use crate::core::types::{DamageTag, Difficulty};
use crate::dive::bends::{clamp_to_health_floor, BendsInput};
use crate::dive::punisher::AscentInput;
use crate::dive::{
    classify, AscentRateTracker, BendsDamageModel, BendsOutcome, EquipmentModifierTable,
    FastAscentPunisher, NitrogenAccumulator, NitrogenState, SafeDepthStatus,
    SafeDepthTransition, WarningCategory, WarningThrottle,
};
use crate::simulation::events::DiveEvent;
use crate::simulation::host::{DiveHost, HealthSink};
use crate::simulation::persistence::SaveData;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

/// Read-only view for HUD consumers
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DiveSnapshot {
    pub saturation: f32,
    pub safe_depth: f32,
    pub ascent_rate: f32,
    pub depth: f32,
    pub status: SafeDepthStatus,
    pub safe_depth_active: bool,
    pub danger_time: f32,
}

pub struct DiveSimulation {
    config: DecompressionConfig,
    difficulty: Difficulty,
    curves: DiveCurves,
    equipment: EquipmentModifierTable,
    ascent: AscentRateTracker,
    nitrogen: NitrogenAccumulator,
    punisher: FastAscentPunisher,
    bends: BendsDamageModel,
    warnings: WarningThrottle,
    rng: ChaCha8Rng,
    clock: f64,
    last_depth: f32,
}

impl DiveSimulation {
    /// Build a context with the stock equipment plus the config's entries
    pub fn new(config: DecompressionConfig) -> Result<Self> {
        Self::with_equipment(config, EquipmentModifierTable::with_defaults())
    }

    pub fn with_equipment(
        config: DecompressionConfig,
        mut equipment: EquipmentModifierTable,
    ) -> Result<Self> {
        config.validate()?;
        let difficulty = config.difficulty()?;
        equipment.extend_from(&config.equipment)?;

        let seed = config.seed.unwrap_or_else(rand::random);
        let warnings =
            WarningThrottle::new(config.warnings.mode, config.warnings.intervals.clone());

        tracing::debug!(
            "Decompression simulation created: difficulty {:?}, {} equipment entries, seed {}",
            difficulty,
            equipment.len(),
            seed
        );

        Ok(Self {
            config,
            difficulty,
            curves: DiveCurves::default(),
            equipment,
            ascent: AscentRateTracker::new(),
            nitrogen: NitrogenAccumulator::new(),
            punisher: FastAscentPunisher::new(),
            bends: BendsDamageModel::new(),
            warnings,
            rng: ChaCha8Rng::seed_from_u64(seed),
            clock: 0.0,
            last_depth: 0.0,
        })
    }

    pub fn config(&self) -> &DecompressionConfig {
        &self.config
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
    }

    /// Runtime registration of modifier items
    pub fn equipment_mut(&mut self) -> &mut EquipmentModifierTable {
        &mut self.equipment
    }

    pub fn warnings_mut(&mut self) -> &mut WarningThrottle {
        &mut self.warnings
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn nitrogen(&self) -> NitrogenState {
        self.nitrogen.state()
    }

    pub fn snapshot(&self) -> DiveSnapshot {
        let state = self.nitrogen.state();
        DiveSnapshot {
            saturation: state.saturation,
            safe_depth: state.safe_depth,
            ascent_rate: self.ascent.rate(),
            depth: self.last_depth,
            status: classify(self.last_depth, state.safe_depth),
            safe_depth_active: self.nitrogen.is_safe_depth_active(),
            danger_time: self.punisher.danger_time(),
        }
    }

    /// Constant-step tick: smooth the vertical velocity
    pub fn on_fixed_tick<H: DiveHost + ?Sized>(
        &mut self,
        host: &H,
        fixed_dt: f32,
    ) -> Vec<DiveEvent> {
        let mut events = Vec::new();
        if !host.is_ready() {
            tracing::trace!("Host not ready, skipping fixed tick");
            return events;
        }

        let rate = self.ascent.update(host.vertical_velocity(), fixed_dt);
        if self.ascent.changed() {
            events.push(DiveEvent::AscentRateChanged { rate });
        }
        events
    }

    /// Frame tick: punishment, accumulation and bends
    pub fn on_variable_tick<H: DiveHost + ?Sized>(
        &mut self,
        host: &mut H,
        dt: f32,
    ) -> Vec<DiveEvent> {
        let mut events = Vec::new();
        if !host.is_ready() {
            tracing::trace!("Host not ready, skipping variable tick");
            return events;
        }
        if !dt.is_finite() || dt <= 0.0 {
            return events;
        }
        let dt = dt.min(MAX_FRAME_TIME);

        self.clock += dt as f64;
        let depth = host.depth().max(0.0);
        self.last_depth = depth;

        if !self.config.enabled {
            return events;
        }

        let protected = host.is_in_protected_space();

        let outcome = self.punisher.update(
            AscentInput {
                ascent_rate: self.ascent.rate(),
                depth,
                protected,
                dt,
            },
            &mut self.nitrogen,
            &self.curves.punish_ramp,
        );
        if outcome.warn {
            self.warn(WarningCategory::AscendingTooFast, &mut events);
        }
        if outcome.damage > 0.0 {
            Self::apply_damage(host.health(), outcome.damage, DamageTag::Barotrauma, &mut events);
        }
        self.poll_transition(&mut events);

        let fires = self.nitrogen.advance(dt);
        if fires == 0 {
            return events;
        }

        let modifier = self.equipment_modifier(&*host);
        for _ in 0..fires {
            self.nitrogen.fire(depth, modifier, &self.curves);
            self.poll_transition(&mut events);

            let input = BendsInput {
                depth,
                protected,
                difficulty: self.difficulty,
                current_health: host.health().current_health(),
            };
            let outcome = self.bends.evaluate(
                input,
                self.nitrogen.state_mut(),
                &self.curves.recovery,
                &mut self.rng,
            );

            match outcome {
                BendsOutcome::Clear => {}
                BendsOutcome::Warning => {
                    self.warn(WarningCategory::SafeDepthExceeded, &mut events);
                }
                BendsOutcome::Damage(amount) => {
                    self.warn(WarningCategory::DecompressionSickness, &mut events);
                    let sink = host.health();
                    Self::apply_damage(sink, amount, DamageTag::Decompression, &mut events);
                    self.poll_transition(&mut events);
                }
            }
        }

        events
    }

    /// Wipe nitrogen and danger state; the next tick starts from scratch
    pub fn on_player_death(&mut self) -> Vec<DiveEvent> {
        let mut events = vec![DiveEvent::Reset];
        self.nitrogen.reset();
        self.punisher.reset();
        self.bends.reset();
        self.poll_transition(&mut events);
        tracing::info!("Player died, decompression state reset");
        events
    }

    /// Inject nitrogen from an external source
    pub fn add_nitrogen(&mut self, amount: f32) -> Vec<DiveEvent> {
        let mut events = Vec::new();
        self.nitrogen.add_nitrogen(amount);
        self.poll_transition(&mut events);
        events
    }

    /// Remove nitrogen, e.g. from a consumable
    pub fn remove_nitrogen(&mut self, amount: f32) -> Vec<DiveEvent> {
        let mut events = Vec::new();
        self.nitrogen.remove_nitrogen(amount);
        self.poll_transition(&mut events);
        events
    }

    pub fn save_data(&self) -> SaveData {
        let state = self.nitrogen.state();
        SaveData {
            saturation: state.saturation,
            safe_depth: state.safe_depth,
            clock: self.clock,
            warnings: self.warnings.records(),
        }
    }

    /// Resume from save data; ephemeral ascent and danger state start fresh
    pub fn restore(&mut self, data: &SaveData) {
        let state = data.nitrogen();
        if state.saturation != data.saturation || state.safe_depth != data.safe_depth {
            tracing::warn!(
                "Save data out of range (saturation {}, safe depth {}), clamped",
                data.saturation,
                data.safe_depth
            );
        }
        self.nitrogen = NitrogenAccumulator::with_state(state);
        self.punisher.reset();
        self.bends.reset();
        self.ascent = AscentRateTracker::new();
        self.warnings.restore(&data.warnings);

        let latest_warning = data
            .warnings
            .iter()
            .map(|r| r.last_shown)
            .filter(|t| t.is_finite())
            .fold(0.0, f64::max);
        let clock = if data.clock.is_finite() { data.clock } else { 0.0 };
        self.clock = clock.max(latest_warning);

        tracing::info!(
            "Restored decompression state: saturation {:.1}, safe depth {:.1}",
            data.saturation,
            data.safe_depth
        );
    }

    fn equipment_modifier<H: DiveHost + ?Sized>(&self, host: &H) -> f32 {
        match host.equipped_modifier_key() {
            Some(key) => self.equipment.lookup(&key, self.difficulty).unwrap_or(1.0),
            None => 1.0,
        }
    }

    fn warn(&mut self, category: WarningCategory, events: &mut Vec<DiveEvent>) {
        if self.warnings.try_show(category, self.clock) {
            tracing::debug!("Warning shown: {:?} at {:.2}s", category, self.clock);
            events.push(DiveEvent::Warning {
                category,
                clock: self.clock,
            });
        }
    }

    fn apply_damage(
        sink: &mut dyn HealthSink,
        damage: f32,
        tag: DamageTag,
        events: &mut Vec<DiveEvent>,
    ) {
        let amount = clamp_to_health_floor(damage, sink.current_health());
        if amount <= 0.0 {
            return;
        }
        sink.take_damage(amount, tag);
        tracing::debug!("{:?} damage {:.2}, health now {:.2}", tag, amount, sink.current_health());
        events.push(DiveEvent::Damaged { amount, tag });
    }

    fn poll_transition(&mut self, events: &mut Vec<DiveEvent>) {
        match self.nitrogen.poll_transition() {
            Some(SafeDepthTransition::Enabled) => {
                let safe_depth = self.nitrogen.state().safe_depth;
                tracing::debug!("Safe depth enabled at {:.1}m", safe_depth);
                events.push(DiveEvent::SafeDepthEnabled { safe_depth });
                self.warn(WarningCategory::NitrogenSaturated, events);
            }
            Some(SafeDepthTransition::Disabled) => {
                tracing::debug!("Safe depth disabled");
                events.push(DiveEvent::SafeDepthDisabled);
            }
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::EquipmentKey;
    use crate::simulation::host::HealthPool;

    struct StillHost {
        ready: bool,
        depth: f32,
        velocity: f32,
        protected: bool,
        key: Option<EquipmentKey>,
        health: HealthPool,
    }

    impl StillHost {
        fn at(depth: f32) -> Self {
            Self {
                ready: true,
                depth,
                velocity: 0.0,
                protected: false,
                key: None,
                health: HealthPool::default(),
            }
        }
    }

    impl DiveHost for StillHost {
        fn is_ready(&self) -> bool {
            self.ready
        }
        fn depth(&self) -> f32 {
            self.depth
        }
        fn vertical_velocity(&self) -> f32 {
            self.velocity
        }
        fn equipped_modifier_key(&self) -> Option<EquipmentKey> {
            self.key.clone()
        }
        fn is_in_protected_space(&self) -> bool {
            self.protected
        }
        fn health(&mut self) -> &mut dyn HealthSink {
            &mut self.health
        }
    }

    fn sim() -> DiveSimulation {
        let config = DecompressionConfig {
            seed: Some(11),
            ..DecompressionConfig::default()
        };
        DiveSimulation::new(config).unwrap()
    }

    fn run(sim: &mut DiveSimulation, host: &mut StillHost, seconds: f32) -> Vec<DiveEvent> {
        let mut events = Vec::new();
        for _ in 0..(seconds * 20.0) as u32 {
            for _ in 0..2 {
                events.extend(sim.on_fixed_tick(&*host, 0.025));
            }
            events.extend(sim.on_variable_tick(host, 0.05));
        }
        events
    }

    #[test]
    fn test_not_ready_host_is_noop() {
        let mut sim = sim();
        let mut host = StillHost::at(200.0);
        host.ready = false;
        host.velocity = 8.0;
        let events = run(&mut sim, &mut host, 30.0);
        assert!(events.is_empty());
        assert_eq!(sim.nitrogen(), NitrogenState::default());
        assert_eq!(sim.clock(), 0.0);
    }

    #[test]
    fn test_disabled_sim_accumulates_nothing() {
        let mut sim = sim();
        sim.set_enabled(false);
        let mut host = StillHost::at(200.0);
        run(&mut sim, &mut host, 30.0);
        assert_eq!(sim.nitrogen(), NitrogenState::default());
    }

    #[test]
    fn test_long_hitch_is_clamped() {
        let mut sim = sim();
        let mut host = StillHost::at(200.0);
        sim.on_variable_tick(&mut host, 1.0e8);
        assert!((sim.clock() - MAX_FRAME_TIME as f64).abs() < 1e-6);
        assert!(sim.nitrogen().saturation < 100.0);
    }

    #[test]
    fn test_deep_hold_enables_safe_depth() {
        let mut sim = sim();
        let mut host = StillHost::at(120.0);
        let events = run(&mut sim, &mut host, 60.0);

        let enabled = events.iter().position(
            |e| matches!(e, DiveEvent::SafeDepthEnabled { safe_depth } if *safe_depth > 10.0),
        );
        assert!(enabled.is_some());
        assert!(events.iter().any(|e| e.is_warning(WarningCategory::NitrogenSaturated)));

        let snap = sim.snapshot();
        assert_eq!(snap.saturation, 100.0);
        assert!((snap.safe_depth - 90.0).abs() < 1.0);
        assert_eq!(snap.status, SafeDepthStatus::Safe);
        assert!(snap.safe_depth_active);
    }

    #[test]
    fn test_surfacing_while_saturated_hurts_but_never_kills() {
        let mut sim = sim();
        let mut host = StillHost::at(150.0);
        run(&mut sim, &mut host, 60.0);

        host.depth = 0.0;
        host.health.health = 20.0;
        let events = run(&mut sim, &mut host, 120.0);

        assert!(events.iter().any(|e| matches!(
            e,
            DiveEvent::Damaged { tag: DamageTag::Decompression, .. }
        )));
        assert!(events.iter().any(|e| e.is_warning(WarningCategory::DecompressionSickness)));
        assert!(host.health.health >= crate::core::constants::HEALTH_FLOOR - 1e-4);
    }

    #[test]
    fn test_protected_space_blocks_bends() {
        let mut sim = sim();
        let mut host = StillHost::at(150.0);
        run(&mut sim, &mut host, 60.0);

        host.depth = 0.0;
        host.protected = true;
        let events = run(&mut sim, &mut host, 30.0);
        assert!(!events.iter().any(|e| matches!(e, DiveEvent::Damaged { .. })));
        assert_eq!(host.health.health, 100.0);
    }

    #[test]
    fn test_fast_ascent_warns_and_injects() {
        let mut sim = sim();
        let mut host = StillHost::at(80.0);
        host.velocity = 7.0;
        let events = run(&mut sim, &mut host, 8.0);

        assert!(events.iter().any(|e| e.is_warning(WarningCategory::AscendingTooFast)));
        assert!(sim.snapshot().danger_time > 2.0);
        assert!(sim.nitrogen().saturation > 0.0);
    }

    #[test]
    fn test_death_resets_immediately() {
        let mut sim = sim();
        let mut host = StillHost::at(150.0);
        run(&mut sim, &mut host, 60.0);
        assert!(sim.snapshot().safe_depth_active);

        let events = sim.on_player_death();
        assert!(events.contains(&DiveEvent::Reset));
        assert!(events.contains(&DiveEvent::SafeDepthDisabled));
        assert_eq!(sim.nitrogen(), NitrogenState::default());
        assert_eq!(sim.snapshot().danger_time, 0.0);
    }

    #[test]
    fn test_equipment_modifier_slows_safe_depth() {
        let mut plain = sim();
        let mut suited = sim();
        let mut host = StillHost::at(200.0);
        let mut suited_host = StillHost::at(200.0);
        suited_host.key = Some(EquipmentKey::new("pressure_compensating_suit"));

        run(&mut plain, &mut host, 8.0);
        run(&mut suited, &mut suited_host, 8.0);
        assert!(suited.nitrogen().safe_depth < plain.nitrogen().safe_depth);
    }

    #[test]
    fn test_save_and_restore() {
        let mut sim = sim();
        let mut host = StillHost::at(120.0);
        run(&mut sim, &mut host, 60.0);
        let data = sim.save_data();

        let mut fresh = DiveSimulation::new(DecompressionConfig::default()).unwrap();
        fresh.restore(&data);
        assert_eq!(fresh.nitrogen(), sim.nitrogen());
        assert_eq!(fresh.clock(), sim.clock());
        assert!(fresh.snapshot().safe_depth_active);
        assert_eq!(fresh.save_data(), data);
    }

    #[test]
    fn test_external_nitrogen_respects_hysteresis() {
        let mut sim = sim();
        sim.add_nitrogen(100.0);
        let events = sim.add_nitrogen(15.0);
        assert!(matches!(events[0], DiveEvent::SafeDepthEnabled { .. }));
        assert_eq!(
            events[1],
            DiveEvent::Warning {
                category: WarningCategory::NitrogenSaturated,
                clock: 0.0,
            }
        );

        // safe portion is 15 - 10 + 1 = 6, the rest comes out of saturation
        let events = sim.remove_nitrogen(14.0);
        assert!(events.is_empty());
        assert_eq!(sim.nitrogen(), NitrogenState::new(92.0, 9.0));
        assert!(sim.snapshot().safe_depth_active);
    }
}
