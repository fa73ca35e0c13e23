//! Scripted dive profiles for headless runs
//!
//! A profile is a list of `(time, depth)` waypoints joined linearly, an
//! optional equipment key and optional protected-space windows. Running one
//! drives a `DiveSimulation` through both tick clocks and records what
//! happened.

use crate::core::curve::Curve;
use crate::core::error::{DiveError, Result};
use crate::core::types::EquipmentKey;
use crate::dive::{SafeDepthStatus, WarningCategory};
use crate::simulation::context::{DiveSimulation, DiveSnapshot};
use crate::simulation::events::DiveEvent;
use crate::simulation::host::{DiveHost, HealthPool, HealthSink};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Half-width of the central difference used for vertical velocity (seconds)
const VELOCITY_PROBE: f32 = 0.05;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiveProfile {
    pub name: String,
    /// `(seconds, metres)`, sorted by time
    pub waypoints: Vec<(f32, f32)>,
    #[serde(default)]
    pub equipment: Option<String>,
    /// `(start, end)` seconds spent inside a protected space
    #[serde(default)]
    pub protected: Vec<(f32, f32)>,
}

impl DiveProfile {
    /// Descend to 300m over five minutes, hold, then bolt for the surface
    pub fn deep_bounce() -> Self {
        Self {
            name: "deep_bounce".to_string(),
            waypoints: vec![
                (0.0, 0.0),
                (300.0, 300.0),
                (360.0, 300.0),
                (410.0, 0.0),
                (470.0, 0.0),
            ],
            equipment: None,
            protected: Vec::new(),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let profile: DiveProfile = toml::from_str(content)?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let profile = Self::from_toml_str(&content)?;
        tracing::info!(
            "Loaded dive profile '{}' ({} waypoints) from {}",
            profile.name,
            profile.waypoints.len(),
            path.display()
        );
        Ok(profile)
    }

    pub fn validate(&self) -> Result<()> {
        self.depth_curve()?;
        if self.waypoints.iter().any(|&(_, depth)| depth < 0.0) {
            return Err(DiveError::InvalidConfig(format!(
                "profile '{}' has a waypoint above the surface",
                self.name
            )));
        }
        for &(start, end) in &self.protected {
            if !(start <= end) {
                return Err(DiveError::InvalidConfig(format!(
                    "profile '{}' has a protected window ending before it starts",
                    self.name
                )));
            }
        }
        Ok(())
    }

    /// Time of the last waypoint
    pub fn duration(&self) -> f32 {
        self.waypoints.last().map(|&(t, _)| t).unwrap_or(0.0)
    }

    fn depth_curve(&self) -> Result<Curve> {
        Curve::new(self.waypoints.clone())
            .map_err(|e| DiveError::InvalidConfig(format!("profile '{}': {}", self.name, e)))
    }
}

/// Host that replays a profile against a plain health pool
pub struct ProfileHost {
    depth: Curve,
    protected: Vec<(f32, f32)>,
    equipment: Option<EquipmentKey>,
    time: f32,
    pub health: HealthPool,
}

impl ProfileHost {
    pub fn new(profile: &DiveProfile) -> Result<Self> {
        profile.validate()?;
        Ok(Self {
            depth: profile.depth_curve()?,
            protected: profile.protected.clone(),
            equipment: profile.equipment.as_deref().map(EquipmentKey::new),
            time: 0.0,
            health: HealthPool::default(),
        })
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn set_time(&mut self, time: f32) {
        self.time = time;
    }
}

impl DiveHost for ProfileHost {
    fn is_ready(&self) -> bool {
        true
    }

    fn depth(&self) -> f32 {
        self.depth.evaluate(self.time).max(0.0)
    }

    fn vertical_velocity(&self) -> f32 {
        let before = self.depth.evaluate(self.time - VELOCITY_PROBE);
        let after = self.depth.evaluate(self.time + VELOCITY_PROBE);
        // Depth shrinks while rising
        (before - after) / (2.0 * VELOCITY_PROBE)
    }

    fn equipped_modifier_key(&self) -> Option<EquipmentKey> {
        self.equipment.clone()
    }

    fn is_in_protected_space(&self) -> bool {
        self.protected
            .iter()
            .any(|&(start, end)| self.time >= start && self.time <= end)
    }

    fn health(&mut self) -> &mut dyn HealthSink {
        &mut self.health
    }
}

/// Step sizes for a profile run
#[derive(Debug, Clone, Copy)]
pub struct RunSettings {
    pub fixed_dt: f32,
    pub variable_dt: f32,
    /// Seconds between recorded samples
    pub sample_interval: f32,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            fixed_dt: 0.02,
            variable_dt: 1.0 / 60.0,
            sample_interval: 5.0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileSample {
    pub time: f32,
    pub health: f32,
    pub snapshot: DiveSnapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusChange {
    pub time: f32,
    pub status: SafeDepthStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShownWarning {
    pub time: f32,
    pub category: WarningCategory,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileReport {
    pub profile: String,
    pub duration: f32,
    pub max_saturation: f32,
    pub max_safe_depth: f32,
    pub decompression_damage: f32,
    pub barotrauma_damage: f32,
    pub final_health: f32,
    pub warnings: Vec<ShownWarning>,
    pub status_changes: Vec<StatusChange>,
    pub samples: Vec<ProfileSample>,
    pub final_snapshot: DiveSnapshot,
}

/// Replay `profile` through `sim` until its last waypoint
pub fn run_profile(
    sim: &mut DiveSimulation,
    profile: &DiveProfile,
    settings: RunSettings,
) -> Result<ProfileReport> {
    if !(settings.fixed_dt > 0.0) || !(settings.variable_dt > 0.0) {
        return Err(DiveError::InvalidArgument(format!(
            "step sizes must be positive, got fixed {} and variable {}",
            settings.fixed_dt, settings.variable_dt
        )));
    }

    let mut host = ProfileHost::new(profile)?;
    let duration = profile.duration();

    let mut max_saturation: f32 = 0.0;
    let mut max_safe_depth: f32 = 0.0;
    let mut warnings = Vec::new();
    let mut status_changes: Vec<StatusChange> = Vec::new();
    let mut samples = Vec::new();

    let mut time = 0.0_f32;
    let mut fixed_time = 0.0_f32;
    let mut next_sample = 0.0_f32;
    let mut frames: u64 = 0;

    tracing::info!("Running profile '{}' for {:.0}s", profile.name, duration);

    while time < duration {
        time = (frames + 1) as f32 * settings.variable_dt;
        frames += 1;

        while fixed_time + settings.fixed_dt <= time {
            fixed_time += settings.fixed_dt;
            host.set_time(fixed_time);
            sim.on_fixed_tick(&host, settings.fixed_dt);
        }

        host.set_time(time);
        for event in sim.on_variable_tick(&mut host, settings.variable_dt) {
            if let DiveEvent::Warning { category, .. } = event {
                warnings.push(ShownWarning { time, category });
            }
        }

        let snapshot = sim.snapshot();
        max_saturation = max_saturation.max(snapshot.saturation);
        max_safe_depth = max_safe_depth.max(snapshot.safe_depth);

        if status_changes.last().map(|c| c.status) != Some(snapshot.status) {
            tracing::debug!("{:.1}s: status {:?}", time, snapshot.status);
            status_changes.push(StatusChange {
                time,
                status: snapshot.status,
            });
        }

        if time >= next_sample {
            samples.push(ProfileSample {
                time,
                health: host.health.current_health(),
                snapshot,
            });
            next_sample += settings.sample_interval;
        }
    }

    let report = ProfileReport {
        profile: profile.name.clone(),
        duration,
        max_saturation,
        max_safe_depth,
        decompression_damage: host.health.decompression_damage,
        barotrauma_damage: host.health.barotrauma_damage,
        final_health: host.health.current_health(),
        warnings,
        status_changes,
        samples,
        final_snapshot: sim.snapshot(),
    };

    tracing::info!(
        "Profile '{}' done: {:.1} decompression and {:.1} barotrauma damage",
        report.profile,
        report.decompression_damage,
        report.barotrauma_damage
    );

    Ok(report)
}
