//! Simulation layer: the context the host ticks, its events and save data

pub mod context;
pub mod events;
pub mod host;
pub mod persistence;
pub mod profile;

pub use context::{DiveSimulation, DiveSnapshot};
pub use events::DiveEvent;
pub use host::{DiveHost, HealthPool, HealthSink};
pub use persistence::SaveData;
pub use profile::{run_profile, DiveProfile, ProfileHost, ProfileReport, RunSettings};
