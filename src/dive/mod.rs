//! Dive physiology: nitrogen, safe depth, ascent and their consequences

pub mod ascent;
pub mod bends;
pub mod equipment;
pub mod nitrogen;
pub mod punisher;
pub mod status;
pub mod warnings;

pub use ascent::AscentRateTracker;
pub use bends::{BendsDamageModel, BendsOutcome};
pub use equipment::EquipmentModifierTable;
pub use nitrogen::{NitrogenAccumulator, NitrogenState, SafeDepthTransition};
pub use punisher::{AscentOutcome, FastAscentPunisher};
pub use status::{classify, SafeDepthStatus};
pub use warnings::{DisplayMode, WarningCategory, WarningRecord, WarningThrottle};
