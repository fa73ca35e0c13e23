//! Decompression constants - all fixed tuning values in one place
//!
//! Depths are metres below the surface, rates are per second unless noted.

// Accumulator timing
/// Leaky-bucket interval of the nitrogen accumulator (seconds)
pub const UPDATE_INTERVAL: f32 = 0.25;
/// Near-surface band that is always safe (metres)
pub const GRACE_DEPTH: f32 = 10.0;
/// Most accumulator updates one `advance` call may release
pub const MAX_CATCH_UP_FIRES: u32 = 8;
/// Longest frame a variable tick simulates; longer hitches are clamped (seconds)
pub const MAX_FRAME_TIME: f32 = 1.0 / 3.0;
/// Scales how fast safe depth chases its target
pub const ACCUMULATION_SCALAR: f32 = 10.0 * UPDATE_INTERVAL;
/// Fraction of current depth that becomes the safe-depth target once saturated
pub const SAFE_DEPTH_RATIO: f32 = 0.75;
/// Depth range normalising the intensity and nitrogen curves
pub const MAX_CURVE_DEPTH: f32 = 2000.0;

// Saturation
pub const MAX_SATURATION: f32 = 100.0;
/// Saturation gained per metre past the grace depth while safe depth is low
pub const SATURATION_PER_METRE: f32 = 10.0;
pub const SATURATION_TOLERANCE: f32 = 0.01;
pub const SAFE_DEPTH_TOLERANCE: f32 = 0.01;

// Near-surface emptying
pub const FAST_EMPTY_DEPTH_RATIO: f32 = 1.5;
pub const FAST_EMPTY_MULTIPLIER: f32 = 5.0;

// Safe-depth transition edges
pub const SAFE_DEPTH_ENABLE_DEPTH: f32 = GRACE_DEPTH;
pub const SAFE_DEPTH_DISABLE_DEPTH: f32 = 3.0;

// Status classification
pub const APPROACH_MARGIN: f32 = 10.0;
pub const APPROACH_RATIO: f32 = 0.08;

// Fast ascent (m/s, positive = upward)
pub const ASCENT_RESET_THRESHOLD: f32 = 1.5;
pub const ASCENT_WARN_THRESHOLD: f32 = 4.0;
pub const ASCENT_DAMAGE_THRESHOLD: f32 = 4.5;
pub const ASCENT_GRACE_TIME: f32 = 2.0;
pub const PUNISH_INTERVAL: f32 = 0.25;
pub const PUNISH_RAMP_UP: f32 = 2.0;
pub const FLAT_NITROGEN_PER_SEC: f32 = 5.0;
/// Share of the depth/safe-depth gap injected per second while punished
pub const EXCESS_DEPTH_NITROGEN_RATE: f32 = 0.25;
/// Share of the current safe depth injected per second while punished
pub const SAFE_DEPTH_NITROGEN_RATE: f32 = 0.05;
/// Direct damage per second once the ramp is full and safe depth is already exceeded
pub const BAROTRAUMA_DAMAGE_PER_SEC: f32 = 2.0;

// Bends damage
pub const BENDS_DAMAGE_PERIOD: f32 = 2.0;
/// Margin above safe depth before bends qualify (metres)
pub const BENDS_MARGIN: f32 = 1.0;
pub const BENDS_DAMAGE_NORMAL: f32 = 10.0;
pub const BENDS_DAMAGE_DEADLY: f32 = 20.0;
pub const BENDS_MINOR_EXCESS: f32 = 2.0;
pub const BENDS_MODERATE_EXCESS: f32 = 5.0;

/// Health this core never damages below
pub const HEALTH_FLOOR: f32 = 1.0;

// Warnings
/// Global floor between two warnings of the same category (seconds)
pub const WARNING_MIN_DELAY: f64 = 3.0;
/// Interval multiplier used by the Occasional display mode
pub const OCCASIONAL_INTERVAL_FACTOR: f64 = 10.0;

/// Qualifying accumulator fires between two bends damage ticks
pub fn bends_damage_ticks() -> u32 {
    (BENDS_DAMAGE_PERIOD / UPDATE_INTERVAL).ceil() as u32
}
