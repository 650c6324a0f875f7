//! Centralized balance and tuning constants for Drillrush game logic.
//!
//! These values define the deterministic math for the drilling core. The
//! serde-backed configs in [`crate::config`] fall back to them, so a missing
//! JSON field always resolves to the numbers below.

// Layer generation ---------------------------------------------------------
pub(crate) const NORMAL_LAYER_CHANCE: f64 = 0.4;
pub(crate) const HARDNESS_MIN: f64 = 3.0;
pub(crate) const HARDNESS_MAX: f64 = 7.0;
pub(crate) const DIAGNOSTIC_HARDNESS: f64 = 3.0;
pub(crate) const STRATA_VARIANTS: u8 = 4;
pub(crate) const TUTORIAL_LAYER_COUNT: u16 = 5;
pub(crate) const TIER_ONE_LAYERS: (u16, u16) = (5, 20);
pub(crate) const TIER_TWO_LAYERS: (u16, u16) = (20, 50);
pub(crate) const TIER_THREE_LAYERS: (u16, u16) = (50, 100);

/// Location title that switches layer generation into the diagnostic sweep.
pub const DIAGNOSTIC_LOCATION: &str = "TEST";

// Contracts ----------------------------------------------------------------
pub(crate) const CONTRACT_OIL_MIN: u32 = 1_000;
pub(crate) const CONTRACT_OIL_MAX: u32 = 6_000;
pub(crate) const MIN_STEPS_LOW: u8 = 3;
pub(crate) const MIN_STEPS_HIGH: u8 = 10;
pub(crate) const KNOWN_DANGERS_MAX: usize = 3;
pub(crate) const DEFAULT_BOARD_SIZE: usize = 8;

// Session ------------------------------------------------------------------
pub(crate) const STARTING_LIVES: u8 = 3;
pub(crate) const LAYER_OIL_BASE: u32 = 50;
pub(crate) const DANGER_OIL_MULTIPLIER: u32 = 2;
pub(crate) const COMPLETION_RECOGNITION: u32 = 10;
pub(crate) const FAILURE_RECOGNITION: u32 = 20;
pub(crate) const RETURN_TO_MAP_DELAY_MS: u64 = 3_000;

// Malus tuning -------------------------------------------------------------
pub(crate) const RADIATION_LOCK_LAYERS: u8 = 5;
pub(crate) const ACID_LAYERS: u8 = 2;
pub(crate) const ACID_SPEED_MULTIPLIER: f64 = 10.0;
pub(crate) const BIOHAZARD_DISABLE_MS: u64 = 5_000;
pub(crate) const TOXIC_CLOUDS_MIN: u8 = 6;
pub(crate) const TOXIC_CLOUDS_MAX: u8 = 10;
pub(crate) const TOXIC_CLOUD_RADIUS_MIN: f32 = 0.08;
pub(crate) const TOXIC_CLOUD_RADIUS_MAX: f32 = 0.18;
pub(crate) const SLOT_REPAIR_RADIUS: f32 = 0.06;

// Mask rack layout (normalized view space) ---------------------------------
pub(crate) const SLOT_ROW_Y: f32 = 0.8;
pub(crate) const INVENTORY_ROW_Y: f32 = 0.93;
pub(crate) const RACK_SPACING: f32 = 0.1;
pub(crate) const SLOT_HALF_EXTENT: f32 = 0.0375;

// Radar reveal pricing -----------------------------------------------------
pub(crate) const REVEAL_LINEAR_LAYERS: usize = 10;
pub(crate) const REVEAL_UNIT_COST: u32 = 100;
