//! Serde-backed tuning for layer generation and drilling sessions.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants;
use crate::tier::RecognitionTier;

/// Errors raised when configuration invariants are violated.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("config JSON could not be parsed: {0}")]
    Parse(String),
    #[error("{field} must be between {min:.2} and {max:.2} (got {value:.2})")]
    RangeViolation {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
    #[error("{field} must be at least {min} (got {value})")]
    MinViolation {
        field: &'static str,
        min: u64,
        value: u64,
    },
    #[error("layer range for tier {tier} invalid (min {min} > max {max})")]
    LayerRange { tier: u8, min: u16, max: u16 },
    #[error("hardness range invalid (min {min:.2} >= max {max:.2})")]
    HardnessRange { min: f64, max: f64 },
}

/// Inclusive layer-count window for one recognition tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerRange {
    pub min: u16,
    pub max: u16,
}

impl LayerRange {
    #[must_use]
    pub const fn new(min: u16, max: u16) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub const fn fixed(count: u16) -> Self {
        Self {
            min: count,
            max: count,
        }
    }

    #[must_use]
    pub const fn contains(self, count: usize) -> bool {
        count >= self.min as usize && count <= self.max as usize
    }
}

/// Per-tier layer count windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierLayerRanges {
    #[serde(default = "TierLayerRanges::default_tutorial")]
    pub tutorial: LayerRange,
    #[serde(default = "TierLayerRanges::default_regional")]
    pub regional: LayerRange,
    #[serde(default = "TierLayerRanges::default_continental")]
    pub continental: LayerRange,
    #[serde(default = "TierLayerRanges::default_global")]
    pub global: LayerRange,
}

impl TierLayerRanges {
    const fn default_tutorial() -> LayerRange {
        LayerRange::fixed(constants::TUTORIAL_LAYER_COUNT)
    }

    const fn default_regional() -> LayerRange {
        LayerRange::new(constants::TIER_ONE_LAYERS.0, constants::TIER_ONE_LAYERS.1)
    }

    const fn default_continental() -> LayerRange {
        LayerRange::new(constants::TIER_TWO_LAYERS.0, constants::TIER_TWO_LAYERS.1)
    }

    const fn default_global() -> LayerRange {
        LayerRange::new(
            constants::TIER_THREE_LAYERS.0,
            constants::TIER_THREE_LAYERS.1,
        )
    }

    #[must_use]
    pub const fn for_tier(&self, tier: RecognitionTier) -> LayerRange {
        match tier {
            RecognitionTier::Tutorial => self.tutorial,
            RecognitionTier::Regional => self.regional,
            RecognitionTier::Continental => self.continental,
            RecognitionTier::Global => self.global,
        }
    }
}

impl Default for TierLayerRanges {
    fn default() -> Self {
        Self {
            tutorial: Self::default_tutorial(),
            regional: Self::default_regional(),
            continental: Self::default_continental(),
            global: Self::default_global(),
        }
    }
}

/// Layer sequence generation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "GenerationConfig::default_normal_chance")]
    pub normal_chance: f64,
    #[serde(default = "GenerationConfig::default_hardness_min")]
    pub hardness_min: f64,
    #[serde(default = "GenerationConfig::default_hardness_max")]
    pub hardness_max: f64,
    #[serde(default)]
    pub layer_ranges: TierLayerRanges,
}

impl GenerationConfig {
    const fn default_normal_chance() -> f64 {
        constants::NORMAL_LAYER_CHANCE
    }

    const fn default_hardness_min() -> f64 {
        constants::HARDNESS_MIN
    }

    const fn default_hardness_max() -> f64 {
        constants::HARDNESS_MAX
    }

    /// Validate the generation parameters.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a probability, hardness window or tier range is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.normal_chance) {
            return Err(ConfigError::RangeViolation {
                field: "normal_chance",
                min: 0.0,
                max: 1.0,
                value: self.normal_chance,
            });
        }
        if !(self.hardness_min > 0.0 && self.hardness_min < self.hardness_max) {
            return Err(ConfigError::HardnessRange {
                min: self.hardness_min,
                max: self.hardness_max,
            });
        }
        for tier in RecognitionTier::ALL {
            let range = self.layer_ranges.for_tier(tier);
            if range.min == 0 || range.min > range.max {
                return Err(ConfigError::LayerRange {
                    tier: tier.ordinal(),
                    min: range.min,
                    max: range.max,
                });
            }
        }
        Ok(())
    }

    /// Clamp every field into a range the generator can sample from.
    pub fn sanitize(&mut self) {
        if !(0.0..=1.0).contains(&self.normal_chance) {
            self.normal_chance = Self::default_normal_chance();
        }
        if !(self.hardness_min > 0.0 && self.hardness_min < self.hardness_max) {
            self.hardness_min = Self::default_hardness_min();
            self.hardness_max = Self::default_hardness_max();
        }
        for range in [
            &mut self.layer_ranges.tutorial,
            &mut self.layer_ranges.regional,
            &mut self.layer_ranges.continental,
            &mut self.layer_ranges.global,
        ] {
            range.min = range.min.max(1);
            range.max = range.max.max(range.min);
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            normal_chance: Self::default_normal_chance(),
            hardness_min: Self::default_hardness_min(),
            hardness_max: Self::default_hardness_max(),
            layer_ranges: TierLayerRanges::default(),
        }
    }
}

/// Malus durations and magnitudes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MalusConfig {
    #[serde(default = "MalusConfig::default_radiation_layers")]
    pub radiation_layers: u8,
    #[serde(default = "MalusConfig::default_acid_layers")]
    pub acid_layers: u8,
    #[serde(default = "MalusConfig::default_acid_speed_multiplier")]
    pub acid_speed_multiplier: f64,
    #[serde(default = "MalusConfig::default_biohazard_ms")]
    pub biohazard_ms: u64,
    #[serde(default = "MalusConfig::default_toxic_clouds_min")]
    pub toxic_clouds_min: u8,
    #[serde(default = "MalusConfig::default_toxic_clouds_max")]
    pub toxic_clouds_max: u8,
    #[serde(default = "MalusConfig::default_repair_radius")]
    pub repair_radius: f32,
}

impl MalusConfig {
    const fn default_radiation_layers() -> u8 {
        constants::RADIATION_LOCK_LAYERS
    }

    const fn default_acid_layers() -> u8 {
        constants::ACID_LAYERS
    }

    const fn default_acid_speed_multiplier() -> f64 {
        constants::ACID_SPEED_MULTIPLIER
    }

    const fn default_biohazard_ms() -> u64 {
        constants::BIOHAZARD_DISABLE_MS
    }

    const fn default_toxic_clouds_min() -> u8 {
        constants::TOXIC_CLOUDS_MIN
    }

    const fn default_toxic_clouds_max() -> u8 {
        constants::TOXIC_CLOUDS_MAX
    }

    const fn default_repair_radius() -> f32 {
        constants::SLOT_REPAIR_RADIUS
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.radiation_layers == 0 {
            return Err(ConfigError::MinViolation {
                field: "malus.radiation_layers",
                min: 1,
                value: 0,
            });
        }
        if self.acid_layers == 0 {
            return Err(ConfigError::MinViolation {
                field: "malus.acid_layers",
                min: 1,
                value: 0,
            });
        }
        if self.acid_speed_multiplier < 1.0 {
            return Err(ConfigError::RangeViolation {
                field: "malus.acid_speed_multiplier",
                min: 1.0,
                max: f64::MAX,
                value: self.acid_speed_multiplier,
            });
        }
        if self.toxic_clouds_min == 0 || self.toxic_clouds_min > self.toxic_clouds_max {
            return Err(ConfigError::MinViolation {
                field: "malus.toxic_clouds_min",
                min: 1,
                value: u64::from(self.toxic_clouds_min),
            });
        }
        if !(self.repair_radius > 0.0 && self.repair_radius <= 1.0) {
            return Err(ConfigError::RangeViolation {
                field: "malus.repair_radius",
                min: 0.0,
                max: 1.0,
                value: f64::from(self.repair_radius),
            });
        }
        Ok(())
    }

    fn sanitize(&mut self) {
        self.radiation_layers = self.radiation_layers.max(1);
        self.acid_layers = self.acid_layers.max(1);
        if self.acid_speed_multiplier.is_nan() || self.acid_speed_multiplier < 1.0 {
            self.acid_speed_multiplier = 1.0;
        }
        self.toxic_clouds_min = self.toxic_clouds_min.max(1);
        self.toxic_clouds_max = self.toxic_clouds_max.max(self.toxic_clouds_min);
        if !(self.repair_radius > 0.0 && self.repair_radius <= 1.0) {
            self.repair_radius = Self::default_repair_radius();
        }
    }
}

impl Default for MalusConfig {
    fn default() -> Self {
        Self {
            radiation_layers: Self::default_radiation_layers(),
            acid_layers: Self::default_acid_layers(),
            acid_speed_multiplier: Self::default_acid_speed_multiplier(),
            biohazard_ms: Self::default_biohazard_ms(),
            toxic_clouds_min: Self::default_toxic_clouds_min(),
            toxic_clouds_max: Self::default_toxic_clouds_max(),
            repair_radius: Self::default_repair_radius(),
        }
    }
}

/// Drilling session rules: lives, rewards, penalties and malus tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "SessionConfig::default_starting_lives")]
    pub starting_lives: u8,
    #[serde(default = "SessionConfig::default_layer_oil_base")]
    pub layer_oil_base: u32,
    #[serde(default = "SessionConfig::default_danger_oil_multiplier")]
    pub danger_oil_multiplier: u32,
    #[serde(default = "SessionConfig::default_completion_recognition")]
    pub completion_recognition: u32,
    #[serde(default = "SessionConfig::default_failure_recognition")]
    pub failure_recognition: u32,
    /// Return every placed mask to the inventory after each broken layer.
    #[serde(default = "SessionConfig::default_eject_masks_on_break")]
    pub eject_masks_on_break: bool,
    #[serde(default = "SessionConfig::default_return_delay_ms")]
    pub return_delay_ms: u64,
    #[serde(default)]
    pub malus: MalusConfig,
}

impl SessionConfig {
    const fn default_starting_lives() -> u8 {
        constants::STARTING_LIVES
    }

    const fn default_layer_oil_base() -> u32 {
        constants::LAYER_OIL_BASE
    }

    const fn default_danger_oil_multiplier() -> u32 {
        constants::DANGER_OIL_MULTIPLIER
    }

    const fn default_completion_recognition() -> u32 {
        constants::COMPLETION_RECOGNITION
    }

    const fn default_failure_recognition() -> u32 {
        constants::FAILURE_RECOGNITION
    }

    const fn default_eject_masks_on_break() -> bool {
        true
    }

    const fn default_return_delay_ms() -> u64 {
        constants::RETURN_TO_MAP_DELAY_MS
    }

    /// Validate session rules.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when any field violates its documented bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.starting_lives == 0 {
            return Err(ConfigError::MinViolation {
                field: "starting_lives",
                min: 1,
                value: 0,
            });
        }
        self.malus.validate()
    }

    /// Clamp lives and malus tuning into playable bounds.
    pub fn sanitize(&mut self) {
        self.starting_lives = self.starting_lives.max(1);
        self.malus.sanitize();
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            starting_lives: Self::default_starting_lives(),
            layer_oil_base: Self::default_layer_oil_base(),
            danger_oil_multiplier: Self::default_danger_oil_multiplier(),
            completion_recognition: Self::default_completion_recognition(),
            failure_recognition: Self::default_failure_recognition(),
            eject_masks_on_break: Self::default_eject_masks_on_break(),
            return_delay_ms: Self::default_return_delay_ms(),
            malus: MalusConfig::default(),
        }
    }
}

/// Complete tuning bundle as shipped in `assets/tuning.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TuningConfig {
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

impl TuningConfig {
    /// Load tuning from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or if validation fails.
    pub fn from_json(json_str: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json_str).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate both sections.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError` found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.generation.validate()?;
        self.session.validate()
    }

    /// Embedded tuning, falling back to compiled-in constants if the asset is invalid.
    #[must_use]
    pub fn default_config() -> Self {
        match Self::from_json(include_str!("../assets/tuning.json")) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("embedded tuning rejected, using built-in defaults: {err}");
                Self::default()
            }
        }
    }
}
