//! Player upgrades, the inventory snapshot handed to a session, and radar intel.
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::constants::{REVEAL_LINEAR_LAYERS, REVEAL_UNIT_COST};
use crate::contract::Contract;
use crate::hazards::HazardKind;
use crate::layers::LayerKind;
use crate::numbers::{floor_f64_to_u32, usize_to_f64, usize_to_u32};

const DRILL_SPEEDS: [f64; 4] = [1.0, 1.5, 2.0, 3.0];
const MASK_SLOTS: [usize; 4] = [1, 2, 3, 4];
const RADAR_RANGES: [Option<usize>; 5] = [Some(1), Some(5), Some(20), Some(50), None];
const STARTING_MASKS: [HazardKind; 2] = [HazardKind::Toxic, HazardKind::BioHazard];

/// Read-only equipment snapshot consumed by a drilling session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryConfig {
    pub drill_speed_multiplier: f64,
    pub mask_slot_capacity: usize,
    pub owned_hazards: Vec<HazardKind>,
}

impl InventoryConfig {
    #[must_use]
    pub fn owns(&self, kind: HazardKind) -> bool {
        self.owned_hazards.contains(&kind)
    }
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Upgrades::default().inventory()
    }
}

fn level_index(level: u8, table_len: usize) -> usize {
    usize::from(level.max(1) - 1).min(table_len - 1)
}

/// Purchased upgrade levels (1-based) and owned masks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Upgrades {
    #[serde(default = "Upgrades::first_level")]
    pub drill_level: u8,
    #[serde(default = "Upgrades::first_level")]
    pub mask_level: u8,
    #[serde(default = "Upgrades::first_level")]
    pub radar_level: u8,
    #[serde(default = "Upgrades::starting_masks")]
    pub owned_masks: Vec<HazardKind>,
}

impl Upgrades {
    const fn first_level() -> u8 {
        1
    }

    fn starting_masks() -> Vec<HazardKind> {
        STARTING_MASKS.to_vec()
    }

    /// Highest purchasable level per upgrade line.
    pub const MAX_DRILL_LEVEL: u8 = 4;
    pub const MAX_MASK_LEVEL: u8 = 4;
    pub const MAX_RADAR_LEVEL: u8 = 5;

    /// Every upgrade maxed and every mask owned.
    #[must_use]
    pub fn maxed() -> Self {
        Self {
            drill_level: Self::MAX_DRILL_LEVEL,
            mask_level: Self::MAX_MASK_LEVEL,
            radar_level: Self::MAX_RADAR_LEVEL,
            owned_masks: HazardKind::ALL.to_vec(),
        }
    }

    #[must_use]
    pub fn drill_speed(&self) -> f64 {
        DRILL_SPEEDS[level_index(self.drill_level, DRILL_SPEEDS.len())]
    }

    #[must_use]
    pub fn mask_slots(&self) -> usize {
        MASK_SLOTS[level_index(self.mask_level, MASK_SLOTS.len())]
    }

    /// Number of leading layers the radar shows; `None` shows every layer.
    #[must_use]
    pub fn radar_range(&self) -> Option<usize> {
        RADAR_RANGES[level_index(self.radar_level, RADAR_RANGES.len())]
    }

    pub fn grant_mask(&mut self, kind: HazardKind) -> bool {
        if self.owned_masks.contains(&kind) {
            return false;
        }
        self.owned_masks.push(kind);
        true
    }

    #[must_use]
    pub fn inventory(&self) -> InventoryConfig {
        InventoryConfig {
            drill_speed_multiplier: self.drill_speed(),
            mask_slot_capacity: self.mask_slots(),
            owned_hazards: self.owned_masks.clone(),
        }
    }
}

impl Default for Upgrades {
    fn default() -> Self {
        Self {
            drill_level: Self::first_level(),
            mask_level: Self::first_level(),
            radar_level: Self::first_level(),
            owned_masks: Self::starting_masks(),
        }
    }
}

/// What the briefing panel may show about a layer before drilling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intel", content = "hazard", rename_all = "snake_case")]
pub enum LayerIntel {
    Hidden,
    Normal,
    Danger(HazardKind),
}

/// Per-layer intel given the radar range and the layers paid to reveal.
#[must_use]
pub fn layer_intel(
    contract: &Contract,
    radar_range: Option<usize>,
    revealed: &BTreeSet<usize>,
) -> Vec<LayerIntel> {
    contract
        .layers
        .iter()
        .map(|layer| {
            let in_range = radar_range.is_none_or(|range| layer.index < range);
            if !in_range && !revealed.contains(&layer.index) {
                return LayerIntel::Hidden;
            }
            match layer.kind {
                LayerKind::Normal => LayerIntel::Normal,
                LayerKind::Danger(kind) => LayerIntel::Danger(kind),
            }
        })
        .collect()
}

/// Oil price to reveal layer `index`: linear for the first ten layers, logarithmic after.
#[must_use]
pub fn reveal_cost(index: usize) -> u32 {
    if index < REVEAL_LINEAR_LAYERS {
        return usize_to_u32(index + 1).saturating_mul(REVEAL_UNIT_COST);
    }
    floor_f64_to_u32(f64::from(REVEAL_UNIT_COST) * usize_to_f64(index + 1).ln())
}
