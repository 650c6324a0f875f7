//! Oil and recognition accounting.
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::locations::{Location, all_locations};
use crate::tier::RecognitionTier;

/// Receiver of a session's rewards and penalties.
pub trait EconomyLedger {
    fn add_oil(&mut self, amount: u32);
    fn add_recognition(&mut self, amount: u32);
    /// Remove recognition, saturating at zero.
    fn remove_recognition(&mut self, amount: u32);
    fn mark_location_completed(&mut self, location: &str);
}

/// In-memory player ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerLedger {
    pub oil: u64,
    pub recognition: u32,
    #[serde(default)]
    pub completed_locations: BTreeSet<String>,
}

impl PlayerLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_completed(&self, location: &str) -> bool {
        self.completed_locations.contains(location)
    }

    /// Highest tier the player may take contracts at.
    ///
    /// Each tier above the tutorial opens once any location of the tier below it is completed.
    #[must_use]
    pub fn unlocked_tier(&self) -> RecognitionTier {
        let mut tier = RecognitionTier::Tutorial;
        while let Some(next) = tier.next() {
            let cleared_current = all_locations()
                .iter()
                .filter(|location: &&Location| location.tier == tier)
                .any(|location| self.is_completed(location.name));
            if !cleared_current {
                break;
            }
            tier = next;
        }
        tier
    }
}

impl EconomyLedger for PlayerLedger {
    fn add_oil(&mut self, amount: u32) {
        self.oil = self.oil.saturating_add(u64::from(amount));
    }

    fn add_recognition(&mut self, amount: u32) {
        self.recognition = self.recognition.saturating_add(amount);
    }

    fn remove_recognition(&mut self, amount: u32) {
        self.recognition = self.recognition.saturating_sub(amount);
    }

    fn mark_location_completed(&mut self, location: &str) {
        if self.completed_locations.insert(location.to_string()) {
            log::info!("location completed: {location}");
        }
    }
}
