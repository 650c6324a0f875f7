//! Hazard catalog: the six environmental threats and what each one unlocks.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::tier::RecognitionTier;

/// Environmental threat category carried by a danger layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardKind {
    Toxic,
    Explosion,
    Radiation,
    Acid,
    Flammable,
    BioHazard,
}

/// How a malus effect decays once triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum MalusDuration {
    /// Persists until the player clears it or the contract ends.
    UntilCleared,
    /// Counts down once per broken layer.
    Layers(u8),
    /// Applies at the triggering moment only.
    Instant,
    /// Expires after a span of session clock time.
    WallClock(u64),
}

/// Mechanical consequence a hazard inflicts when its layer is breached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalusEffectKind {
    ColorInversionClouds,
    ScatterMaskSlots,
    EjectAndLockMask,
    AcidDrill,
    CharMasks,
    DisableMaskInteraction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MalusDescriptor {
    pub effect: MalusEffectKind,
    pub duration: MalusDuration,
}

/// Static catalog entry for a hazard kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HazardInfo {
    pub kind: HazardKind,
    pub id: &'static str,
    pub label: &'static str,
    /// Unnormalized weight used when sampling danger layers.
    pub ratio: f64,
    /// RGB tint applied to layers and masks of this kind.
    pub color: u32,
    pub malus: MalusDescriptor,
}

static CATALOG: [HazardInfo; 6] = [
    HazardInfo {
        kind: HazardKind::Toxic,
        id: "1",
        label: "Toxic",
        ratio: 0.1,
        color: 0x0099_33ff,
        malus: MalusDescriptor {
            effect: MalusEffectKind::ColorInversionClouds,
            duration: MalusDuration::UntilCleared,
        },
    },
    HazardInfo {
        kind: HazardKind::Explosion,
        id: "2",
        label: "Explosion",
        ratio: 0.1,
        color: 0x00ff_6600,
        malus: MalusDescriptor {
            effect: MalusEffectKind::ScatterMaskSlots,
            duration: MalusDuration::UntilCleared,
        },
    },
    HazardInfo {
        kind: HazardKind::Radiation,
        id: "3",
        label: "Radiation",
        ratio: 0.1,
        color: 0x0000_ff00,
        malus: MalusDescriptor {
            effect: MalusEffectKind::EjectAndLockMask,
            duration: MalusDuration::Layers(crate::constants::RADIATION_LOCK_LAYERS),
        },
    },
    HazardInfo {
        kind: HazardKind::Acid,
        id: "4",
        label: "Acid",
        ratio: 0.1,
        color: 0x00cc_ff00,
        malus: MalusDescriptor {
            effect: MalusEffectKind::AcidDrill,
            duration: MalusDuration::Layers(crate::constants::ACID_LAYERS),
        },
    },
    HazardInfo {
        kind: HazardKind::Flammable,
        id: "5",
        label: "Flammable",
        ratio: 0.1,
        color: 0x00ff_0000,
        malus: MalusDescriptor {
            effect: MalusEffectKind::CharMasks,
            duration: MalusDuration::Instant,
        },
    },
    HazardInfo {
        kind: HazardKind::BioHazard,
        id: "6",
        label: "Bio-hazard",
        ratio: 0.1,
        color: 0x0000_ffff,
        malus: MalusDescriptor {
            effect: MalusEffectKind::DisableMaskInteraction,
            duration: MalusDuration::WallClock(crate::constants::BIOHAZARD_DISABLE_MS),
        },
    },
];

const TUTORIAL_DANGERS: [HazardKind; 2] = [HazardKind::Toxic, HazardKind::BioHazard];
const TIER_TWO_DANGERS: [HazardKind; 4] = [
    HazardKind::Toxic,
    HazardKind::BioHazard,
    HazardKind::Explosion,
    HazardKind::Flammable,
];
const TIER_THREE_DANGERS: [HazardKind; 6] = [
    HazardKind::Toxic,
    HazardKind::BioHazard,
    HazardKind::Explosion,
    HazardKind::Flammable,
    HazardKind::Radiation,
    HazardKind::Acid,
];

impl HazardKind {
    /// Every hazard kind in catalog order.
    pub const ALL: [Self; 6] = [
        Self::Toxic,
        Self::Explosion,
        Self::Radiation,
        Self::Acid,
        Self::Flammable,
        Self::BioHazard,
    ];

    const fn catalog_index(self) -> usize {
        match self {
            Self::Toxic => 0,
            Self::Explosion => 1,
            Self::Radiation => 2,
            Self::Acid => 3,
            Self::Flammable => 4,
            Self::BioHazard => 5,
        }
    }

    #[must_use]
    pub fn info(self) -> &'static HazardInfo {
        &CATALOG[self.catalog_index()]
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        self.info().label
    }

    #[must_use]
    pub fn ratio(self) -> f64 {
        self.info().ratio
    }

    #[must_use]
    pub fn color(self) -> u32 {
        self.info().color
    }

    #[must_use]
    pub fn malus(self) -> MalusDescriptor {
        self.info().malus
    }

    /// Stable kebab-case name used in event names.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Toxic => "toxic",
            Self::Explosion => "explosion",
            Self::Radiation => "radiation",
            Self::Acid => "acid",
            Self::Flammable => "flammable",
            Self::BioHazard => "bio-hazard",
        }
    }
}

impl fmt::Display for HazardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Full catalog in canonical order.
#[must_use]
pub fn catalog() -> &'static [HazardInfo] {
    &CATALOG
}

/// Look up a hazard by its numeric id (`"1"`..`"6"`) or slug.
#[must_use]
pub fn by_id(id: &str) -> Option<HazardKind> {
    let needle = id.trim();
    CATALOG
        .iter()
        .find(|info| info.id == needle || info.kind.slug().eq_ignore_ascii_case(needle))
        .map(|info| info.kind)
}

/// Hazard kinds a player may be briefed on at the given tier, in unlock order.
#[must_use]
pub const fn dangers_for_tier(tier: RecognitionTier) -> &'static [HazardKind] {
    match tier {
        RecognitionTier::Tutorial | RecognitionTier::Regional => &TUTORIAL_DANGERS,
        RecognitionTier::Continental => &TIER_TWO_DANGERS,
        RecognitionTier::Global => &TIER_THREE_DANGERS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_sets_are_cumulative() {
        let tiers = RecognitionTier::ALL;
        for pair in tiers.windows(2) {
            let lower = dangers_for_tier(pair[0]);
            let upper = dangers_for_tier(pair[1]);
            assert!(lower.iter().all(|kind| upper.contains(kind)));
        }
        assert_eq!(dangers_for_tier(RecognitionTier::Tutorial).len(), 2);
        assert_eq!(dangers_for_tier(RecognitionTier::Regional).len(), 2);
        assert_eq!(dangers_for_tier(RecognitionTier::Continental).len(), 4);
        assert_eq!(dangers_for_tier(RecognitionTier::Global).len(), 6);
    }

    #[test]
    fn lookup_accepts_ids_and_slugs() {
        assert_eq!(by_id("3"), Some(HazardKind::Radiation));
        assert_eq!(by_id("bio-hazard"), Some(HazardKind::BioHazard));
        assert_eq!(by_id(" Acid "), Some(HazardKind::Acid));
        assert_eq!(by_id("7"), None);
        assert_eq!(by_id(""), None);
    }

    #[test]
    fn catalog_order_matches_all() {
        let kinds: Vec<_> = catalog().iter().map(|info| info.kind).collect();
        assert_eq!(kinds, HazardKind::ALL.to_vec());
        for kind in HazardKind::ALL {
            assert!(kind.ratio() > 0.0);
        }
    }

    #[test]
    fn descriptors_match_effect_durations() {
        assert_eq!(
            HazardKind::Acid.malus().duration,
            MalusDuration::Layers(2)
        );
        assert_eq!(
            HazardKind::Radiation.malus().duration,
            MalusDuration::Layers(5)
        );
        assert_eq!(
            HazardKind::BioHazard.malus().duration,
            MalusDuration::WallClock(5_000)
        );
        assert_eq!(HazardKind::Flammable.malus().duration, MalusDuration::Instant);
    }
}
