//! Layer sequence generation: the ordered strata a contract drills through.
use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::config::GenerationConfig;
use crate::constants::{DIAGNOSTIC_HARDNESS, DIAGNOSTIC_LOCATION, STRATA_VARIANTS};
use crate::hazards::HazardKind;
use crate::tier::RecognitionTier;

/// Whether a layer is plain rock or carries a hazard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "hazard", rename_all = "snake_case")]
pub enum LayerKind {
    Normal,
    Danger(HazardKind),
}

/// Visual reference for the renderer; danger layers are tinted by hazard color instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "variant", rename_all = "snake_case")]
pub enum LayerVisual {
    Surface,
    Strata(u8),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub index: usize,
    pub kind: LayerKind,
    /// Seconds of drilling at speed 1.0.
    pub hardness: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual: Option<LayerVisual>,
}

impl Layer {
    #[must_use]
    pub const fn is_danger(&self) -> bool {
        matches!(self.kind, LayerKind::Danger(_))
    }

    #[must_use]
    pub const fn hazard(&self) -> Option<HazardKind> {
        match self.kind {
            LayerKind::Danger(kind) => Some(kind),
            LayerKind::Normal => None,
        }
    }
}

/// First option whose cumulative weight reaches `draw`.
///
/// Non-positive weights are never selected. Draws beyond the total fall back to the first
/// option; an empty slice yields `None`.
#[must_use]
pub fn pick_cumulative<T: Copy>(options: &[(T, f64)], draw: f64) -> Option<T> {
    let mut cumulative = 0.0;
    for (item, weight) in options {
        if *weight <= 0.0 {
            continue;
        }
        cumulative += weight;
        if cumulative >= draw {
            return Some(*item);
        }
    }
    options.first().map(|(item, _)| *item)
}

/// Draw uniformly in `[0, total)` and resolve it with [`pick_cumulative`].
///
/// Returns `None` without consuming randomness when no option has positive weight.
pub fn weighted_pick<T, R>(options: &[(T, f64)], rng: &mut R) -> Option<T>
where
    R: Rng + ?Sized,
    T: Copy,
{
    let total: f64 = options.iter().map(|(_, weight)| weight.max(0.0)).sum();
    if total <= 0.0 {
        return None;
    }
    pick_cumulative(options, rng.gen_range(0.0..total))
}

fn hazard_weights(known: &[HazardKind]) -> SmallVec<[(HazardKind, f64); 6]> {
    known.iter().map(|kind| (*kind, kind.ratio())).collect()
}

/// Pick the hazard whose cumulative ratio first reaches `draw`.
///
/// Draws beyond the total fall back to the first known hazard; an empty slice yields `None`.
#[must_use]
pub fn weighted_hazard(known: &[HazardKind], draw: f64) -> Option<HazardKind> {
    pick_cumulative(&hazard_weights(known), draw)
}

fn roll_layer_kind<R>(known: &[HazardKind], cfg: &GenerationConfig, rng: &mut R) -> LayerKind
where
    R: Rng + ?Sized,
{
    if rng.r#gen::<f64>() < cfg.normal_chance {
        return LayerKind::Normal;
    }
    weighted_pick(&hazard_weights(known), rng).map_or(LayerKind::Normal, LayerKind::Danger)
}

/// Generate a contract's layer sequence for a tier and a known-hazard set.
///
/// Layer 0 is always the normal surface layer. Hazards outside `known` are never emitted.
pub fn generate_layers<R>(
    tier: RecognitionTier,
    known: &[HazardKind],
    cfg: &GenerationConfig,
    rng: &mut R,
) -> Vec<Layer>
where
    R: Rng + ?Sized,
{
    let range = cfg.layer_ranges.for_tier(tier);
    let count = if range.min >= range.max {
        usize::from(range.min)
    } else {
        usize::from(rng.gen_range(range.min..=range.max))
    };

    let mut layers = Vec::with_capacity(count);
    for index in 0..count {
        let kind = if index == 0 {
            LayerKind::Normal
        } else {
            roll_layer_kind(known, cfg, rng)
        };
        let hardness = rng.gen_range(cfg.hardness_min..cfg.hardness_max);
        let visual = match (index, kind) {
            (0, _) => Some(LayerVisual::Surface),
            (_, LayerKind::Normal) => Some(LayerVisual::Strata(rng.gen_range(1..=STRATA_VARIANTS))),
            (_, LayerKind::Danger(_)) => None,
        };
        layers.push(Layer {
            index,
            kind,
            hardness,
            visual,
        });
    }

    log::debug!(
        "generated {} layers for tier {} ({} danger)",
        layers.len(),
        tier.ordinal(),
        layers.iter().filter(|layer| layer.is_danger()).count()
    );
    layers
}

/// Fixed sweep through every hazard kind, used by the diagnostic location.
#[must_use]
pub fn diagnostic_layers() -> Vec<Layer> {
    let mut layers = vec![
        Layer {
            index: 0,
            kind: LayerKind::Normal,
            hardness: DIAGNOSTIC_HARDNESS,
            visual: Some(LayerVisual::Surface),
        },
        Layer {
            index: 1,
            kind: LayerKind::Normal,
            hardness: DIAGNOSTIC_HARDNESS,
            visual: Some(LayerVisual::Strata(1)),
        },
    ];
    for kind in HazardKind::ALL {
        layers.push(Layer {
            index: layers.len(),
            kind: LayerKind::Danger(kind),
            hardness: DIAGNOSTIC_HARDNESS,
            visual: None,
        });
    }
    layers
}

/// Layers for a named location; the diagnostic location ignores tier and known hazards.
pub fn layers_for_location<R>(
    location: &str,
    tier: RecognitionTier,
    known: &[HazardKind],
    cfg: &GenerationConfig,
    rng: &mut R,
) -> Vec<Layer>
where
    R: Rng + ?Sized,
{
    if location == DIAGNOSTIC_LOCATION {
        return diagnostic_layers();
    }
    generate_layers(tier, known, cfg, rng)
}
