use std::collections::BTreeSet;
use std::fmt;

use drillrush_game::{
    DrillSession, DropOutcome, EventSink, HazardKind, Layer, LayerIntel, MaskId, layer_intel,
};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

/// A mask the autopilot put on, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PilotDecision {
    pub layer: usize,
    pub hazard: HazardKind,
    pub slot: usize,
    pub rationale: &'static str,
}

/// Plays a drilling session frame by frame in place of a human.
pub trait Autopilot {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Called once per frame before the session ticks.
    fn act(
        &mut self,
        session: &mut DrillSession,
        sink: &mut dyn EventSink,
    ) -> Option<PilotDecision>;
}

/// Built-in autopilot strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PilotStrategy {
    /// Never touches a mask.
    Reckless,
    /// Plays from the briefing and whatever the radar shows.
    Briefed,
    /// Reads the whole layer sequence and always wears the right mask.
    Clairvoyant,
    /// Puts on a random mask at the start of every layer.
    Erratic,
}

impl PilotStrategy {
    pub const ALL: [Self; 4] = [Self::Reckless, Self::Briefed, Self::Clairvoyant, Self::Erratic];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Reckless => "Reckless",
            Self::Briefed => "Briefed",
            Self::Clairvoyant => "Clairvoyant",
            Self::Erratic => "Erratic",
        }
    }

    #[must_use]
    pub fn create_pilot(self, seed: u64, radar_range: Option<usize>) -> Box<dyn Autopilot> {
        match self {
            Self::Reckless => Box::new(RecklessPilot),
            Self::Briefed => Box::new(BriefedPilot { radar_range }),
            Self::Clairvoyant => Box::new(ClairvoyantPilot),
            Self::Erratic => Box::new(ErraticPilot::new(seed)),
        }
    }
}

impl fmt::Display for PilotStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

struct RecklessPilot;
struct BriefedPilot {
    radar_range: Option<usize>,
}
struct ClairvoyantPilot;

struct ErraticPilot {
    rng: ChaCha20Rng,
    last_layer: Option<usize>,
}

impl ErraticPilot {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
            last_layer: None,
        }
    }
}

impl Autopilot for RecklessPilot {
    fn name(&self) -> &'static str {
        "Reckless"
    }

    fn act(
        &mut self,
        _session: &mut DrillSession,
        _sink: &mut dyn EventSink,
    ) -> Option<PilotDecision> {
        None
    }
}

impl Autopilot for BriefedPilot {
    fn name(&self) -> &'static str {
        "Briefed"
    }

    fn act(
        &mut self,
        session: &mut DrillSession,
        sink: &mut dyn EventSink,
    ) -> Option<PilotDecision> {
        tidy_up(session, sink);
        let next = session.layer_index() + 1;
        let intel = layer_intel(session.contract(), self.radar_range, &BTreeSet::new());
        match intel.get(next) {
            Some(LayerIntel::Danger(kind)) => put_on(session, *kind, "radar", sink),
            Some(LayerIntel::Hidden) => {
                let has_free_slot = session.rack().slots().iter().any(Option::is_none);
                if !has_free_slot {
                    return None;
                }
                let guess = session.contract().known_hazards.iter().copied().find(|kind| {
                    !session.rack().has_equipped(*kind)
                        && session.rack().mask_for(*kind).is_some_and(|mask| !mask.locked)
                })?;
                put_on(session, guess, "briefing", sink)
            }
            Some(LayerIntel::Normal) | None => None,
        }
    }
}

impl Autopilot for ClairvoyantPilot {
    fn name(&self) -> &'static str {
        "Clairvoyant"
    }

    fn act(
        &mut self,
        session: &mut DrillSession,
        sink: &mut dyn EventSink,
    ) -> Option<PilotDecision> {
        tidy_up(session, sink);
        let hazard = session.next_layer().and_then(Layer::hazard)?;
        put_on(session, hazard, "foresight", sink)
    }
}

impl Autopilot for ErraticPilot {
    fn name(&self) -> &'static str {
        "Erratic"
    }

    fn act(
        &mut self,
        session: &mut DrillSession,
        sink: &mut dyn EventSink,
    ) -> Option<PilotDecision> {
        let layer = session.layer_index();
        if self.last_layer == Some(layer) {
            return None;
        }
        self.last_layer = Some(layer);

        let candidates: Vec<(MaskId, HazardKind)> = session
            .rack()
            .masks()
            .iter()
            .map(|mask| (mask.id, mask.hazard))
            .collect();
        let (mask, hazard) = *candidates.choose(&mut self.rng)?;
        let slot = self.rng.gen_range(0..session.rack().slot_count().max(1));
        match session.equip(mask, slot, sink) {
            Ok(DropOutcome::Placed { slot, .. }) => Some(PilotDecision {
                layer,
                hazard,
                slot,
                rationale: "coin flip",
            }),
            Ok(DropOutcome::Returned) => None,
            Err(err) => {
                log::debug!("erratic pilot could not equip {mask}: {err}");
                None
            }
        }
    }
}

/// Equip the mask for `hazard` unless it is already on.
fn put_on(
    session: &mut DrillSession,
    hazard: HazardKind,
    rationale: &'static str,
    sink: &mut dyn EventSink,
) -> Option<PilotDecision> {
    if session.rack().has_equipped(hazard) {
        return None;
    }
    match session.equip_for(hazard, sink) {
        Ok(DropOutcome::Placed { slot, .. }) => Some(PilotDecision {
            layer: session.layer_index(),
            hazard,
            slot,
            rationale,
        }),
        Ok(DropOutcome::Returned) => None,
        Err(err) => {
            log::trace!("cannot equip {hazard} yet: {err}");
            None
        }
    }
}

/// Wipe every toxic cloud and drag scattered slots back home.
fn tidy_up(session: &mut DrillSession, sink: &mut dyn EventSink) {
    let clouds: Vec<_> = session.malus().clouds().iter().map(|cloud| cloud.id).collect();
    for cloud in clouds {
        session.dismiss_cloud(cloud, sink);
    }
    for mask in session.malus().scattered() {
        if let Some(home) = session.rack().mask(mask).map(|entry| entry.home) {
            session.move_scattered_slot(mask, home, sink);
        }
    }
}
