//! Domain events emitted by a drilling session.
//!
//! The core never plays sounds or animations; presentation layers subscribe
//! through [`EventSink`] and react to the stable [`DrillEvent::name`].

use serde::{Deserialize, Serialize};

use crate::hazards::HazardKind;
use crate::malus::CloudId;
use crate::masks::MaskId;

/// Severity tier used by presentation layers to pick feedback intensity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSeverity {
    Info,
    Warning,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DrillEvent {
    LayerBroken {
        index: usize,
        hazard: Option<HazardKind>,
        oil: u32,
    },
    DamageTaken {
        index: usize,
        hazard: HazardKind,
        lives_left: u8,
    },
    MalusTriggered {
        hazard: HazardKind,
    },
    MalusExpired {
        hazard: HazardKind,
    },
    MaskPlaced {
        mask: MaskId,
        slot: usize,
    },
    MaskReturned {
        mask: MaskId,
    },
    MaskIrradiated {
        mask: MaskId,
    },
    MasksCharred {
        masks: Vec<MaskId>,
    },
    CloudsSpawned {
        count: usize,
    },
    CloudDismissed {
        cloud: CloudId,
    },
    SlotsScattered {
        count: usize,
    },
    SlotRepaired {
        mask: MaskId,
    },
    MaskInteractionRestored,
    ContractComplete {
        contract_id: u32,
        oil: u32,
    },
    ContractFailed {
        contract_id: u32,
    },
    ContractAbandoned {
        contract_id: u32,
    },
    ReturnToMap,
}

impl DrillEvent {
    /// Stable kebab-case event name, e.g. `malus-triggered:bio-hazard`.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::LayerBroken { .. } => "layer-broken".to_string(),
            Self::DamageTaken { .. } => "damage-taken".to_string(),
            Self::MalusTriggered { hazard } => format!("malus-triggered:{}", hazard.slug()),
            Self::MalusExpired { hazard } => format!("malus-expired:{}", hazard.slug()),
            Self::MaskPlaced { .. } => "mask-placed".to_string(),
            Self::MaskReturned { .. } => "mask-returned".to_string(),
            Self::MaskIrradiated { .. } => "mask-irradiated".to_string(),
            Self::MasksCharred { .. } => "masks-charred".to_string(),
            Self::CloudsSpawned { .. } => "clouds-spawned".to_string(),
            Self::CloudDismissed { .. } => "cloud-dismissed".to_string(),
            Self::SlotsScattered { .. } => "slots-scattered".to_string(),
            Self::SlotRepaired { .. } => "slot-repaired".to_string(),
            Self::MaskInteractionRestored => "mask-interaction-restored".to_string(),
            Self::ContractComplete { .. } => "contract-complete".to_string(),
            Self::ContractFailed { .. } => "contract-failed".to_string(),
            Self::ContractAbandoned { .. } => "contract-abandoned".to_string(),
            Self::ReturnToMap => "return-to-map".to_string(),
        }
    }

    #[must_use]
    pub const fn severity(&self) -> EventSeverity {
        match self {
            Self::DamageTaken { .. } | Self::ContractFailed { .. } => EventSeverity::Critical,
            Self::MalusTriggered { .. }
            | Self::MaskIrradiated { .. }
            | Self::MasksCharred { .. }
            | Self::CloudsSpawned { .. }
            | Self::SlotsScattered { .. } => EventSeverity::Warning,
            _ => EventSeverity::Info,
        }
    }
}

/// Subscriber for session events.
pub trait EventSink {
    fn emit(&mut self, event: DrillEvent);
}

impl EventSink for Vec<DrillEvent> {
    fn emit(&mut self, event: DrillEvent) {
        self.push(event);
    }
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: DrillEvent) {}
}
