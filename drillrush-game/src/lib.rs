//! Drillrush Game Engine
//!
//! Platform-agnostic core for the Drillrush oil-drilling arcade game: hazard
//! catalog, layer and contract generation, the drilling session state machine
//! and the malus effects. Rendering, audio and pointer handling live in the
//! presentation layer, which talks to this crate through [`EventSink`] and
//! [`EconomyLedger`].

pub mod config;
pub mod constants;
pub mod contract;
pub mod economy;
pub mod events;
pub mod geometry;
pub mod hazards;
pub mod inventory;
pub mod layers;
pub mod locations;
pub mod malus;
pub mod masks;
pub mod numbers;
pub mod rng;
pub mod session;
pub mod tier;
pub mod timers;

// Re-export commonly used types
pub use config::{
    ConfigError, GenerationConfig, LayerRange, MalusConfig, SessionConfig, TuningConfig,
};
pub use contract::{Contract, ContractGenerator, KnownHazards};
pub use economy::{EconomyLedger, PlayerLedger};
pub use events::{DrillEvent, EventSeverity, EventSink, NullSink};
pub use geometry::{ViewPoint, slot_at};
pub use hazards::{
    HazardInfo, HazardKind, MalusDescriptor, MalusDuration, MalusEffectKind, by_id,
    dangers_for_tier,
};
pub use inventory::{InventoryConfig, LayerIntel, Upgrades, layer_intel, reveal_cost};
pub use layers::{
    Layer, LayerKind, LayerVisual, generate_layers, layers_for_location, pick_cumulative,
    weighted_hazard, weighted_pick,
};
pub use locations::{Location, MapPoint, locations_up_to, project_coordinates};
pub use malus::{CloudId, MalusContext, MalusEffect, MalusEngine, SlotMove, ToxicCloud};
pub use masks::{DropOutcome, Mask, MaskId, MaskRack, PlacementError};
pub use rng::{RngBundle, Stream, StreamRng};
pub use session::{DrillPhase, DrillSession, SessionTotals};
pub use tier::RecognitionTier;
pub use timers::{DeferredAction, DeferredQueue, TimerHandle};
