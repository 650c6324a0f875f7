//! Malus effects: what a breached hazard layer does to the player.
//!
//! Each hazard kind has one handler implementing [`MalusEffect`]. The
//! [`MalusEngine`] owns all six and dispatches by [`HazardKind`]. Handlers
//! mutate the mask rack and deferred queue through a [`MalusContext`] and
//! never touch a mask that is being dragged beyond what the rack allows.

mod acid;
mod biohazard;
mod explosion;
mod flammable;
mod radiation;
mod toxic;

use rand::RngCore;

use crate::config::MalusConfig;
use crate::events::{DrillEvent, EventSink};
use crate::geometry::ViewPoint;
use crate::hazards::HazardKind;
use crate::masks::{MaskId, MaskRack};
use crate::timers::{DeferredQueue, TimerHandle};

pub use acid::AcidDrill;
pub use biohazard::Quarantine;
pub use explosion::{ScatteredSlots, SlotMove};
pub use flammable::CharredMasks;
pub use radiation::RadiationLock;
pub use toxic::{CloudId, ToxicCloud, ToxicClouds};

/// Mutable session state a malus handler may touch.
pub struct MalusContext<'a> {
    pub rack: &'a mut MaskRack,
    pub timers: &'a mut DeferredQueue,
    pub rng: &'a mut dyn RngCore,
    /// Session clock in milliseconds.
    pub now_ms: u64,
    pub config: &'a MalusConfig,
    pub events: &'a mut dyn EventSink,
}

/// Common lifecycle shared by every malus handler.
pub trait MalusEffect {
    fn kind(&self) -> HazardKind;

    /// Start (or restart) the effect.
    fn apply(&mut self, ctx: &mut MalusContext<'_>);

    /// Advance layer-counted effects by one broken layer. Returns true if the effect expired.
    fn on_layer_break(&mut self, _ctx: &mut MalusContext<'_>) -> bool {
        false
    }

    /// Undo the effect. Idempotent.
    fn revert(&mut self, ctx: &mut MalusContext<'_>);

    fn is_active(&self) -> bool;
}

/// Emit the expiry event for `kind` when `was_active`.
fn expire(ctx: &mut MalusContext<'_>, kind: HazardKind, was_active: bool) {
    if was_active {
        log::debug!("malus expired: {kind}");
        ctx.events.emit(DrillEvent::MalusExpired { hazard: kind });
    }
}

/// Owns one handler per hazard kind.
#[derive(Debug, Clone, Default)]
pub struct MalusEngine {
    toxic: ToxicClouds,
    explosion: ScatteredSlots,
    radiation: RadiationLock,
    acid: AcidDrill,
    flammable: CharredMasks,
    biohazard: Quarantine,
}

impl MalusEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn handler_mut(&mut self, kind: HazardKind) -> &mut dyn MalusEffect {
        match kind {
            HazardKind::Toxic => &mut self.toxic,
            HazardKind::Explosion => &mut self.explosion,
            HazardKind::Radiation => &mut self.radiation,
            HazardKind::Acid => &mut self.acid,
            HazardKind::Flammable => &mut self.flammable,
            HazardKind::BioHazard => &mut self.biohazard,
        }
    }

    fn handler(&self, kind: HazardKind) -> &dyn MalusEffect {
        match kind {
            HazardKind::Toxic => &self.toxic,
            HazardKind::Explosion => &self.explosion,
            HazardKind::Radiation => &self.radiation,
            HazardKind::Acid => &self.acid,
            HazardKind::Flammable => &self.flammable,
            HazardKind::BioHazard => &self.biohazard,
        }
    }

    /// Trigger the malus of a breached hazard layer.
    pub fn trigger(&mut self, kind: HazardKind, ctx: &mut MalusContext<'_>) {
        log::debug!("malus triggered: {kind}");
        ctx.events.emit(DrillEvent::MalusTriggered { hazard: kind });
        self.handler_mut(kind).apply(ctx);
    }

    /// Count one broken layer against every layer-timed effect.
    pub fn on_layer_break(&mut self, ctx: &mut MalusContext<'_>) -> Vec<HazardKind> {
        HazardKind::ALL
            .into_iter()
            .filter(|kind| self.handler_mut(*kind).on_layer_break(ctx))
            .collect()
    }

    pub fn revert_all(&mut self, ctx: &mut MalusContext<'_>) {
        for kind in HazardKind::ALL {
            self.handler_mut(kind).revert(ctx);
        }
    }

    #[must_use]
    pub fn is_active(&self, kind: HazardKind) -> bool {
        self.handler(kind).is_active()
    }

    #[must_use]
    pub fn active(&self) -> Vec<HazardKind> {
        HazardKind::ALL
            .into_iter()
            .filter(|kind| self.is_active(*kind))
            .collect()
    }

    /// Drill speed factor contributed by maluses.
    #[must_use]
    pub fn speed_multiplier(&self, config: &MalusConfig) -> f64 {
        self.acid.speed_multiplier(config)
    }

    #[must_use]
    pub fn clouds(&self) -> &[ToxicCloud] {
        self.toxic.clouds()
    }

    /// Whether rendering at `point` is color-inverted by a toxic cloud.
    #[must_use]
    pub fn inverts(&self, point: ViewPoint) -> bool {
        self.toxic.inverts(point)
    }

    pub fn dismiss_cloud(&mut self, cloud: CloudId, ctx: &mut MalusContext<'_>) -> bool {
        self.toxic.dismiss(cloud, ctx)
    }

    #[must_use]
    pub fn scattered(&self) -> Vec<MaskId> {
        self.explosion.scattered().collect()
    }

    pub fn move_scattered_slot(
        &mut self,
        mask: MaskId,
        point: ViewPoint,
        ctx: &mut MalusContext<'_>,
    ) -> SlotMove {
        self.explosion.move_slot(mask, point, ctx)
    }

    #[must_use]
    pub const fn acid_layers_left(&self) -> u8 {
        self.acid.remaining()
    }

    #[must_use]
    pub const fn radiation_layers_left(&self) -> u8 {
        self.radiation.remaining()
    }

    #[must_use]
    pub const fn irradiated_mask(&self) -> Option<MaskId> {
        self.radiation.locked()
    }

    /// Handle a fired bio-hazard timer; stale handles are ignored.
    pub fn restore_interaction(&mut self, handle: TimerHandle, ctx: &mut MalusContext<'_>) -> bool {
        self.biohazard.restore(handle, ctx)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::events::DrillEvent;
    use crate::inventory::InventoryConfig;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    /// Owned backing state for building a [`MalusContext`] in tests.
    pub struct Harness {
        pub rack: MaskRack,
        pub timers: DeferredQueue,
        pub rng: ChaCha20Rng,
        pub now_ms: u64,
        pub config: MalusConfig,
        pub events: Vec<DrillEvent>,
    }

    impl Harness {
        pub fn new(slots: usize, hazards: &[HazardKind]) -> Self {
            let inventory = InventoryConfig {
                drill_speed_multiplier: 1.0,
                mask_slot_capacity: slots,
                owned_hazards: hazards.to_vec(),
            };
            Self {
                rack: MaskRack::new(hazards, &inventory),
                timers: DeferredQueue::new(),
                rng: ChaCha20Rng::seed_from_u64(17),
                now_ms: 0,
                config: MalusConfig::default(),
                events: Vec::new(),
            }
        }

        pub fn ctx(&mut self) -> MalusContext<'_> {
            MalusContext {
                rack: &mut self.rack,
                timers: &mut self.timers,
                rng: &mut self.rng,
                now_ms: self.now_ms,
                config: &self.config,
                events: &mut self.events,
            }
        }

        pub fn names(&self) -> Vec<String> {
            self.events.iter().map(DrillEvent::name).collect()
        }
    }
}
