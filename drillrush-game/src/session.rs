//! Drilling session: the state machine that bores through a contract's layers.
//!
//! A session is driven by [`DrillSession::tick`] with the frame delta. Each
//! tick advances a session clock, fires due deferred actions and, while
//! drilling, accumulates progress on the current layer. Reaching full
//! progress breaks the layer: timed maluses count down, the next layer's
//! hazard is checked against the equipped masks, its malus fires, and oil is
//! credited. Rewards and penalties flow into an [`EconomyLedger`]; everything
//! the presentation layer needs to know flows into an [`EventSink`].

use serde::{Deserialize, Serialize};

use crate::config::SessionConfig;
use crate::contract::Contract;
use crate::economy::EconomyLedger;
use crate::events::{DrillEvent, EventSink};
use crate::geometry::{ViewPoint, slot_at};
use crate::hazards::HazardKind;
use crate::inventory::InventoryConfig;
use crate::layers::Layer;
use crate::malus::{CloudId, MalusContext, MalusEngine, SlotMove};
use crate::masks::{DropOutcome, MaskId, MaskRack, PlacementError};
use crate::numbers::millis_to_secs;
use crate::rng::{RngBundle, Stream};
use crate::timers::{DeferredAction, DeferredQueue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrillPhase {
    Drilling,
    /// Set for the remainder of the tick that broke a layer.
    LayerBroken,
    ContractComplete,
    ContractFailed,
    Abandoned,
}

impl DrillPhase {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::ContractComplete | Self::ContractFailed | Self::Abandoned
        )
    }
}

/// Running totals of what this session paid out or took away.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTotals {
    pub layer_oil: u32,
    pub contract_oil: u32,
    pub recognition_gained: u32,
    pub recognition_lost: u32,
    pub damage_taken: u8,
}

impl SessionTotals {
    #[must_use]
    pub const fn oil_earned(&self) -> u32 {
        self.layer_oil.saturating_add(self.contract_oil)
    }
}

#[derive(Debug, Clone)]
pub struct DrillSession {
    contract: Contract,
    config: SessionConfig,
    drill_speed: f64,
    phase: DrillPhase,
    layer_index: usize,
    progress: f64,
    lives: u8,
    clock_ms: u64,
    rack: MaskRack,
    malus: MalusEngine,
    timers: DeferredQueue,
    rngs: RngBundle,
    totals: SessionTotals,
    returned_to_map: bool,
}

impl DrillSession {
    /// Begin drilling `contract` at layer 0 with the player's current equipment.
    #[must_use]
    pub fn start(
        contract: Contract,
        inventory: &InventoryConfig,
        mut config: SessionConfig,
        seed: u64,
    ) -> Self {
        config.sanitize();
        let rack = MaskRack::new(&contract.known_hazards, inventory);
        log::info!(
            "drilling {} (#{}): {} layers, {} masks, {} slots",
            contract.title,
            contract.id,
            contract.layers.len(),
            rack.masks().len(),
            rack.slot_count()
        );
        Self {
            lives: config.starting_lives,
            contract,
            config,
            drill_speed: inventory.drill_speed_multiplier,
            phase: DrillPhase::Drilling,
            layer_index: 0,
            progress: 0.0,
            clock_ms: 0,
            rack,
            malus: MalusEngine::new(),
            timers: DeferredQueue::new(),
            rngs: RngBundle::from_user_seed(seed),
            totals: SessionTotals::default(),
            returned_to_map: false,
        }
    }

    #[must_use]
    pub const fn contract(&self) -> &Contract {
        &self.contract
    }

    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub const fn phase(&self) -> DrillPhase {
        self.phase
    }

    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    #[must_use]
    pub const fn layer_index(&self) -> usize {
        self.layer_index
    }

    /// Fraction of the current layer drilled, in `[0, 1)`.
    #[must_use]
    pub const fn progress(&self) -> f64 {
        self.progress
    }

    #[must_use]
    pub const fn lives(&self) -> u8 {
        self.lives
    }

    #[must_use]
    pub const fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    #[must_use]
    pub const fn totals(&self) -> SessionTotals {
        self.totals
    }

    #[must_use]
    pub const fn rack(&self) -> &MaskRack {
        &self.rack
    }

    #[must_use]
    pub const fn malus(&self) -> &MalusEngine {
        &self.malus
    }

    #[must_use]
    pub const fn timers(&self) -> &DeferredQueue {
        &self.timers
    }

    /// True once the delayed return to the world map has fired, or right after abandoning.
    #[must_use]
    pub const fn returned_to_map(&self) -> bool {
        self.returned_to_map
    }

    #[must_use]
    pub fn current_layer(&self) -> Option<&Layer> {
        self.contract.layers.get(self.layer_index)
    }

    #[must_use]
    pub fn next_layer(&self) -> Option<&Layer> {
        self.contract.layers.get(self.layer_index + 1)
    }

    /// Drill speed including malus multipliers.
    #[must_use]
    pub fn effective_speed(&self) -> f64 {
        self.drill_speed * self.malus.speed_multiplier(&self.config.malus)
    }

    #[must_use]
    pub fn inverts(&self, point: ViewPoint) -> bool {
        self.malus.inverts(point)
    }

    fn with_malus<T>(
        &mut self,
        sink: &mut dyn EventSink,
        f: impl FnOnce(&mut MalusEngine, &mut MalusContext<'_>) -> T,
    ) -> T {
        let mut rng = self.rngs.malus();
        let mut ctx = MalusContext {
            rack: &mut self.rack,
            timers: &mut self.timers,
            rng: &mut *rng,
            now_ms: self.clock_ms,
            config: &self.config.malus,
            events: sink,
        };
        f(&mut self.malus, &mut ctx)
    }

    /// Advance the session by `delta_ms` of wall-clock time.
    pub fn tick(
        &mut self,
        delta_ms: u32,
        ledger: &mut dyn EconomyLedger,
        sink: &mut dyn EventSink,
    ) -> DrillPhase {
        self.clock_ms = self.clock_ms.saturating_add(u64::from(delta_ms));
        self.fire_due_timers(sink);

        if self.phase == DrillPhase::LayerBroken {
            self.phase = DrillPhase::Drilling;
        }
        if self.phase != DrillPhase::Drilling {
            return self.phase;
        }
        let Some(hardness) = self.current_layer().map(|layer| layer.hardness) else {
            return self.phase;
        };

        let step = millis_to_secs(delta_ms) / hardness.max(f64::EPSILON) * self.effective_speed();
        self.progress += step;
        if self.progress >= 1.0 {
            self.break_layer(ledger, sink);
        }
        self.phase
    }

    fn fire_due_timers(&mut self, sink: &mut dyn EventSink) {
        for (handle, action) in self.timers.pop_due(self.clock_ms) {
            match action {
                DeferredAction::RestoreMaskInteraction => {
                    self.with_malus(sink, |engine, ctx| engine.restore_interaction(handle, ctx));
                }
                DeferredAction::ReturnToMap => {
                    self.returned_to_map = true;
                    log::debug!("returning to map from {}", self.contract.title);
                    sink.emit(DrillEvent::ReturnToMap);
                }
            }
        }
    }

    /// Break through the current layer into the next one.
    ///
    /// No-op once the session has ended or when there is no current layer.
    pub fn break_layer(&mut self, ledger: &mut dyn EconomyLedger, sink: &mut dyn EventSink) {
        if self.is_terminal() {
            return;
        }
        let Some(broken) = self.current_layer().cloned() else {
            return;
        };

        self.with_malus(sink, |engine, ctx| engine.on_layer_break(ctx));

        let incoming = self.next_layer().and_then(Layer::hazard);
        if let Some(hazard) = incoming {
            let protected = self.rack.has_equipped(hazard);
            if !protected {
                self.take_damage(hazard, sink);
            }
            self.with_malus(sink, |engine, ctx| engine.trigger(hazard, ctx));
            if !protected && self.lives == 0 {
                self.fail(ledger, sink);
                return;
            }
        }

        let mut oil = self
            .config
            .layer_oil_base
            .saturating_mul(u32::try_from(broken.index + 1).unwrap_or(u32::MAX));
        if broken.is_danger() {
            oil = oil.saturating_mul(self.config.danger_oil_multiplier);
        }
        ledger.add_oil(oil);
        self.totals.layer_oil = self.totals.layer_oil.saturating_add(oil);

        if self.config.eject_masks_on_break {
            for mask in self.rack.eject_all() {
                sink.emit(DrillEvent::MaskReturned { mask });
            }
        }

        self.layer_index += 1;
        self.progress = 0.0;
        self.phase = DrillPhase::LayerBroken;
        log::debug!(
            "layer {} broken at {} (+{oil} oil)",
            broken.index,
            self.contract.title
        );
        sink.emit(DrillEvent::LayerBroken {
            index: broken.index,
            hazard: broken.hazard(),
            oil,
        });

        if self.layer_index >= self.contract.layers.len() {
            self.complete(ledger, sink);
        }
    }

    fn take_damage(&mut self, hazard: HazardKind, sink: &mut dyn EventSink) {
        self.lives = self.lives.saturating_sub(1);
        self.totals.damage_taken = self.totals.damage_taken.saturating_add(1);
        log::info!(
            "unprotected against {hazard} at layer {}, {} lives left",
            self.layer_index + 1,
            self.lives
        );
        sink.emit(DrillEvent::DamageTaken {
            index: self.layer_index + 1,
            hazard,
            lives_left: self.lives,
        });
    }

    fn complete(&mut self, ledger: &mut dyn EconomyLedger, sink: &mut dyn EventSink) {
        self.phase = DrillPhase::ContractComplete;
        ledger.add_oil(self.contract.oil);
        ledger.add_recognition(self.config.completion_recognition);
        ledger.mark_location_completed(&self.contract.title);
        self.totals.contract_oil = self.contract.oil;
        self.totals.recognition_gained = self.config.completion_recognition;
        log::info!(
            "contract {} complete: +{} oil, +{} recognition",
            self.contract.id,
            self.contract.oil,
            self.config.completion_recognition
        );
        self.wind_down(sink);
        sink.emit(DrillEvent::ContractComplete {
            contract_id: self.contract.id,
            oil: self.contract.oil,
        });
    }

    fn fail(&mut self, ledger: &mut dyn EconomyLedger, sink: &mut dyn EventSink) {
        self.phase = DrillPhase::ContractFailed;
        ledger.remove_recognition(self.config.failure_recognition);
        self.totals.recognition_lost = self.config.failure_recognition;
        log::info!(
            "contract {} failed at layer {}",
            self.contract.id,
            self.layer_index
        );
        self.wind_down(sink);
        sink.emit(DrillEvent::ContractFailed {
            contract_id: self.contract.id,
        });
    }

    /// Clear maluses and timers, then schedule the delayed return to the map.
    fn wind_down(&mut self, sink: &mut dyn EventSink) {
        self.with_malus(sink, |engine, ctx| engine.revert_all(ctx));
        self.timers.cancel_all();
        log::debug!(
            "contract {} wound down after {} malus draws",
            self.contract.id,
            self.rngs.draws(Stream::Malus)
        );
        let due = self.clock_ms.saturating_add(self.config.return_delay_ms);
        self.timers.schedule(due, DeferredAction::ReturnToMap);
    }

    /// Leave the contract without rewards or penalties. Returns false if it already ended.
    pub fn abandon(&mut self, sink: &mut dyn EventSink) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.with_malus(sink, |engine, ctx| engine.revert_all(ctx));
        self.timers.cancel_all();
        self.phase = DrillPhase::Abandoned;
        self.returned_to_map = true;
        log::info!("contract {} abandoned", self.contract.id);
        sink.emit(DrillEvent::ContractAbandoned {
            contract_id: self.contract.id,
        });
        true
    }

    // Mask input -------------------------------------------------------------

    /// Pick up a mask.
    ///
    /// # Errors
    ///
    /// Rejected after the contract ends, while bio-hazard is active, or for locked/unknown masks.
    pub fn begin_drag(&mut self, mask: MaskId) -> Result<(), PlacementError> {
        if self.is_terminal() {
            return Err(PlacementError::InteractionDisabled);
        }
        self.rack.begin_drag(mask)
    }

    /// Move a dragged mask.
    ///
    /// # Errors
    ///
    /// Fails if the mask is unknown or not being dragged.
    pub fn drag_to(&mut self, mask: MaskId, point: ViewPoint) -> Result<(), PlacementError> {
        self.rack.drag_to(mask, point)
    }

    /// Drop a dragged mask into `slot`, or back into the inventory when `None`.
    ///
    /// # Errors
    ///
    /// Returns the placement rejection; the mask is back at its anchor either way.
    pub fn end_drag(
        &mut self,
        mask: MaskId,
        slot: Option<usize>,
        sink: &mut dyn EventSink,
    ) -> Result<DropOutcome, PlacementError> {
        let was_placed = self.rack.mask(mask).is_some_and(|entry| entry.is_placed());
        match self.rack.end_drag(mask, slot) {
            Ok(DropOutcome::Placed { slot, displaced }) => {
                if let Some(other) = displaced {
                    sink.emit(DrillEvent::MaskReturned { mask: other });
                }
                sink.emit(DrillEvent::MaskPlaced { mask, slot });
                Ok(DropOutcome::Placed { slot, displaced })
            }
            Ok(DropOutcome::Returned) => {
                if was_placed {
                    sink.emit(DrillEvent::MaskReturned { mask });
                }
                Ok(DropOutcome::Returned)
            }
            Err(err) => {
                log::debug!("rejected drop of {mask}: {err}");
                if was_placed {
                    sink.emit(DrillEvent::MaskReturned { mask });
                }
                Err(err)
            }
        }
    }

    /// Drop a dragged mask at a view point, resolving the slot underneath.
    ///
    /// # Errors
    ///
    /// Same as [`Self::end_drag`].
    pub fn drop_at(
        &mut self,
        mask: MaskId,
        point: ViewPoint,
        sink: &mut dyn EventSink,
    ) -> Result<DropOutcome, PlacementError> {
        let slot = slot_at(point, self.rack.slot_count());
        self.end_drag(mask, slot, sink)
    }

    /// Pick up and drop a mask into `slot` in one step.
    ///
    /// # Errors
    ///
    /// Same as [`Self::begin_drag`] and [`Self::end_drag`].
    pub fn equip(
        &mut self,
        mask: MaskId,
        slot: usize,
        sink: &mut dyn EventSink,
    ) -> Result<DropOutcome, PlacementError> {
        self.begin_drag(mask)?;
        self.end_drag(mask, Some(slot), sink)
    }

    /// Equip the mask for `hazard` into the first free slot, or slot 0 when all are full.
    ///
    /// # Errors
    ///
    /// Fails when no mask for `hazard` exists or placement is rejected.
    pub fn equip_for(
        &mut self,
        hazard: HazardKind,
        sink: &mut dyn EventSink,
    ) -> Result<DropOutcome, PlacementError> {
        let Some(mask) = self.rack.mask_for(hazard).map(|mask| mask.id) else {
            return Err(PlacementError::NoMaskFor(hazard));
        };
        if let Some((slot, _)) = self.rack.equipped().find(|(_, entry)| entry.id == mask) {
            return Ok(DropOutcome::Placed {
                slot,
                displaced: None,
            });
        }
        let slot = self
            .rack
            .slots()
            .iter()
            .position(Option::is_none)
            .unwrap_or(0);
        self.equip(mask, slot, sink)
    }

    /// Wipe away one toxic cloud.
    pub fn dismiss_cloud(&mut self, cloud: CloudId, sink: &mut dyn EventSink) -> bool {
        self.with_malus(sink, |engine, ctx| engine.dismiss_cloud(cloud, ctx))
    }

    /// Drag a scattered inventory slot; close enough to home repairs it.
    pub fn move_scattered_slot(
        &mut self,
        mask: MaskId,
        point: ViewPoint,
        sink: &mut dyn EventSink,
    ) -> SlotMove {
        self.with_malus(sink, |engine, ctx| engine.move_scattered_slot(mask, point, ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::ContractGenerator;
    use crate::economy::PlayerLedger;
    use crate::layers::{LayerKind, LayerVisual};
    use crate::tier::RecognitionTier;

    fn layer(index: usize, kind: LayerKind) -> Layer {
        Layer {
            index,
            kind,
            hardness: 3.0,
            visual: (index == 0).then_some(LayerVisual::Surface),
        }
    }

    fn contract(kinds: &[LayerKind], known: &[HazardKind]) -> Contract {
        Contract {
            id: 1,
            title: "Nigeria".to_string(),
            oil: 1_500,
            min_steps: 3,
            known_hazards: known.iter().copied().collect(),
            layers: kinds
                .iter()
                .enumerate()
                .map(|(index, kind)| layer(index, *kind))
                .collect(),
            lat: 9.1,
            lon: 8.7,
            tier: RecognitionTier::Regional,
        }
    }

    fn inventory(slots: usize, owned: &[HazardKind]) -> InventoryConfig {
        InventoryConfig {
            drill_speed_multiplier: 1.0,
            mask_slot_capacity: slots,
            owned_hazards: owned.to_vec(),
        }
    }

    fn names(events: &[DrillEvent]) -> Vec<String> {
        events.iter().map(DrillEvent::name).collect()
    }

    #[test]
    fn progress_accumulates_by_hardness_and_speed() {
        let contract = contract(&[LayerKind::Normal, LayerKind::Normal], &[]);
        let mut session = DrillSession::start(
            contract,
            &InventoryConfig {
                drill_speed_multiplier: 1.5,
                ..inventory(1, &[])
            },
            SessionConfig::default(),
            1,
        );
        let mut ledger = PlayerLedger::new();
        let mut events = Vec::new();
        session.tick(1_000, &mut ledger, &mut events);
        assert!((session.progress() - 0.5).abs() < 1e-9);
        assert!(events.is_empty());
    }

    #[test]
    fn breaking_normal_layers_pays_increasing_oil() {
        let contract = contract(&[LayerKind::Normal; 3], &[]);
        let mut session =
            DrillSession::start(contract, &inventory(1, &[]), SessionConfig::default(), 1);
        let mut ledger = PlayerLedger::new();
        let mut events = Vec::new();

        assert_eq!(session.tick(3_000, &mut ledger, &mut events), DrillPhase::LayerBroken);
        assert_eq!(session.layer_index(), 1);
        assert!(session.progress().abs() < f64::EPSILON);
        assert_eq!(ledger.oil, 50);

        session.tick(3_000, &mut ledger, &mut events);
        assert_eq!(ledger.oil, 150);
        assert_eq!(session.tick(3_000, &mut ledger, &mut events), DrillPhase::ContractComplete);
        assert_eq!(ledger.oil, 150 + 150 + 1_500);
        assert_eq!(ledger.recognition, 10);
        assert!(ledger.is_completed("Nigeria"));
        assert_eq!(
            names(&events),
            vec!["layer-broken", "layer-broken", "layer-broken", "contract-complete"]
        );
    }

    #[test]
    fn at_most_one_break_per_tick() {
        let contract = contract(&[LayerKind::Normal; 3], &[]);
        let mut session =
            DrillSession::start(contract, &inventory(1, &[]), SessionConfig::default(), 1);
        let mut ledger = PlayerLedger::new();
        let mut events = Vec::new();
        session.tick(60_000, &mut ledger, &mut events);
        assert_eq!(session.layer_index(), 1);
    }

    #[test]
    fn unprotected_danger_costs_a_life_and_still_triggers_malus() {
        let contract = contract(
            &[LayerKind::Normal, LayerKind::Danger(HazardKind::Acid), LayerKind::Normal],
            &[HazardKind::Acid],
        );
        let mut session =
            DrillSession::start(contract, &inventory(1, &[]), SessionConfig::default(), 1);
        let mut ledger = PlayerLedger::new();
        let mut events = Vec::new();
        session.break_layer(&mut ledger, &mut events);
        assert_eq!(session.lives(), 2);
        assert_eq!(
            names(&events),
            vec!["damage-taken", "malus-triggered:acid", "layer-broken"]
        );
        assert!((session.effective_speed() - 10.0).abs() < f64::EPSILON);

        events.clear();
        session.break_layer(&mut ledger, &mut events);
        assert_eq!(ledger.oil, 50 + 200);
        assert!((session.effective_speed() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn matching_mask_prevents_damage() {
        let contract = contract(
            &[LayerKind::Normal, LayerKind::Danger(HazardKind::Toxic)],
            &[HazardKind::Toxic],
        );
        let mut session = DrillSession::start(
            contract,
            &inventory(1, &[HazardKind::Toxic]),
            SessionConfig::default(),
            1,
        );
        let mut ledger = PlayerLedger::new();
        let mut events = Vec::new();
        session.equip_for(HazardKind::Toxic, &mut events).unwrap();
        session.break_layer(&mut ledger, &mut events);
        assert_eq!(session.lives(), 3);
        assert!(!session.malus().clouds().is_empty());
        assert!(!session.rack().has_equipped(HazardKind::Toxic), "masks eject after each break");
    }

    #[test]
    fn losing_the_last_life_fires_the_malus_then_fails() {
        let contract = contract(
            &[LayerKind::Normal, LayerKind::Danger(HazardKind::Toxic)],
            &[HazardKind::Toxic],
        );
        let config = SessionConfig {
            starting_lives: 1,
            ..SessionConfig::default()
        };
        let mut session = DrillSession::start(contract, &inventory(1, &[]), config, 1);
        let mut ledger = PlayerLedger {
            recognition: 50,
            ..PlayerLedger::default()
        };
        let mut events = Vec::new();
        session.break_layer(&mut ledger, &mut events);
        assert_eq!(session.phase(), DrillPhase::ContractFailed);
        assert_eq!(ledger.recognition, 30);
        assert_eq!(ledger.oil, 0);
        assert_eq!(session.layer_index(), 0);
        assert_eq!(
            names(&events),
            vec![
                "damage-taken",
                "malus-triggered:toxic",
                "clouds-spawned",
                "malus-expired:toxic",
                "contract-failed",
            ]
        );
        assert!(session.malus().clouds().is_empty());

        events.clear();
        session.break_layer(&mut ledger, &mut events);
        session.tick(10, &mut ledger, &mut events);
        assert!(events.is_empty());
    }

    #[test]
    fn terminal_state_returns_to_map_after_delay() {
        let contract = contract(&[LayerKind::Normal], &[]);
        let mut session =
            DrillSession::start(contract, &inventory(1, &[]), SessionConfig::default(), 1);
        let mut ledger = PlayerLedger::new();
        let mut events = Vec::new();
        session.tick(3_000, &mut ledger, &mut events);
        assert_eq!(session.phase(), DrillPhase::ContractComplete);
        events.clear();

        session.tick(2_999, &mut ledger, &mut events);
        assert!(!session.returned_to_map());
        session.tick(1, &mut ledger, &mut events);
        assert!(session.returned_to_map());
        assert_eq!(names(&events), vec!["return-to-map"]);
    }

    #[test]
    fn abandon_cancels_everything_without_rewards() {
        let contract = contract(
            &[LayerKind::Normal, LayerKind::Danger(HazardKind::BioHazard), LayerKind::Normal],
            &[HazardKind::BioHazard],
        );
        let mut session =
            DrillSession::start(contract, &inventory(1, &[]), SessionConfig::default(), 1);
        let mut ledger = PlayerLedger::new();
        let mut events = Vec::new();
        session.break_layer(&mut ledger, &mut events);
        assert!(!session.rack().interaction_enabled());
        let oil_before = ledger.oil;

        assert!(session.abandon(&mut events));
        assert_eq!(session.phase(), DrillPhase::Abandoned);
        assert!(session.timers().is_empty());
        assert!(session.rack().interaction_enabled());
        assert!(!session.abandon(&mut events));

        events.clear();
        session.tick(10_000, &mut ledger, &mut events);
        assert!(events.is_empty());
        assert_eq!(ledger.oil, oil_before);
        assert_eq!(ledger.recognition, 0);
    }

    #[test]
    fn diagnostic_contract_walks_every_malus() {
        let contract = ContractGenerator::diagnostic(1);
        let mut session = DrillSession::start(
            contract,
            &InventoryConfig {
                drill_speed_multiplier: 1.0,
                mask_slot_capacity: 4,
                owned_hazards: HazardKind::ALL.to_vec(),
            },
            SessionConfig {
                starting_lives: 10,
                ..SessionConfig::default()
            },
            5,
        );
        let mut ledger = PlayerLedger::new();
        let mut events = Vec::new();
        while !session.is_terminal() {
            session.break_layer(&mut ledger, &mut events);
        }
        assert_eq!(session.phase(), DrillPhase::ContractComplete);
        assert_eq!(session.lives(), 4);
        let triggered: Vec<String> = names(&events)
            .into_iter()
            .filter(|name| name.starts_with("malus-triggered"))
            .collect();
        assert_eq!(triggered.len(), 6);
        assert!(session.malus().active().is_empty());
    }

    #[test]
    fn rejected_drop_reports_the_return() {
        let contract = contract(&[LayerKind::Normal; 2], &[HazardKind::Toxic]);
        let mut session = DrillSession::start(
            contract,
            &inventory(1, &[HazardKind::Toxic]),
            SessionConfig::default(),
            1,
        );
        let mut events = Vec::new();
        session.equip(MaskId(0), 0, &mut events).unwrap();
        session.begin_drag(MaskId(0)).unwrap();
        let outcome = session
            .drop_at(MaskId(0), ViewPoint::new(0.5, 0.1), &mut events)
            .unwrap();
        assert_eq!(outcome, DropOutcome::Returned);
        assert_eq!(names(&events), vec!["mask-placed", "mask-returned"]);
    }
}
