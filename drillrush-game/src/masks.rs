//! Mask rack: the player's protective masks, the equip slots and the drag lifecycle.
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::geometry::{ViewPoint, inventory_home, slot_center};
use crate::hazards::HazardKind;
use crate::inventory::InventoryConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaskId(pub u16);

impl fmt::Display for MaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mask#{}", self.0)
    }
}

/// Reasons a drag or drop is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("{0} is not part of this rack")]
    UnknownMask(MaskId),
    #[error("no {0} mask in this rack")]
    NoMaskFor(HazardKind),
    #[error("slot {slot} is out of range (capacity {capacity})")]
    SlotOutOfRange { slot: usize, capacity: usize },
    #[error("{0} is locked by radiation")]
    Locked(MaskId),
    #[error("mask interaction is disabled")]
    InteractionDisabled,
    #[error("{0} is not being dragged")]
    NotDragging(MaskId),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mask {
    pub id: MaskId,
    pub hazard: HazardKind,
    pub slot: Option<usize>,
    /// Where the renderer should draw the mask right now.
    pub position: ViewPoint,
    /// Original inventory position.
    pub home: ViewPoint,
    /// Current inventory position; differs from `home` while scattered.
    pub anchor: ViewPoint,
    pub locked: bool,
    pub dragging: bool,
}

impl Mask {
    #[must_use]
    pub const fn is_placed(&self) -> bool {
        self.slot.is_some()
    }
}

/// Result of a successful drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// The mask now occupies `slot`; any previous occupant went back to its anchor.
    Placed {
        slot: usize,
        displaced: Option<MaskId>,
    },
    /// Dropped outside every slot; the mask went back to its anchor.
    Returned,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskRack {
    masks: Vec<Mask>,
    slots: Vec<Option<MaskId>>,
    interaction_enabled: bool,
}

impl MaskRack {
    /// Instantiate one mask per hazard that is both briefed and owned, in briefing order.
    #[must_use]
    pub fn new(known: &[HazardKind], inventory: &InventoryConfig) -> Self {
        let kinds: Vec<HazardKind> = known
            .iter()
            .copied()
            .filter(|kind| inventory.owns(*kind))
            .collect();
        let count = kinds.len();
        let masks = kinds
            .into_iter()
            .zip(0_u16..)
            .enumerate()
            .map(|(index, (hazard, raw_id))| {
                let home = inventory_home(index, count);
                Mask {
                    id: MaskId(raw_id),
                    hazard,
                    slot: None,
                    position: home,
                    home,
                    anchor: home,
                    locked: false,
                    dragging: false,
                }
            })
            .collect();
        Self {
            masks,
            slots: vec![None; inventory.mask_slot_capacity],
            interaction_enabled: true,
        }
    }

    #[must_use]
    pub fn masks(&self) -> &[Mask] {
        &self.masks
    }

    #[must_use]
    pub fn mask(&self, id: MaskId) -> Option<&Mask> {
        self.masks.iter().find(|mask| mask.id == id)
    }

    fn mask_mut(&mut self, id: MaskId) -> Result<&mut Mask, PlacementError> {
        self.masks
            .iter_mut()
            .find(|mask| mask.id == id)
            .ok_or(PlacementError::UnknownMask(id))
    }

    #[must_use]
    pub fn mask_for(&self, hazard: HazardKind) -> Option<&Mask> {
        self.masks.iter().find(|mask| mask.hazard == hazard)
    }

    #[must_use]
    pub fn slots(&self) -> &[Option<MaskId>] {
        &self.slots
    }

    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn mask_in_slot(&self, slot: usize) -> Option<MaskId> {
        self.slots.get(slot).copied().flatten()
    }

    /// Equipped masks as `(slot, mask)` pairs in slot order.
    pub fn equipped(&self) -> impl Iterator<Item = (usize, &Mask)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, id)| id.and_then(|id| self.mask(id)).map(|mask| (slot, mask)))
    }

    /// Whether a mask matching `hazard` sits in a slot.
    #[must_use]
    pub fn has_equipped(&self, hazard: HazardKind) -> bool {
        self.equipped().any(|(_, mask)| mask.hazard == hazard)
    }

    #[must_use]
    pub const fn interaction_enabled(&self) -> bool {
        self.interaction_enabled
    }

    pub const fn set_interaction_enabled(&mut self, enabled: bool) {
        self.interaction_enabled = enabled;
    }

    #[must_use]
    pub fn locked_mask(&self) -> Option<MaskId> {
        self.masks.iter().find(|mask| mask.locked).map(|mask| mask.id)
    }

    /// Pure accept/reject check for dropping `id` into `slot`.
    ///
    /// # Errors
    ///
    /// Rejects unknown masks, out-of-range slots and locked masks.
    pub fn validate_placement(&self, id: MaskId, slot: usize) -> Result<(), PlacementError> {
        let mask = self.mask(id).ok_or(PlacementError::UnknownMask(id))?;
        if slot >= self.slots.len() {
            return Err(PlacementError::SlotOutOfRange {
                slot,
                capacity: self.slots.len(),
            });
        }
        if mask.locked {
            return Err(PlacementError::Locked(id));
        }
        Ok(())
    }

    /// Pick a mask up.
    ///
    /// # Errors
    ///
    /// Fails for unknown or locked masks, or while interaction is disabled.
    pub fn begin_drag(&mut self, id: MaskId) -> Result<(), PlacementError> {
        if !self.interaction_enabled {
            return Err(PlacementError::InteractionDisabled);
        }
        let mask = self.mask_mut(id)?;
        if mask.locked {
            return Err(PlacementError::Locked(id));
        }
        mask.dragging = true;
        Ok(())
    }

    /// Move a dragged mask.
    ///
    /// # Errors
    ///
    /// Fails if the mask is unknown or not being dragged.
    pub fn drag_to(&mut self, id: MaskId, point: ViewPoint) -> Result<(), PlacementError> {
        let mask = self.mask_mut(id)?;
        if !mask.dragging {
            return Err(PlacementError::NotDragging(id));
        }
        mask.position = point.clamped();
        Ok(())
    }

    /// Drop a dragged mask onto `slot`, or back to the inventory when `None`.
    ///
    /// A rejected drop still ends the drag and returns the mask to its anchor.
    ///
    /// # Errors
    ///
    /// Returns the rejection reason from [`Self::validate_placement`].
    pub fn end_drag(
        &mut self,
        id: MaskId,
        slot: Option<usize>,
    ) -> Result<DropOutcome, PlacementError> {
        let mask = self.mask_mut(id)?;
        if !mask.dragging {
            return Err(PlacementError::NotDragging(id));
        }
        mask.dragging = false;
        let previous = mask.slot;

        let Some(target) = slot else {
            self.return_to_inventory(id);
            return Ok(DropOutcome::Returned);
        };
        if let Err(err) = self.validate_placement(id, target) {
            self.return_to_inventory(id);
            return Err(err);
        }
        if previous == Some(target) {
            self.seat(id, target);
            return Ok(DropOutcome::Placed {
                slot: target,
                displaced: None,
            });
        }

        let displaced = self.slots[target].filter(|occupant| *occupant != id);
        if let Some(occupant) = displaced {
            self.return_to_inventory(occupant);
        }
        if let Some(old) = previous {
            self.slots[old] = None;
        }
        self.seat(id, target);
        Ok(DropOutcome::Placed {
            slot: target,
            displaced,
        })
    }

    fn seat(&mut self, id: MaskId, slot: usize) {
        let capacity = self.slots.len();
        self.slots[slot] = Some(id);
        if let Ok(mask) = self.mask_mut(id) {
            mask.slot = Some(slot);
            mask.position = slot_center(slot, capacity);
        }
    }

    /// Pick up and drop in one step.
    ///
    /// # Errors
    ///
    /// Fails like [`Self::begin_drag`] followed by [`Self::end_drag`].
    pub fn equip(&mut self, id: MaskId, slot: usize) -> Result<DropOutcome, PlacementError> {
        self.begin_drag(id)?;
        self.end_drag(id, Some(slot))
    }

    /// Send a mask back to its anchor, freeing its slot. Returns whether it was placed.
    pub fn return_to_inventory(&mut self, id: MaskId) -> bool {
        let Ok(mask) = self.mask_mut(id) else {
            return false;
        };
        let previous = mask.slot.take();
        if !mask.dragging {
            mask.position = mask.anchor;
        }
        if let Some(slot) = previous {
            self.slots[slot] = None;
        }
        previous.is_some()
    }

    /// Return every placed mask that is not mid-drag. Returns the masks moved.
    pub fn eject_all(&mut self) -> Vec<MaskId> {
        let placed: Vec<MaskId> = self
            .masks
            .iter()
            .filter(|mask| mask.is_placed() && !mask.dragging)
            .map(|mask| mask.id)
            .collect();
        for id in &placed {
            self.return_to_inventory(*id);
        }
        placed
    }

    /// Move a mask's inventory anchor; idle unplaced masks follow it.
    pub fn set_anchor(&mut self, id: MaskId, anchor: ViewPoint) -> bool {
        let Ok(mask) = self.mask_mut(id) else {
            return false;
        };
        mask.anchor = anchor;
        if !mask.is_placed() && !mask.dragging {
            mask.position = anchor;
        }
        true
    }

    pub fn set_locked(&mut self, id: MaskId, locked: bool) -> bool {
        self.mask_mut(id).map(|mask| mask.locked = locked).is_ok()
    }
}
