use super::{MalusContext, MalusEffect, expire};
use crate::events::DrillEvent;
use crate::hazards::HazardKind;
use crate::masks::MaskId;

/// Radiation: one equipped mask is thrown off and locked for a number of layers.
#[derive(Debug, Clone, Default)]
pub struct RadiationLock {
    remaining: u8,
    locked: Option<MaskId>,
}

impl RadiationLock {
    #[must_use]
    pub const fn remaining(&self) -> u8 {
        self.remaining
    }

    #[must_use]
    pub const fn locked(&self) -> Option<MaskId> {
        self.locked
    }

    /// The radiation mask if equipped, otherwise the mask in the lowest slot.
    fn pick_target(ctx: &MalusContext<'_>) -> Option<MaskId> {
        let mut lowest = None;
        for (_, mask) in ctx.rack.equipped() {
            if mask.hazard == HazardKind::Radiation {
                return Some(mask.id);
            }
            lowest.get_or_insert(mask.id);
        }
        lowest
    }

    fn release(&mut self, ctx: &mut MalusContext<'_>) {
        if let Some(id) = self.locked.take() {
            ctx.rack.set_locked(id, false);
        }
    }
}

impl MalusEffect for RadiationLock {
    fn kind(&self) -> HazardKind {
        HazardKind::Radiation
    }

    fn apply(&mut self, ctx: &mut MalusContext<'_>) {
        self.remaining = ctx.config.radiation_layers;
        let Some(target) = Self::pick_target(ctx) else {
            return;
        };
        if self.locked != Some(target) {
            self.release(ctx);
        }
        ctx.rack.set_locked(target, true);
        self.locked = Some(target);
        let dragging = ctx.rack.mask(target).is_some_and(|mask| mask.dragging);
        if !dragging {
            ctx.rack.return_to_inventory(target);
        }
        ctx.events.emit(DrillEvent::MaskIrradiated { mask: target });
    }

    fn on_layer_break(&mut self, ctx: &mut MalusContext<'_>) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        if self.remaining > 0 {
            return false;
        }
        self.release(ctx);
        expire(ctx, HazardKind::Radiation, true);
        true
    }

    fn revert(&mut self, ctx: &mut MalusContext<'_>) {
        let was_active = self.is_active();
        self.remaining = 0;
        self.release(ctx);
        expire(ctx, HazardKind::Radiation, was_active);
    }

    fn is_active(&self) -> bool {
        self.remaining > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::malus::test_support::Harness;
    use crate::masks::PlacementError;

    const KINDS: [HazardKind; 3] = [
        HazardKind::Toxic,
        HazardKind::BioHazard,
        HazardKind::Radiation,
    ];

    #[test]
    fn prefers_the_radiation_mask() {
        let mut harness = Harness::new(3, &KINDS);
        harness.rack.equip(MaskId(0), 0).unwrap();
        harness.rack.equip(MaskId(2), 2).unwrap();
        let mut radiation = RadiationLock::default();
        radiation.apply(&mut harness.ctx());
        assert_eq!(radiation.locked(), Some(MaskId(2)));
        assert_eq!(harness.rack.slots(), &[Some(MaskId(0)), None, None]);
        assert_eq!(
            harness.rack.validate_placement(MaskId(2), 1),
            Err(PlacementError::Locked(MaskId(2)))
        );
    }

    #[test]
    fn falls_back_to_lowest_slot() {
        let mut harness = Harness::new(3, &KINDS);
        harness.rack.equip(MaskId(1), 1).unwrap();
        harness.rack.equip(MaskId(0), 2).unwrap();
        let mut radiation = RadiationLock::default();
        radiation.apply(&mut harness.ctx());
        assert_eq!(radiation.locked(), Some(MaskId(1)));
        assert_eq!(harness.rack.mask_in_slot(2), Some(MaskId(0)));
    }

    #[test]
    fn expires_after_configured_breaks() {
        let mut harness = Harness::new(1, &KINDS);
        harness.rack.equip(MaskId(0), 0).unwrap();
        let mut radiation = RadiationLock::default();
        radiation.apply(&mut harness.ctx());
        for _ in 0..4 {
            assert!(!radiation.on_layer_break(&mut harness.ctx()));
            assert_eq!(harness.rack.locked_mask(), Some(MaskId(0)));
        }
        assert!(radiation.on_layer_break(&mut harness.ctx()));
        assert!(harness.rack.locked_mask().is_none());
        assert!(!radiation.on_layer_break(&mut harness.ctx()));
    }

    #[test]
    fn retrigger_resets_counter_and_hands_lock_over() {
        let mut harness = Harness::new(2, &KINDS);
        harness.rack.equip(MaskId(0), 0).unwrap();
        let mut radiation = RadiationLock::default();
        radiation.apply(&mut harness.ctx());
        radiation.on_layer_break(&mut harness.ctx());
        assert_eq!(radiation.remaining(), 4);

        harness.rack.equip(MaskId(1), 1).unwrap();
        radiation.apply(&mut harness.ctx());
        assert_eq!(radiation.remaining(), 5);
        assert_eq!(radiation.locked(), Some(MaskId(1)));
        assert!(!harness.rack.mask(MaskId(0)).unwrap().locked);
    }

    #[test]
    fn retrigger_without_equipped_mask_keeps_existing_lock() {
        let mut harness = Harness::new(1, &KINDS);
        harness.rack.equip(MaskId(0), 0).unwrap();
        let mut radiation = RadiationLock::default();
        radiation.apply(&mut harness.ctx());
        radiation.on_layer_break(&mut harness.ctx());
        radiation.apply(&mut harness.ctx());
        assert_eq!(radiation.remaining(), 5);
        assert_eq!(radiation.locked(), Some(MaskId(0)));
    }

    #[test]
    fn dragged_mask_is_locked_in_place() {
        let mut harness = Harness::new(1, &KINDS);
        harness.rack.equip(MaskId(0), 0).unwrap();
        harness.rack.begin_drag(MaskId(0)).unwrap();
        let mut radiation = RadiationLock::default();
        radiation.apply(&mut harness.ctx());
        let mask = harness.rack.mask(MaskId(0)).unwrap();
        assert!(mask.locked);
        assert!(mask.dragging);
        assert_eq!(
            harness.rack.end_drag(MaskId(0), Some(0)),
            Err(PlacementError::Locked(MaskId(0)))
        );
        assert_eq!(harness.rack.slots(), &[None]);
    }
}
