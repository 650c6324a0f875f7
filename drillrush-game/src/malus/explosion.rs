use rand::Rng;
use std::collections::BTreeSet;

use super::{MalusContext, MalusEffect, expire};
use crate::events::DrillEvent;
use crate::geometry::ViewPoint;
use crate::hazards::HazardKind;
use crate::masks::MaskId;

/// Outcome of moving a mask's inventory slot by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotMove {
    /// The slot moved but is still away from home.
    Moved,
    /// The slot snapped back home.
    Repaired,
    /// The mask's slot was not scattered.
    NotScattered,
}

/// Explosion: every mask's inventory slot is blown somewhere across the view.
#[derive(Debug, Clone, Default)]
pub struct ScatteredSlots {
    scattered: BTreeSet<MaskId>,
}

impl ScatteredSlots {
    pub fn scattered(&self) -> impl Iterator<Item = MaskId> + '_ {
        self.scattered.iter().copied()
    }

    pub fn move_slot(
        &mut self,
        mask: MaskId,
        point: ViewPoint,
        ctx: &mut MalusContext<'_>,
    ) -> SlotMove {
        if !self.scattered.contains(&mask) {
            return SlotMove::NotScattered;
        }
        let Some(home) = ctx.rack.mask(mask).map(|mask| mask.home) else {
            return SlotMove::NotScattered;
        };
        if point.distance(home) > ctx.config.repair_radius {
            ctx.rack.set_anchor(mask, point.clamped());
            return SlotMove::Moved;
        }
        ctx.rack.set_anchor(mask, home);
        self.scattered.remove(&mask);
        ctx.events.emit(DrillEvent::SlotRepaired { mask });
        expire(ctx, HazardKind::Explosion, self.scattered.is_empty());
        SlotMove::Repaired
    }
}

impl MalusEffect for ScatteredSlots {
    fn kind(&self) -> HazardKind {
        HazardKind::Explosion
    }

    fn apply(&mut self, ctx: &mut MalusContext<'_>) {
        let ids: Vec<MaskId> = ctx.rack.masks().iter().map(|mask| mask.id).collect();
        for id in &ids {
            let anchor = ViewPoint::new(ctx.rng.gen_range(0.05..0.95), ctx.rng.gen_range(0.1..0.9));
            ctx.rack.set_anchor(*id, anchor);
            self.scattered.insert(*id);
        }
        ctx.events.emit(DrillEvent::SlotsScattered { count: ids.len() });
    }

    fn revert(&mut self, ctx: &mut MalusContext<'_>) {
        let was_active = self.is_active();
        for id in std::mem::take(&mut self.scattered) {
            if let Some(home) = ctx.rack.mask(id).map(|mask| mask.home) {
                ctx.rack.set_anchor(id, home);
            }
        }
        expire(ctx, HazardKind::Explosion, was_active);
    }

    fn is_active(&self) -> bool {
        !self.scattered.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::malus::test_support::Harness;

    #[test]
    fn scatter_moves_every_anchor() {
        let mut harness = Harness::new(1, &[HazardKind::Toxic, HazardKind::BioHazard]);
        let mut explosion = ScatteredSlots::default();
        explosion.apply(&mut harness.ctx());
        assert_eq!(explosion.scattered().count(), 2);
        for mask in harness.rack.masks() {
            assert_ne!(mask.anchor, mask.home);
            assert_eq!(mask.position, mask.anchor);
        }
        assert_eq!(harness.names(), vec!["slots-scattered"]);
    }

    #[test]
    fn placed_masks_stay_seated_while_anchor_moves() {
        let mut harness = Harness::new(1, &[HazardKind::Toxic]);
        harness.rack.equip(MaskId(0), 0).unwrap();
        let seated = harness.rack.mask(MaskId(0)).unwrap().position;
        let mut explosion = ScatteredSlots::default();
        explosion.apply(&mut harness.ctx());
        let mask = harness.rack.mask(MaskId(0)).unwrap();
        assert_eq!(mask.position, seated);
        assert!(mask.is_placed());
    }

    #[test]
    fn moving_near_home_repairs_the_slot() {
        let mut harness = Harness::new(1, &[HazardKind::Toxic]);
        let mut explosion = ScatteredSlots::default();
        explosion.apply(&mut harness.ctx());
        let home = harness.rack.mask(MaskId(0)).unwrap().home;

        let far = ViewPoint::new(home.x, home.y - 0.3);
        assert_eq!(
            explosion.move_slot(MaskId(0), far, &mut harness.ctx()),
            SlotMove::Moved
        );
        assert!(explosion.is_active());

        let near = ViewPoint::new(home.x + 0.03, home.y);
        assert_eq!(
            explosion.move_slot(MaskId(0), near, &mut harness.ctx()),
            SlotMove::Repaired
        );
        assert!(!explosion.is_active());
        assert_eq!(harness.rack.mask(MaskId(0)).unwrap().anchor, home);
        assert_eq!(
            harness.names(),
            vec!["slots-scattered", "slot-repaired", "malus-expired:explosion"]
        );
        assert_eq!(
            explosion.move_slot(MaskId(0), near, &mut harness.ctx()),
            SlotMove::NotScattered
        );
    }

    #[test]
    fn revert_restores_homes() {
        let mut harness = Harness::new(2, &[HazardKind::Toxic, HazardKind::Acid]);
        let mut explosion = ScatteredSlots::default();
        explosion.apply(&mut harness.ctx());
        explosion.revert(&mut harness.ctx());
        assert!(
            harness
                .rack
                .masks()
                .iter()
                .all(|mask| mask.anchor == mask.home)
        );
        explosion.revert(&mut harness.ctx());
        assert_eq!(
            harness.names(),
            vec!["slots-scattered", "malus-expired:explosion"]
        );
    }
}
