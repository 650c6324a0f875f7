use super::{MalusContext, MalusEffect};
use crate::events::DrillEvent;
use crate::hazards::HazardKind;

/// Flammable: every mask is scorched. Purely cosmetic, nothing lingers.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharredMasks;

impl MalusEffect for CharredMasks {
    fn kind(&self) -> HazardKind {
        HazardKind::Flammable
    }

    fn apply(&mut self, ctx: &mut MalusContext<'_>) {
        let masks = ctx.rack.masks().iter().map(|mask| mask.id).collect();
        ctx.events.emit(DrillEvent::MasksCharred { masks });
    }

    fn revert(&mut self, _ctx: &mut MalusContext<'_>) {}

    fn is_active(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::malus::test_support::Harness;
    use crate::masks::MaskId;

    #[test]
    fn chars_every_mask_without_moving_any() {
        let mut harness = Harness::new(1, &[HazardKind::Toxic, HazardKind::Flammable]);
        harness.rack.equip(MaskId(1), 0).unwrap();
        let before = harness.rack.clone();
        CharredMasks.apply(&mut harness.ctx());
        assert_eq!(harness.rack, before);
        assert_eq!(
            harness.events,
            vec![DrillEvent::MasksCharred {
                masks: vec![MaskId(0), MaskId(1)]
            }]
        );
    }
}
