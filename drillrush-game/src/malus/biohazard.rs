use super::{MalusContext, MalusEffect, expire};
use crate::events::DrillEvent;
use crate::hazards::HazardKind;
use crate::timers::{DeferredAction, TimerHandle};

/// Bio-hazard: masks cannot be picked up until the session clock runs the quarantine out.
#[derive(Debug, Clone, Default)]
pub struct Quarantine {
    timer: Option<TimerHandle>,
}

impl Quarantine {
    /// Lift the quarantine if `handle` is the live timer.
    pub fn restore(&mut self, handle: TimerHandle, ctx: &mut MalusContext<'_>) -> bool {
        if self.timer != Some(handle) {
            return false;
        }
        self.timer = None;
        ctx.rack.set_interaction_enabled(true);
        ctx.events.emit(DrillEvent::MaskInteractionRestored);
        expire(ctx, HazardKind::BioHazard, true);
        true
    }
}

impl MalusEffect for Quarantine {
    fn kind(&self) -> HazardKind {
        HazardKind::BioHazard
    }

    fn apply(&mut self, ctx: &mut MalusContext<'_>) {
        if let Some(previous) = self.timer.take() {
            ctx.timers.cancel(previous);
        }
        ctx.rack.set_interaction_enabled(false);
        let due = ctx.now_ms.saturating_add(ctx.config.biohazard_ms);
        self.timer = Some(ctx.timers.schedule(due, DeferredAction::RestoreMaskInteraction));
    }

    fn revert(&mut self, ctx: &mut MalusContext<'_>) {
        let was_active = self.is_active();
        if let Some(handle) = self.timer.take() {
            ctx.timers.cancel(handle);
        }
        ctx.rack.set_interaction_enabled(true);
        expire(ctx, HazardKind::BioHazard, was_active);
    }

    fn is_active(&self) -> bool {
        self.timer.is_some()
    }
}
