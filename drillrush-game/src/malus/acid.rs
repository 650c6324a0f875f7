use super::{MalusContext, MalusEffect, expire};
use crate::config::MalusConfig;
use crate::hazards::HazardKind;

/// Acid: the bit eats through rock far faster for a couple of layers.
#[derive(Debug, Clone, Default)]
pub struct AcidDrill {
    remaining: u8,
}

impl AcidDrill {
    #[must_use]
    pub const fn remaining(&self) -> u8 {
        self.remaining
    }

    #[must_use]
    pub fn speed_multiplier(&self, config: &MalusConfig) -> f64 {
        if self.is_active() {
            config.acid_speed_multiplier
        } else {
            1.0
        }
    }
}

impl MalusEffect for AcidDrill {
    fn kind(&self) -> HazardKind {
        HazardKind::Acid
    }

    fn apply(&mut self, ctx: &mut MalusContext<'_>) {
        self.remaining = ctx.config.acid_layers;
    }

    fn on_layer_break(&mut self, ctx: &mut MalusContext<'_>) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        let expired = self.remaining == 0;
        expire(ctx, HazardKind::Acid, expired);
        expired
    }

    fn revert(&mut self, ctx: &mut MalusContext<'_>) {
        let was_active = self.is_active();
        self.remaining = 0;
        expire(ctx, HazardKind::Acid, was_active);
    }

    fn is_active(&self) -> bool {
        self.remaining > 0
    }
}
