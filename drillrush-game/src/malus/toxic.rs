use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{MalusContext, MalusEffect, expire};
use crate::constants::{TOXIC_CLOUD_RADIUS_MAX, TOXIC_CLOUD_RADIUS_MIN};
use crate::events::DrillEvent;
use crate::geometry::ViewPoint;
use crate::hazards::HazardKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CloudId(pub u32);

/// A circular patch of the view rendered with inverted colors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToxicCloud {
    pub id: CloudId,
    pub center: ViewPoint,
    pub radius: f32,
}

impl ToxicCloud {
    #[must_use]
    pub fn contains(&self, point: ViewPoint) -> bool {
        self.center.distance(point) <= self.radius
    }
}

/// Toxic: clouds linger until the player wipes each one away.
#[derive(Debug, Clone, Default)]
pub struct ToxicClouds {
    clouds: Vec<ToxicCloud>,
    next_id: u32,
}

impl ToxicClouds {
    #[must_use]
    pub fn clouds(&self) -> &[ToxicCloud] {
        &self.clouds
    }

    #[must_use]
    pub fn inverts(&self, point: ViewPoint) -> bool {
        self.clouds.iter().any(|cloud| cloud.contains(point))
    }

    pub fn dismiss(&mut self, id: CloudId, ctx: &mut MalusContext<'_>) -> bool {
        let Some(at) = self.clouds.iter().position(|cloud| cloud.id == id) else {
            return false;
        };
        self.clouds.remove(at);
        ctx.events.emit(DrillEvent::CloudDismissed { cloud: id });
        expire(ctx, HazardKind::Toxic, self.clouds.is_empty());
        true
    }
}

impl MalusEffect for ToxicClouds {
    fn kind(&self) -> HazardKind {
        HazardKind::Toxic
    }

    fn apply(&mut self, ctx: &mut MalusContext<'_>) {
        let count = ctx
            .rng
            .gen_range(ctx.config.toxic_clouds_min..=ctx.config.toxic_clouds_max);
        for _ in 0..count {
            let center =
                ViewPoint::new(ctx.rng.gen_range(0.05..0.95), ctx.rng.gen_range(0.05..0.7));
            let radius = ctx
                .rng
                .gen_range(TOXIC_CLOUD_RADIUS_MIN..TOXIC_CLOUD_RADIUS_MAX);
            self.clouds.push(ToxicCloud {
                id: CloudId(self.next_id),
                center,
                radius,
            });
            self.next_id = self.next_id.wrapping_add(1);
        }
        ctx.events.emit(DrillEvent::CloudsSpawned {
            count: usize::from(count),
        });
    }

    fn revert(&mut self, ctx: &mut MalusContext<'_>) {
        let was_active = self.is_active();
        self.clouds.clear();
        expire(ctx, HazardKind::Toxic, was_active);
    }

    fn is_active(&self) -> bool {
        !self.clouds.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::malus::test_support::Harness;

    #[test]
    fn spawns_clouds_within_bounds() {
        let mut harness = Harness::new(1, &[HazardKind::Toxic]);
        let mut toxic = ToxicClouds::default();
        toxic.apply(&mut harness.ctx());
        let count = toxic.clouds().len();
        assert!((6..=10).contains(&count));
        for cloud in toxic.clouds() {
            assert!((0.08..0.18).contains(&cloud.radius));
            assert!(toxic.inverts(cloud.center));
        }
        assert_eq!(harness.events, vec![DrillEvent::CloudsSpawned { count }]);
    }

    #[test]
    fn retrigger_adds_clouds_with_fresh_ids() {
        let mut harness = Harness::new(1, &[HazardKind::Toxic]);
        let mut toxic = ToxicClouds::default();
        toxic.apply(&mut harness.ctx());
        let first = toxic.clouds().len();
        toxic.apply(&mut harness.ctx());
        assert!(toxic.clouds().len() > first);
        let mut ids: Vec<_> = toxic.clouds().iter().map(|cloud| cloud.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), toxic.clouds().len());
    }

    #[test]
    fn persists_until_every_cloud_is_dismissed() {
        let mut harness = Harness::new(1, &[HazardKind::Toxic]);
        let mut toxic = ToxicClouds::default();
        toxic.apply(&mut harness.ctx());
        harness.events.clear();

        assert!(!toxic.dismiss(CloudId(999), &mut harness.ctx()));
        let ids: Vec<_> = toxic.clouds().iter().map(|cloud| cloud.id).collect();
        for id in &ids {
            assert!(toxic.is_active());
            assert!(toxic.dismiss(*id, &mut harness.ctx()));
        }
        assert!(!toxic.is_active());
        assert_eq!(
            harness.names().last().map(String::as_str),
            Some("malus-expired:toxic")
        );
        assert_eq!(harness.events.len(), ids.len() + 1);

        toxic.revert(&mut harness.ctx());
        assert_eq!(harness.events.len(), ids.len() + 1, "revert is idempotent");
    }

    #[test]
    fn points_outside_clouds_are_not_inverted() {
        let toxic = ToxicClouds {
            clouds: vec![ToxicCloud {
                id: CloudId(0),
                center: ViewPoint::new(0.5, 0.5),
                radius: 0.1,
            }],
            next_id: 1,
        };
        assert!(toxic.inverts(ViewPoint::new(0.55, 0.5)));
        assert!(!toxic.inverts(ViewPoint::new(0.7, 0.5)));
    }
}
