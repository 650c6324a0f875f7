//! Normalized view-space geometry for the mask rack and malus overlays.
//!
//! Coordinates run from `(0, 0)` at the top-left of the drilling view to
//! `(1, 1)` at the bottom-right. The renderer scales them to pixels.
use serde::{Deserialize, Serialize};

use crate::constants::{INVENTORY_ROW_Y, RACK_SPACING, SLOT_HALF_EXTENT, SLOT_ROW_Y};
use crate::numbers::usize_to_f64;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ViewPoint {
    pub x: f32,
    pub y: f32,
}

impl ViewPoint {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Clamp both coordinates into the visible view.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            x: self.x.clamp(0.0, 1.0),
            y: self.y.clamp(0.0, 1.0),
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn row_x(index: usize, count: usize) -> f32 {
    let offset = usize_to_f64(index) - usize_to_f64(count.saturating_sub(1)) / 2.0;
    (0.5 + offset * f64::from(RACK_SPACING)) as f32
}

/// Center of equip slot `index` in a row of `count` slots.
#[must_use]
pub fn slot_center(index: usize, count: usize) -> ViewPoint {
    ViewPoint::new(row_x(index, count), SLOT_ROW_Y)
}

/// Home position of inventory mask `index` in a row of `count` masks.
#[must_use]
pub fn inventory_home(index: usize, count: usize) -> ViewPoint {
    ViewPoint::new(row_x(index, count), INVENTORY_ROW_Y)
}

/// Resolve a drop point to the equip slot under it, if any.
#[must_use]
pub fn slot_at(point: ViewPoint, slot_count: usize) -> Option<usize> {
    (0..slot_count).find(|&index| {
        let center = slot_center(index, slot_count);
        (point.x - center.x).abs() <= SLOT_HALF_EXTENT
            && (point.y - center.y).abs() <= SLOT_HALF_EXTENT
    })
}
