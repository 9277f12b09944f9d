use crate::card::StepVector;
use crate::state::{Coord, GridIndex};

use super::Orientation;

/// Cells an attack lands on, in depth-then-width order.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Footprint {
    pub origin: Coord,
    pub orientation: Orientation,
    pub cells: Vec<Coord>,
}

impl Footprint {
    /// A footprint covering only the caster's own cell.
    pub fn caster(origin: Coord, orientation: Orientation) -> Self {
        Self {
            origin,
            orientation,
            cells: vec![origin],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Lateral offset of column `width` (1-based) in a row `row_width` wide.
pub fn column_offset(width: i32, row_width: i32) -> i32 {
    width - (1 + row_width / 2)
}

/// Computes the attack footprint of `steps` (width `x`, depth `y`).
///
/// Each depth row `1..=y` holds `x` columns centered on the origin column.
/// Off-grid cells and cells whose depth does not match their row are
/// skipped.
pub fn attack_footprint(
    grid: &GridIndex,
    origin: Coord,
    steps: StepVector,
    orientation: Orientation,
) -> Footprint {
    let mut cells = Vec::new();
    for depth in 1..=steps.y {
        for width in 1..=steps.x {
            let (dx, dy) = orientation.project(column_offset(width, steps.x), depth);
            let candidate = origin.offset(dx, dy);
            if !grid.contains(candidate) {
                tracing::trace!(%origin, %candidate, "footprint cell off grid");
                continue;
            }
            if orientation.depth_distance(origin, candidate) != depth {
                continue;
            }
            cells.push(candidate);
        }
    }
    Footprint {
        origin,
        orientation,
        cells,
    }
}
