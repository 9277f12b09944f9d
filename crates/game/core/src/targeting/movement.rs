use crate::card::StepVector;
use crate::state::{Coord, GridIndex};

use super::Orientation;

/// Axis a unit step travels along.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StepAxis {
    Depth,
    Width,
}

/// One attempted unit step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveStep {
    pub axis: StepAxis,
    pub from: Coord,
    pub attempted: Coord,
    pub blocked: bool,
}

/// Result of resolving a movement card: where the mover ends up and how
/// every unit step went.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovementPath {
    pub origin: Coord,
    pub destination: Coord,
    pub orientation: Orientation,
    pub steps: Vec<MoveStep>,
}

impl MovementPath {
    pub fn is_blocked(&self) -> bool {
        self.steps.iter().any(|step| step.blocked)
    }

    pub fn displacement(&self) -> (i32, i32) {
        (
            self.destination.x - self.origin.x,
            self.destination.y - self.origin.y,
        )
    }
}

/// Decomposes `steps` into unit moves, depth first, then width.
///
/// Each step starts from the cell the previous one produced. A blocked step
/// leaves the current cell unchanged but still uses up its iteration.
pub fn movement_path(
    grid: &GridIndex,
    origin: Coord,
    steps: StepVector,
    orientation: Orientation,
) -> MovementPath {
    let mut current = origin;
    let mut attempts = Vec::new();

    let depth_sign = steps.y.signum();
    for _ in 0..steps.y.abs() {
        let (dx, dy) = orientation.project(0, depth_sign);
        let attempted = current.offset(dx, dy);
        let legal = grid.is_free(attempted)
            && orientation.depth_distance(current, attempted) == 1
            && orientation.lateral_distance(current, attempted) == 0;
        attempts.push(advance(&mut current, attempted, legal, StepAxis::Depth));
    }

    let width_sign = steps.x.signum();
    for _ in 0..steps.x.abs() {
        let (dx, dy) = orientation.project(width_sign, 0);
        let attempted = current.offset(dx, dy);
        let legal = grid.is_free(attempted)
            && orientation.depth_distance(current, attempted) == 0
            && orientation.lateral_distance(current, attempted) == 1;
        attempts.push(advance(&mut current, attempted, legal, StepAxis::Width));
    }

    MovementPath {
        origin,
        destination: current,
        orientation,
        steps: attempts,
    }
}

fn advance(current: &mut Coord, attempted: Coord, legal: bool, axis: StepAxis) -> MoveStep {
    let step = MoveStep {
        axis,
        from: *current,
        attempted,
        blocked: !legal,
    };
    if legal {
        *current = attempted;
    } else {
        tracing::debug!(from = %step.from, to = %attempted, ?axis, "movement step blocked");
    }
    step
}
