//! Grid index: coordinate to cell lookup.
//!
//! Cells are created once when the grid is built and live for the whole
//! session; only their mutable fields change. Lookups of coordinates outside
//! the grid return `None` and mutations of them are ignored.

use std::collections::BTreeMap;

use super::{CharacterId, Coord, StatusTag};

/// Persistent ground effect left on a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SurfaceEffect {
    #[default]
    None,
    Burning,
    Electrified,
}

/// One cube of the grid.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridCell {
    pub coord: Coord,
    pub occupant: Option<CharacterId>,
    pub corpse: bool,
    pub surface: SurfaceEffect,
    pub status: StatusTag,
}

impl GridCell {
    pub fn new(coord: Coord) -> Self {
        Self {
            coord,
            occupant: None,
            corpse: false,
            surface: SurfaceEffect::None,
            status: StatusTag::None,
        }
    }

    pub fn is_free(&self) -> bool {
        self.occupant.is_none()
    }

    /// True when every mutable field holds its build-time value.
    pub fn is_pristine(&self) -> bool {
        self.occupant.is_none()
            && !self.corpse
            && self.surface == SurfaceEffect::None
            && self.status == StatusTag::None
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct GridIndex {
    cells: BTreeMap<Coord, GridCell>,
}

impl GridIndex {
    /// Builds the cells `(0..width) x (0..height)`.
    pub fn rectangular(width: u32, height: u32) -> Self {
        let cells = (0..height as i32)
            .flat_map(|y| (0..width as i32).map(move |x| Coord::new(x, y)))
            .map(|coord| (coord, GridCell::new(coord)))
            .collect();
        Self { cells }
    }

    /// Builds a grid from an arbitrary set of coordinates (holes allowed).
    pub fn from_coords(coords: impl IntoIterator<Item = Coord>) -> Self {
        let cells = coords
            .into_iter()
            .map(|coord| (coord, GridCell::new(coord)))
            .collect();
        Self { cells }
    }

    pub fn get(&self, coord: Coord) -> Option<&GridCell> {
        self.cells.get(&coord)
    }

    /// Looks up the cell nearest to a float position.
    pub fn get_nearest(&self, x: f32, y: f32) -> Option<&GridCell> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        self.get(Coord::new(x.round() as i32, y.round() as i32))
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.cells.contains_key(&coord)
    }

    pub fn occupant(&self, coord: Coord) -> Option<CharacterId> {
        self.get(coord).and_then(|cell| cell.occupant)
    }

    pub fn is_free(&self, coord: Coord) -> bool {
        self.get(coord).is_some_and(GridCell::is_free)
    }

    /// Sets or clears the occupant of a cell.
    ///
    /// Returns false (and changes nothing) when the cell is off-grid or is
    /// already held by a different character.
    pub fn set_occupant(&mut self, coord: Coord, occupant: Option<CharacterId>) -> bool {
        let Some(cell) = self.cells.get_mut(&coord) else {
            return false;
        };
        match (cell.occupant, occupant) {
            (Some(current), Some(next)) if current != next => false,
            _ => {
                cell.occupant = occupant;
                true
            }
        }
    }

    pub fn set_surface(&mut self, coord: Coord, surface: SurfaceEffect) -> bool {
        self.with_cell(coord, |cell| cell.surface = surface)
    }

    pub fn set_status(&mut self, coord: Coord, status: StatusTag) -> bool {
        self.with_cell(coord, |cell| cell.status = status)
    }

    pub fn set_corpse(&mut self, coord: Coord, corpse: bool) -> bool {
        self.with_cell(coord, |cell| cell.corpse = corpse)
    }

    /// Restores a cell's mutable fields to their build-time values.
    pub fn reset_cell(&mut self, coord: Coord) -> bool {
        self.with_cell(coord, |cell| *cell = GridCell::new(coord))
    }

    /// Iterates cells in coordinate order.
    pub fn cells(&self) -> impl Iterator<Item = &GridCell> {
        self.cells.values()
    }

    /// Free cells in row `y`, left to right.
    pub fn free_cells_in_row(&self, y: i32) -> Vec<Coord> {
        self.cells
            .values()
            .filter(|cell| cell.coord.y == y && cell.is_free())
            .map(|cell| cell.coord)
            .collect()
    }

    /// Highest row index present in the grid.
    pub fn top_row(&self) -> Option<i32> {
        self.cells.keys().map(|coord| coord.y).max()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn with_cell(&mut self, coord: Coord, f: impl FnOnce(&mut GridCell)) -> bool {
        match self.cells.get_mut(&coord) {
            Some(cell) => {
                f(cell);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn off_grid_lookup_is_none() {
        let grid = GridIndex::rectangular(3, 3);
        assert!(grid.get(Coord::new(3, 0)).is_none());
        assert!(grid.get(Coord::new(-1, 2)).is_none());
        assert!(grid.get(Coord::new(2, 2)).is_some());
    }

    #[test]
    fn nearest_rounds_float_positions() {
        let grid = GridIndex::rectangular(3, 3);
        let cell = grid.get_nearest(1.4, 1.6).unwrap();
        assert_eq!(cell.coord, Coord::new(1, 2));
        assert!(grid.get_nearest(f32::NAN, 0.0).is_none());
    }

    #[test]
    fn cell_keeps_single_occupant() {
        let mut grid = GridIndex::rectangular(2, 2);
        let at = Coord::new(1, 1);
        assert!(grid.set_occupant(at, Some(CharacterId(1))));
        assert!(!grid.set_occupant(at, Some(CharacterId(2))));
        assert_eq!(grid.occupant(at), Some(CharacterId(1)));
        assert!(grid.set_occupant(at, None));
        assert!(grid.set_occupant(at, Some(CharacterId(2))));
    }

    #[test]
    fn mutations_off_grid_are_ignored() {
        let mut grid = GridIndex::rectangular(2, 2);
        let outside = Coord::new(5, 5);
        assert!(!grid.set_occupant(outside, Some(CharacterId(1))));
        assert!(!grid.set_surface(outside, SurfaceEffect::Burning));
        assert!(!grid.set_corpse(outside, true));
        assert_eq!(grid.len(), 4);
    }

    #[test]
    fn reset_restores_build_state() {
        let mut grid = GridIndex::rectangular(2, 2);
        let at = Coord::new(0, 1);
        grid.set_surface(at, SurfaceEffect::Electrified);
        grid.set_corpse(at, true);
        grid.set_status(at, StatusTag::Fire);
        assert!(!grid.get(at).unwrap().is_pristine());

        grid.reset_cell(at);
        assert!(grid.get(at).unwrap().is_pristine());
    }
}
