//! Grid-hash index of opponent units.
//!
//! The map is bucketed into square cells of `cell_size`. A unit at `(x, y)`
//! lives in cell `(floor(x / cell_size), floor(y / cell_size))`. Cells are
//! kept in a `BTreeMap` so every scan over them has a fixed order, and a
//! cell is dropped as soon as its last unit leaves.

use std::collections::{BTreeMap, BTreeSet};

use crate::math::Vec2;
use crate::unit::UnitId;

/// Integer cell coordinates.
pub type CellKey = (i64, i64);

/// Offsets of the 3×3 neighborhood, scanned in this order.
pub const NEIGHBORHOOD: [(i64, i64); 9] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 0),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Spatial hash from cells to the opponent units inside them.
#[derive(Debug, Clone, PartialEq)]
pub struct GridIndex {
    cell_size: f64,
    cells: BTreeMap<CellKey, BTreeSet<UnitId>>,
}

impl GridIndex {
    /// Create an empty index.
    ///
    /// # Panics
    ///
    /// Panics if `cell_size` is not positive and finite.
    #[must_use]
    pub fn new(cell_size: f64) -> Self {
        assert!(
            cell_size > 0.0 && cell_size.is_finite(),
            "GridIndex cell_size must be positive and finite"
        );
        Self {
            cell_size,
            cells: BTreeMap::new(),
        }
    }

    /// Cell size in world units.
    #[must_use]
    pub const fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Cell containing a world position.
    #[must_use]
    pub fn cell_of(&self, position: Vec2) -> CellKey {
        (
            (position.x / self.cell_size).floor() as i64,
            (position.y / self.cell_size).floor() as i64,
        )
    }

    /// Add a unit to the cell for `position`.
    pub fn insert(&mut self, id: UnitId, position: Vec2) {
        let key = self.cell_of(position);
        self.cells.entry(key).or_default().insert(id);
    }

    /// Remove a unit from the cell for `position`.
    ///
    /// Returns `false` if the unit was not in that cell.
    pub fn remove(&mut self, id: UnitId, position: Vec2) -> bool {
        let key = self.cell_of(position);
        let Some(units) = self.cells.get_mut(&key) else {
            return false;
        };
        let removed = units.remove(&id);
        if units.is_empty() {
            self.cells.remove(&key);
        }
        removed
    }

    /// Units in a cell (empty for unknown cells).
    pub fn units_in(&self, key: CellKey) -> impl Iterator<Item = UnitId> + '_ {
        self.cells.get(&key).into_iter().flatten().copied()
    }

    /// Check whether a cell holds any unit.
    #[must_use]
    pub fn is_occupied(&self, key: CellKey) -> bool {
        self.cells.contains_key(&key)
    }

    /// Non-empty cells in ascending key order.
    pub fn occupied_cells(&self) -> impl Iterator<Item = CellKey> + '_ {
        self.cells.keys().copied()
    }

    /// Cells that contain the given unit. Exactly one for a tracked opponent.
    #[must_use]
    pub fn cells_containing(&self, id: UnitId) -> Vec<CellKey> {
        self.cells
            .iter()
            .filter(|(_, units)| units.contains(&id))
            .map(|(key, _)| *key)
            .collect()
    }

    /// Total number of indexed units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.values().map(BTreeSet::len).sum()
    }

    /// Check if no unit is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_of_floors_negative_coordinates() {
        let grid = GridIndex::new(16.0);
        assert_eq!(grid.cell_of(Vec2::new(15.9, 16.0)), (0, 1));
        assert_eq!(grid.cell_of(Vec2::new(-0.1, 0.0)), (-1, 0));
    }

    #[test]
    fn test_remove_drops_empty_cell() {
        let mut grid = GridIndex::new(16.0);
        grid.insert(7, Vec2::new(1.0, 1.0));
        assert!(grid.is_occupied((0, 0)));
        assert!(grid.remove(7, Vec2::new(2.0, 2.0)));
        assert!(!grid.is_occupied((0, 0)));
        assert!(grid.is_empty());
    }

    #[test]
    fn test_remove_from_wrong_cell_is_noop() {
        let mut grid = GridIndex::new(16.0);
        grid.insert(7, Vec2::new(1.0, 1.0));
        assert!(!grid.remove(7, Vec2::new(100.0, 100.0)));
        assert_eq!(grid.cells_containing(7), vec![(0, 0)]);
    }

    #[test]
    fn test_occupied_cells_are_sorted() {
        let mut grid = GridIndex::new(10.0);
        grid.insert(1, Vec2::new(55.0, 5.0));
        grid.insert(2, Vec2::new(5.0, 55.0));
        grid.insert(3, Vec2::new(5.0, 5.0));
        let cells: Vec<_> = grid.occupied_cells().collect();
        assert_eq!(cells, vec![(0, 0), (0, 5), (5, 0)]);
        assert_eq!(grid.len(), 3);
    }
}
