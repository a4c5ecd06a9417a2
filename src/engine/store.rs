use crate::{
    error::{LifeError, Result},
    pos::{Pos2, Size2},
};
use std::collections::{BTreeMap, BTreeSet};

/// Sparse storage of live cells within a bounded grid
///
/// Cells are grouped by row, so looking up a row or walking the cells in
/// row-major order only ever touches live cells. Rows are dropped as soon as
/// their last cell dies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellStore {
    size: Size2,
    rows: BTreeMap<i32, BTreeSet<i32>>,
    count: usize,
}

impl CellStore {
    pub fn new(size: Size2) -> Self {
        Self {
            size,
            rows: BTreeMap::new(),
            count: 0,
        }
    }

    /// Creates a store from a list of cells, dropping any outside of `size`
    pub fn from_cells<I: IntoIterator<Item = Pos2>>(size: Size2, cells: I) -> Self {
        let mut store = Self::new(size);
        store.set_all(cells);
        store
    }

    #[inline]
    pub fn size(&self) -> Size2 {
        self.size
    }

    fn check_bounds(&self, pos: Pos2) -> Result<()> {
        if self.size.contains(pos) {
            Ok(())
        } else {
            Err(LifeError::OutOfBounds {
                pos,
                size: self.size,
            })
        }
    }

    /// Inserts without a bounds check, returns whether the cell was newly added
    fn insert(&mut self, pos: Pos2) -> bool {
        let added = self.rows.entry(pos.y).or_default().insert(pos.x);
        if added {
            self.count += 1;
        }
        added
    }

    fn remove(&mut self, pos: Pos2) -> bool {
        let Some(row) = self.rows.get_mut(&pos.y) else {
            return false;
        };
        let removed = row.remove(&pos.x);
        if removed {
            self.count -= 1;
            if row.is_empty() {
                self.rows.remove(&pos.y);
            }
        }
        removed
    }

    /// Marks a cell as alive
    pub fn set_cell(&mut self, pos: Pos2) -> Result<()> {
        self.check_bounds(pos)?;
        self.insert(pos);
        Ok(())
    }

    /// Marks a cell as dead
    pub fn kill_cell(&mut self, pos: Pos2) -> Result<()> {
        self.check_bounds(pos)?;
        self.remove(pos);
        Ok(())
    }

    /// Flips a cell, returning its new state
    pub fn toggle_cell(&mut self, pos: Pos2) -> Result<bool> {
        self.check_bounds(pos)?;
        if self.remove(pos) {
            Ok(false)
        } else {
            self.insert(pos);
            Ok(true)
        }
    }

    #[inline]
    pub fn is_alive(&self, pos: Pos2) -> bool {
        self.rows.get(&pos.y).is_some_and(|row| row.contains(&pos.x))
    }

    /// Counts the live cells around `pos`, the grid edges do not wrap
    ///
    /// Cells outside of the grid are never counted, and count 0 themselves.
    pub fn live_neighbor_count(&self, pos: Pos2) -> u8 {
        if !self.size.contains(pos) {
            return 0;
        }
        let mut count = 0;
        for y in pos.y - 1..=pos.y + 1 {
            let Some(row) = self.rows.get(&y) else {
                continue;
            };
            for x in row.range(pos.x - 1..=pos.x + 1) {
                if y != pos.y || *x != pos.x {
                    count += 1;
                }
            }
        }
        count
    }

    #[inline]
    pub fn living_count(&self) -> usize {
        self.count
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Replaces all cells, silently dropping cells outside of the grid
    ///
    /// Returns the number of dropped cells.
    pub fn set_all<I: IntoIterator<Item = Pos2>>(&mut self, cells: I) -> usize {
        self.clear();
        let mut dropped = 0;
        for pos in cells {
            if self.size.contains(pos) {
                self.insert(pos);
            } else {
                dropped += 1;
            }
        }
        if dropped > 0 {
            tracing::trace!("dropped {} cells outside of the {} grid", dropped, self.size);
        }
        dropped
    }

    pub fn clear(&mut self) {
        self.rows.clear();
        self.count = 0;
    }

    /// Live cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = Pos2> + '_ {
        self.rows
            .iter()
            .flat_map(|(&y, row)| row.iter().map(move |&x| Pos2 { x, y }))
    }

    /// Live columns of a single row, ascending
    pub fn row(&self, y: i32) -> impl Iterator<Item = i32> + '_ {
        self.rows.get(&y).into_iter().flat_map(|row| row.iter().copied())
    }

    /// Indices of the rows holding at least one live cell, ascending
    pub fn rows(&self) -> impl Iterator<Item = i32> + '_ {
        self.rows.keys().copied()
    }

    /// Top-left and bottom-right (inclusive) corners of the live cells
    pub fn bounding_box(&self) -> Option<(Pos2, Pos2)> {
        let (&top, _) = self.rows.first_key_value()?;
        let (&bottom, _) = self.rows.last_key_value()?;
        let left = self.rows.values().filter_map(|r| r.first()).min()?;
        let right = self.rows.values().filter_map(|r| r.last()).max()?;
        Some((Pos2::new(*left, top), Pos2::new(*right, bottom)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(w: i32, h: i32) -> CellStore {
        CellStore::new(Size2::new(w, h))
    }

    #[test]
    fn set_then_kill() {
        let mut store = store(10, 10);
        for y in 0..10 {
            for x in 0..10 {
                let pos = Pos2::new(x, y);
                store.set_cell(pos).unwrap();
                assert!(store.is_alive(pos));
                store.kill_cell(pos).unwrap();
                assert!(!store.is_alive(pos));
            }
        }
        assert!(store.is_empty());
        assert_eq!(store.rows().count(), 0);
    }

    #[test]
    fn set_and_kill_are_idempotent() {
        let mut store = store(4, 4);
        store.set_cell(Pos2::new(1, 1)).unwrap();
        store.set_cell(Pos2::new(1, 1)).unwrap();
        assert_eq!(store.living_count(), 1);

        store.kill_cell(Pos2::new(1, 1)).unwrap();
        store.kill_cell(Pos2::new(1, 1)).unwrap();
        store.kill_cell(Pos2::new(2, 3)).unwrap();
        assert_eq!(store.living_count(), 0);
    }

    #[test]
    fn out_of_bounds_is_reported_without_mutation() {
        let mut store = store(4, 3);

        for pos in [Pos2::new(4, 0), Pos2::new(0, 3), Pos2::new(-1, 1)] {
            assert!(matches!(
                store.set_cell(pos),
                Err(LifeError::OutOfBounds { .. })
            ));
            assert!(store.kill_cell(pos).is_err());
            assert!(store.toggle_cell(pos).is_err());
            assert!(!store.is_alive(pos));
        }
        assert!(store.is_empty());
    }

    #[test]
    fn toggle_flips_state() {
        let mut store = store(4, 4);
        let pos = Pos2::new(2, 2);

        assert!(store.toggle_cell(pos).unwrap());
        assert!(store.is_alive(pos));
        assert!(!store.toggle_cell(pos).unwrap());
        assert!(!store.is_alive(pos));
    }

    #[test]
    fn neighbor_counts() {
        let mut store = store(5, 5);
        let center = Pos2::new(2, 2);
        store.set_cell(center).unwrap();
        assert_eq!(store.live_neighbor_count(center), 0);

        for pos in center.neighbors() {
            store.set_cell(pos).unwrap();
        }
        assert_eq!(store.live_neighbor_count(center), 8);
        assert_eq!(store.live_neighbor_count(Pos2::new(1, 1)), 3);
        assert_eq!(store.live_neighbor_count(Pos2::new(0, 0)), 1);
    }

    #[test]
    fn neighbor_counts_do_not_wrap() {
        let mut store = store(3, 3);
        store.set_cell(Pos2::new(2, 0)).unwrap();
        store.set_cell(Pos2::new(0, 2)).unwrap();

        assert_eq!(store.live_neighbor_count(Pos2::new(0, 0)), 0);
        assert_eq!(store.live_neighbor_count(Pos2::new(2, 2)), 0);
    }

    #[test]
    fn neighbor_count_outside_grid_is_zero() {
        let mut store = store(3, 3);
        store.set_cell(Pos2::new(0, 0)).unwrap();
        store.set_cell(Pos2::new(2, 0)).unwrap();

        assert_eq!(store.live_neighbor_count(Pos2::new(1, -1)), 0);
        assert_eq!(store.live_neighbor_count(Pos2::new(3, 0)), 0);
        assert_eq!(store.live_neighbor_count(Pos2::new(i32::MAX, 0)), 0);
        assert_eq!(store.live_neighbor_count(Pos2::new(i32::MIN, i32::MIN)), 0);
    }

    #[test]
    fn set_all_drops_out_of_bounds() {
        let mut store = store(3, 3);
        store.set_cell(Pos2::new(0, 0)).unwrap();

        let dropped = store.set_all([
            Pos2::new(1, 1),
            Pos2::new(3, 1),
            Pos2::new(2, 2),
            Pos2::new(2, 2),
            Pos2::new(-1, 0),
        ]);

        assert_eq!(dropped, 2);
        assert_eq!(store.living_count(), 2);
        assert!(!store.is_alive(Pos2::new(0, 0)));
    }

    #[test]
    fn iter_is_row_major_and_restartable() {
        let cells = [Pos2::new(2, 1), Pos2::new(0, 2), Pos2::new(1, 0), Pos2::new(0, 1)];
        let store = CellStore::from_cells(Size2::new(3, 3), cells);

        let expected = vec![Pos2::new(1, 0), Pos2::new(0, 1), Pos2::new(2, 1), Pos2::new(0, 2)];
        assert_eq!(store.iter().collect::<Vec<_>>(), expected);
        assert_eq!(store.iter().collect::<Vec<_>>(), expected);
        assert_eq!(store.row(1).collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(store.row(5).count(), 0);
    }

    #[test]
    fn bounding_box_is_tight() {
        let store = CellStore::from_cells(
            Size2::new(10, 10),
            [Pos2::new(4, 2), Pos2::new(7, 3), Pos2::new(3, 5)],
        );

        assert_eq!(store.bounding_box(), Some((Pos2::new(3, 2), Pos2::new(7, 5))));
        assert_eq!(CellStore::new(Size2::new(1, 1)).bounding_box(), None);
    }
}
