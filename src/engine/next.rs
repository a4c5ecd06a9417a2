use super::store::CellStore;
use crate::{pos::Pos2, rule::RuleSet};
use rayon::prelude::*;
use std::collections::BTreeSet;

/// Rows that may hold a live cell in the next generation
///
/// Only rows with a live cell, or directly next to one, can change, and
/// they are clamped to the grid.
fn candidate_rows(store: &CellStore) -> Vec<i32> {
    let size = store.size();
    let mut rows = BTreeSet::new();
    for y in store.rows() {
        rows.extend((y - 1..=y + 1).filter(|&y| size.contains_y(y)));
    }
    rows.into_iter().collect()
}

/// Computes the live cells of a single row in the next generation
///
/// Every candidate is decided against `store` which is never mutated here,
/// so no cell's transition can affect another one in the same step.
fn next_row(store: &CellStore, rules: &RuleSet, y: i32) -> Vec<Pos2> {
    let size = store.size();
    let mut columns = BTreeSet::new();
    for row in y - 1..=y + 1 {
        for x in store.row(row) {
            columns.extend((x - 1..=x + 1).filter(|&x| size.contains_x(x)));
        }
    }

    columns
        .into_iter()
        .map(|x| Pos2 { x, y })
        .filter(|&pos| rules.next_state(store.is_alive(pos), store.live_neighbor_count(pos)))
        .collect()
}

/// Iterator over the live cells of the next generation, in row-major order
pub(super) struct NextGen<'a> {
    store: &'a CellStore,
    rules: &'a RuleSet,
    rows: std::vec::IntoIter<i32>,
    pending: std::vec::IntoIter<Pos2>,
}
impl<'a> NextGen<'a> {
    pub(super) fn new(store: &'a CellStore, rules: &'a RuleSet) -> Self {
        Self {
            store,
            rules,
            rows: candidate_rows(store).into_iter(),
            pending: Vec::new().into_iter(),
        }
    }
}
impl Iterator for NextGen<'_> {
    type Item = Pos2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(pos) = self.pending.next() {
                return Some(pos);
            }
            let y = self.rows.next()?;
            self.pending = next_row(self.store, self.rules, y).into_iter();
        }
    }
}

/// Computes the next generation with the candidate rows split into `bands`
/// contiguous bands, one rayon task each
pub(super) fn next_gen_parallel(store: &CellStore, rules: &RuleSet, bands: usize) -> Vec<Pos2> {
    let rows = candidate_rows(store);
    if rows.is_empty() || bands == 0 {
        return Vec::new();
    }
    let band_len = rows.len().div_ceil(bands.min(rows.len()));

    // bands are disjoint and ordered, so concatenating keeps row-major order
    let band_outputs: Vec<Vec<Pos2>> = rows
        .par_chunks(band_len)
        .map(|band| {
            band.iter()
                .flat_map(|&y| next_row(store, rules, y))
                .collect()
        })
        .collect();
    band_outputs.concat()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pos::Size2;

    fn store(cells: &[(i32, i32)]) -> CellStore {
        CellStore::from_cells(
            Size2::new(8, 8),
            cells.iter().map(|&(x, y)| Pos2 { x, y }),
        )
    }

    #[test]
    fn candidate_rows_are_clamped() {
        let store = store(&[(3, 0), (3, 4)]);

        assert_eq!(candidate_rows(&store), vec![0, 1, 3, 4, 5]);
    }

    #[test]
    fn blinker_rotates() {
        let store = store(&[(1, 2), (2, 2), (3, 2)]);
        let rules = RuleSet::conway();

        let next: Vec<_> = NextGen::new(&store, &rules).collect();
        assert_eq!(next, vec![Pos2::new(2, 1), Pos2::new(2, 2), Pos2::new(2, 3)]);
    }

    #[test]
    fn parallel_matches_serial() {
        let cells: Vec<(i32, i32)> = (0..8)
            .flat_map(|y| (0..8).map(move |x| (x, y)))
            .filter(|&(x, y)| (x * 3 + y * 5) % 7 < 3)
            .collect();
        let store = store(&cells);
        let rules = RuleSet::parse("B36/S23").unwrap();

        let serial: Vec<_> = NextGen::new(&store, &rules).collect();
        for bands in [1, 2, 3, 16] {
            assert_eq!(next_gen_parallel(&store, &rules, bands), serial);
        }
    }
}
