use crate::matching::engine::Matcher;
use crate::matching::grid::{CompatibilityGrid, PairingMatrix};

/// Exact matcher by depth-first backtracking.
///
/// Every row either claims one free compatible column or stays unmatched, so
/// the search visits every partial one-to-one assignment and returns one with
/// the maximum number of pairs. The only pruning is skipping claimed columns:
/// the running time is exponential and callers must bound the grid size
/// (see [`crate::matching::engine::ExhaustiveLimit`]).
#[derive(Debug, Clone, Copy, Default)]
pub struct ExhaustiveMatcher;

impl ExhaustiveMatcher {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Matcher for ExhaustiveMatcher {
    fn name(&self) -> &'static str {
        "exhaustive"
    }

    fn find_pairing(&self, grid: &CompatibilityGrid) -> PairingMatrix {
        if grid.is_empty() {
            return PairingMatrix::empty_for(grid);
        }

        let mut search = Search {
            grid,
            owner: vec![None; grid.columns()],
            best_count: 0,
            best: PairingMatrix::empty_for(grid),
        };
        search.descend(0, 0);
        search.best
    }
}

struct Search<'g> {
    grid: &'g CompatibilityGrid,
    /// owner[column] = row currently holding that column
    owner: Vec<Option<usize>>,
    best_count: usize,
    best: PairingMatrix,
}

impl Search<'_> {
    fn descend(&mut self, row: usize, count: usize) {
        if row == self.grid.rows() {
            if count > self.best_count {
                self.best_count = count;
                self.best = self.materialize();
            }
            return;
        }

        for column in 0..self.grid.columns() {
            if self.grid.get(row, column) && self.owner[column].is_none() {
                self.owner[column] = Some(row);
                self.descend(row + 1, count + 1);
                self.owner[column] = None;
            }
        }

        // Leave this row unmatched
        self.descend(row + 1, count);
    }

    fn materialize(&self) -> PairingMatrix {
        let mut pairing = PairingMatrix::empty_for(self.grid);
        for (column, owner) in self.owner.iter().enumerate() {
            if let Some(row) = *owner {
                pairing.pair(row, column);
            }
        }
        pairing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(bits: &[&[u8]]) -> PairingMatrix {
        let grid = CompatibilityGrid::from_bits(bits).unwrap();
        let pairing = ExhaustiveMatcher.find_pairing(&grid);
        pairing.validate_against(&grid).unwrap();
        pairing
    }

    #[test]
    fn test_identity_grid() {
        let pairing = run(&[&[1, 0], &[0, 1]]);
        assert_eq!(pairing.to_bits(), vec![vec![1, 0], vec![0, 1]]);
    }

    #[test]
    fn test_no_assignment_possible() {
        let pairing = run(&[&[0, 0], &[0, 0]]);
        assert_eq!(pairing.to_bits(), vec![vec![0, 0], vec![0, 0]]);
    }

    #[test]
    fn test_more_rescuers_than_units() {
        let pairing = run(&[&[1, 0], &[0, 1], &[1, 1]]);
        assert_eq!(pairing.pair_count(), 2);
    }

    #[test]
    fn test_more_units_than_rescuers() {
        let pairing = run(&[&[1, 1, 0], &[0, 1, 1]]);
        assert_eq!(pairing.pair_count(), 2);
        // First maximal leaf in column order
        assert_eq!(pairing.to_bits(), vec![vec![1, 0, 0], vec![0, 1, 0]]);
    }

    #[test]
    fn test_finds_perfect_matching_greedy_misses() {
        let pairing = run(&[&[0, 1, 1], &[1, 0, 1], &[1, 1, 0]]);
        assert_eq!(pairing.pair_count(), 3);
    }

    #[test]
    fn test_backtracks_past_first_choice() {
        // Row 0 taking column 0 would block row 1 entirely
        let pairing = run(&[&[1, 1], &[1, 0]]);
        assert_eq!(pairing.pair_count(), 2);
        assert_eq!(pairing.column_for(1), Some(0));
    }

    #[test]
    fn test_empty_grid() {
        let grid = CompatibilityGrid::from_rows(Vec::new()).unwrap();
        let pairing = ExhaustiveMatcher.find_pairing(&grid);
        assert_eq!((pairing.rows(), pairing.columns()), (0, 0));

        let grid = CompatibilityGrid::from_rows(vec![Vec::new(); 4]).unwrap();
        let pairing = ExhaustiveMatcher.find_pairing(&grid);
        assert_eq!((pairing.rows(), pairing.columns()), (4, 0));
        assert_eq!(pairing.pair_count(), 0);
    }
}
