use crate::matching::engine::Matcher;
use crate::matching::grid::{CompatibilityGrid, PairingMatrix};

/// Least-constrained-first heuristic.
///
/// Rows and columns are visited in ascending degree order (ties keep their
/// original index order). Each row claims the first unclaimed compatible
/// column; a claimed column is never revisited. Runs in O(rows × columns)
/// after the ordering pass but does not search for augmenting paths, so it can
/// leave units unfilled that an optimal pairing would fill.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyMatcher;

impl GreedyMatcher {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Indices `0..n` stably sorted by ascending degree
fn ascending_by_degree(n: usize, degree: impl Fn(usize) -> usize) -> Vec<usize> {
    let degrees: Vec<usize> = (0..n).map(degree).collect();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by_key(|&i| degrees[i]);
    order
}

impl Matcher for GreedyMatcher {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn find_pairing(&self, grid: &CompatibilityGrid) -> PairingMatrix {
        let mut pairing = PairingMatrix::empty_for(grid);
        if grid.is_empty() {
            return pairing;
        }

        let row_order = ascending_by_degree(grid.rows(), |r| grid.row_degree(r));
        let column_order = ascending_by_degree(grid.columns(), |c| grid.column_degree(c));

        let mut claimed = vec![false; grid.columns()];
        for row in row_order {
            let candidates = grid.row(row);
            if let Some(&column) = column_order
                .iter()
                .find(|&&c| candidates[c] && !claimed[c])
            {
                claimed[column] = true;
                pairing.pair(row, column);
            }
        }
        pairing
    }
}
