//! Directed-graph checks over the direct dependency edges.
//!
//! The edges are viewed as a square boolean adjacency matrix where
//! `matrix[i][j]` means skill `i` directly requires skill `j`. Reachability is
//! computed with Floyd–Warshall on a copy; the input is never modified.

use crate::skills::hierarchy::HierarchyError;

/// Check that every row has as many cells as there are rows.
///
/// # Errors
///
/// Returns `HierarchyError::NonSquareMatrix` naming the first offending row.
pub fn ensure_square(matrix: &[Vec<bool>]) -> Result<(), HierarchyError> {
    let n = matrix.len();
    match matrix.iter().position(|row| row.len() != n) {
        Some(row) => Err(HierarchyError::NonSquareMatrix {
            row,
            len: matrix[row].len(),
            expected: n,
        }),
        None => Ok(()),
    }
}

/// Transitive closure of the adjacency matrix: `reach[i][j]` is true when a
/// non-empty path leads from `i` to `j`.
///
/// # Errors
///
/// Returns `HierarchyError::NonSquareMatrix` if the matrix is not square.
pub fn reachability(matrix: &[Vec<bool>]) -> Result<Vec<Vec<bool>>, HierarchyError> {
    ensure_square(matrix)?;

    let n = matrix.len();
    let mut reach = matrix.to_vec();
    for k in 0..n {
        for i in 0..n {
            if !reach[i][k] {
                continue;
            }
            for j in 0..n {
                if reach[k][j] {
                    reach[i][j] = true;
                }
            }
        }
    }
    Ok(reach)
}

/// Indices of the vertices that can reach themselves, in ascending order.
///
/// # Errors
///
/// Returns `HierarchyError::NonSquareMatrix` if the matrix is not square.
pub fn cyclic_vertices(matrix: &[Vec<bool>]) -> Result<Vec<usize>, HierarchyError> {
    let reach = reachability(matrix)?;
    Ok((0..reach.len()).filter(|&i| reach[i][i]).collect())
}

/// Whether the directed graph has no cycle.
///
/// # Errors
///
/// Returns `HierarchyError::NonSquareMatrix` if the matrix is not square.
pub fn is_acyclic(matrix: &[Vec<bool>]) -> Result<bool, HierarchyError> {
    Ok(cyclic_vertices(matrix)?.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(bits: &[&[u8]]) -> Vec<Vec<bool>> {
        bits.iter()
            .map(|row| row.iter().map(|&b| b == 1).collect())
            .collect()
    }

    #[test]
    fn test_two_cycle_is_rejected() {
        let m = matrix(&[&[0, 1], &[1, 0]]);
        assert!(!is_acyclic(&m).unwrap());
        assert_eq!(cyclic_vertices(&m).unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_self_loop_is_a_cycle() {
        let m = matrix(&[&[0, 0], &[0, 1]]);
        assert_eq!(cyclic_vertices(&m).unwrap(), vec![1]);
    }

    #[test]
    fn test_chain_is_acyclic() {
        let m = matrix(&[&[0, 1, 0], &[0, 0, 1], &[0, 0, 0]]);
        assert!(is_acyclic(&m).unwrap());
    }

    #[test]
    fn test_long_cycle_detected() {
        let m = matrix(&[
            &[0, 1, 0, 0],
            &[0, 0, 1, 0],
            &[0, 0, 0, 1],
            &[1, 0, 0, 0],
        ]);
        assert!(!is_acyclic(&m).unwrap());
    }

    #[test]
    fn test_reachability_is_transitive() {
        let m = matrix(&[&[0, 1, 0], &[0, 0, 1], &[0, 0, 0]]);
        let reach = reachability(&m).unwrap();
        assert!(reach[0][2]);
        assert!(!reach[2][0]);
        // Input untouched
        assert!(!m[0][2]);
    }

    #[test]
    fn test_empty_matrix_is_acyclic() {
        assert!(is_acyclic(&[]).unwrap());
    }

    #[test]
    fn test_non_square_rejected() {
        let m = matrix(&[&[0, 1], &[0]]);
        let err = is_acyclic(&m).unwrap_err();
        assert!(matches!(
            err,
            HierarchyError::NonSquareMatrix {
                row: 1,
                len: 1,
                expected: 2
            }
        ));
    }
}
