//! Compatibility grid and pairing matrix.
//!
//! Rows are rescuers in snapshot order; columns are [`RequirementUnit`]s in
//! event order, then ascending skill id, then ascending repetition index.

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::core::event::Event;
use crate::core::rescuer::Rescuer;
use crate::core::skill::Skill;
use crate::core::types::EventId;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GridError {
    #[error("Grid row {row} has {len} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        len: usize,
        expected: usize,
    },
}

/// A pairing that breaks one of the one-to-one invariants
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PairingViolation {
    #[error("Pairing is {pairing:?}, grid is {grid:?}")]
    ShapeMismatch {
        pairing: (usize, usize),
        grid: (usize, usize),
    },

    #[error("Rescuer {row} paired to unit {column} without the required skill")]
    Incompatible { row: usize, column: usize },

    #[error("Rescuer {row} is paired more than once")]
    RowConflict { row: usize },

    #[error("Unit {column} is paired more than once")]
    ColumnConflict { column: usize },
}

/// One atomic slot of need: one event, one skill, one repetition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RequirementUnit {
    pub event: EventId,
    pub skill: Skill,
    /// Index in `0..count` among the units of the same (event, skill)
    pub repetition: u32,
}

/// Row-major boolean matrix shared by the grid and the pairing
#[derive(Debug, Clone, PartialEq, Eq)]
struct BitMatrix {
    rows: usize,
    columns: usize,
    cells: Vec<bool>,
}

impl BitMatrix {
    fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            cells: vec![false; rows * columns],
        }
    }

    fn from_rows(rows: Vec<Vec<bool>>) -> Result<Self, GridError> {
        let columns = rows.first().map_or(0, Vec::len);
        if let Some(row) = rows.iter().position(|r| r.len() != columns) {
            return Err(GridError::RaggedRow {
                row,
                len: rows[row].len(),
                expected: columns,
            });
        }
        let n = rows.len();
        Ok(Self {
            rows: n,
            columns,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    fn get(&self, row: usize, column: usize) -> bool {
        assert!(
            row < self.rows && column < self.columns,
            "cell ({row}, {column}) outside {}x{} matrix",
            self.rows,
            self.columns
        );
        self.cells[row * self.columns + column]
    }

    fn set(&mut self, row: usize, column: usize, value: bool) {
        assert!(
            row < self.rows && column < self.columns,
            "cell ({row}, {column}) outside {}x{} matrix",
            self.rows,
            self.columns
        );
        self.cells[row * self.columns + column] = value;
    }

    fn row(&self, row: usize) -> &[bool] {
        let start = row * self.columns;
        &self.cells[start..start + self.columns]
    }

    fn to_bits(&self) -> Vec<Vec<u8>> {
        (0..self.rows)
            .map(|r| self.row(r).iter().map(|&b| u8::from(b)).collect())
            .collect()
    }
}

/// Rescuer × requirement-unit eligibility. Cell (r, u) is true iff rescuer r
/// holds the skill of unit u.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompatibilityGrid {
    inner: BitMatrix,
}

impl CompatibilityGrid {
    /// Build a grid from explicit rows.
    ///
    /// # Errors
    ///
    /// Returns `GridError::RaggedRow` if the rows differ in length.
    pub fn from_rows(rows: Vec<Vec<bool>>) -> Result<Self, GridError> {
        Ok(Self {
            inner: BitMatrix::from_rows(rows)?,
        })
    }

    /// Build a grid from 0/1 rows; any non-zero value counts as compatible.
    ///
    /// # Errors
    ///
    /// Returns `GridError::RaggedRow` if the rows differ in length.
    pub fn from_bits<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, GridError> {
        Self::from_rows(
            rows.iter()
                .map(|r| r.as_ref().iter().map(|&b| b != 0).collect())
                .collect(),
        )
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.inner.rows
    }

    #[must_use]
    pub fn columns(&self) -> usize {
        self.inner.columns
    }

    /// True when either dimension is zero
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.rows == 0 || self.inner.columns == 0
    }

    /// # Panics
    ///
    /// Panics if the cell lies outside the grid.
    #[must_use]
    pub fn get(&self, row: usize, column: usize) -> bool {
        self.inner.get(row, column)
    }

    #[must_use]
    pub fn row(&self, row: usize) -> &[bool] {
        self.inner.row(row)
    }

    /// Number of units a rescuer could fill
    #[must_use]
    pub fn row_degree(&self, row: usize) -> usize {
        self.inner.row(row).iter().filter(|&&b| b).count()
    }

    /// Number of rescuers who could fill a unit
    #[must_use]
    pub fn column_degree(&self, column: usize) -> usize {
        (0..self.inner.rows)
            .filter(|&r| self.inner.get(r, column))
            .count()
    }

    #[must_use]
    pub fn to_bits(&self) -> Vec<Vec<u8>> {
        self.inner.to_bits()
    }
}

/// Chosen one-to-one subset of a [`CompatibilityGrid`].
///
/// Matchers return a fresh pairing of the grid's shape; once returned it is
/// read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairingMatrix {
    inner: BitMatrix,
}

impl PairingMatrix {
    /// All-zero pairing of the given shape
    #[must_use]
    pub fn empty(rows: usize, columns: usize) -> Self {
        Self {
            inner: BitMatrix::new(rows, columns),
        }
    }

    /// All-zero pairing with the same shape as `grid`
    #[must_use]
    pub fn empty_for(grid: &CompatibilityGrid) -> Self {
        Self::empty(grid.rows(), grid.columns())
    }

    pub(crate) fn pair(&mut self, row: usize, column: usize) {
        self.inner.set(row, column, true);
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.inner.rows
    }

    #[must_use]
    pub fn columns(&self) -> usize {
        self.inner.columns
    }

    #[must_use]
    pub fn get(&self, row: usize, column: usize) -> bool {
        self.inner.get(row, column)
    }

    /// Paired (row, column) cells in row-major order
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let columns = self.inner.columns;
        self.inner
            .cells
            .iter()
            .enumerate()
            .filter(|(_, b)| **b)
            .map(move |(i, _)| (i / columns, i % columns))
    }

    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.inner.cells.iter().filter(|&&b| b).count()
    }

    /// Column paired with `row`, if any
    #[must_use]
    pub fn column_for(&self, row: usize) -> Option<usize> {
        self.inner.row(row).iter().position(|&b| b)
    }

    /// Fraction of requirement units that are filled (1.0 when there are none)
    #[must_use]
    pub fn coverage(&self) -> f64 {
        if self.inner.columns == 0 {
            return 1.0;
        }
        #[allow(clippy::cast_precision_loss)]
        {
            self.pair_count() as f64 / self.inner.columns as f64
        }
    }

    #[must_use]
    pub fn to_bits(&self) -> Vec<Vec<u8>> {
        self.inner.to_bits()
    }

    /// Check the pairing invariants against the grid it was computed from:
    /// pairs only on compatible cells, at most one pair per row and per column.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate_against(&self, grid: &CompatibilityGrid) -> Result<(), PairingViolation> {
        if (self.rows(), self.columns()) != (grid.rows(), grid.columns()) {
            return Err(PairingViolation::ShapeMismatch {
                pairing: (self.rows(), self.columns()),
                grid: (grid.rows(), grid.columns()),
            });
        }

        let mut row_used = vec![false; self.rows()];
        let mut column_used = vec![false; self.columns()];
        for (row, column) in self.pairs() {
            if !grid.get(row, column) {
                return Err(PairingViolation::Incompatible { row, column });
            }
            if std::mem::replace(&mut row_used[row], true) {
                return Err(PairingViolation::RowConflict { row });
            }
            if std::mem::replace(&mut column_used[column], true) {
                return Err(PairingViolation::ColumnConflict { column });
            }
        }
        Ok(())
    }
}

/// Grid plus the column metadata needed to map pairs back to events
#[derive(Debug, Clone)]
pub struct Requirements {
    pub grid: CompatibilityGrid,
    pub units: Vec<RequirementUnit>,
}

/// Expand event needs into requirement units and build the compatibility grid.
///
/// Each event contributes `count` units per (skill, count) need, in ascending
/// skill id order. A rescuer is compatible with a unit when their closed skill
/// set contains the unit's skill.
#[must_use]
pub fn expand_requirements(rescuers: &[Rescuer], events: &[Event]) -> Requirements {
    let units: Vec<RequirementUnit> = events
        .iter()
        .flat_map(|event| {
            event.needs().flat_map(move |(skill, count)| {
                (0..count).map(move |repetition| RequirementUnit {
                    event: event.id,
                    skill,
                    repetition,
                })
            })
        })
        .collect();

    let mut inner = BitMatrix::new(rescuers.len(), units.len());
    for (row, rescuer) in rescuers.iter().enumerate() {
        for (column, unit) in units.iter().enumerate() {
            if rescuer.has_skill(unit.skill) {
                inner.set(row, column, true);
            }
        }
    }

    debug!(
        rescuers = rescuers.len(),
        units = units.len(),
        "Built compatibility grid"
    );

    Requirements {
        grid: CompatibilityGrid { inner },
        units,
    }
}
