//! Centralized validation and helper functions.

use crate::core::event::Event;

/// Maximum number of rescuers in a single matching run
pub const MAX_RESCUERS: usize = 50_000;

/// Maximum number of requirement units in a single matching run
pub const MAX_REQUIREMENT_UNITS: usize = 50_000;

/// Maximum number of grid cells (rescuers × units) allocated for one run
pub const MAX_GRID_CELLS: usize = 200_000_000;

/// Snapshot size validation error types
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Too many rescuers: {0} exceeds maximum of {MAX_RESCUERS}")]
    TooManyRescuers(usize),
    #[error("Too many requirement units: {0} exceeds maximum of {MAX_REQUIREMENT_UNITS}")]
    TooManyUnits(usize),
    #[error("Compatibility grid of {rows} x {columns} exceeds {MAX_GRID_CELLS} cells")]
    GridTooLarge { rows: usize, columns: usize },
}

/// Total number of requirement units the events expand to.
///
/// Saturates instead of overflowing so absurd head-counts are caught by
/// [`check_snapshot_size`] rather than wrapping.
#[must_use]
pub fn count_units(events: &[Event]) -> usize {
    events
        .iter()
        .fold(0usize, |acc, e| acc.saturating_add(e.total_units()))
}

/// Check that a snapshot can be expanded into a grid without excessive allocation.
///
/// Call this BEFORE building the grid.
///
/// # Errors
///
/// Returns the first limit the snapshot exceeds.
pub fn check_snapshot_size(rescuers: usize, units: usize) -> Result<(), ValidationError> {
    if rescuers > MAX_RESCUERS {
        return Err(ValidationError::TooManyRescuers(rescuers));
    }
    if units > MAX_REQUIREMENT_UNITS {
        return Err(ValidationError::TooManyUnits(units));
    }
    if rescuers.saturating_mul(units) > MAX_GRID_CELLS {
        return Err(ValidationError::GridTooLarge {
            rows: rescuers,
            columns: units,
        });
    }
    Ok(())
}

/// Helper function to convert a ratio to a whole percentage for display
#[inline]
#[must_use]
pub fn percent(ratio: f64) -> u32 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // Percentage 0-100
    {
        (ratio.clamp(0.0, 1.0) * 100.0).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::skill::Skill;
    use crate::core::types::EventId;

    #[test]
    fn test_count_units() {
        let events = vec![
            Event::new(EventId(1)).with_need(Skill::Pse1, 3),
            Event::new(EventId(2))
                .with_need(Skill::Ce, 1)
                .with_need(Skill::Pbc, 2),
        ];
        assert_eq!(count_units(&events), 6);
        assert_eq!(count_units(&[]), 0);
    }

    #[test]
    fn test_check_snapshot_size() {
        assert!(check_snapshot_size(100, 100).is_ok());
        assert!(check_snapshot_size(0, MAX_REQUIREMENT_UNITS).is_ok());
        assert_eq!(
            check_snapshot_size(MAX_RESCUERS + 1, 1),
            Err(ValidationError::TooManyRescuers(MAX_RESCUERS + 1))
        );
        assert_eq!(
            check_snapshot_size(1, MAX_REQUIREMENT_UNITS + 1),
            Err(ValidationError::TooManyUnits(MAX_REQUIREMENT_UNITS + 1))
        );
        assert_eq!(
            check_snapshot_size(MAX_RESCUERS, MAX_REQUIREMENT_UNITS),
            Err(ValidationError::GridTooLarge {
                rows: MAX_RESCUERS,
                columns: MAX_REQUIREMENT_UNITS
            })
        );
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(0.0), 0);
        assert_eq!(percent(0.666), 67);
        assert_eq!(percent(1.0), 100);
        assert_eq!(percent(1.5), 100);
    }
}
