use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::core::rescuer::Rescuer;
use crate::core::skill::Skill;
use crate::core::types::{EventId, RescuerId};
use crate::matching::grid::{PairingMatrix, RequirementUnit};

/// Resolves a grid row to the live rescuer it was built from
pub trait RescuerLookup {
    fn rescuer_at_mut(&mut self, row: usize) -> Option<&mut Rescuer>;
}

impl RescuerLookup for [Rescuer] {
    fn rescuer_at_mut(&mut self, row: usize) -> Option<&mut Rescuer> {
        self.get_mut(row)
    }
}

impl RescuerLookup for Vec<Rescuer> {
    fn rescuer_at_mut(&mut self, row: usize) -> Option<&mut Rescuer> {
        self.as_mut_slice().rescuer_at_mut(row)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ApplyError {
    #[error("Pairing has {pairing} columns but {units} requirement units were supplied")]
    ColumnMismatch { pairing: usize, units: usize },
}

/// One (rescuer, event) link written by the applier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignmentLink {
    pub row: usize,
    pub rescuer: RescuerId,
    pub event: EventId,
    pub skill: Skill,
    /// False when the rescuer already held this event
    pub newly_added: bool,
}

/// Summary of one application pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    pub links: Vec<AssignmentLink>,
    /// Rows that resolved to no rescuer and were skipped
    pub missing_rows: Vec<usize>,
}

impl ApplyReport {
    #[must_use]
    pub fn added(&self) -> usize {
        self.links.iter().filter(|l| l.newly_added).count()
    }

    #[must_use]
    pub fn already_held(&self) -> usize {
        self.links.len() - self.added()
    }
}

/// Writes a computed pairing back onto rescuer assignment sets.
///
/// Only the rescuers are mutated; the pairing and unit list are read-only.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssignmentApplier;

impl AssignmentApplier {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Add the event of every paired unit to the paired rescuer.
    ///
    /// Adding an event the rescuer already holds is a no-op. Rows the lookup
    /// cannot resolve are skipped, logged and listed in the report.
    ///
    /// # Errors
    ///
    /// Returns `ApplyError::ColumnMismatch` if `units` does not describe the
    /// pairing's columns.
    pub fn apply<L>(
        &self,
        pairing: &PairingMatrix,
        units: &[RequirementUnit],
        lookup: &mut L,
    ) -> Result<ApplyReport, ApplyError>
    where
        L: RescuerLookup + ?Sized,
    {
        if pairing.columns() != units.len() {
            return Err(ApplyError::ColumnMismatch {
                pairing: pairing.columns(),
                units: units.len(),
            });
        }

        let mut report = ApplyReport::default();
        for (row, column) in pairing.pairs() {
            let unit = &units[column];
            let Some(rescuer) = lookup.rescuer_at_mut(row) else {
                warn!(row, event = %unit.event, "No rescuer found for row, skipping");
                if report.missing_rows.last() != Some(&row) {
                    report.missing_rows.push(row);
                }
                continue;
            };

            let newly_added = rescuer.add_assignment(unit.event);
            if newly_added {
                info!(
                    rescuer = %rescuer.id,
                    event = %unit.event,
                    skill = %unit.skill,
                    "Assigned rescuer to event"
                );
            }
            report.links.push(AssignmentLink {
                row,
                rescuer: rescuer.id,
                event: unit.event,
                skill: unit.skill,
                newly_added,
            });
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::engine::Matcher;
    use crate::matching::exhaustive::ExhaustiveMatcher;
    use crate::matching::grid::CompatibilityGrid;

    fn units() -> Vec<RequirementUnit> {
        vec![
            RequirementUnit {
                event: EventId(10),
                skill: Skill::Pse1,
                repetition: 0,
            },
            RequirementUnit {
                event: EventId(11),
                skill: Skill::Ssa,
                repetition: 0,
            },
        ]
    }

    fn pairing(bits: &[&[u8]]) -> PairingMatrix {
        let grid = CompatibilityGrid::from_bits(bits).unwrap();
        ExhaustiveMatcher.find_pairing(&grid)
    }

    fn rescuers(n: u32) -> Vec<Rescuer> {
        (1..=n)
            .map(|i| Rescuer::new(RescuerId(i), format!("r{i}")))
            .collect()
    }

    #[test]
    fn test_apply_links_rows_to_events() {
        let mut team = rescuers(2);
        let report = AssignmentApplier
            .apply(&pairing(&[&[1, 0], &[0, 1]]), &units(), &mut team)
            .unwrap();

        assert_eq!(report.added(), 2);
        assert_eq!(team[0].assignments(), &[EventId(10)]);
        assert_eq!(team[1].assignments(), &[EventId(11)]);
        assert_eq!(report.links[1].rescuer, RescuerId(2));
    }

    #[test]
    fn test_apply_twice_is_idempotent() {
        let mut team = rescuers(2);
        let p = pairing(&[&[1, 0], &[0, 1]]);
        AssignmentApplier.apply(&p, &units(), &mut team).unwrap();
        let snapshot = team.clone();

        let report = AssignmentApplier.apply(&p, &units(), &mut team).unwrap();
        assert_eq!(report.added(), 0);
        assert_eq!(report.already_held(), 2);
        assert_eq!(team, snapshot);
    }

    #[test]
    fn test_missing_row_is_skipped() {
        // Pairing built for three rescuers, only two are live
        let mut team = rescuers(2);
        let p = pairing(&[&[0, 0], &[1, 0], &[0, 1]]);
        let report = AssignmentApplier.apply(&p, &units(), &mut team).unwrap();

        assert_eq!(report.missing_rows, vec![2]);
        assert_eq!(report.added(), 1);
        assert_eq!(team[1].assignments(), &[EventId(10)]);
        assert!(team[0].assignments().is_empty());
    }

    #[test]
    fn test_column_mismatch_rejected() {
        let mut team = rescuers(1);
        let p = pairing(&[&[1, 0, 0]]);
        let err = AssignmentApplier.apply(&p, &units(), &mut team).unwrap_err();
        assert_eq!(
            err,
            ApplyError::ColumnMismatch {
                pairing: 3,
                units: 2
            }
        );
    }

    #[test]
    fn test_apply_on_slice() {
        let mut team = rescuers(1);
        let p = pairing(&[&[0, 1]]);
        AssignmentApplier
            .apply(&p, &units(), team.as_mut_slice())
            .unwrap();
        assert_eq!(team[0].assignments(), &[EventId(11)]);
    }
}
