use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::event::Event;
use crate::core::rescuer::Rescuer;
use crate::core::types::Strategy;
use crate::matching::exhaustive::ExhaustiveMatcher;
use crate::matching::greedy::GreedyMatcher;
use crate::matching::grid::{expand_requirements, CompatibilityGrid, PairingMatrix, Requirements};
use crate::utils::validation::{check_snapshot_size, count_units, ValidationError};

/// A strategy that turns a compatibility grid into a one-to-one pairing.
///
/// Implementations return a fresh [`PairingMatrix`] of the grid's shape with
/// pairs only on compatible cells and at most one pair per row and column. A
/// grid with a zero dimension yields an all-zero pairing.
pub trait Matcher {
    fn name(&self) -> &'static str;

    fn find_pairing(&self, grid: &CompatibilityGrid) -> PairingMatrix;
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MatchError {
    #[error(
        "Grid of {rows} rescuers x {columns} units exceeds the exhaustive search limit \
         ({max_rows} x {max_columns}); use the greedy strategy or raise the limit"
    )]
    GridTooLarge {
        rows: usize,
        columns: usize,
        max_rows: usize,
        max_columns: usize,
    },

    #[error("Snapshot cannot be expanded: {0}")]
    Snapshot(#[from] ValidationError),
}

/// Default maximum number of rescuers for exhaustive search.
///
/// A dense 8 x 10 grid is searched in well under a second; one more rescuer
/// and unit multiplies the search by about twenty.
pub const DEFAULT_MAX_EXHAUSTIVE_ROWS: usize = 8;

/// Default maximum number of requirement units for exhaustive search
pub const DEFAULT_MAX_EXHAUSTIVE_COLUMNS: usize = 10;

/// Size guard for the exponential exhaustive search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExhaustiveLimit {
    pub max_rows: usize,
    pub max_columns: usize,
}

impl Default for ExhaustiveLimit {
    fn default() -> Self {
        Self {
            max_rows: DEFAULT_MAX_EXHAUSTIVE_ROWS,
            max_columns: DEFAULT_MAX_EXHAUSTIVE_COLUMNS,
        }
    }
}

impl ExhaustiveLimit {
    #[must_use]
    pub fn allows(&self, grid: &CompatibilityGrid) -> bool {
        grid.rows() <= self.max_rows && grid.columns() <= self.max_columns
    }

    /// A limit that admits every grid
    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            max_rows: usize::MAX,
            max_columns: usize::MAX,
        }
    }
}

/// Configuration for the matching engine
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Requested strategy
    pub strategy: Strategy,
    /// Grids larger than this are refused by the exhaustive strategy
    pub exhaustive_limit: ExhaustiveLimit,
}

/// Everything produced by one expand + match run
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    /// Grid and column metadata the pairing refers to
    pub requirements: Requirements,

    pub pairing: PairingMatrix,

    /// Strategy actually used (never `Auto`)
    pub strategy: Strategy,

    /// Time spent in the matcher
    pub elapsed: Duration,
}

impl MatchOutcome {
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.pairing.pair_count()
    }

    #[must_use]
    pub fn unit_count(&self) -> usize {
        self.requirements.units.len()
    }
}

/// The main matching engine
#[derive(Debug, Clone, Default)]
pub struct MatchingEngine {
    config: MatchingConfig,
}

impl MatchingEngine {
    /// Create a new matching engine with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new matching engine with custom configuration
    #[must_use]
    pub fn with_config(config: MatchingConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Resolve the configured strategy for a given grid.
    ///
    /// # Errors
    ///
    /// Returns `MatchError::GridTooLarge` when exhaustive search is requested
    /// explicitly for a grid outside the size guard.
    pub fn resolve_strategy(&self, grid: &CompatibilityGrid) -> Result<Strategy, MatchError> {
        let limit = &self.config.exhaustive_limit;
        match self.config.strategy {
            Strategy::Greedy => Ok(Strategy::Greedy),
            Strategy::Exhaustive if limit.allows(grid) => Ok(Strategy::Exhaustive),
            Strategy::Exhaustive => Err(MatchError::GridTooLarge {
                rows: grid.rows(),
                columns: grid.columns(),
                max_rows: limit.max_rows,
                max_columns: limit.max_columns,
            }),
            Strategy::Auto if limit.allows(grid) => Ok(Strategy::Exhaustive),
            Strategy::Auto => {
                warn!(
                    rows = grid.rows(),
                    columns = grid.columns(),
                    "Grid too large for exhaustive search, falling back to greedy"
                );
                Ok(Strategy::Greedy)
            }
        }
    }

    /// Compute a pairing for an already-built grid.
    ///
    /// # Errors
    ///
    /// Returns `MatchError::GridTooLarge` if the exhaustive size guard refuses the grid.
    pub fn pair(&self, grid: &CompatibilityGrid) -> Result<(Strategy, PairingMatrix), MatchError> {
        let strategy = self.resolve_strategy(grid)?;
        let matcher: &dyn Matcher = match strategy {
            Strategy::Exhaustive => &ExhaustiveMatcher,
            Strategy::Greedy | Strategy::Auto => &GreedyMatcher,
        };

        let pairing = matcher.find_pairing(grid);
        debug!(
            matcher = matcher.name(),
            pairs = pairing.pair_count(),
            units = grid.columns(),
            "Computed pairing"
        );
        Ok((strategy, pairing))
    }

    /// Expand the snapshot into requirement units and the compatibility grid.
    ///
    /// The snapshot is sized before anything is allocated.
    ///
    /// # Errors
    ///
    /// Returns `MatchError::Snapshot` if the rescuers or units exceed the
    /// limits in [`crate::utils::validation`].
    pub fn expand(&self, rescuers: &[Rescuer], events: &[Event]) -> Result<Requirements, MatchError> {
        check_snapshot_size(rescuers.len(), count_units(events))?;
        Ok(expand_requirements(rescuers, events))
    }

    /// Expand the snapshot into a grid and pair it.
    ///
    /// # Errors
    ///
    /// Returns `MatchError::Snapshot` if the snapshot is too large to expand, or
    /// `MatchError::GridTooLarge` if the exhaustive size guard refuses the grid.
    pub fn run(&self, rescuers: &[Rescuer], events: &[Event]) -> Result<MatchOutcome, MatchError> {
        let requirements = self.expand(rescuers, events)?;

        let start = Instant::now();
        let (strategy, pairing) = self.pair(&requirements.grid)?;
        let elapsed = start.elapsed();

        Ok(MatchOutcome {
            requirements,
            pairing,
            strategy,
            elapsed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::skill::Skill;
    use crate::core::types::{EventId, RescuerId};
    use crate::skills::hierarchy::SkillHierarchy;

    fn snapshot() -> (Vec<Rescuer>, Vec<Event>) {
        let h = SkillHierarchy::load_embedded().unwrap();
        let rescuers = vec![
            Rescuer::new(RescuerId(1), "a").with_skills(&h, [Skill::Co]),
            Rescuer::new(RescuerId(2), "b").with_skills(&h, [Skill::Pse1]),
            Rescuer::new(RescuerId(3), "c").with_skills(&h, [Skill::Ssa]),
        ];
        let events = vec![
            Event::new(EventId(10))
                .with_need(Skill::Cp, 1)
                .with_need(Skill::Pse1, 1),
            Event::new(EventId(11)).with_need(Skill::Ssa, 1),
        ];
        (rescuers, events)
    }

    fn grid(rows: usize, columns: usize) -> CompatibilityGrid {
        CompatibilityGrid::from_rows(vec![vec![true; columns]; rows]).unwrap()
    }

    fn engine(strategy: Strategy) -> MatchingEngine {
        MatchingEngine::with_config(MatchingConfig {
            strategy,
            ..MatchingConfig::default()
        })
    }

    #[test]
    fn test_run_fills_every_unit() {
        let (rescuers, events) = snapshot();
        for strategy in [Strategy::Greedy, Strategy::Exhaustive, Strategy::Auto] {
            let outcome = engine(strategy).run(&rescuers, &events).unwrap();
            assert_eq!(outcome.unit_count(), 3);
            assert_eq!(outcome.pair_count(), 3, "strategy {strategy}");
            outcome
                .pairing
                .validate_against(&outcome.requirements.grid)
                .unwrap();
        }
    }

    #[test]
    fn test_auto_resolves_by_size() {
        let engine = engine(Strategy::Auto);
        assert_eq!(engine.resolve_strategy(&grid(3, 3)), Ok(Strategy::Exhaustive));
        assert_eq!(engine.resolve_strategy(&grid(50, 3)), Ok(Strategy::Greedy));
    }

    #[test]
    fn test_exhaustive_refuses_large_grid() {
        let err = engine(Strategy::Exhaustive)
            .pair(&grid(DEFAULT_MAX_EXHAUSTIVE_ROWS + 1, 2))
            .unwrap_err();
        assert_eq!(
            err,
            MatchError::GridTooLarge {
                rows: DEFAULT_MAX_EXHAUSTIVE_ROWS + 1,
                columns: 2,
                max_rows: DEFAULT_MAX_EXHAUSTIVE_ROWS,
                max_columns: DEFAULT_MAX_EXHAUSTIVE_COLUMNS,
            }
        );
    }

    #[test]
    fn test_greedy_has_no_size_guard() {
        let (strategy, pairing) = engine(Strategy::Greedy).pair(&grid(200, 150)).unwrap();
        assert_eq!(strategy, Strategy::Greedy);
        assert_eq!(pairing.pair_count(), 150);
    }

    #[test]
    fn test_default_guard_admits_only_fast_grids() {
        let limit = ExhaustiveLimit::default();
        assert!(limit.allows(&grid(8, 10)));
        assert!(!limit.allows(&grid(9, 10)));
        assert!(!limit.allows(&grid(8, 11)));
        assert!(!limit.allows(&grid(10, 12)));

        // Largest dense grid the default admits
        let start = Instant::now();
        let (strategy, pairing) = engine(Strategy::Auto).pair(&grid(8, 10)).unwrap();
        assert_eq!(strategy, Strategy::Exhaustive);
        assert_eq!(pairing.pair_count(), 8);
        assert!(start.elapsed() < Duration::from_secs(30));
    }

    #[test]
    fn test_oversized_need_is_refused_before_expansion() {
        let (rescuers, _) = snapshot();
        let events = vec![Event::new(EventId(1)).with_need(Skill::Pse1, u32::MAX)];

        let err = engine(Strategy::Greedy).run(&rescuers, &events).unwrap_err();
        assert_eq!(
            err,
            MatchError::Snapshot(ValidationError::TooManyUnits(u32::MAX as usize))
        );
    }

    #[test]
    fn test_empty_snapshot() {
        let outcome = engine(Strategy::Exhaustive).run(&[], &[]).unwrap();
        assert_eq!(outcome.pair_count(), 0);
        assert_eq!(outcome.unit_count(), 0);
    }
}
