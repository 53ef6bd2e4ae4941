//! Rescuer-to-requirement matching.
//!
//! This module provides the matching pipeline:
//!
//! - [`expand_requirements`]: Expands event needs into requirement units and
//!   builds the rescuer × unit [`CompatibilityGrid`]
//! - [`GreedyMatcher`]: Least-constrained-first heuristic for large grids
//! - [`ExhaustiveMatcher`]: Backtracking search returning a maximum pairing
//! - [`MatchingEngine`]: Strategy selection and the exhaustive size guard
//! - [`AssignmentApplier`]: Writes a pairing back onto rescuer assignments
//!
//! ## Pairing invariants
//!
//! Every [`PairingMatrix`] returned by a [`Matcher`] has the grid's shape and:
//!
//! 1. pairs only cells that are compatible in the grid
//! 2. pairs each rescuer (row) at most once
//! 3. pairs each requirement unit (column) at most once
//!
//! [`PairingMatrix::validate_against`] checks all three.
//!
//! ## Example
//!
//! ```rust
//! use rescue_planner::core::event::Event;
//! use rescue_planner::core::rescuer::Rescuer;
//! use rescue_planner::core::skill::Skill;
//! use rescue_planner::core::types::{EventId, RescuerId};
//! use rescue_planner::matching::{AssignmentApplier, MatchingEngine};
//! use rescue_planner::skills::SkillHierarchy;
//!
//! let hierarchy = SkillHierarchy::load_embedded().unwrap();
//! let mut rescuers = vec![
//!     Rescuer::new(RescuerId(1), "jdupont").with_skills(&hierarchy, [Skill::Co]),
//!     Rescuer::new(RescuerId(2), "mmartin").with_skills(&hierarchy, [Skill::Ssa]),
//! ];
//! let events = vec![Event::new(EventId(7))
//!     .with_need(Skill::Cp, 1)
//!     .with_need(Skill::Pse1, 1)];
//!
//! let outcome = MatchingEngine::new().run(&rescuers, &events).unwrap();
//! assert_eq!(outcome.pair_count(), 2);
//!
//! AssignmentApplier::new()
//!     .apply(&outcome.pairing, &outcome.requirements.units, &mut rescuers)
//!     .unwrap();
//! assert!(rescuers.iter().all(|r| r.is_assigned_to(EventId(7))));
//! ```

pub mod apply;
pub mod engine;
pub mod exhaustive;
pub mod greedy;
pub mod grid;

pub use apply::{ApplyReport, AssignmentApplier, RescuerLookup};
pub use engine::{ExhaustiveLimit, MatchError, MatchOutcome, Matcher, MatchingConfig, MatchingEngine};
pub use exhaustive::ExhaustiveMatcher;
pub use greedy::GreedyMatcher;
pub use grid::{expand_requirements, CompatibilityGrid, PairingMatrix, RequirementUnit, Requirements};
