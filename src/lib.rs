//! # rescue-planner
//!
//! A library for assigning certified rescuers to medical-support deployments
//! at sporting events.
//!
//! Each deployment (an event) asks for a number of rescuers per skill. Skills
//! form a prerequisite hierarchy: a rescuer certified CO also holds CP, CE,
//! PSE2 and PSE1. `rescue-planner` expands every event's needs into single
//! requirement units, builds the rescuer × unit compatibility grid and pairs
//! each rescuer with at most one unit.
//!
//! ## Features
//!
//! - **Skill closure**: Prerequisites are expanded once, with cycle detection
//! - **Greedy matching**: Least-constrained-first heuristic for large rosters
//! - **Exhaustive matching**: Backtracking search for a maximum pairing
//! - **Size guard**: Exhaustive search refuses grids beyond a configurable limit
//! - **Idempotent application**: Re-applying a pairing adds nothing twice
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use rescue_planner::{AssignmentApplier, MatchingEngine, Roster, SkillHierarchy};
//!
//! // Build the skill closure from the embedded dependency table
//! let hierarchy = SkillHierarchy::load_embedded().unwrap();
//!
//! // Load rescuers and events
//! let mut roster = Roster::load_from_file(Path::new("roster.json"), &hierarchy).unwrap();
//!
//! // Pair rescuers with requirement units and record the assignments
//! let outcome = MatchingEngine::new()
//!     .run(roster.rescuers(), roster.events())
//!     .unwrap();
//! let report = AssignmentApplier::new()
//!     .apply(&outcome.pairing, &outcome.requirements.units, &mut roster)
//!     .unwrap();
//!
//! println!("{} of {} units filled", report.links.len(), outcome.unit_count());
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Skills, rescuers, events and identifiers
//! - [`skills`]: Dependency table and skill closure
//! - [`matching`]: Compatibility grid, matchers, engine and applier
//! - [`roster`]: JSON roster storage
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod matching;
pub mod roster;
pub mod skills;
pub mod utils;

// Re-export commonly used types for convenience
pub use core::event::Event;
pub use core::rescuer::Rescuer;
pub use core::skill::Skill;
pub use core::types::*;
pub use matching::apply::AssignmentApplier;
pub use matching::engine::{MatchOutcome, MatchingEngine};
pub use roster::store::Roster;
pub use skills::hierarchy::SkillHierarchy;
