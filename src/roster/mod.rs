//! In-memory roster of rescuers and deployments.
//!
//! The roster stands in for the persistence layer: it loads a JSON snapshot,
//! hands ordered rescuer and event slices to the matching engine, and
//! receives assignment updates through [`crate::matching::RescuerLookup`].
//!
//! ## Format
//!
//! ```json
//! {
//!   "version": "1.0.0",
//!   "rescuers": [
//!     {"id": 1, "identifier": "jdupont", "skills": ["CO", "SSA"], "assignments": []}
//!   ],
//!   "events": [
//!     {"id": 10, "site": "Stade", "sport": "Trail", "day": "2025-06-14", "needs": {"CP": 1, "PSE1": 3}}
//!   ]
//! }
//! ```
//!
//! Skill labels are expanded through the skill hierarchy on load, so the
//! in-memory skill sets are always closed.

pub mod store;

pub use store::{Roster, RosterError};
