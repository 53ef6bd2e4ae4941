//! Skill prerequisite hierarchy.
//!
//! - [`graph`]: Acyclicity and reachability checks over the adjacency matrix
//! - [`hierarchy`]: The direct edge table and the validated closure built from it
//!
//! The hierarchy is built once at startup and passed by reference to every
//! consumer; nothing in the crate holds it in a global.

pub mod graph;
pub mod hierarchy;

pub use hierarchy::{DependencyTable, HierarchyError, SkillExpansion, SkillHierarchy};
