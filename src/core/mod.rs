//! Core data types for rescuer assignment.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`Skill`]: An enumerated certification with a stable integer id
//! - [`Rescuer`]: A volunteer with a closed skill set and assignments
//! - [`Event`]: A deployment declaring a head-count per skill
//! - [`RescuerId`], [`EventId`], [`Strategy`]: Identifier and selection types
//!
//! ## Skills
//!
//! | Id | Label | Implies |
//! |----|-------|---------|
//! | 0  | CP    | CE |
//! | 1  | CE    | PSE2 |
//! | 2  | CO    | CP |
//! | 3  | PSE1  | |
//! | 4  | PSE2  | PSE1 |
//! | 5  | SSA   | PSE1 |
//! | 6  | VPSP  | PSE2 |
//! | 7  | PBC   | |
//! | 8  | PBF   | PBC |
//!
//! The "Implies" column lists direct prerequisites from the embedded table;
//! a rescuer's skill set holds their transitive closure.
//!
//! [`Skill`]: skill::Skill
//! [`Rescuer`]: rescuer::Rescuer
//! [`Event`]: event::Event
//! [`RescuerId`]: types::RescuerId
//! [`EventId`]: types::EventId
//! [`Strategy`]: types::Strategy

pub mod event;
pub mod rescuer;
pub mod skill;
pub mod types;
