//! Command-line interface for rescue-planner.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **assign**: Match rescuers to deployment needs and record the assignments
//! - **compare**: Run the greedy and exhaustive matchers side by side
//! - **skills**: Show the skill hierarchy and each skill's closure
//! - **export**: List rescuers with their closed skills and assignments
//!
//! ## Usage
//!
//! ```text
//! # Assign with the greedy matcher and save the updated roster
//! rescue-planner assign roster.json --output roster.assigned.json
//!
//! # Exact matching on a small roster
//! rescue-planner assign roster.json --strategy exhaustive
//!
//! # How far is greedy from the optimum?
//! rescue-planner compare roster.json --format json
//!
//! # Inspect a custom dependency table
//! rescue-planner skills --dependencies my_table.json
//! ```

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::warn;

use crate::skills::hierarchy::{DependencyTable, SkillHierarchy};

pub mod assign;
pub mod compare;
pub mod export;
pub mod skills;

#[derive(Parser)]
#[command(name = "rescue-planner")]
#[command(author = "ResQ360")]
#[command(version)]
#[command(about = "Assign certified rescuers to medical-support deployments")]
#[command(
    long_about = "rescue-planner pairs rescuers with the skill quotas of medical-support deployments.\n\nSkills follow a prerequisite hierarchy (holding CO implies CP, CE, PSE2 and PSE1), and each rescuer fills at most one requirement unit per run. Two matchers are available:\n- greedy: fast least-constrained-first heuristic\n- exhaustive: backtracking search, optimal but limited to small rosters"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Custom skill dependency table (JSON) instead of the embedded one
    #[arg(long, global = true)]
    pub dependencies: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Match rescuers to deployment needs and record the assignments
    Assign(assign::AssignArgs),

    /// Compare greedy and exhaustive matching on the same roster
    Compare(compare::CompareArgs),

    /// Show the skill hierarchy
    Skills,

    /// List rescuers with their skills and assignments
    Export(export::ExportArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Build the skill hierarchy once for the whole command.
///
/// # Errors
///
/// Returns an error if the table cannot be loaded or its edges form a cycle.
pub fn load_hierarchy(dependencies: Option<&Path>) -> anyhow::Result<SkillHierarchy> {
    let table = match dependencies {
        Some(path) => DependencyTable::load_from_file(path)?,
        None => DependencyTable::load_embedded()?,
    };

    SkillHierarchy::new(table).map_err(|e| {
        warn!("Skill dependency table rejected: {e}");
        anyhow::anyhow!("Cannot expand skills: {e}")
    })
}
