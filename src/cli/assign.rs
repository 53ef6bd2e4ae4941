use std::collections::HashSet;
use std::path::PathBuf;

use clap::Args;

use crate::cli::OutputFormat;
use crate::core::types::Strategy;
use crate::matching::apply::{ApplyReport, AssignmentApplier};
use crate::matching::engine::{
    ExhaustiveLimit, MatchOutcome, MatchingConfig, MatchingEngine, DEFAULT_MAX_EXHAUSTIVE_COLUMNS,
    DEFAULT_MAX_EXHAUSTIVE_ROWS,
};
use crate::roster::store::Roster;
use crate::skills::hierarchy::SkillHierarchy;
use crate::utils::validation::percent;

#[derive(Args)]
pub struct AssignArgs {
    /// Roster file (JSON) with rescuers and events
    #[arg(required = true)]
    pub roster: PathBuf,

    /// Matching strategy
    #[arg(short, long, value_enum, default_value = "greedy")]
    pub strategy: Strategy,

    #[command(flatten)]
    pub limit: LimitArgs,

    /// Drop existing assignments before matching
    #[arg(long)]
    pub reset: bool,

    /// Write the updated roster to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Size guard flags shared by commands that may run exhaustive search
#[derive(Args, Clone, Copy)]
pub struct LimitArgs {
    /// Largest number of rescuers allowed for exhaustive search
    #[arg(long, default_value_t = DEFAULT_MAX_EXHAUSTIVE_ROWS)]
    pub max_exhaustive_rows: usize,

    /// Largest number of requirement units allowed for exhaustive search
    #[arg(long, default_value_t = DEFAULT_MAX_EXHAUSTIVE_COLUMNS)]
    pub max_exhaustive_units: usize,
}

impl From<LimitArgs> for ExhaustiveLimit {
    fn from(args: LimitArgs) -> Self {
        Self {
            max_rows: args.max_exhaustive_rows,
            max_columns: args.max_exhaustive_units,
        }
    }
}

/// Execute assign subcommand
///
/// # Errors
///
/// Returns an error if the roster cannot be loaded, the snapshot is too large,
/// the exhaustive size guard refuses the grid, or the output cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(
    args: AssignArgs,
    format: OutputFormat,
    verbose: bool,
    hierarchy: &SkillHierarchy,
) -> anyhow::Result<()> {
    let mut roster = Roster::load_from_file(&args.roster, hierarchy)?;

    if verbose {
        eprintln!(
            "Loaded {} rescuers and {} events ({} unknown skill labels dropped)",
            roster.len(),
            roster.events().len(),
            roster.unknown_labels().len()
        );
    }

    if args.reset {
        roster.clear_assignments();
    }

    let engine = MatchingEngine::with_config(MatchingConfig {
        strategy: args.strategy,
        exhaustive_limit: args.limit.into(),
    });
    let outcome = engine.run(roster.rescuers(), roster.events())?;
    let report =
        AssignmentApplier::new().apply(&outcome.pairing, &outcome.requirements.units, &mut roster)?;

    match format {
        OutputFormat::Text => print_text_assignment(&roster, &outcome, &report),
        OutputFormat::Json => print_json_assignment(&roster, &outcome, &report)?,
        OutputFormat::Tsv => print_tsv_assignment(&roster, &outcome, &report),
    }

    if let Some(path) = &args.output {
        roster.save_to_file(path)?;
        if verbose {
            eprintln!("Wrote updated roster to {}", path.display());
        }
    }

    Ok(())
}

/// Column indices left without a rescuer
fn unfilled_columns(outcome: &MatchOutcome) -> Vec<usize> {
    let filled: HashSet<usize> = outcome.pairing.pairs().map(|(_, c)| c).collect();
    (0..outcome.unit_count())
        .filter(|c| !filled.contains(c))
        .collect()
}

fn print_text_assignment(roster: &Roster, outcome: &MatchOutcome, report: &ApplyReport) {
    println!("Assignment Results");
    println!("{}", "=".repeat(60));

    println!("\nStrategy: {}", outcome.strategy);
    println!(
        "Filled: {} of {} requirement units ({}%)",
        outcome.pair_count(),
        outcome.unit_count(),
        percent(outcome.pairing.coverage())
    );
    println!(
        "New assignments: {} (already held: {})",
        report.added(),
        report.already_held()
    );

    if !report.links.is_empty() {
        println!("\nAssignments:");
        for link in &report.links {
            let name = roster
                .rescuer(link.rescuer)
                .map_or_else(|| link.rescuer.to_string(), |r| r.display_name());
            let event = roster
                .event(link.event)
                .map_or_else(|| format!("#{}", link.event), |e| e.label());
            let marker = if link.newly_added { "" } else { " (unchanged)" };
            println!("  {name} -> {event} as {}{marker}", link.skill);
        }
    }

    let unfilled = unfilled_columns(outcome);
    if !unfilled.is_empty() {
        println!("\nUnfilled:");
        for column in unfilled {
            let unit = &outcome.requirements.units[column];
            println!(
                "  event #{} needs {} (slot {})",
                unit.event,
                unit.skill,
                unit.repetition + 1
            );
        }
    }

    if !report.missing_rows.is_empty() {
        println!(
            "\nWarning: {} paired rows had no rescuer and were skipped",
            report.missing_rows.len()
        );
    }
}

fn print_json_assignment(
    roster: &Roster,
    outcome: &MatchOutcome,
    report: &ApplyReport,
) -> anyhow::Result<()> {
    let unfilled: Vec<_> = unfilled_columns(outcome)
        .into_iter()
        .map(|c| outcome.requirements.units[c])
        .collect();

    let output = serde_json::json!({
        "roster": {
            "rescuers": roster.len(),
            "events": roster.events().len(),
        },
        "strategy": outcome.strategy,
        "units": outcome.unit_count(),
        "pairs": outcome.pair_count(),
        "coverage": outcome.pairing.coverage(),
        "elapsed_ms": outcome.elapsed.as_secs_f64() * 1000.0,
        "assignments": report.links,
        "unfilled": unfilled,
        "missing_rows": report.missing_rows,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_assignment(roster: &Roster, outcome: &MatchOutcome, report: &ApplyReport) {
    println!("rescuer_id\tidentifier\tevent_id\tskill\tnew");
    for link in &report.links {
        let identifier = roster
            .rescuer(link.rescuer)
            .map_or("", |r| r.identifier.as_str());
        println!(
            "{}\t{}\t{}\t{}\t{}",
            link.rescuer, identifier, link.event, link.skill, link.newly_added
        );
    }
    for column in unfilled_columns(outcome) {
        let unit = &outcome.requirements.units[column];
        println!("\t\t{}\t{}\t", unit.event, unit.skill);
    }
}
