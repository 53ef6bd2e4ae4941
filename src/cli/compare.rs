use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use serde::Serialize;

use crate::cli::assign::LimitArgs;
use crate::cli::OutputFormat;
use crate::matching::engine::{ExhaustiveLimit, Matcher, MatchingEngine};
use crate::matching::exhaustive::ExhaustiveMatcher;
use crate::matching::greedy::GreedyMatcher;
use crate::matching::grid::CompatibilityGrid;
use crate::roster::store::Roster;
use crate::skills::hierarchy::SkillHierarchy;
use crate::utils::validation::percent;

#[derive(Args)]
pub struct CompareArgs {
    /// Roster file (JSON) with rescuers and events
    #[arg(required = true)]
    pub roster: PathBuf,

    #[command(flatten)]
    pub limit: LimitArgs,

    /// Run exhaustive search even when the grid exceeds the size limit
    #[arg(long)]
    pub force: bool,
}

/// One matcher's result on the shared grid
#[derive(Debug, Serialize)]
struct MatcherRun {
    matcher: &'static str,
    pairs: usize,
    coverage: f64,
    elapsed_ms: f64,
}

impl MatcherRun {
    fn measure(matcher: &dyn Matcher, grid: &CompatibilityGrid) -> anyhow::Result<Self> {
        let start = Instant::now();
        let pairing = matcher.find_pairing(grid);
        let elapsed: Duration = start.elapsed();

        // Both matchers must uphold the one-to-one invariants
        pairing.validate_against(grid)?;

        Ok(Self {
            matcher: matcher.name(),
            pairs: pairing.pair_count(),
            coverage: pairing.coverage(),
            elapsed_ms: elapsed.as_secs_f64() * 1000.0,
        })
    }
}

/// Execute compare subcommand
///
/// # Errors
///
/// Returns an error if the roster cannot be loaded or the snapshot is too large.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(
    args: CompareArgs,
    format: OutputFormat,
    verbose: bool,
    hierarchy: &SkillHierarchy,
) -> anyhow::Result<()> {
    let roster = Roster::load_from_file(&args.roster, hierarchy)?;
    let requirements = MatchingEngine::new().expand(roster.rescuers(), roster.events())?;
    let grid = &requirements.grid;

    if verbose {
        eprintln!(
            "Compatibility grid: {} rescuers x {} requirement units",
            grid.rows(),
            grid.columns()
        );
    }

    let greedy = MatcherRun::measure(&GreedyMatcher, grid)?;

    let limit = if args.force {
        ExhaustiveLimit::unbounded()
    } else {
        ExhaustiveLimit::from(args.limit)
    };
    let exhaustive = if limit.allows(grid) {
        Some(MatcherRun::measure(&ExhaustiveMatcher, grid)?)
    } else {
        None
    };

    match format {
        OutputFormat::Text => print_text_comparison(grid, &greedy, exhaustive.as_ref()),
        OutputFormat::Json => print_json_comparison(grid, &greedy, exhaustive.as_ref())?,
        OutputFormat::Tsv => print_tsv_comparison(&greedy, exhaustive.as_ref()),
    }

    Ok(())
}

fn print_text_comparison(
    grid: &CompatibilityGrid,
    greedy: &MatcherRun,
    exhaustive: Option<&MatcherRun>,
) {
    println!("Matcher Comparison");
    println!("{}", "=".repeat(60));
    println!(
        "\nGrid: {} rescuers x {} requirement units",
        grid.rows(),
        grid.columns()
    );

    println!("\n{:<12} {:>8} {:>10} {:>12}", "Matcher", "Pairs", "Coverage", "Time (ms)");
    for run in std::iter::once(greedy).chain(exhaustive) {
        println!(
            "{:<12} {:>8} {:>9}% {:>12.3}",
            run.matcher,
            run.pairs,
            percent(run.coverage),
            run.elapsed_ms
        );
    }

    match exhaustive {
        Some(exact) if exact.pairs > greedy.pairs => println!(
            "\nGreedy left {} units unfilled that an optimal pairing fills.",
            exact.pairs - greedy.pairs
        ),
        Some(_) => println!("\nGreedy reached the optimum."),
        None => println!(
            "\nExhaustive search skipped: grid exceeds the size limit (use --force to run it anyway)."
        ),
    }
}

fn print_json_comparison(
    grid: &CompatibilityGrid,
    greedy: &MatcherRun,
    exhaustive: Option<&MatcherRun>,
) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "grid": {
            "rescuers": grid.rows(),
            "units": grid.columns(),
        },
        "greedy": greedy,
        "exhaustive": exhaustive,
        "greedy_is_optimal": exhaustive.map(|e| e.pairs == greedy.pairs),
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_comparison(greedy: &MatcherRun, exhaustive: Option<&MatcherRun>) {
    println!("matcher\tpairs\tcoverage\telapsed_ms");
    for run in std::iter::once(greedy).chain(exhaustive) {
        println!(
            "{}\t{}\t{:.4}\t{:.3}",
            run.matcher, run.pairs, run.coverage, run.elapsed_ms
        );
    }
}
