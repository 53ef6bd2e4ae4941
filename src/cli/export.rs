use std::path::PathBuf;

use clap::Args;

use crate::cli::OutputFormat;
use crate::core::skill::Skill;
use crate::roster::store::Roster;
use crate::skills::hierarchy::SkillHierarchy;

#[derive(Args)]
pub struct ExportArgs {
    /// Roster file (JSON) with rescuers and events
    #[arg(required = true)]
    pub roster: PathBuf,
}

fn skill_list(skills: impl IntoIterator<Item = Skill>, separator: &str) -> String {
    skills
        .into_iter()
        .map(|s| s.name())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Execute export subcommand
///
/// # Errors
///
/// Returns an error if the roster cannot be loaded or serialized.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(
    args: ExportArgs,
    format: OutputFormat,
    verbose: bool,
    hierarchy: &SkillHierarchy,
) -> anyhow::Result<()> {
    let roster = Roster::load_from_file(&args.roster, hierarchy)?;

    match format {
        OutputFormat::Text => {
            println!("Roster");
            println!("{}", "=".repeat(60));
            println!(
                "\n{} rescuers, {} events",
                roster.len(),
                roster.events().len()
            );

            for rescuer in roster.rescuers() {
                println!("\n{} ({})", rescuer.display_name(), rescuer.id);
                println!("  Skills: {}", skill_list(rescuer.skills().iter().copied(), ", "));
                if rescuer.assignments().is_empty() {
                    println!("  Assignments: none");
                } else {
                    println!("  Assignments:");
                    for &event in rescuer.assignments() {
                        let label = roster
                            .event(event)
                            .map_or_else(|| format!("#{event} (unknown event)"), |e| e.label());
                        println!("    {label}");
                    }
                }
            }

            if verbose && !roster.unknown_labels().is_empty() {
                println!("\nDropped skill labels:");
                for unknown in roster.unknown_labels() {
                    println!("  {}: '{}'", unknown.rescuer, unknown.label);
                }
            }
        }
        OutputFormat::Json => {
            // Closed skill sets, unlike the raw labels kept in the roster file
            let output = serde_json::json!({
                "rescuers": roster.rescuers(),
                "events": roster.events(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("rescuer_id\tidentifier\tname\tskills\tassignments");
            for rescuer in roster.rescuers() {
                let assignments = rescuer
                    .assignments()
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(",");
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    rescuer.id,
                    rescuer.identifier,
                    rescuer.display_name(),
                    skill_list(rescuer.skills().iter().copied(), ","),
                    assignments
                );
            }
        }
    }

    Ok(())
}
