use serde::Serialize;

use crate::cli::OutputFormat;
use crate::core::skill::Skill;
use crate::skills::hierarchy::SkillHierarchy;

#[derive(Debug, Serialize)]
struct SkillRow {
    id: u8,
    skill: Skill,
    requires: Vec<Skill>,
    implies: Vec<Skill>,
    /// Skills whose holders also hold this one
    implied_by: Vec<Skill>,
}

fn skill_rows(hierarchy: &SkillHierarchy) -> Vec<SkillRow> {
    Skill::ALL
        .iter()
        .map(|&skill| SkillRow {
            id: skill.id(),
            skill,
            requires: hierarchy.table().direct(skill).collect(),
            implies: hierarchy.closure_of(skill).iter().copied().collect(),
            implied_by: Skill::ALL
                .into_iter()
                .filter(|&other| hierarchy.closure_of(other).contains(&skill))
                .collect(),
        })
        .collect()
}

fn join(skills: &[Skill], separator: &str) -> String {
    skills
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}

/// Execute skills subcommand
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn run(format: OutputFormat, verbose: bool, hierarchy: &SkillHierarchy) -> anyhow::Result<()> {
    let rows = skill_rows(hierarchy);

    match format {
        OutputFormat::Text => {
            println!("Skill Hierarchy");
            println!("{}", "=".repeat(60));
            println!(
                "\n{} skills, {} direct prerequisite edges",
                rows.len(),
                hierarchy.table().edge_count()
            );

            println!("\n{:<4} {:<6} {:<16} Implies", "ID", "Skill", "Requires");
            for row in &rows {
                let requires = if row.requires.is_empty() {
                    "-".to_string()
                } else {
                    join(&row.requires, ", ")
                };
                let implies = if row.implies.is_empty() {
                    "-".to_string()
                } else {
                    join(&row.implies, ", ")
                };
                println!("{:<4} {:<6} {:<16} {}", row.id, row.skill, requires, implies);
                if verbose && !row.implied_by.is_empty() {
                    println!("     implied by {}", join(&row.implied_by, ", "));
                }
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "edges": hierarchy.table().edge_count(),
                "skills": rows,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("id\tskill\trequires\timplies\timplied_by");
            for row in &rows {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    row.id,
                    row.skill,
                    join(&row.requires, ","),
                    join(&row.implies, ","),
                    join(&row.implied_by, ",")
                );
            }
        }
    }

    Ok(())
}
