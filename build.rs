use std::path::Path;

use serde_json::Value;

const TABLE_PATH: &str = "catalogs/skill_dependencies.json";

/// Skill labels accepted in the dependency table, in id order.
const KNOWN_SKILLS: [&str; 9] = ["CP", "CE", "CO", "PSE1", "PSE2", "SSA", "VPSP", "PBC", "PBF"];

fn main() {
    println!("cargo:rerun-if-changed={TABLE_PATH}");
    println!("cargo:rerun-if-changed=build.rs");

    let table = load_table(Path::new(TABLE_PATH));
    let edges = check_dependencies(&table);

    println!("cargo:warning=Skill dependency table: {edges} direct edges");
}

/// Abort the build with a message pointing at the dependency table
fn reject(reason: &str) -> ! {
    panic!("invalid skill dependency table {TABLE_PATH}: {reason}");
}

fn load_table(path: &Path) -> Value {
    let contents = std::fs::read_to_string(path)
        .unwrap_or_else(|e| reject(&format!("cannot be read ({e})")));
    serde_json::from_str(&contents).unwrap_or_else(|e| reject(&format!("not valid JSON ({e})")))
}

/// Check every entry of the `dependencies` object and return the edge count
fn check_dependencies(table: &Value) -> usize {
    let Some(entries) = table.get("dependencies").and_then(Value::as_object) else {
        reject("expected a top-level \"dependencies\" object");
    };

    let mut edges = 0;
    for (skill, prerequisites) in entries {
        check_label(skill);

        let Some(list) = prerequisites.as_array() else {
            reject(&format!("prerequisites of {skill} must be an array"));
        };
        for prerequisite in list {
            let Some(label) = prerequisite.as_str() else {
                reject(&format!("prerequisite {prerequisite} of {skill} is not a string"));
            };
            check_label(label);
            if label == skill {
                reject(&format!("{skill} lists itself as a prerequisite"));
            }
        }
        edges += list.len();
    }
    edges
}

fn check_label(label: &str) {
    if !KNOWN_SKILLS.contains(&label) {
        reject(&format!(
            "unknown skill {label:?} (known: {})",
            KNOWN_SKILLS.join(", ")
        ));
    }
}
