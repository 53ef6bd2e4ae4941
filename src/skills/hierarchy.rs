use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::skill::Skill;
use crate::skills::graph;

#[derive(Error, Debug)]
pub enum HierarchyError {
    #[error("Skill dependencies contain a cycle through: {}", format_skills(.0))]
    Cycle(Vec<Skill>),

    #[error("Adjacency matrix is not square: row {row} has {len} cells, expected {expected}")]
    NonSquareMatrix {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("Unknown skill '{0}' in dependency table")]
    UnknownSkill(String),

    #[error("Failed to read dependency table: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse dependency table: {0}")]
    ParseError(#[from] serde_json::Error),
}

fn format_skills(skills: &[Skill]) -> String {
    skills
        .iter()
        .map(|s| s.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Dependency table version for compatibility checking
pub const DEPENDENCY_TABLE_VERSION: &str = "1.0.0";

/// Serializable dependency table format, keyed by skill label
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyTableData {
    pub version: String,
    pub dependencies: BTreeMap<String, Vec<String>>,
}

/// Direct prerequisite edges: holding the key skill implies holding each listed skill
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyTable {
    edges: BTreeMap<Skill, BTreeSet<Skill>>,
}

impl DependencyTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the table embedded at build time
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded JSON cannot be parsed.
    pub fn load_embedded() -> Result<Self, HierarchyError> {
        // Validated at compile time by build.rs
        const EMBEDDED_TABLE: &str = include_str!("../../catalogs/skill_dependencies.json");
        Self::from_json(EMBEDDED_TABLE)
    }

    /// Load a table from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or names an unknown skill.
    pub fn load_from_file(path: &Path) -> Result<Self, HierarchyError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse a table from a JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or names an unknown skill.
    pub fn from_json(json: &str) -> Result<Self, HierarchyError> {
        let data: DependencyTableData = serde_json::from_str(json)?;

        if data.version != DEPENDENCY_TABLE_VERSION {
            warn!(
                expected = DEPENDENCY_TABLE_VERSION,
                found = %data.version,
                "Dependency table version mismatch"
            );
        }

        let parse = |label: &str| {
            label
                .parse::<Skill>()
                .map_err(|_| HierarchyError::UnknownSkill(label.to_string()))
        };

        let mut table = Self::new();
        for (skill, prerequisites) in &data.dependencies {
            let skill = parse(skill)?;
            table.edges.entry(skill).or_default();
            for prerequisite in prerequisites {
                table.add_edge(skill, parse(prerequisite)?);
            }
        }
        Ok(table)
    }

    /// Export the table to JSON
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, HierarchyError> {
        let data = DependencyTableData {
            version: DEPENDENCY_TABLE_VERSION.to_string(),
            dependencies: self
                .edges
                .iter()
                .map(|(skill, prerequisites)| {
                    (
                        skill.name().to_string(),
                        prerequisites.iter().map(|p| p.name().to_string()).collect(),
                    )
                })
                .collect(),
        };
        Ok(serde_json::to_string_pretty(&data)?)
    }

    /// Record that `skill` directly requires `prerequisite`
    pub fn add_edge(&mut self, skill: Skill, prerequisite: Skill) {
        self.edges.entry(skill).or_default().insert(prerequisite);
    }

    pub fn remove_edge(&mut self, skill: Skill, prerequisite: Skill) -> bool {
        self.edges
            .get_mut(&skill)
            .is_some_and(|set| set.remove(&prerequisite))
    }

    /// Direct prerequisites of a skill
    pub fn direct(&self, skill: Skill) -> impl Iterator<Item = Skill> + '_ {
        self.edges.get(&skill).into_iter().flatten().copied()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeSet::len).sum()
    }

    /// Square adjacency matrix indexed by skill id
    #[must_use]
    pub fn adjacency_matrix(&self) -> Vec<Vec<bool>> {
        let mut matrix = vec![vec![false; Skill::COUNT]; Skill::COUNT];
        for (skill, prerequisites) in &self.edges {
            for prerequisite in prerequisites {
                matrix[skill.index()][prerequisite.index()] = true;
            }
        }
        matrix
    }
}

/// Result of expanding raw skill labels through the hierarchy
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillExpansion {
    /// Closed skill set: every valid label plus everything it implies
    pub skills: BTreeSet<Skill>,
    /// Labels that named no known skill, in input order
    pub unknown: Vec<String>,
}

/// Validated skill hierarchy with the precomputed closure of every skill.
///
/// Built once from a [`DependencyTable`]; the direct graph is checked for
/// cycles before any closure is computed. A changed table needs a new
/// hierarchy, which recomputes every closure.
#[derive(Debug, Clone)]
pub struct SkillHierarchy {
    table: DependencyTable,
    /// closure[skill.index()] = every skill implied by `skill`, excluding itself
    closure: Vec<BTreeSet<Skill>>,
}

impl SkillHierarchy {
    /// Build the hierarchy from direct edges.
    ///
    /// # Errors
    ///
    /// Returns `HierarchyError::Cycle` if the direct edges form a cycle.
    pub fn new(table: DependencyTable) -> Result<Self, HierarchyError> {
        let cyclic = graph::cyclic_vertices(&table.adjacency_matrix())?;
        if !cyclic.is_empty() {
            let skills: Vec<Skill> = cyclic
                .into_iter()
                .filter_map(|i| u8::try_from(i).ok().and_then(Skill::from_id))
                .collect();
            warn!("Refusing to build skill hierarchy: dependency graph is not acyclic");
            return Err(HierarchyError::Cycle(skills));
        }

        let closure = Skill::ALL
            .iter()
            .map(|&skill| Self::reachable_from(&table, skill))
            .collect();

        debug!(edges = table.edge_count(), "Built skill hierarchy");
        Ok(Self { table, closure })
    }

    /// Build the hierarchy from the embedded dependency table
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded table cannot be parsed or is cyclic.
    pub fn load_embedded() -> Result<Self, HierarchyError> {
        Self::new(DependencyTable::load_embedded()?)
    }

    /// Worklist traversal of direct edges starting at `start`
    fn reachable_from(table: &DependencyTable, start: Skill) -> BTreeSet<Skill> {
        let mut seen = BTreeSet::new();
        let mut pending: Vec<Skill> = table.direct(start).collect();
        while let Some(skill) = pending.pop() {
            if skill != start && seen.insert(skill) {
                pending.extend(table.direct(skill).filter(|s| !seen.contains(s)));
            }
        }
        seen
    }

    /// Every skill implied by `skill`, excluding `skill` itself
    #[must_use]
    pub fn closure_of(&self, skill: Skill) -> &BTreeSet<Skill> {
        &self.closure[skill.index()]
    }

    /// The direct edges this hierarchy was built from
    #[must_use]
    pub fn table(&self) -> &DependencyTable {
        &self.table
    }

    /// Close a set of skills under the hierarchy
    pub fn expand<I>(&self, skills: I) -> BTreeSet<Skill>
    where
        I: IntoIterator<Item = Skill>,
    {
        let mut closed = BTreeSet::new();
        for skill in skills {
            closed.insert(skill);
            closed.extend(self.closure_of(skill).iter().copied());
        }
        closed
    }

    /// Parse raw labels and close the valid ones under the hierarchy.
    ///
    /// Unknown labels are dropped and reported in [`SkillExpansion::unknown`];
    /// the remaining labels are still expanded.
    pub fn expand_labels<I, S>(&self, labels: I) -> SkillExpansion
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut valid = Vec::new();
        let mut unknown = Vec::new();
        for label in labels {
            let label = label.as_ref();
            match label.parse::<Skill>() {
                Ok(skill) => valid.push(skill),
                Err(_) => unknown.push(label.to_string()),
            }
        }

        SkillExpansion {
            skills: self.expand(valid),
            unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hierarchy() -> SkillHierarchy {
        SkillHierarchy::load_embedded().unwrap()
    }

    #[test]
    fn test_embedded_table_loads() {
        let table = DependencyTable::load_embedded().unwrap();
        assert_eq!(table.edge_count(), 7);
        assert_eq!(table.direct(Skill::Co).collect::<Vec<_>>(), vec![Skill::Cp]);
    }

    #[test]
    fn test_closure_of_co() {
        let h = hierarchy();
        let expected: BTreeSet<Skill> = [Skill::Cp, Skill::Ce, Skill::Pse2, Skill::Pse1]
            .into_iter()
            .collect();
        assert_eq!(h.closure_of(Skill::Co), &expected);
    }

    #[test]
    fn test_closure_of_leaves_is_empty() {
        let h = hierarchy();
        assert!(h.closure_of(Skill::Pse1).is_empty());
        assert!(h.closure_of(Skill::Pbc).is_empty());
    }

    #[test]
    fn test_closure_excludes_self() {
        let h = hierarchy();
        for skill in Skill::ALL {
            assert!(!h.closure_of(skill).contains(&skill));
        }
    }

    #[test]
    fn test_closure_matches_reachability() {
        let h = hierarchy();
        let reach = graph::reachability(&h.table().adjacency_matrix()).unwrap();
        for skill in Skill::ALL {
            for other in Skill::ALL {
                assert_eq!(
                    h.closure_of(skill).contains(&other),
                    reach[skill.index()][other.index()],
                    "{skill} -> {other}"
                );
            }
        }
    }

    #[test]
    fn test_cycle_rejected() {
        let mut table = DependencyTable::new();
        table.add_edge(Skill::Pse1, Skill::Pse2);
        table.add_edge(Skill::Pse2, Skill::Pse1);
        let err = SkillHierarchy::new(table).unwrap_err();
        match err {
            HierarchyError::Cycle(skills) => assert_eq!(skills, vec![Skill::Pse1, Skill::Pse2]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_edge_change_recomputes_closure() {
        let mut table = DependencyTable::load_embedded().unwrap();
        table.add_edge(Skill::Pse1, Skill::Pbc);
        let h = SkillHierarchy::new(table.clone()).unwrap();
        assert!(h.closure_of(Skill::Co).contains(&Skill::Pbc));

        assert!(table.remove_edge(Skill::Pse1, Skill::Pbc));
        let h = SkillHierarchy::new(table).unwrap();
        assert!(!h.closure_of(Skill::Co).contains(&Skill::Pbc));
    }

    #[test]
    fn test_expand_labels_keeps_valid_and_reports_unknown() {
        let h = hierarchy();
        let expansion = h.expand_labels(["SSA", "PSE9", "PBF"]);
        let expected: BTreeSet<Skill> = [Skill::Ssa, Skill::Pse1, Skill::Pbf, Skill::Pbc]
            .into_iter()
            .collect();
        assert_eq!(expansion.skills, expected);
        assert_eq!(expansion.unknown, vec!["PSE9".to_string()]);
    }

    #[test]
    fn test_from_json_unknown_skill() {
        let json = r#"{"version": "1.0.0", "dependencies": {"CO": ["XX"]}}"#;
        let err = DependencyTable::from_json(json).unwrap_err();
        assert!(matches!(err, HierarchyError::UnknownSkill(label) if label == "XX"));
    }

    #[test]
    fn test_json_roundtrip_preserves_edges() {
        let table = DependencyTable::load_embedded().unwrap();
        let json = table.to_json().unwrap();
        let reparsed = DependencyTable::from_json(&json).unwrap();
        assert_eq!(table, reparsed);
    }
}
