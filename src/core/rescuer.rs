use serde::Serialize;
use std::collections::BTreeSet;
use tracing::warn;

use crate::core::skill::Skill;
use crate::core::types::{EventId, RescuerId};
use crate::skills::hierarchy::SkillHierarchy;

/// A volunteer holding certified skills and deployment assignments.
///
/// The skill set is always closed under the [`SkillHierarchy`]: raw labels are
/// expanded on construction and on replacement, never appended as-is. Rosters
/// are read through [`crate::roster::store::RescuerRecord`] for that reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rescuer {
    pub id: RescuerId,

    /// Login / display identifier
    pub identifier: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub first_name: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub email: String,

    skills: BTreeSet<Skill>,

    /// Event ids held, in the order they were assigned
    assignments: Vec<EventId>,
}

impl Rescuer {
    /// Create a rescuer with no skills and no assignments
    pub fn new(id: RescuerId, identifier: impl Into<String>) -> Self {
        Self {
            id,
            identifier: identifier.into(),
            name: String::new(),
            first_name: String::new(),
            email: String::new(),
            skills: BTreeSet::new(),
            assignments: Vec::new(),
        }
    }

    /// Set skills from raw labels, expanded through the hierarchy.
    ///
    /// Returns the labels that named no known skill; they are dropped with a
    /// warning while the valid ones are still expanded.
    pub fn replace_skills<I, S>(&mut self, hierarchy: &SkillHierarchy, labels: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let expansion = hierarchy.expand_labels(labels);
        for label in &expansion.unknown {
            warn!(rescuer = %self.id, label = %label, "Dropping unknown skill label");
        }
        self.skills = expansion.skills;
        expansion.unknown
    }

    /// Set skills from already-parsed values, expanded through the hierarchy
    pub fn replace_skill_set<I>(&mut self, hierarchy: &SkillHierarchy, skills: I)
    where
        I: IntoIterator<Item = Skill>,
    {
        self.skills = hierarchy.expand(skills);
    }

    #[must_use]
    pub fn with_skills<I>(mut self, hierarchy: &SkillHierarchy, skills: I) -> Self
    where
        I: IntoIterator<Item = Skill>,
    {
        self.replace_skill_set(hierarchy, skills);
        self
    }

    /// Closed skill set
    #[must_use]
    pub fn skills(&self) -> &BTreeSet<Skill> {
        &self.skills
    }

    #[must_use]
    pub fn has_skill(&self, skill: Skill) -> bool {
        self.skills.contains(&skill)
    }

    #[must_use]
    pub fn assignments(&self) -> &[EventId] {
        &self.assignments
    }

    #[must_use]
    pub fn is_assigned_to(&self, event: EventId) -> bool {
        self.assignments.contains(&event)
    }

    /// Record an assignment; returns false if it was already held
    pub fn add_assignment(&mut self, event: EventId) -> bool {
        if self.is_assigned_to(event) {
            return false;
        }
        self.assignments.push(event);
        true
    }

    pub fn remove_assignment(&mut self, event: EventId) -> bool {
        let before = self.assignments.len();
        self.assignments.retain(|&e| e != event);
        self.assignments.len() != before
    }

    pub fn clear_assignments(&mut self) {
        self.assignments.clear();
    }

    /// "First Last" when both are known, otherwise the identifier
    #[must_use]
    pub fn display_name(&self) -> String {
        match (self.first_name.is_empty(), self.name.is_empty()) {
            (false, false) => format!("{} {}", self.first_name, self.name),
            (true, false) => self.name.clone(),
            (false, true) => self.first_name.clone(),
            (true, true) => self.identifier.clone(),
        }
    }
}
