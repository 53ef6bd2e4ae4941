use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

use crate::core::event::Event;
use crate::core::rescuer::Rescuer;
use crate::core::types::{EventId, RescuerId};
use crate::matching::apply::RescuerLookup;
use crate::skills::hierarchy::SkillHierarchy;

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("Failed to read roster: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse roster: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Duplicate rescuer id {0}")]
    DuplicateRescuer(RescuerId),

    #[error("Duplicate event id {0}")]
    DuplicateEvent(EventId),
}

/// Roster version for compatibility checking
pub const ROSTER_VERSION: &str = "1.0.0";

/// Rescuer as written in a roster file: skills are raw labels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescuerRecord {
    pub id: RescuerId,
    #[serde(default)]
    pub identifier: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub first_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub assignments: Vec<EventId>,
}

impl From<&Rescuer> for RescuerRecord {
    fn from(rescuer: &Rescuer) -> Self {
        Self {
            id: rescuer.id,
            identifier: rescuer.identifier.clone(),
            name: rescuer.name.clone(),
            first_name: rescuer.first_name.clone(),
            email: rescuer.email.clone(),
            skills: rescuer.skills().iter().map(|s| s.name().to_string()).collect(),
            assignments: rescuer.assignments().to_vec(),
        }
    }
}

/// Serializable roster format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterData {
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<String>,
    #[serde(default)]
    pub rescuers: Vec<RescuerRecord>,
    #[serde(default)]
    pub events: Vec<Event>,
}

/// A skill label that could not be resolved while loading a rescuer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLabel {
    pub rescuer: RescuerId,
    pub label: String,
}

/// In-memory rescuer and event store.
///
/// Rescuers and events keep their insertion order, which is the row and event
/// order used by matching runs.
#[derive(Debug, Default)]
pub struct Roster {
    rescuers: Vec<Rescuer>,
    events: Vec<Event>,

    /// Index: rescuer ID -> index in rescuers vec
    rescuer_index: HashMap<RescuerId, usize>,

    /// Index: event ID -> index in events vec
    event_index: HashMap<EventId, usize>,

    /// Labels dropped while loading
    unknown_labels: Vec<UnknownLabel>,
}

impl Roster {
    /// Create an empty roster
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a roster from a JSON file, expanding skills through `hierarchy`
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or repeats an id.
    pub fn load_from_file(path: &Path, hierarchy: &SkillHierarchy) -> Result<Self, RosterError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content, hierarchy)
    }

    /// Parse a roster from a JSON string, expanding skills through `hierarchy`.
    ///
    /// Unknown skill labels are dropped with a warning and kept in
    /// [`Roster::unknown_labels`]; the rest of each rescuer's skills still load.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or repeats an id.
    pub fn from_json(json: &str, hierarchy: &SkillHierarchy) -> Result<Self, RosterError> {
        let data: RosterData = serde_json::from_str(json)?;

        if data.version != ROSTER_VERSION {
            warn!(
                expected = ROSTER_VERSION,
                found = %data.version,
                "Roster version mismatch"
            );
        }

        let mut roster = Self::new();
        for record in data.rescuers {
            let mut rescuer = Rescuer::new(record.id, record.identifier);
            rescuer.name = record.name;
            rescuer.first_name = record.first_name;
            rescuer.email = record.email;
            let unknown = rescuer.replace_skills(hierarchy, &record.skills);
            for event in record.assignments {
                rescuer.add_assignment(event);
            }

            roster
                .unknown_labels
                .extend(unknown.into_iter().map(|label| UnknownLabel {
                    rescuer: record.id,
                    label,
                }));
            roster.add_rescuer(rescuer)?;
        }
        for event in data.events {
            roster.add_event(event)?;
        }

        Ok(roster)
    }

    /// Export roster to JSON with closed skill sets and current assignments
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, RosterError> {
        let data = RosterData {
            version: ROSTER_VERSION.to_string(),
            exported_at: Some(chrono::Utc::now().to_rfc3339()),
            rescuers: self.rescuers.iter().map(RescuerRecord::from).collect(),
            events: self.events.clone(),
        };
        Ok(serde_json::to_string_pretty(&data)?)
    }

    /// Write the roster to a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save_to_file(&self, path: &Path) -> Result<(), RosterError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Add a rescuer
    ///
    /// # Errors
    ///
    /// Returns `RosterError::DuplicateRescuer` if the id is already present.
    pub fn add_rescuer(&mut self, rescuer: Rescuer) -> Result<(), RosterError> {
        if self.rescuer_index.contains_key(&rescuer.id) {
            return Err(RosterError::DuplicateRescuer(rescuer.id));
        }
        self.rescuer_index.insert(rescuer.id, self.rescuers.len());
        self.rescuers.push(rescuer);
        Ok(())
    }

    /// Add an event
    ///
    /// # Errors
    ///
    /// Returns `RosterError::DuplicateEvent` if the id is already present.
    pub fn add_event(&mut self, event: Event) -> Result<(), RosterError> {
        if self.event_index.contains_key(&event.id) {
            return Err(RosterError::DuplicateEvent(event.id));
        }
        self.event_index.insert(event.id, self.events.len());
        self.events.push(event);
        Ok(())
    }

    #[must_use]
    pub fn rescuers(&self) -> &[Rescuer] {
        &self.rescuers
    }

    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Get a rescuer by ID
    #[must_use]
    pub fn rescuer(&self, id: RescuerId) -> Option<&Rescuer> {
        self.rescuer_index.get(&id).map(|&idx| &self.rescuers[idx])
    }

    pub fn rescuer_mut(&mut self, id: RescuerId) -> Option<&mut Rescuer> {
        self.rescuer_index
            .get(&id)
            .map(|&idx| &mut self.rescuers[idx])
    }

    /// Get an event by ID
    #[must_use]
    pub fn event(&self, id: EventId) -> Option<&Event> {
        self.event_index.get(&id).map(|&idx| &self.events[idx])
    }

    /// Skill labels dropped while loading
    #[must_use]
    pub fn unknown_labels(&self) -> &[UnknownLabel] {
        &self.unknown_labels
    }

    /// Rescuers currently assigned to an event
    pub fn assigned_to(&self, event: EventId) -> impl Iterator<Item = &Rescuer> + '_ {
        self.rescuers.iter().filter(move |r| r.is_assigned_to(event))
    }

    /// Remove one assignment; returns false if the rescuer or link was absent
    pub fn unassign(&mut self, rescuer: RescuerId, event: EventId) -> bool {
        self.rescuer_mut(rescuer)
            .is_some_and(|r| r.remove_assignment(event))
    }

    /// Drop every rescuer's assignments
    pub fn clear_assignments(&mut self) {
        for rescuer in &mut self.rescuers {
            rescuer.clear_assignments();
        }
    }

    /// Number of rescuers in roster
    #[must_use]
    pub fn len(&self) -> usize {
        self.rescuers.len()
    }

    /// Check if roster has no rescuers
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rescuers.is_empty()
    }
}

impl RescuerLookup for Roster {
    fn rescuer_at_mut(&mut self, row: usize) -> Option<&mut Rescuer> {
        self.rescuers.get_mut(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::skill::Skill;

    const ROSTER: &str = r#"{
        "version": "1.0.0",
        "rescuers": [
            {"id": 1, "identifier": "jdupont", "name": "Dupont", "first_name": "Jeanne", "skills": ["CO"]},
            {"id": 2, "identifier": "mmartin", "skills": ["SSA", "PSE7"], "assignments": [11]}
        ],
        "events": [
            {"id": 10, "site": "Stade Nautique", "needs": {"CP": 1}},
            {"id": 11, "needs": {"PSE1": 2}}
        ]
    }"#;

    fn hierarchy() -> SkillHierarchy {
        SkillHierarchy::load_embedded().unwrap()
    }

    #[test]
    fn test_from_json_expands_skills() {
        let roster = Roster::from_json(ROSTER, &hierarchy()).unwrap();
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.events().len(), 2);

        let jeanne = roster.rescuer(RescuerId(1)).unwrap();
        assert!(jeanne.has_skill(Skill::Pse1));
        assert_eq!(jeanne.display_name(), "Jeanne Dupont");
    }

    #[test]
    fn test_unknown_labels_collected() {
        let roster = Roster::from_json(ROSTER, &hierarchy()).unwrap();
        assert_eq!(
            roster.unknown_labels(),
            &[UnknownLabel {
                rescuer: RescuerId(2),
                label: "PSE7".to_string()
            }]
        );
        let m = roster.rescuer(RescuerId(2)).unwrap();
        assert!(m.has_skill(Skill::Ssa));
        assert!(m.has_skill(Skill::Pse1));
    }

    #[test]
    fn test_duplicate_rescuer_rejected() {
        let json = r#"{"version": "1.0.0", "rescuers": [{"id": 1}, {"id": 1}]}"#;
        let err = Roster::from_json(json, &hierarchy()).unwrap_err();
        assert!(matches!(err, RosterError::DuplicateRescuer(RescuerId(1))));
    }

    #[test]
    fn test_duplicate_event_rejected() {
        let json = r#"{"version": "1.0.0", "events": [{"id": 4}, {"id": 4}]}"#;
        let err = Roster::from_json(json, &hierarchy()).unwrap_err();
        assert!(matches!(err, RosterError::DuplicateEvent(EventId(4))));
    }

    #[test]
    fn test_assignment_queries() {
        let mut roster = Roster::from_json(ROSTER, &hierarchy()).unwrap();
        let assigned: Vec<RescuerId> = roster.assigned_to(EventId(11)).map(|r| r.id).collect();
        assert_eq!(assigned, vec![RescuerId(2)]);

        assert!(roster.unassign(RescuerId(2), EventId(11)));
        assert!(!roster.unassign(RescuerId(2), EventId(11)));
        assert!(!roster.unassign(RescuerId(9), EventId(11)));
        assert_eq!(roster.assigned_to(EventId(11)).count(), 0);
    }

    #[test]
    fn test_to_json_writes_closed_skills() {
        let mut roster = Roster::from_json(ROSTER, &hierarchy()).unwrap();
        roster.clear_assignments();
        let json = roster.to_json().unwrap();
        assert!(json.contains("\"exported_at\""));

        let reloaded = Roster::from_json(&json, &hierarchy()).unwrap();
        let jeanne = reloaded.rescuer(RescuerId(1)).unwrap();
        assert_eq!(jeanne.skills().len(), 5);
        assert!(reloaded.rescuers().iter().all(|r| r.assignments().is_empty()));
        assert!(reloaded.unknown_labels().is_empty());
    }

    #[test]
    fn test_row_lookup() {
        let mut roster = Roster::from_json(ROSTER, &hierarchy()).unwrap();
        assert_eq!(roster.rescuer_at_mut(1).map(|r| r.id), Some(RescuerId(2)));
        assert!(roster.rescuer_at_mut(2).is_none());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, ROSTER.as_bytes()).unwrap();
        let roster = Roster::load_from_file(file.path(), &hierarchy()).unwrap();
        assert_eq!(roster.len(), 2);
        assert!(roster.event(EventId(10)).is_some());
    }
}
