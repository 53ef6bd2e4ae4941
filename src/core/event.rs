use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::skill::Skill;
use crate::core::types::EventId;

/// A medical-support deployment (DPS) at a sporting event.
///
/// Needs are authored by an operator and are not closed under the skill
/// hierarchy: a need for CO asks for CO holders only. They are kept in a
/// `BTreeMap` so iteration follows ascending skill id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sport: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<NaiveDate>,

    /// Required head-count per skill
    #[serde(default)]
    needs: BTreeMap<Skill, u32>,
}

impl Event {
    #[must_use]
    pub fn new(id: EventId) -> Self {
        Self {
            id,
            site: None,
            sport: None,
            day: None,
            needs: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_need(mut self, skill: Skill, count: u32) -> Self {
        self.set_need(skill, count);
        self
    }

    #[must_use]
    pub fn with_site(mut self, site: impl Into<String>) -> Self {
        self.site = Some(site.into());
        self
    }

    /// Set the head-count for a skill; zero removes the need
    pub fn set_need(&mut self, skill: Skill, count: u32) {
        if count == 0 {
            self.needs.remove(&skill);
        } else {
            self.needs.insert(skill, count);
        }
    }

    #[must_use]
    pub fn need(&self, skill: Skill) -> u32 {
        self.needs.get(&skill).copied().unwrap_or(0)
    }

    /// Needs in ascending skill id order
    pub fn needs(&self) -> impl Iterator<Item = (Skill, u32)> + '_ {
        self.needs.iter().map(|(&skill, &count)| (skill, count))
    }

    /// Number of requirement units this event contributes
    #[must_use]
    pub fn total_units(&self) -> usize {
        self.needs
            .values()
            .fold(0usize, |acc, &c| acc.saturating_add(c as usize))
    }

    /// Short human label: "#id site (sport)"
    #[must_use]
    pub fn label(&self) -> String {
        let mut label = format!("#{}", self.id);
        if let Some(site) = &self.site {
            label.push(' ');
            label.push_str(site);
        }
        if let Some(sport) = &self.sport {
            label.push_str(&format!(" ({sport})"));
        }
        label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_iterate_by_skill_id() {
        let event = Event::new(EventId(1))
            .with_need(Skill::Pbf, 1)
            .with_need(Skill::Cp, 2)
            .with_need(Skill::Pse1, 3);
        let order: Vec<Skill> = event.needs().map(|(s, _)| s).collect();
        assert_eq!(order, vec![Skill::Cp, Skill::Pse1, Skill::Pbf]);
        assert_eq!(event.total_units(), 6);
    }

    #[test]
    fn test_zero_need_removes_entry() {
        let mut event = Event::new(EventId(1)).with_need(Skill::Ssa, 2);
        event.set_need(Skill::Ssa, 0);
        assert_eq!(event.need(Skill::Ssa), 0);
        assert_eq!(event.needs().count(), 0);
    }

    #[test]
    fn test_deserialize_needs_by_label() {
        let json = r#"{"id": 7, "site": "Stade", "day": "2025-06-14", "needs": {"PSE2": 2, "CE": 1}}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.id, EventId(7));
        assert_eq!(event.need(Skill::Pse2), 2);
        assert_eq!(event.need(Skill::Ce), 1);
        assert_eq!(event.day, NaiveDate::from_ymd_opt(2025, 6, 14));
    }

    #[test]
    fn test_label() {
        let mut event = Event::new(EventId(3)).with_site("Piscine");
        event.sport = Some("Natation".to_string());
        assert_eq!(event.label(), "#3 Piscine (Natation)");
    }
}
