use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A certified rescue capability.
///
/// Each variant carries a stable integer id used as a matrix index and as the
/// key of deployment needs. Variants are declared in id order so the derived
/// `Ord` sorts by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Skill {
    /// Chef de poste
    #[serde(rename = "CP")]
    Cp,
    /// Chef d'équipe
    #[serde(rename = "CE")]
    Ce,
    /// Chef d'opération
    #[serde(rename = "CO")]
    Co,
    /// Premiers secours en équipe, level 1
    #[serde(rename = "PSE1")]
    Pse1,
    /// Premiers secours en équipe, level 2
    #[serde(rename = "PSE2")]
    Pse2,
    /// Surveillance et sauvetage aquatique
    #[serde(rename = "SSA")]
    Ssa,
    /// Vehicle driver for emergency transport
    #[serde(rename = "VPSP")]
    Vpsp,
    /// Boat licence, coastal
    #[serde(rename = "PBC")]
    Pbc,
    /// Boat licence, river
    #[serde(rename = "PBF")]
    Pbf,
}

impl Skill {
    /// Every skill, in ascending id order
    pub const ALL: [Skill; 9] = [
        Skill::Cp,
        Skill::Ce,
        Skill::Co,
        Skill::Pse1,
        Skill::Pse2,
        Skill::Ssa,
        Skill::Vpsp,
        Skill::Pbc,
        Skill::Pbf,
    ];

    /// Number of distinct skills
    pub const COUNT: usize = Self::ALL.len();

    #[must_use]
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Matrix index of this skill (same value as [`Skill::id`])
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(usize::from(id)).copied()
    }

    /// Canonical label, as written in rosters and dependency tables
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Cp => "CP",
            Self::Ce => "CE",
            Self::Co => "CO",
            Self::Pse1 => "PSE1",
            Self::Pse2 => "PSE2",
            Self::Ssa => "SSA",
            Self::Vpsp => "VPSP",
            Self::Pbc => "PBC",
            Self::Pbf => "PBF",
        }
    }
}

impl std::fmt::Display for Skill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Error returned when a label names no known skill
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown skill label: '{0}'")]
pub struct UnknownSkill(pub String);

impl FromStr for Skill {
    type Err = UnknownSkill;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|skill| skill.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownSkill(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_stable() {
        assert_eq!(Skill::Cp.id(), 0);
        assert_eq!(Skill::Co.id(), 2);
        assert_eq!(Skill::Pbf.id(), 8);
        for (i, skill) in Skill::ALL.iter().enumerate() {
            assert_eq!(skill.index(), i);
        }
    }

    #[test]
    fn test_from_id() {
        assert_eq!(Skill::from_id(4), Some(Skill::Pse2));
        assert_eq!(Skill::from_id(9), None);
    }

    #[test]
    fn test_parse_label() {
        assert_eq!("PSE1".parse::<Skill>(), Ok(Skill::Pse1));
        assert_eq!(" vpsp ".parse::<Skill>(), Ok(Skill::Vpsp));
        assert_eq!(
            "PSE3".parse::<Skill>(),
            Err(UnknownSkill("PSE3".to_string()))
        );
    }

    #[test]
    fn test_serde_uses_labels() {
        let json = serde_json::to_string(&Skill::Ssa).unwrap();
        assert_eq!(json, "\"SSA\"");
        let skill: Skill = serde_json::from_str("\"PBC\"").unwrap();
        assert_eq!(skill, Skill::Pbc);
    }

    #[test]
    fn test_ordering_follows_id() {
        let mut skills = vec![Skill::Pbf, Skill::Cp, Skill::Pse1];
        skills.sort();
        assert_eq!(skills, vec![Skill::Cp, Skill::Pse1, Skill::Pbf]);
    }
}
