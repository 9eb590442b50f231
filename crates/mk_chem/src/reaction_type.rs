use std::fmt;
use serde::{Serialize, Deserialize};

#[derive(Debug)]
pub enum ChemError {
    UnknownReactionType(String),
}

impl fmt::Display for ChemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChemError::UnknownReactionType(s) => {
                write!(f, "Unknown reaction type: '{}'", s)
            }
        }
    }
}

impl std::error::Error for ChemError {}

/// The four supported reaction mechanisms.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum ReactionType {
    Sn2,
    Sn1,
    E2,
    E1,
}

impl TryFrom<&str> for ReactionType {
    type Error = ChemError;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.to_ascii_uppercase().as_str() {
            "SN2" => Ok(ReactionType::Sn2),
            "SN1" => Ok(ReactionType::Sn1),
            "E2" => Ok(ReactionType::E2),
            "E1" => Ok(ReactionType::E1),
            _ => Err(ChemError::UnknownReactionType(s.to_string())),
        }
    }
}

impl fmt::Display for ReactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReactionType::Sn2 => "SN2",
            ReactionType::Sn1 => "SN1",
            ReactionType::E2 => "E2",
            ReactionType::E1 => "E1",
        };
        write!(f, "{}", s)
    }
}

impl ReactionType {
    /// Substitution mechanisms produce a substituted product, eliminations
    /// an alkene.
    pub fn is_substitution(&self) -> bool {
        matches!(self, ReactionType::Sn2 | ReactionType::Sn1)
    }

    /// Bimolecular mechanisms are rate-limited by the collision itself;
    /// unimolecular ones by prior ionization.
    pub fn is_bimolecular(&self) -> bool {
        matches!(self, ReactionType::Sn2 | ReactionType::E2)
    }

    /// Base activation energy in kJ/mol, used when no tabulated entry
    /// exists for a substrate/nucleophile combination.
    pub fn base_activation_energy(&self) -> f64 {
        match self {
            ReactionType::Sn2 => 90.0,
            ReactionType::Sn1 => 100.0,
            ReactionType::E2 => 95.0,
            ReactionType::E1 => 105.0,
        }
    }
}
