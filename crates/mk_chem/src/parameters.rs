use serde::{Serialize, Deserialize};

use crate::ReactionType;

/// Physical parameters of one reaction run.
///
/// Constructed once per run and never mutated afterwards; orchestrators
/// take a snapshot at tick start instead of reading ambient state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReactionParameters {
    pub reaction_type: ReactionType,
    pub substrate: String,
    pub nucleophile: String,
    /// Kelvin, > 0.
    pub temperature: f64,
    /// Degrees in [0, 180]; 0 = front attack, 180 = backside attack.
    pub approach_angle: f64,
    /// m/s, > 0.
    pub relative_velocity: f64,
    /// Perpendicular trajectory offset in Angstrom, >= 0.
    pub impact_parameter: f64,
}

impl ReactionParameters {
    pub fn new(reaction_type: ReactionType, substrate: &str, nucleophile: &str) -> Self {
        Self {
            reaction_type,
            substrate: substrate.to_string(),
            nucleophile: nucleophile.to_string(),
            temperature: 298.0,
            approach_angle: 180.0,
            relative_velocity: 400.0,
            impact_parameter: 0.0,
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_approach_angle(mut self, degrees: f64) -> Self {
        self.approach_angle = degrees;
        self
    }

    pub fn with_relative_velocity(mut self, mps: f64) -> Self {
        self.relative_velocity = mps;
        self
    }

    pub fn with_impact_parameter(mut self, angstrom: f64) -> Self {
        self.impact_parameter = angstrom;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let params = ReactionParameters::new(ReactionType::Sn2, "CH3Br", "OH-")
            .with_temperature(310.0)
            .with_approach_angle(150.0)
            .with_relative_velocity(350.0)
            .with_impact_parameter(0.5);
        assert_eq!(params.temperature, 310.0);
        assert_eq!(params.approach_angle, 150.0);
        assert_eq!(params.relative_velocity, 350.0);
        assert_eq!(params.impact_parameter, 0.5);
        assert_eq!(params.substrate, "CH3Br");
    }
}
