use log::warn;
use colored::*;

/// Molar mass used when an identity is not in the table (kg/mol).
pub const FALLBACK_MOLAR_MASS: f64 = 0.05;

/// Tabulated molar masses in kg/mol, keyed by the identity strings the
/// presentation layer passes down. Lookup is case-insensitive.
const MOLAR_MASSES: &[(&str, f64)] = &[
    // substrates
    ("CH3BR", 0.09493),
    ("CH3CL", 0.05049),
    ("CH3I", 0.14193),
    ("C2H5BR", 0.10897),
    ("C2H5CL", 0.06451),
    ("(CH3)2CHBR", 0.12298),
    ("(CH3)3CBR", 0.13702),
    ("(CH3)3CCL", 0.09257),
    // nucleophiles / bases
    ("OH-", 0.01701),
    ("CN-", 0.02602),
    ("I-", 0.12690),
    ("BR-", 0.07990),
    ("CL-", 0.03545),
    ("CH3O-", 0.03104),
    ("SH-", 0.03307),
    ("H2O", 0.01802),
    ("NH3", 0.01703),
];

fn lookup_molar_mass(identity: &str) -> Option<f64> {
    let key = identity.to_ascii_uppercase();
    MOLAR_MASSES.iter()
        .find(|(name, _)| *name == key)
        .map(|(_, mass)| *mass)
}

/// Molar mass of an identity in kg/mol, with a fixed fallback for unknown
/// species. The simulation degrades gracefully instead of failing.
pub fn molar_mass(identity: &str) -> f64 {
    lookup_molar_mass(identity).unwrap_or_else(|| {
        warn!("{} Unknown species '{}' -> using fallback mass {} kg/mol",
            "WARNING:".red(), identity, FALLBACK_MOLAR_MASS);
        FALLBACK_MOLAR_MASS
    })
}

/// Substrate and nucleophile molar masses, resolved once per run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MassPair {
    pub substrate: f64,
    pub nucleophile: f64,
}

impl MassPair {
    pub fn resolve(substrate: &str, nucleophile: &str) -> Self {
        Self {
            substrate: molar_mass(substrate),
            nucleophile: molar_mass(nucleophile),
        }
    }

    /// Reduced mass of the two-body system in kg/mol.
    pub fn reduced(&self) -> f64 {
        (self.substrate * self.nucleophile) / (self.substrate + self.nucleophile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_species() {
        assert_eq!(molar_mass("CH3Br"), 0.09493);
        assert_eq!(molar_mass("oh-"), 0.01701);
    }

    #[test]
    fn test_fallback() {
        assert_eq!(molar_mass("XeF6"), FALLBACK_MOLAR_MASS);
    }

    #[test]
    fn test_mass_pair() {
        let pair = MassPair::resolve("CH3Br", "OH-");
        assert_eq!(pair.substrate, 0.09493);
        assert_eq!(pair.nucleophile, 0.01701);
        assert!(pair.reduced() < pair.nucleophile);
        assert!(pair.reduced() > 0.0);
    }
}
