//! Energy- and angle-dependent reaction probability.
//!
//! A collision reacts when its kinetic energy clears the activation
//! barrier and its geometry is sterically favorable. Both factors are
//! simplified curves tuned for plausibility, not thermodynamic accuracy.
//! Evaluation is pure and must be recomputed per call; callers must not
//! memoize on anything less than the full parameter tuple.

use crate::ReactionParameters;
use crate::ReactionType;
use crate::activation_energy;

/// Relative velocity that maps to the maximum kinetic energy (m/s).
pub const VELOCITY_NORMALIZATION: f64 = 500.0;

/// Kinetic energy at the normalization velocity (kJ/mol).
pub const MAX_KINETIC_ENERGY: f64 = 150.0;

pub const REFERENCE_TEMPERATURE: f64 = 298.0; // Kelvin

/// Energy probability at an energy ratio of exactly 1.0.
pub const ENERGY_SATURATION: f64 = 0.95;

/// Floor below which the energy probability never drops.
pub const MIN_ENERGY_PROBABILITY: f64 = 0.001;

/// The two probability components and their product.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProbabilityResult {
    /// Probability that the collision energy clears the barrier, in [0,1].
    pub energy: f64,
    /// Steric favorability of the approach geometry, in [0,1].
    pub steric: f64,
    /// energy * steric, clamped to [0,1]. Used for sampling.
    pub combined: f64,
}

impl ProbabilityResult {
    /// Combined probability as a percentage, for display.
    pub fn percent(&self) -> f64 {
        self.combined * 100.0
    }
}

/// Probability that the collision energy exceeds the activation barrier.
///
/// Kinetic energy rises linearly with velocity (a deliberate
/// simplification), is boosted by sqrt(T/298), and is compared against
/// `ea` in kJ/mol.
pub fn energy_probability(relative_velocity: f64, temperature: f64, ea: f64) -> f64 {
    let v = relative_velocity.max(0.0);
    let t = temperature.max(1.0);

    let kinetic = (v / VELOCITY_NORMALIZATION) * MAX_KINETIC_ENERGY;
    let adjusted = kinetic * (t / REFERENCE_TEMPERATURE).sqrt();

    let ratio = if ea > 0.0 { adjusted / ea } else { 1.5 };

    if ratio >= 1.0 {
        // Saturates at 0.95, approaching 1.0 linearly over [1.0, 1.5].
        let excess = ((ratio - 1.0) / 0.5).min(1.0);
        ENERGY_SATURATION + (1.0 - ENERGY_SATURATION) * excess
    } else if ratio > 0.0 {
        (ENERGY_SATURATION * ratio.powf(2.5)).max(MIN_ENERGY_PROBABILITY)
    } else {
        MIN_ENERGY_PROBABILITY
    }
}

/// Steric factor for the approach angle, in [0,1].
///
/// All curves rise monotonically from 0 deg (front attack) to a peak at
/// 180 deg (backside attack). Bimolecular mechanisms are sharply angle
/// dependent; SN1/E1 barely care since the nucleophile arrives after
/// ionization.
pub fn steric_probability(reaction_type: ReactionType, angle_degrees: f64) -> f64 {
    let theta = angle_degrees.clamp(0.0, 180.0).to_radians();
    // (1 - cos) / 2 maps [0, 180] deg onto [0, 1] monotonically.
    let backside = (1.0 - theta.cos()) / 2.0;

    match reaction_type {
        ReactionType::Sn2 => backside.powi(4),
        ReactionType::E2 => backside.powi(2),
        ReactionType::Sn1 => 0.7 + 0.3 * backside,
        ReactionType::E1 => 0.6 + 0.4 * backside,
    }
}

/// Evaluate the full probability model for one parameter snapshot.
pub fn reaction_probability(params: &ReactionParameters) -> ProbabilityResult {
    let ea = activation_energy(&params.substrate, &params.nucleophile, params.reaction_type);
    let energy = energy_probability(params.relative_velocity, params.temperature, ea);
    let steric = steric_probability(params.reaction_type, params.approach_angle);
    ProbabilityResult {
        energy,
        steric,
        combined: (energy * steric).clamp(0.0, 1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sn2_params() -> ReactionParameters {
        ReactionParameters::new(ReactionType::Sn2, "CH3Br", "OH-")
    }

    #[test]
    fn test_saturation_at_ratio_one() {
        // Ea = 80 kJ/mol; ratio 1.0 needs adjusted energy of 80 at 298 K,
        // i.e. velocity 80/150 * 500.
        let v = 80.0 / MAX_KINETIC_ENERGY * VELOCITY_NORMALIZATION;
        let p = energy_probability(v, 298.0, 80.0);
        assert!((p - ENERGY_SATURATION).abs() < 1e-9, "got {p}");
    }

    #[test]
    fn test_energy_probability_bounds() {
        for v in [0.0, 1.0, 50.0, 400.0, 2000.0, -10.0] {
            for t in [-5.0, 0.0, 1.0, 298.0, 1000.0] {
                for ea in [0.0, 40.0, 80.0, 200.0] {
                    let p = energy_probability(v, t, ea);
                    assert!((MIN_ENERGY_PROBABILITY..=1.0).contains(&p),
                        "p={p} for v={v} t={t} ea={ea}");
                }
            }
        }
    }

    #[test]
    fn test_energy_floor() {
        assert_eq!(energy_probability(0.0, 298.0, 80.0), MIN_ENERGY_PROBABILITY);
    }

    #[test]
    fn test_temperature_boost() {
        let cold = energy_probability(200.0, 250.0, 80.0);
        let hot = energy_probability(200.0, 350.0, 80.0);
        assert!(hot > cold);
    }

    #[test]
    fn test_backside_beats_front_attack() {
        for rt in [ReactionType::Sn2, ReactionType::Sn1, ReactionType::E2, ReactionType::E1] {
            let front = steric_probability(rt, 0.0);
            let back = steric_probability(rt, 180.0);
            assert!(back > front, "{rt}: back={back} front={front}");
            assert!((0.0..=1.0).contains(&front));
            assert!((0.0..=1.0).contains(&back));
        }
    }

    #[test]
    fn test_steric_monotone() {
        for rt in [ReactionType::Sn2, ReactionType::Sn1, ReactionType::E2, ReactionType::E1] {
            let mut last = -1.0;
            for deg in (0..=180).step_by(5) {
                let p = steric_probability(rt, deg as f64);
                assert!(p >= last, "{rt} not monotone at {deg}");
                last = p;
            }
        }
    }

    #[test]
    fn test_sn2_sharper_than_sn1() {
        // At a mediocre angle SN2 is heavily penalized, SN1 barely.
        let sn2 = steric_probability(ReactionType::Sn2, 90.0);
        let sn1 = steric_probability(ReactionType::Sn1, 90.0);
        assert!(sn2 < sn1);
    }

    #[test]
    fn test_ideal_sn2_collision() {
        // SN2, 180 deg, 400 m/s, 298 K: near-ideal conditions.
        let p = reaction_probability(&sn2_params());
        assert!(p.combined >= 0.9, "got {}", p.combined);
    }

    #[test]
    fn test_poor_sn2_collision() {
        // Front attack at low speed barely ever reacts.
        let params = sn2_params()
            .with_approach_angle(0.0)
            .with_relative_velocity(50.0);
        let p = reaction_probability(&params);
        assert!(p.combined <= 0.05, "got {}", p.combined);
    }

    #[test]
    fn test_combined_in_unit_interval() {
        for angle in [0.0, 45.0, 90.0, 135.0, 180.0, 360.0, -20.0] {
            for v in [0.0, 50.0, 400.0, 5000.0] {
                let params = sn2_params()
                    .with_approach_angle(angle)
                    .with_relative_velocity(v);
                let p = reaction_probability(&params);
                assert!((0.0..=1.0).contains(&p.combined));
            }
        }
    }

    #[test]
    fn test_percent() {
        let p = ProbabilityResult { energy: 0.5, steric: 0.5, combined: 0.25 };
        assert_eq!(p.percent(), 25.0);
    }
}
