//! Mapping between molar concentration and the number of particle pairs
//! shown in the simulation volume.
//!
//! The simulated container is a cube of fixed edge length. A real molecule
//! count at laboratory concentrations is far too large to animate, so the
//! count is scaled down by a fixed visualization factor and clamped to a
//! range the population simulator can handle.

pub const AVOGADRO: f64 = 6.02214076e23;

/// Container edge length in meters (50 nm).
pub const CONTAINER_EDGE_M: f64 = 5.0e-8;

/// Container volume in liters: edge^3 * 1000 L/m^3.
pub const CONTAINER_VOLUME_L: f64 = 1.25e-19;

/// Fraction of the real molecule count that is actually simulated.
pub const VISUALIZATION_SCALE: f64 = 8.0e-3;

pub const MIN_PARTICLE_COUNT: u32 = 1;
pub const MAX_PARTICLE_COUNT: u32 = 100;

pub const MIN_CONCENTRATION: f64 = 0.001; // mol/L
pub const MAX_CONCENTRATION: f64 = 10.0; // mol/L

/// Number of simulated particles per mol/L of concentration.
fn particles_per_molar() -> f64 {
    CONTAINER_VOLUME_L * AVOGADRO * VISUALIZATION_SCALE
}

/// Map a molar concentration to a particle-pair count in
/// [`MIN_PARTICLE_COUNT`, `MAX_PARTICLE_COUNT`].
///
/// Out-of-range concentrations are clamped to
/// [`MIN_CONCENTRATION`, `MAX_CONCENTRATION`] first, never rejected.
pub fn concentration_to_particle_count(concentration: f64) -> u32 {
    let c = concentration.clamp(MIN_CONCENTRATION, MAX_CONCENTRATION);
    let count = (c * particles_per_molar()).round();
    (count as u32).clamp(MIN_PARTICLE_COUNT, MAX_PARTICLE_COUNT)
}

/// Exact algebraic inverse of [`concentration_to_particle_count`], clamped
/// to [`MIN_CONCENTRATION`, `MAX_CONCENTRATION`].
///
/// The round trip through both functions is lossy only through integer
/// rounding and clamping at the boundaries.
pub fn particle_count_to_concentration(count: u32) -> f64 {
    let n = count.clamp(MIN_PARTICLE_COUNT, MAX_PARTICLE_COUNT);
    (n as f64 / particles_per_molar()).clamp(MIN_CONCENTRATION, MAX_CONCENTRATION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_concentration() {
        // 0.1 mol/L in 1.25e-19 L is ~7528 molecules, scaled down to 60.
        assert_eq!(concentration_to_particle_count(0.1), 60);

        let back = particle_count_to_concentration(60);
        assert!((back - 0.1).abs() < 0.1, "got {back}");
    }

    #[test]
    fn test_clamping() {
        assert_eq!(concentration_to_particle_count(0.0), 1);
        assert_eq!(concentration_to_particle_count(-3.0), 1);
        assert_eq!(concentration_to_particle_count(1000.0), 100);
        assert_eq!(concentration_to_particle_count(10.0), 100);

        assert!(particle_count_to_concentration(0) >= MIN_CONCENTRATION);
        assert!(particle_count_to_concentration(200) <= MAX_CONCENTRATION);
    }

    #[test]
    fn test_round_trip_interior() {
        for n in MIN_PARTICLE_COUNT..=MAX_PARTICLE_COUNT {
            let c = particle_count_to_concentration(n);
            if c <= MIN_CONCENTRATION || c >= MAX_CONCENTRATION {
                continue; // clamped at the boundary, round trip not exact
            }
            assert_eq!(concentration_to_particle_count(c), n);
        }
    }

    #[test]
    fn test_monotone() {
        let mut last = 0;
        for i in 0..=100 {
            let c = MIN_CONCENTRATION + i as f64 * 0.01;
            let n = concentration_to_particle_count(c);
            assert!(n >= last);
            last = n;
        }
    }
}
