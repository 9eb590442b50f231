use rand::Rng;
use serde::{Serialize, Deserialize};

/// Result of one collision attempt.
///
/// `Missed` is produced by geometry alone (impact parameter beyond the
/// contact threshold); the stochastic resolver is never consulted for it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum CollisionOutcome {
    Reacted {
        draw: f64,
        probability: f64,
        time: f64,
    },
    NoReaction {
        draw: f64,
        probability: f64,
        time: f64,
    },
    Missed {
        time: f64,
    },
}

impl CollisionOutcome {
    pub fn reacted(&self) -> bool {
        matches!(self, CollisionOutcome::Reacted { .. })
    }

    /// Simulation time at which the outcome was produced.
    pub fn time(&self) -> f64 {
        match self {
            CollisionOutcome::Reacted { time, .. } => *time,
            CollisionOutcome::NoReaction { time, .. } => *time,
            CollisionOutcome::Missed { time } => *time,
        }
    }

    /// The probability that was sampled against, if any.
    pub fn probability(&self) -> Option<f64> {
        match self {
            CollisionOutcome::Reacted { probability, .. } => Some(*probability),
            CollisionOutcome::NoReaction { probability, .. } => Some(*probability),
            CollisionOutcome::Missed { .. } => None,
        }
    }

    /// The uniform random draw, if the resolver was consulted.
    pub fn draw(&self) -> Option<f64> {
        match self {
            CollisionOutcome::Reacted { draw, .. } => Some(*draw),
            CollisionOutcome::NoReaction { draw, .. } => Some(*draw),
            CollisionOutcome::Missed { .. } => None,
        }
    }
}

/// Decide reacted / not-reacted for a contact with the given combined
/// probability.
///
/// Draws once from `rng` in [0, 1); the outcome is fully determined by
/// the probability, the draw, and nothing else, so a seeded source makes
/// runs reproducible.
pub fn resolve_collision<R: Rng + ?Sized>(
    probability: f64,
    time: f64,
    rng: &mut R,
) -> CollisionOutcome {
    let p = probability.clamp(0.0, 1.0);
    let draw = rng.random::<f64>();
    if draw < p {
        CollisionOutcome::Reacted { draw, probability: p, time }
    } else {
        CollisionOutcome::NoReaction { draw, probability: p, time }
    }
}
