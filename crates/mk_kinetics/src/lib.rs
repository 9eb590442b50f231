/// The physics-collaborator trait and body handles.
pub mod physics;

/// A minimal straight-line reference implementation of the trait.
pub mod ballistic;

/// Typed publish/subscribe for engine events.
pub mod events;

/// Container bounds and simulation-space constants.
mod container;

/// Collision outcomes and the stochastic resolver.
mod resolver;

/// One substrate/nucleophile pair, approach to outcome.
mod single;

/// Population-scale rate simulation.
mod rate;

pub use physics::*;
pub use ballistic::*;
pub use events::*;
pub use container::*;
pub use resolver::*;
pub use single::*;
pub use rate::*;
