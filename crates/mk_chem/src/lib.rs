/// ReactionType and its parsing.
mod reaction_type;

/// Species identities and molar mass lookup.
mod species;

/// Activation energy tables and fallback heuristics.
mod activation;

/// Per-run reaction parameters.
mod parameters;

/// The energy / steric probability model.
mod probability;

pub use reaction_type::*;
pub use species::*;
pub use activation::*;
pub use parameters::*;
pub use probability::*;
