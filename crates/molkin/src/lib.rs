//! # molkin
//!
//! Unified API for molecular collision and reaction-kinetics simulations.
//!
//! This crate re-exports the main functionality from its submodules.

pub mod run_parsers;
pub mod engine;

pub mod units {
    pub use ::mk_units::*;
}

pub mod chem {
    pub use ::mk_chem::*;
}

pub mod kinetics {
    pub use ::mk_kinetics::*;
}
