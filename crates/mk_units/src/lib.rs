/// Concentration <-> particle count conversions.
mod convert;

pub use convert::*;
