//! nb-gibbs math utilities.

pub mod math;

pub use math::dirichlet;
pub use math::stable::*;
