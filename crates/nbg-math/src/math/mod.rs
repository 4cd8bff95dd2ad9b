//! Core math modules.

pub mod dirichlet;
pub mod stable;
