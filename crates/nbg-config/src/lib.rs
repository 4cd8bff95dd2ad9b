//! nb-gibbs configuration loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for sampler.json
//! - Config resolution (CLI → env → XDG → defaults)
//! - Semantic validation of sweep counts, categories and hyperparameters

pub mod resolve;
pub mod sampler;
pub mod validate;

pub use resolve::{resolve_config, ConfigSource, ResolvedPath};
pub use sampler::{Hyperparameters, InitStrategy, SamplerConfig};
pub use validate::{validate_config, ValidationError, ValidationResult, UNKNOWN_CATEGORY};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
