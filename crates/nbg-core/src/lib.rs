//! nb-gibbs core library.
//!
//! Semi-supervised two-class Naive Bayes trained by collapsed Gibbs sampling:
//! - Corpus loading and vocabulary indexing
//! - Sufficient statistics, collapsed posterior and label resampling
//! - Post-burn-in majority vote, accuracy and purity
//! - Structured logging, progress events, exit codes and run reports
//!
//! The binary entry point is in `main.rs`.

pub mod corpus;
pub mod error;
pub mod evaluate;
pub mod events;
pub mod exit_codes;
pub mod label;
pub mod logging;
pub mod report;
pub mod sampler;

pub use error::{Error, ErrorCategory, Result};
pub use label::Label;
