//! Collapsed Gibbs sampler over test-document labels.
//!
//! Training labels stay fixed; each sweep revisits every test document,
//! removes it from the class statistics, scores both classes, draws a new
//! label and puts it back. Class word distributions are redrawn once per
//! sweep and labels after the burn-in are tallied into a majority vote.

pub mod driver;
pub mod posterior;
pub mod resample;
pub mod stats;
pub mod theta;
pub mod vote;

pub use driver::{GibbsSampler, RunOutcome, SweepStats};
pub use posterior::{ClassLogProbs, PosteriorError};
pub use resample::{resample_label, Decision, ResampleError, LOG_RATIO_CLIP};
pub use stats::{ClassCounts, StatsError, SufficientStats};
pub use theta::Theta;
pub use vote::{burn_in, VoteAccumulator};

use thiserror::Error;

use crate::label::Label;

/// Errors raised while sampling.
#[derive(Debug, Error)]
pub enum SamplerError {
    #[error("statistics update failed: {0}")]
    Stats(#[from] StatsError),

    #[error("posterior evaluation failed: {0}")]
    Posterior(#[from] PosteriorError),

    #[error("label resampling failed: {0}")]
    Resample(#[from] ResampleError),

    #[error("every gamma draw underflowed while redrawing theta for class {label}")]
    DegenerateTheta { label: Label },

    #[error("prior has {expected} components but the vocabulary has {actual} terms")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("incremental statistics diverged from a full recount after sweep {sweep}")]
    InconsistentStats { sweep: usize },

    #[error("invalid prior: hyper_multi={hyper_multi} over {vocab_size} terms")]
    InvalidPrior { hyper_multi: f64, vocab_size: usize },

    #[error("sweep count must be at least 1")]
    NoSweeps,

    #[error("all {sweeps} sweeps already completed")]
    SweepsExhausted { sweeps: usize },
}
