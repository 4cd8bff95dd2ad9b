//! Stable names and stages attached to structured log records.

use serde::{Deserialize, Serialize};

/// Stage of a run a log record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Startup and configuration.
    Init,
    /// Reading the corpus.
    Load,
    /// Gibbs sweeps.
    Sample,
    /// Majority vote over post-burn-in labels.
    Vote,
    /// Scoring and report output.
    Report,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Init => "init",
            Stage::Load => "load",
            Stage::Sample => "sample",
            Stage::Vote => "vote",
            Stage::Report => "report",
        };
        write!(f, "{}", s)
    }
}

/// Event names used as the `event` field of log records.
pub mod event_names {
    pub const RUN_STARTED: &str = "run.started";
    pub const RUN_FINISHED: &str = "run.finished";

    pub const CONFIG_LOADED: &str = "config.loaded";
    pub const CONFIG_DEFAULT_USED: &str = "config.default_used";
    pub const CONFIG_ERROR: &str = "config.error";

    pub const LOAD_FINISHED: &str = "load.finished";

    pub const SAMPLE_STARTED: &str = "sample.started";
    pub const SAMPLE_SWEEP: &str = "sample.sweep";
    pub const SAMPLE_DOC: &str = "sample.doc";
    pub const SAMPLE_AUDIT_FAILED: &str = "sample.audit_failed";
    pub const SAMPLE_FINISHED: &str = "sample.finished";

    pub const VOTE_FINISHED: &str = "vote.finished";

    pub const INTERNAL_ERROR: &str = "internal_error";
}
