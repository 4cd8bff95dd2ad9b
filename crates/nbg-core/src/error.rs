//! Top-level error type.
//!
//! Every layer has its own `thiserror` enum; this one wraps them so the
//! binary can map any failure to a category and an exit code.

use nbg_config::ValidationError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::corpus::CorpusError;
use crate::exit_codes::ExitCode;
use crate::sampler::SamplerError;

pub type Result<T> = std::result::Result<T, Error>;

/// Coarse grouping of errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Config,
    Data,
    Sampler,
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Data => write!(f, "data"),
            ErrorCategory::Sampler => write!(f, "sampler"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ValidationError),

    #[error("corpus error: {0}")]
    Corpus(#[from] CorpusError),

    #[error("sampler error: {0}")]
    Sampler(#[from] SamplerError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(ValidationError::IoError(_)) => ErrorCategory::Io,
            Error::Config(_) => ErrorCategory::Config,
            Error::Corpus(CorpusError::Io { .. }) => ErrorCategory::Io,
            Error::Corpus(_) => ErrorCategory::Data,
            Error::Sampler(SamplerError::NoSweeps | SamplerError::InvalidPrior { .. }) => {
                ErrorCategory::Config
            }
            Error::Sampler(_) => ErrorCategory::Sampler,
            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        match self.category() {
            ErrorCategory::Config => ExitCode::ConfigError,
            ErrorCategory::Data => ExitCode::DataError,
            ErrorCategory::Sampler => ExitCode::InternalError,
            ErrorCategory::Io => ExitCode::IoError,
        }
    }
}

/// JSON shape of an error printed by the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    pub code: i32,
    pub code_name: String,
    pub category: ErrorCategory,
    pub message: String,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let exit = err.exit_code();
        StructuredError {
            code: exit.as_i32(),
            code_name: exit.code_name().to_string(),
            category: err.category(),
            message: err.to_string(),
        }
    }
}

impl StructuredError {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }
}
