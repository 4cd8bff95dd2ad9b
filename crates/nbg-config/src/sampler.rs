//! Sampler configuration types.
//!
//! These types match the sampler.json layout:
//!
//! ```json
//! {
//!   "schema_version": "1.0.0",
//!   "categories": ["acq", "alum"],
//!   "sweeps": 100,
//!   "hyperparameters": { "hyper_gamma": [2.0, 2.0], "hyper_multi": 1.0 },
//!   "seed": 42,
//!   "init": "random",
//!   "audit": false
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::validate::ValidationError;

/// Complete sampler configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplerConfig {
    pub schema_version: String,

    #[serde(default)]
    pub description: Option<String>,

    /// The two category tags to classify between. The first maps to label 0.
    #[serde(default = "default_categories")]
    pub categories: [String; 2],

    /// Number of full Gibbs sweeps (T).
    #[serde(default = "default_sweeps")]
    pub sweeps: usize,

    #[serde(default)]
    pub hyperparameters: Hyperparameters,

    /// RNG seed; a fresh seed is drawn (and reported) when absent.
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default)]
    pub init: InitStrategy,

    /// Check incremental statistics against a full recount after every sweep.
    #[serde(default)]
    pub audit: bool,
}

/// Prior pseudo-counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hyperparameters {
    /// Beta-type pseudo-counts for the class proportions.
    #[serde(default = "default_hyper_gamma")]
    pub hyper_gamma: [f64; 2],

    /// Uniform Dirichlet pseudo-count per vocabulary term.
    #[serde(default = "default_hyper_multi")]
    pub hyper_multi: f64,
}

/// How test-document labels are seeded before the first sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitStrategy {
    /// Fair coin per test document.
    #[default]
    Random,
    /// Start from the held-out truth; unknown truth falls back to a coin flip.
    GroundTruth,
}

impl std::str::FromStr for InitStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "random" => Ok(InitStrategy::Random),
            "ground-truth" | "ground_truth" | "truth" => Ok(InitStrategy::GroundTruth),
            _ => Err(format!("unknown init strategy: {}", s)),
        }
    }
}

impl std::fmt::Display for InitStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InitStrategy::Random => write!(f, "random"),
            InitStrategy::GroundTruth => write!(f, "ground_truth"),
        }
    }
}

fn default_categories() -> [String; 2] {
    ["acq".to_string(), "alum".to_string()]
}

fn default_sweeps() -> usize {
    100
}

fn default_hyper_gamma() -> [f64; 2] {
    [2.0, 2.0]
}

fn default_hyper_multi() -> f64 {
    1.0
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self {
            hyper_gamma: default_hyper_gamma(),
            hyper_multi: default_hyper_multi(),
        }
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
            description: None,
            categories: default_categories(),
            sweeps: default_sweeps(),
            hyperparameters: Hyperparameters::default(),
            seed: None,
            init: InitStrategy::default(),
            audit: false,
        }
    }
}

impl SamplerConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ValidationError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::from_json(&content)
    }

    /// Parse configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        serde_json::from_str(json)
            .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_run() {
        let config = SamplerConfig::default();
        assert_eq!(config.categories, ["acq".to_string(), "alum".to_string()]);
        assert_eq!(config.hyperparameters.hyper_gamma, [2.0, 2.0]);
        assert_eq!(config.hyperparameters.hyper_multi, 1.0);
        assert_eq!(config.init, InitStrategy::Random);
        assert!(!config.audit);
    }

    #[test]
    fn minimal_json_fills_defaults() {
        let config = SamplerConfig::from_json(r#"{"schema_version": "1.0.0", "sweeps": 12}"#)
            .expect("parse");
        assert_eq!(config.sweeps, 12);
        assert_eq!(config.hyperparameters, Hyperparameters::default());
        assert_eq!(config.seed, None);
    }

    #[test]
    fn full_json_round_trips_fields() {
        let json = r#"{
            "schema_version": "1.0.0",
            "categories": ["course", "faculty"],
            "sweeps": 30,
            "hyperparameters": { "hyper_gamma": [1.5, 3.0], "hyper_multi": 0.5 },
            "seed": 99,
            "init": "ground_truth",
            "audit": true
        }"#;
        let config = SamplerConfig::from_json(json).expect("parse");
        assert_eq!(config.categories[1], "faculty");
        assert_eq!(config.hyperparameters.hyper_gamma, [1.5, 3.0]);
        assert_eq!(config.seed, Some(99));
        assert_eq!(config.init, InitStrategy::GroundTruth);
        assert!(config.audit);
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let err = SamplerConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, ValidationError::ParseError(_)));
    }

    #[test]
    fn init_strategy_parses_cli_spellings() {
        assert_eq!("random".parse::<InitStrategy>(), Ok(InitStrategy::Random));
        assert_eq!(
            "ground-truth".parse::<InitStrategy>(),
            Ok(InitStrategy::GroundTruth)
        );
        assert!("oracle".parse::<InitStrategy>().is_err());
    }
}
