//! Configuration validation errors and semantic validation.

use thiserror::Error;

use crate::sampler::SamplerConfig;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
        }
    }

    fn invalid(field: &str, message: impl Into<String>) -> Self {
        ValidationError::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Tag of test documents with no known category; it cannot be selected.
pub const UNKNOWN_CATEGORY: &str = "unknown";

/// Validate a sampler configuration semantically.
pub fn validate_config(config: &SamplerConfig) -> ValidationResult<()> {
    if config.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: config.schema_version.clone(),
        });
    }

    if config.sweeps < 1 {
        return Err(ValidationError::invalid(
            "sweeps",
            "at least one sweep is required",
        ));
    }

    validate_categories(&config.categories)?;

    let hyper = &config.hyperparameters;
    for (i, &g) in hyper.hyper_gamma.iter().enumerate() {
        validate_positive(&format!("hyperparameters.hyper_gamma[{}]", i), g)?;
    }
    validate_positive("hyperparameters.hyper_multi", hyper.hyper_multi)?;

    Ok(())
}

fn validate_categories(categories: &[String; 2]) -> ValidationResult<()> {
    for (i, tag) in categories.iter().enumerate() {
        if tag.trim().is_empty() {
            return Err(ValidationError::invalid(
                &format!("categories[{}]", i),
                "category tag must not be empty",
            ));
        }
        if tag.split_whitespace().count() != 1 {
            return Err(ValidationError::invalid(
                &format!("categories[{}]", i),
                format!("category tag '{}' must be a single token", tag),
            ));
        }
    }
    if let Some(i) = categories.iter().position(|c| c == UNKNOWN_CATEGORY) {
        return Err(ValidationError::invalid(
            &format!("categories[{}]", i),
            format!("'{}' is reserved for unlabeled test documents", UNKNOWN_CATEGORY),
        ));
    }
    if categories[0] == categories[1] {
        return Err(ValidationError::invalid(
            "categories",
            format!("the two categories must differ, both are '{}'", categories[0]),
        ));
    }
    Ok(())
}

fn validate_positive(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError::invalid(
            field,
            format!("must be a positive finite number, got {}", value),
        ));
    }
    Ok(())
}
