//! Configuration resolution and path discovery.
//!
//! Resolution order: CLI argument → environment variables → XDG path → defaults.

use std::path::{Path, PathBuf};

use crate::sampler::SamplerConfig;
use crate::validate::{validate_config, ValidationResult};

/// Where a configuration file was found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument.
    CliArgument,

    /// Set via environment variable.
    Environment,

    /// Found in XDG config directory.
    XdgConfig,

    /// Using built-in defaults.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// Discovered configuration path and its provenance.
#[derive(Debug, Clone, Default)]
pub struct ResolvedPath {
    /// Path to sampler.json (None means built-in defaults).
    pub path: Option<PathBuf>,
    pub source: ConfigSource,
}

impl ResolvedPath {
    /// Load and validate the resolved configuration.
    pub fn load(&self) -> ValidationResult<SamplerConfig> {
        let config = match &self.path {
            Some(path) => SamplerConfig::from_file(path)?,
            None => SamplerConfig::default(),
        };
        validate_config(&config)?;
        Ok(config)
    }
}

/// Environment variable names.
pub const ENV_CONFIG_PATH: &str = "NBG_CONFIG";
pub const ENV_CONFIG_DIR: &str = "NBG_CONFIG_DIR";

/// Standard config file name.
pub const CONFIG_FILENAME: &str = "sampler.json";

/// Application name for XDG directories.
const APP_NAME: &str = "nb-gibbs";

/// Resolve the sampler configuration path.
///
/// Resolution order:
/// 1. Explicit CLI path (returned even if missing, so loading reports it)
/// 2. NBG_CONFIG environment variable
/// 3. NBG_CONFIG_DIR environment variable + sampler.json
/// 4. XDG config directory (~/.config/nb-gibbs/sampler.json)
/// 5. Built-in defaults (None)
pub fn resolve_config(cli_path: Option<&Path>) -> ResolvedPath {
    if let Some(path) = cli_path {
        return ResolvedPath {
            path: Some(path.to_path_buf()),
            source: ConfigSource::CliArgument,
        };
    }

    if let Ok(env_path) = std::env::var(ENV_CONFIG_PATH) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return found(path, ConfigSource::Environment);
        }
    }

    if let Ok(config_dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = PathBuf::from(config_dir).join(CONFIG_FILENAME);
        if path.exists() {
            return found(path, ConfigSource::Environment);
        }
    }

    if let Some(dir) = xdg_config_dir() {
        let path = dir.join(CONFIG_FILENAME);
        if path.exists() {
            return found(path, ConfigSource::XdgConfig);
        }
    }

    ResolvedPath::default()
}

fn found(path: PathBuf, source: ConfigSource) -> ResolvedPath {
    ResolvedPath {
        path: Some(path),
        source,
    }
}

/// Get the XDG config directory for nb-gibbs.
pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_source_display() {
        assert_eq!(format!("{}", ConfigSource::CliArgument), "CLI argument");
        assert_eq!(
            format!("{}", ConfigSource::Environment),
            "environment variable"
        );
        assert_eq!(format!("{}", ConfigSource::XdgConfig), "XDG config");
        assert_eq!(
            format!("{}", ConfigSource::BuiltinDefault),
            "builtin default"
        );
    }

    #[test]
    fn cli_path_wins_even_when_missing() {
        let resolved = resolve_config(Some(Path::new("/nonexistent/sampler.json")));
        assert_eq!(resolved.source, ConfigSource::CliArgument);
        assert!(resolved.load().is_err());
    }

    #[test]
    fn builtin_default_loads_valid_config() {
        let resolved = ResolvedPath::default();
        let config = resolved.load().expect("defaults are valid");
        assert_eq!(config, SamplerConfig::default());
    }

    #[test]
    fn xdg_dir_ends_with_app_name() {
        if let Some(path) = xdg_config_dir() {
            assert!(path.ends_with(APP_NAME));
        }
    }
}
