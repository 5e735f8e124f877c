//! Parameter loading
//!
//! Parameters are read once at startup and then shared read-only. Resolution
//! order for the file:
//!
//! 1. An explicit path
//! 2. `RETAIN_CONFIG`
//! 3. `scheduler.json` in the platform config directory, if it exists
//! 4. Built-in defaults
//!
//! Environment overrides are applied on top, then the result is validated.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::{debug, info};

use crate::error::SchedulerError;
use crate::fsrs::{FSRSParameters, Weights};

/// Env var naming a parameter file
pub const CONFIG_ENV: &str = "RETAIN_CONFIG";
/// Env override for `desired_retention`
pub const RETENTION_ENV: &str = "RETAIN_DESIRED_RETENTION";
/// Env override for `maximum_interval`
pub const MAXIMUM_INTERVAL_ENV: &str = "RETAIN_MAXIMUM_INTERVAL";
/// Env override for `enable_fuzz`
pub const FUZZ_ENV: &str = "RETAIN_ENABLE_FUZZ";
/// Env override for the weight vector (comma-separated)
pub const WEIGHTS_ENV: &str = "RETAIN_WEIGHTS";

const CONFIG_FILE_NAME: &str = "scheduler.json";

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Reading the parameter file failed
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The parameter file is not valid JSON for [`FSRSParameters`]
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// An environment override could not be parsed
    #[error("Invalid value for {var}: {value}")]
    InvalidOverride { var: &'static str, value: String },
    /// The resolved parameters failed validation
    #[error(transparent)]
    Invalid(#[from] SchedulerError),
}

/// Platform config location of the parameter file
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "retain", "retain").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// Read and parse one parameter file without overrides or validation
pub fn read_parameters(path: &Path) -> Result<FSRSParameters, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolve, override and validate the process-wide parameters
pub fn load_parameters(path: Option<&Path>) -> Result<FSRSParameters, ConfigError> {
    let env_path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
    let resolved = match (path, env_path) {
        (Some(p), _) => Some(p.to_path_buf()),
        (None, Some(p)) => Some(p),
        (None, None) => default_config_path().filter(|p| p.exists()),
    };

    let params = match resolved {
        Some(p) => {
            info!(path = %p.display(), "Loading scheduler parameters");
            read_parameters(&p)?
        }
        None => {
            debug!("No parameter file found, using built-in defaults");
            FSRSParameters::default()
        }
    };

    let params = apply_overrides(params, |var| std::env::var(var).ok())?;
    params.validate()?;
    Ok(params)
}

/// Apply `RETAIN_*` overrides read through `lookup`
pub fn apply_overrides<F>(mut params: FSRSParameters, lookup: F) -> Result<FSRSParameters, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(RETENTION_ENV) {
        params.desired_retention = value.trim().parse().map_err(|_| ConfigError::InvalidOverride {
            var: RETENTION_ENV,
            value: value.clone(),
        })?;
    }

    if let Some(value) = lookup(MAXIMUM_INTERVAL_ENV) {
        params.maximum_interval = value.trim().parse().map_err(|_| ConfigError::InvalidOverride {
            var: MAXIMUM_INTERVAL_ENV,
            value: value.clone(),
        })?;
    }

    if let Some(value) = lookup(FUZZ_ENV) {
        params.enable_fuzz = match value.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => {
                return Err(ConfigError::InvalidOverride {
                    var: FUZZ_ENV,
                    value,
                });
            }
        };
    }

    if let Some(value) = lookup(WEIGHTS_ENV) {
        let parsed: Result<Vec<f64>, _> = value.split(',').map(|v| v.trim().parse::<f64>()).collect();
        let weights = parsed
            .ok()
            .and_then(|w| Weights::try_from(w.as_slice()).ok())
            .ok_or_else(|| ConfigError::InvalidOverride {
                var: WEIGHTS_ENV,
                value: value.clone(),
            })?;
        params.weights = weights;
        params.version = format!("{}+env", params.version);
    }

    Ok(params)
}
