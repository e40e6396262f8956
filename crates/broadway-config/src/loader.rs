//! Configuration loading utilities

use crate::Config;
use broadway_common::{BroadwayError, Result as BroadwayResult};
use std::env;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info};
use validator::Validate;

/// Environment variable naming an explicit configuration file
pub const CONFIG_PATH_ENV: &str = "BROADWAY_CONFIG_PATH";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {message}")]
    EnvParseError {
        /// Name of the offending variable
        var: String,
        /// Why its value was rejected
        message: String,
    },
}

impl From<ConfigError> for BroadwayError {
    fn from(err: ConfigError) -> Self {
        BroadwayError::config_with_source("Configuration loading failed", err)
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file with environment variable overrides
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let mut config = Self::parse_yaml(&content)?;

        Self::apply_env_overrides(&mut config)?;
        config.validate()?;

        info!(path = %path.as_ref().display(), "Configuration loaded");
        Ok(config)
    }

    /// Parse a YAML document; missing sections fall back to defaults
    pub fn parse_yaml(content: &str) -> Result<Config, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load configuration from environment variables and files
    pub fn load() -> BroadwayResult<Config> {
        let config = if let Ok(config_path) = env::var(CONFIG_PATH_ENV) {
            Self::load_config(&config_path)?
        } else if Path::new("config.yaml").exists() {
            Self::load_config("config.yaml")?
        } else if Path::new("config.yml").exists() {
            Self::load_config("config.yml")?
        } else {
            debug!("No configuration file found, using defaults");
            let mut config = Config::default();
            Self::apply_env_overrides(&mut config)?;
            config.validate().map_err(ConfigError::ValidationError)?;
            config
        };

        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> BroadwayResult<Config> {
        Ok(Self::load_config(path)?)
    }

    /// Apply overrides from the process environment
    pub fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
        Self::apply_overrides_from(config, |var| env::var(var).ok())
    }

    /// Apply `BROADWAY_*` overrides resolved through `lookup`
    pub fn apply_overrides_from<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Data configuration overrides
        if let Some(path) = lookup("BROADWAY_DATASET_PATH") {
            config.data.dataset_path = path;
        }

        if let Some(path) = lookup("BROADWAY_FORECAST_PATH") {
            config.data.forecast_path = path;
        }

        if let Some(show) = lookup("BROADWAY_FORECAST_SHOW") {
            config.data.forecast_show = show;
        }

        if let Some(years) = lookup("BROADWAY_EXCLUDED_YEARS") {
            config.data.excluded_years = years
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| parse_var("BROADWAY_EXCLUDED_YEARS", s))
                .collect::<Result<_, _>>()?;
        }

        // Aggregation policy overrides
        if let Some(value) = lookup("BROADWAY_DROP_LAST_BUCKET") {
            config.aggregation.drop_last_bucket = parse_var("BROADWAY_DROP_LAST_BUCKET", &value)?;
        }

        if let Some(value) = lookup("BROADWAY_FILL_GAPS") {
            config.aggregation.fill_gaps = parse_var("BROADWAY_FILL_GAPS", &value)?;
        }

        // Control overrides
        if let Some(value) = lookup("BROADWAY_TOP_N_DEFAULT") {
            config.controls.top_n_default = parse_var("BROADWAY_TOP_N_DEFAULT", &value)?;
        }

        if let Some(value) = lookup("BROADWAY_DEFAULT_METRIC") {
            config.controls.default_metric = value.parse().map_err(|e: BroadwayError| {
                ConfigError::EnvParseError {
                    var: "BROADWAY_DEFAULT_METRIC".to_string(),
                    message: e.to_string(),
                }
            })?;
        }

        // Graph configuration overrides
        if let Some(value) = lookup("BROADWAY_GRAPH_WIDTH") {
            config.graphs.width = parse_var("BROADWAY_GRAPH_WIDTH", &value)?;
        }

        if let Some(value) = lookup("BROADWAY_GRAPH_HEIGHT") {
            config.graphs.height = parse_var("BROADWAY_GRAPH_HEIGHT", &value)?;
        }

        // Output and logging overrides
        if let Some(dir) = lookup("BROADWAY_OUTPUT_DIR") {
            config.output.directory = dir;
        }

        if let Some(value) = lookup("BROADWAY_WRITE_JSON") {
            config.output.write_json = parse_var("BROADWAY_WRITE_JSON", &value)?;
        }

        if let Some(level) = lookup("BROADWAY_LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(())
    }
}

fn parse_var<T>(var: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::EnvParseError {
        var: var.to_string(),
        message: e.to_string(),
    })
}
