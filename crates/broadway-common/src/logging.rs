//! Structured logging infrastructure for the Broadway dashboard

use crate::error::{BroadwayError, Result};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Configuration for the logging system
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "broadway_graphs=trace")
    pub level: String,
    /// Whether to use the compact single-line format
    pub compact: bool,
    /// Optional file path for log output
    pub file_path: Option<String>,
    /// Whether to include span open/close events in the output
    pub include_spans: bool,
    /// Whether to include target module information
    pub include_targets: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            compact: false,
            file_path: None,
            include_spans: false,
            include_targets: true,
        }
    }
}

impl LoggingConfig {
    /// Builds the environment filter; `RUST_LOG` wins over the configured level.
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Initialize the tracing subscriber with the given configuration
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let span_events = if config.include_spans {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let registry = tracing_subscriber::registry().with(config.env_filter());

    let layer = fmt::layer()
        .with_span_events(span_events)
        .with_target(config.include_targets);

    // The prompt owns stdout, so console logs go to stderr.
    let result = match (&config.file_path, config.compact) {
        (Some(path), compact) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let layer = layer.with_ansi(false).with_writer(Mutex::new(file));
            if compact {
                registry.with(layer.compact()).try_init()
            } else {
                registry.with(layer).try_init()
            }
        }
        (None, true) => registry
            .with(layer.compact().with_writer(std::io::stderr))
            .try_init(),
        (None, false) => registry.with(layer.with_writer(std::io::stderr)).try_init(),
    };

    result.map_err(|e| BroadwayError::config_with_source("Failed to initialize logging", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert!(!config.compact);
        assert!(config.file_path.is_none());
        assert!(!config.include_spans);
        assert!(config.include_targets);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: LoggingConfig = serde_yaml::from_str("level: debug\n").unwrap();
        assert_eq!(config.level, "debug");
        assert!(config.include_targets);
    }
}
