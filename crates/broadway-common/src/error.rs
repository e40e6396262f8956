//! Error types and utilities for the Broadway dashboard

use thiserror::Error;

/// Result type alias for Broadway operations
pub type Result<T> = std::result::Result<T, BroadwayError>;

/// Main error type for Broadway operations
#[derive(Error, Debug)]
pub enum BroadwayError {
    /// An aggregation was requested over zero qualifying records
    #[error("Empty dataset: {message}")]
    EmptyDataset { message: String },

    /// Out-of-range or nonsensical control input
    #[error("Invalid parameter '{parameter}': {message}")]
    InvalidParameter { parameter: String, message: String },

    /// Source file is missing required columns or holds unparseable values
    #[error("Data format error: {message}")]
    DataFormat {
        message: String,
        /// 1-based data row (header excluded), when known
        row: Option<u64>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Graph generation and plotting errors
    #[error("Graph error: {message}")]
    Graph {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl BroadwayError {
    /// Create a new empty dataset error
    pub fn empty_dataset(msg: impl Into<String>) -> Self {
        Self::EmptyDataset {
            message: msg.into(),
        }
    }

    /// Create a new invalid parameter error for the named control
    pub fn invalid_parameter(parameter: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            message: msg.into(),
        }
    }

    /// Create a new data format error
    pub fn data_format(msg: impl Into<String>) -> Self {
        Self::DataFormat {
            message: msg.into(),
            row: None,
            source: None,
        }
    }

    /// Create a new data format error pointing at a data row
    pub fn data_format_at(msg: impl Into<String>, row: u64) -> Self {
        Self::DataFormat {
            message: format!("{} (row {row})", msg.into()),
            row: Some(row),
            source: None,
        }
    }

    /// Create a new data format error with source
    pub fn data_format_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::DataFormat {
            message: msg.into(),
            row: None,
            source: Some(Box::new(source)),
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new graph error
    pub fn graph(msg: impl Into<String>) -> Self {
        Self::Graph {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new graph error with source
    pub fn graph_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Graph {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Whether the error belongs to a single user interaction and should not
    /// take the process down
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::EmptyDataset { .. } | Self::InvalidParameter { .. } | Self::Graph { .. }
        )
    }
}

// Error conversion implementations for external types

/// Convert from csv::Error to BroadwayError
impl From<csv::Error> for BroadwayError {
    fn from(err: csv::Error) -> Self {
        let row = err.position().map(|pos| pos.line().saturating_sub(1));
        let message = match err.kind() {
            csv::ErrorKind::Deserialize { err: de, .. } => {
                match de.field() {
                    Some(field) => format!("Invalid value in column {}: {}", field + 1, de.kind()),
                    None => format!("Invalid record: {}", de.kind()),
                }
            }
            csv::ErrorKind::UnequalLengths { expected_len, len, .. } => {
                format!("Record has {len} fields, expected {expected_len}")
            }
            _ => "CSV parsing failed".to_string(),
        };
        Self::DataFormat {
            message,
            row,
            source: Some(Box::new(err)),
        }
    }
}

/// Convert from serde_yaml::Error to BroadwayError
impl From<serde_yaml::Error> for BroadwayError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::config_with_source("YAML parsing error", err)
    }
}

#[cfg(feature = "plotters")]
/// Convert from plotters drawing errors to BroadwayError
impl<T> From<plotters::drawing::DrawingAreaErrorKind<T>> for BroadwayError
where
    T: std::error::Error + Send + Sync + 'static,
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<T>) -> Self {
        Self::graph_with_source("Graph rendering failed", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{error::Error, io};

    #[test]
    fn test_error_creation() {
        let empty = BroadwayError::empty_dataset("no records for show 'Cats'");
        assert!(empty.to_string().contains("Empty dataset"));
        assert!(empty.to_string().contains("Cats"));

        let invalid = BroadwayError::invalid_parameter("top_n", "must be positive, got 0");
        assert_eq!(
            invalid.to_string(),
            "Invalid parameter 'top_n': must be positive, got 0"
        );

        let format = BroadwayError::data_format_at("Unparseable date '13/45/2001'", 7);
        assert!(format.to_string().contains("Data format error"));
        assert!(format.to_string().contains("row 7"));
        assert!(matches!(format, BroadwayError::DataFormat { row: Some(7), .. }));
    }

    #[test]
    fn test_error_with_source() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let wrapped = BroadwayError::data_format_with_source("Cannot open dataset", io_error);

        assert!(wrapped.to_string().contains("Cannot open dataset"));
        assert!(wrapped.source().is_some());

        let config_error = BroadwayError::config_with_source(
            "Config loading failed",
            io::Error::new(io::ErrorKind::PermissionDenied, "Access denied"),
        );
        assert_eq!(
            config_error.to_string(),
            "Configuration error: Config loading failed"
        );
        assert!(config_error.source().is_some());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error: BroadwayError = io_error.into();

        assert!(error.to_string().contains("I/O error"));
        assert!(!error.is_recoverable());
    }

    #[test]
    fn test_csv_error_conversion() {
        #[derive(Debug, serde::Deserialize)]
        #[allow(dead_code)]
        struct Row {
            value: f64,
        }

        let mut reader = csv::Reader::from_reader("value\n1.5\nnot-a-number\n".as_bytes());
        let err = reader
            .deserialize::<Row>()
            .find_map(std::result::Result::err)
            .expect("second row should fail");
        let error: BroadwayError = err.into();

        assert!(matches!(error, BroadwayError::DataFormat { row: Some(2), .. }));
        assert!(error.to_string().contains("column 1"));
    }

    #[test]
    fn test_recoverable_classification() {
        assert!(BroadwayError::empty_dataset("x").is_recoverable());
        assert!(BroadwayError::invalid_parameter("metric", "unknown").is_recoverable());
        assert!(!BroadwayError::data_format("missing column").is_recoverable());
        assert!(!BroadwayError::config("bad").is_recoverable());
    }
}
