//! Application-wide error types using thiserror.

use broadway_common::BroadwayError;

/// Main application error type.
#[derive(thiserror::Error, Debug)]
pub enum DashboardError {
    /// Error raised by the pipeline, the loaders or the renderers.
    #[error(transparent)]
    Broadway(#[from] BroadwayError),

    /// Prompt input that names no command.
    #[error("Unknown command '{0}', type 'help' for the list of commands")]
    UnknownCommand(String),

    /// Known command with missing or malformed arguments.
    #[error("Usage: {0}")]
    Usage(&'static str),

    /// I/O error on the prompt streams.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DashboardError {
    /// Whether the prompt can continue after this error.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Broadway(err) => err.is_recoverable(),
            Self::UnknownCommand(_) | Self::Usage(_) => true,
            Self::Io(_) => false,
        }
    }
}

/// Result type for the dashboard application.
pub type DashboardResult<T> = Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverability() {
        assert!(DashboardError::Usage("top <n>").is_recoverable());
        assert!(DashboardError::from(BroadwayError::invalid_parameter("top_n", "too big")).is_recoverable());
        assert!(!DashboardError::from(BroadwayError::data_format("missing column")).is_recoverable());
        assert!(!DashboardError::Io(std::io::Error::other("closed")).is_recoverable());
    }

    #[test]
    fn test_messages() {
        assert_eq!(DashboardError::Usage("top <n>").to_string(), "Usage: top <n>");
        let err = DashboardError::from(BroadwayError::invalid_parameter("metric", "unknown"));
        assert_eq!(err.to_string(), "Invalid parameter 'metric': unknown");
    }
}
