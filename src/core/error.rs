//! Error types for the logging core

use super::level::Level;

pub type Result<T> = std::result::Result<T, LogError>;

#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// Logging was attempted with a sentinel or unrecognized level
    #[error("unknown log level: {0}")]
    UnknownLevel(Level),

    /// Destination init hook failed during registration
    #[error("destination '{destination}' failed to initialize: {message}")]
    InitFailed {
        destination: String,
        message: String,
    },

    /// Destination shutdown hook failed during removal or replacement
    #[error("destination '{destination}' failed to shut down: {message}")]
    ShutdownFailed {
        destination: String,
        message: String,
    },

    /// Send was attempted on a destination that was never initialized
    #[error("destination '{destination}' is not initialized")]
    NotInitialized { destination: String },

    /// No registered destination matches the given name
    #[error("no destination registered under '{name}'")]
    DestinationNotFound { name: String },

    /// Invalid configuration with details
    #[error("invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// IO error from a destination implementation
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LogError {
    /// Create an init failure error for a destination
    pub fn init_failed(destination: impl Into<String>, message: impl Into<String>) -> Self {
        LogError::InitFailed {
            destination: destination.into(),
            message: message.into(),
        }
    }

    /// Create a shutdown failure error for a destination
    pub fn shutdown_failed(destination: impl Into<String>, message: impl Into<String>) -> Self {
        LogError::ShutdownFailed {
            destination: destination.into(),
            message: message.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LogError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LogError::Other(msg.into())
    }
}
