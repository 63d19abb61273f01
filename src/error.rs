//! Error types for the pac-serve library.
//!
//! One enum covers both halves of the crate: configuration loading and
//! template rendering. Rendering errors are non-fatal; see
//! [`crate::renderer::RenderOutcome`] for how they reach callers.

use thiserror::Error;

/// Main error type for the pac-serve library.
#[derive(Error, Debug)]
pub enum PacError {
    /// Configuration file could not be found.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration: {message}")]
    ConfigParse { message: String },

    /// Configuration validation failed.
    #[error("Invalid configuration: {message}")]
    ConfigValidation { message: String },

    /// A template referenced a placeholder outside the `{address}`,
    /// `{port}`, `{tld}` contract. Output produced before the offending
    /// placeholder has already been written to the sink.
    #[error("Unknown template placeholder: {name}")]
    UnknownPlaceholder { name: String },

    /// The caller-supplied render sink failed.
    #[error("Failed to write rendered output: {0}")]
    Write(#[from] std::fmt::Error),

    /// I/O error wrapper.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PacError {
    /// Creates a new configuration parse error.
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
        }
    }

    /// Creates a new configuration validation error.
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }
}

/// Result type alias using PacError.
pub type Result<T> = std::result::Result<T, PacError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PacError::ConfigNotFound {
            path: "/etc/pac.yaml".to_string(),
        };
        assert!(err.to_string().contains("/etc/pac.yaml"));

        let err = PacError::config_parse("invalid yaml");
        assert!(err.to_string().contains("invalid yaml"));

        let err = PacError::UnknownPlaceholder {
            name: "proto".to_string(),
        };
        assert!(err.to_string().contains("proto"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let pac_err: PacError = io_err.into();
        assert!(matches!(pac_err, PacError::Io(_)));
    }
}
