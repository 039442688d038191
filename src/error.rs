//! Error types for claude-pulse.
//!
//! This module provides error handling following the thiserror pattern.
//! Most failures in the aggregation pipeline are recoverable by design
//! (a malformed line or unreadable file degrades to "no data"); the error
//! type exists for the failures that must surface — a missing data
//! directory, an unwritable report, a server bind failure.

use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for claude-pulse operations.
#[derive(Error, Debug)]
pub enum PulseError {
    /// A JSON line failed to parse (strict mode only).
    #[error("Failed to parse line {line}: {message}")]
    ParseError {
        /// Line number where parsing failed.
        line: usize,
        /// Human-readable error message.
        message: String,
        /// Underlying serde_json error, if available.
        #[source]
        source: Option<serde_json::Error>,
    },

    /// File not found.
    #[error("File not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// Session not found.
    #[error("Session not found: {session_id}")]
    SessionNotFound {
        /// Session ID that was not found.
        session_id: String,
    },

    /// Project not found.
    #[error("Project not found: {project}")]
    ProjectNotFound {
        /// Encoded project directory name that was not found.
        project: String,
    },

    /// Claude data directory not found.
    #[error("Claude Code data directory not found. Expected at: {expected_path}")]
    DataDirectoryNotFound {
        /// Expected path to the data directory.
        expected_path: PathBuf,
    },

    /// I/O error.
    #[error("I/O error: {context}")]
    IoError {
        /// Context describing the operation that failed.
        context: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Serialization error.
    #[error("Serialization error: {context}")]
    SerializationError {
        /// Context describing the operation that failed.
        context: String,
        /// Underlying serde_json error.
        #[source]
        source: serde_json::Error,
    },

    /// HTTP server error.
    #[error("Server error: {message}")]
    ServerError {
        /// Human-readable error message.
        message: String,
    },

    /// Invalid argument.
    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument {
        /// Name of the invalid argument.
        name: String,
        /// Reason why the argument is invalid.
        reason: String,
    },
}

impl PulseError {
    /// Create a new parse error.
    #[must_use]
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new parse error with source.
    #[must_use]
    pub fn parse_with_source(line: usize, message: impl Into<String>, source: serde_json::Error) -> Self {
        Self::ParseError {
            line,
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create a new I/O error with context.
    #[must_use]
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::IoError {
            context: context.into(),
            source,
        }
    }

    /// Create a new server error.
    #[must_use]
    pub fn server(message: impl Into<String>) -> Self {
        Self::ServerError {
            message: message.into(),
        }
    }

    /// Get the exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::ParseError { .. } => 2,
            Self::FileNotFound { .. }
            | Self::SessionNotFound { .. }
            | Self::ProjectNotFound { .. }
            | Self::DataDirectoryNotFound { .. } => 3,
            Self::InvalidArgument { .. } => 64,
            Self::IoError { .. } => 74,
            _ => 1,
        }
    }
}

/// Result type alias for claude-pulse operations.
pub type Result<T> = std::result::Result<T, PulseError>;

impl From<std::io::Error> for PulseError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            context: "I/O operation failed".to_string(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for PulseError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError {
            context: "JSON operation failed".to_string(),
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let parse_err = PulseError::parse(1, "test");
        assert_eq!(parse_err.exit_code(), 2);

        let not_found = PulseError::FileNotFound {
            path: PathBuf::from("/test"),
        };
        assert_eq!(not_found.exit_code(), 3);

        let server_err = PulseError::server("bind failed");
        assert_eq!(server_err.exit_code(), 1);
    }

    #[test]
    fn test_error_display() {
        let err = PulseError::SessionNotFound {
            session_id: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "Session not found: abc");
    }
}
