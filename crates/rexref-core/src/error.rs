//! Error types and handling for regex cross-reference analysis

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for analysis operations
#[derive(Debug, Error)]
pub enum RexrefError {
    /// Host source could not be tokenized or parsed
    #[error("Parse error: {message} at {line}:{column}")]
    ParseError {
        message: String,
        offset: usize,
        line: usize,
        column: usize,
    },

    /// Configuration loading or validation errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    InternalError { message: String },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    Config,
    Io,
    Internal,
}

impl RexrefError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            RexrefError::ParseError { .. } => ErrorKind::Parse,
            RexrefError::ConfigError { .. } => ErrorKind::Config,
            RexrefError::IoError { .. } => ErrorKind::Io,
            RexrefError::InternalError { .. } => ErrorKind::Internal,
        }
    }

    /// Check if this error is recoverable (can continue processing other files)
    pub fn is_recoverable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Parse | ErrorKind::Io)
    }

    /// Create a parse error at a byte offset of `source`
    pub fn parse_error(message: impl Into<String>, offset: usize, source: &str) -> Self {
        let (line, column) =
            crate::diagnostics::SourceMap::new(source).offset_to_position(offset, source);
        Self::ParseError {
            message: message.into(),
            offset,
            line,
            column,
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    /// Create an internal error
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for RexrefError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            path: PathBuf::new(),
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_position() {
        let err = RexrefError::parse_error("unexpected token", 6, "val a\n= ?");
        match &err {
            RexrefError::ParseError { line, column, .. } => {
                assert_eq!((*line, *column), (2, 1));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_config_error_not_recoverable() {
        let err = RexrefError::config_error("bad keying");
        assert!(!err.is_recoverable());
        assert_eq!(err.to_string(), "Configuration error: bad keying");
    }
}
