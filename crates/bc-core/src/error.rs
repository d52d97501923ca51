//! Error types for boardcache

use thiserror::Error;

/// Main error type for boardcache
#[derive(Debug, Error)]
pub enum BoardCacheError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(String),

    /// Board snapshot not found
    #[error("Board not found: {0}")]
    BoardNotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unsupported schema version
    #[error("Unsupported schema version: {0}")]
    UnsupportedSchemaVersion(String),

    /// The store task is no longer running
    #[error("Comment store has shut down")]
    StoreClosed,

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<BoardCacheError>,
    },
}

impl BoardCacheError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        BoardCacheError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

impl From<toml::de::Error> for BoardCacheError {
    fn from(err: toml::de::Error) -> Self {
        BoardCacheError::Toml(err.to_string())
    }
}

impl From<toml::ser::Error> for BoardCacheError {
    fn from(err: toml::ser::Error) -> Self {
        BoardCacheError::Toml(err.to_string())
    }
}

/// Result type alias for boardcache
pub type Result<T> = std::result::Result<T, BoardCacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BoardCacheError::BoardNotFound("board-1".to_string());
        assert_eq!(err.to_string(), "Board not found: board-1");
    }

    #[test]
    fn test_error_with_context() {
        let err = BoardCacheError::Validation("missing board id".to_string());
        let err = err.with_context("Failed to import board");
        assert!(err.to_string().contains("Failed to import board"));
        assert!(err.to_string().contains("missing board id"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: BoardCacheError = io_err.into();
        assert!(matches!(err, BoardCacheError::Io(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("not = = valid").unwrap_err();
        let err: BoardCacheError = toml_err.into();
        assert!(matches!(err, BoardCacheError::Toml(_)));
    }
}
