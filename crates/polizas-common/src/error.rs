//! Error types shared across the back-office.

use thiserror::Error;

/// Result type alias for polizas operations
pub type Result<T> = std::result::Result<T, PolizasError>;

/// Main error type for the polizas back-office
#[derive(Error, Debug)]
pub enum PolizasError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_detail() {
        let err = PolizasError::Database("connection refused".to_string());
        assert_eq!(err.to_string(), "Database error: connection refused");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: PolizasError = io.into();
        assert!(matches!(err, PolizasError::Io(_)));
    }
}
