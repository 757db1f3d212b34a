//! Error types for the bootval validation framework

use thiserror::Error;

/// Result type alias for bootval operations
pub type Result<T> = std::result::Result<T, BootvalError>;

/// Main error type for the bootval framework
#[derive(Error, Debug)]
pub enum BootvalError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Degenerate labels: {0}")]
    DegenerateLabels(String),

    #[error("Division undefined: {0}")]
    DivisionUndefined(String),

    #[error("Model fit failed: {0}")]
    FitFailure(String),

    #[error("Model not fitted")]
    ModelNotFitted,

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<polars::error::PolarsError> for BootvalError {
    fn from(err: polars::error::PolarsError) -> Self {
        BootvalError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for BootvalError {
    fn from(err: serde_json::Error) -> Self {
        BootvalError::SerializationError(err.to_string())
    }
}
