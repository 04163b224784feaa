//! Error types for tower transfer evaluation

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while preparing data, loading models or scoring results
#[derive(Error, Debug)]
pub enum TransferError {
    #[error("No persisted model `{identifier}` at {path}")]
    MissingModel { identifier: String, path: PathBuf },

    #[error("No tower data at {path}")]
    MissingData { path: PathBuf },

    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    #[error("Insufficient data: {rows} rows cannot fill a window of {window}")]
    InsufficientData { rows: usize, window: usize },

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Unknown season: {0}")]
    InvalidSeason(String),

    #[error("Fine-tuning fraction must be in [0, 1), got {0}")]
    InvalidFraction(f64),

    #[error("Column not found: {0}")]
    MissingColumn(String),

    #[error("Non-numeric value `{value}` in column {column}")]
    InvalidValue { column: String, value: String },

    #[error("Scaler used before fit")]
    ScalerNotFitted,

    #[error("Chart rendering failed: {0}")]
    Render(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Model serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Config write error: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    #[error("Bad timestamp: {0}")]
    Timestamp(#[from] chrono::ParseError),
}

impl TransferError {
    /// Shorthand for a shape mismatch built from anything printable
    pub fn shape(expected: impl ToString, actual: impl ToString) -> Self {
        TransferError::ShapeMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TransferError>;
