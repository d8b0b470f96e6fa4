//! Error types for Ridge

use thiserror::Error;

/// The main error type for Ridge operations
#[derive(Debug, Error)]
pub enum RidgeError {
    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),

    #[error("Dimension mismatch for {what}: expected {expected:?}, got {got:?}")]
    DimensionMismatch {
        what: String,
        expected: (u32, u32),
        got: (u32, u32),
    },

    #[error("Value out of range: {field} must be between {min} and {max}, got {value}")]
    ValueOutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error("Heightmap error: {0}")]
    Heightmap(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("TOML serialization error: {0}")]
    TomlSerError(String),
}

/// Result type alias for Ridge operations
pub type Result<T> = std::result::Result<T, RidgeError>;

impl From<toml::de::Error> for RidgeError {
    fn from(err: toml::de::Error) -> Self {
        RidgeError::TomlParseError(err.to_string())
    }
}

impl From<toml::ser::Error> for RidgeError {
    fn from(err: toml::ser::Error) -> Self {
        RidgeError::TomlSerError(err.to_string())
    }
}
