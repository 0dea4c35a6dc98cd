//! Error types for the arcade runtime

use thiserror::Error;

/// The main error type for arcade operations
#[derive(Debug, Error)]
pub enum ArcadeError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("TOML serialization error: {0}")]
    TomlSerError(String),

    #[error("Audio error: {0}")]
    AudioError(String),

    #[error("Store error: {0}")]
    StoreError(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Unknown game: {0}")]
    UnknownGame(String),

    #[error("Runtime error: {0}")]
    RuntimeError(String),
}

/// Result type alias for arcade operations
pub type Result<T> = std::result::Result<T, ArcadeError>;

impl From<toml::de::Error> for ArcadeError {
    fn from(err: toml::de::Error) -> Self {
        ArcadeError::TomlParseError(err.to_string())
    }
}

impl From<toml::ser::Error> for ArcadeError {
    fn from(err: toml::ser::Error) -> Self {
        ArcadeError::TomlSerError(err.to_string())
    }
}
