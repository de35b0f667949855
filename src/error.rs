//! Error types for Sitat.

use thiserror::Error;

/// Library-level error type for Sitat operations.
#[derive(Error, Debug)]
pub enum SitatError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transcript parse error: {0}")]
    Transcript(String),

    #[error("Chunking error: {0}")]
    Chunking(String),

    #[error("Extraction failed: {0}")]
    Extraction(String),

    #[error("Response store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for Sitat operations.
pub type Result<T> = std::result::Result<T, SitatError>;
