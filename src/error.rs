//! Error types for aicheck

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// aicheck errors
///
/// Only fatal configuration problems surface as errors; anything file-local
/// (missing path, malformed document, unreadable file) is accumulated in the
/// owning report instead.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Missing required prompts file: {0}")]
    MissingSource(String),

    #[error("Expected mapping at top level in {0}")]
    NotAMapping(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_norway::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}
