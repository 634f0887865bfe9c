//! Error types for the daily verse core

use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading verses, tracking streaks or rendering cards
#[derive(Error, Debug)]
pub enum Error {
    /// Verse data is missing, empty or malformed. Fatal to a session.
    #[error("Verse dataset unavailable: {0}")]
    DatasetError(String),

    /// Background art, texture or photo could not be loaded. Always recovered.
    #[error("Asset unavailable: {0}")]
    AssetUnavailable(String),

    /// The canvas could not be encoded as PNG
    #[error("Card encoding failed: {0}")]
    EncodeFailure(String),

    /// A persisted value could not be parsed
    #[error("Malformed stored value for '{key}': {reason}")]
    StorageReadError { key: String, reason: String },

    /// The key-value store could not be read or written
    #[error("Storage error: {0}")]
    StorageError(String),

    /// A date key was not of the form `YYYY-MM-DD`
    #[error("Invalid date key: {0}")]
    InvalidDate(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Network error while fetching a remote dataset
    #[cfg(feature = "remote")]
    #[error("Network error: {0}")]
    NetworkError(String),
}

#[cfg(feature = "remote")]
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::NetworkError(err.to_string())
    }
}
