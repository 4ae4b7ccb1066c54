//! Unified error type for clipforge.
//!
//! The pipeline, the record store and the dashboard all funnel their failures
//! into [`Error`], which carries enough context for API handlers to derive an
//! HTTP status code via [`Error::http_status`].

use std::fmt;

/// Unified error type covering all failure modes in clipforge.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested entity could not be found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity (e.g. "video").
        entity: String,
        /// The identifier that was looked up.
        id: String,
    },

    /// Input failed validation (empty topic, bad config value, ...).
    #[error("Validation error: {0}")]
    Validation(String),

    /// An external generative or catalog provider failed.
    #[error("Provider error [{stage}]: {message}")]
    Provider {
        /// The pipeline stage whose provider failed.
        stage: String,
        /// Human-readable error description.
        message: String,
    },

    /// The record store could not be read or written.
    #[error("Storage error: {0}")]
    Storage(String),

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// JSON encoding or decoding failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Map this error to an appropriate HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::NotFound { .. } => 404,
            Error::Validation(_) => 400,
            Error::Provider { .. } => 502,
            Error::Storage(_) => 500,
            Error::Io { .. } => 500,
            Error::Serialization(_) => 500,
        }
    }

    /// Convenience constructor for [`Error::NotFound`].
    pub fn not_found(entity: impl Into<String>, id: impl fmt::Display) -> Self {
        Error::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Convenience constructor for [`Error::Provider`].
    pub fn provider(stage: impl Into<String>, message: impl fmt::Display) -> Self {
        Error::Provider {
            stage: stage.into(),
            message: message.to_string(),
        }
    }

    /// Convenience constructor for [`Error::Storage`].
    pub fn storage(message: impl fmt::Display) -> Self {
        Error::Storage(message.to_string())
    }

    /// Convenience constructor for [`Error::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
