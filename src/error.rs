//! Error types for engine operations

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the search engine layer
#[derive(Error, Debug)]
pub enum Error {
    /// Connection, TLS or timeout failure before a response was received
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The engine answered with a non-success status
    #[error("Search engine error ({status}): {reason}")]
    SearchEngine {
        status: u16,
        reason: String,
        /// Raw response body, kept for diagnostics
        body: Option<String>,
    },

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// The engine answered with a success status but an unreadable body
    #[error("Invalid engine response: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    /// The record store failed to resolve hit identifiers
    #[error("Record store error: {0}")]
    RecordStore(#[source] anyhow::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// HTTP status reported by the engine, if this is an engine error
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::SearchEngine { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Engine-provided reason text, if this is an engine error
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::SearchEngine { reason, .. } => Some(reason),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
