//! Error type definitions for the playback sandbox
//!
//! This module defines all error types used throughout the crate,
//! providing a hierarchical error system that makes debugging and error
//! handling more straightforward.
//!
//! Two whole classes of failure deliberately do NOT appear here: URL
//! classification (total functions, malformed input is a non-match) and
//! navigation policy decisions (a candidate that cannot be evaluated is
//! Blocked, never an error).

use thiserror::Error;

/// Top-level error type for the sandbox
///
/// This enum represents all possible errors that can occur in the crate.
/// It uses `thiserror` to provide automatic error trait implementations and
/// proper error chaining.
#[derive(Error, Debug)]
pub enum SandboxError {
    /// Catalog metadata service errors
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Message bridge decode errors
    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),

    /// Local list storage errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Errors from the catalog metadata service (reached through the proxy backend)
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Non-success HTTP status surfaced with the status embedded, per the
    /// proxy backend contract
    #[error("HTTP error: {status} for {url}")]
    Http { status: u16, url: String },

    /// Transport-level failures (connect, timeout, body decode)
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Errors decoding messages arriving from the hosted page
///
/// Bridge input is untrusted. Callers log these and drop the message;
/// they never tear down the session.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// The raw message was not valid JSON
    #[error("Message decode failed: {0}")]
    Decode(#[from] serde_json::Error),

    /// The message parsed but the payload had the wrong shape for its type
    #[error("Invalid payload for {kind}: {message}")]
    Payload { kind: String, message: String },
}

/// Errors from the local list store
#[derive(Error, Debug)]
pub enum StorageError {
    /// Filesystem failures
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// List serialization failures
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience methods for creating common error types
impl SandboxError {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl CatalogError {
    /// Create an HTTP status error
    pub fn http<U: Into<String>>(status: u16, url: U) -> Self {
        Self::Http {
            status,
            url: url.into(),
        }
    }
}

impl BridgeError {
    /// Create a payload shape error
    pub fn payload<K: Into<String>, M: Into<String>>(kind: K, message: M) -> Self {
        Self::Payload {
            kind: kind.into(),
            message: message.into(),
        }
    }
}
