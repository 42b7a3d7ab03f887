//! Error types for the mlwbd resolver
//!
//! Provides a comprehensive error enum with human-readable messages
//! and string serialization for the presentation boundary.

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Error type for all mlwbd scraping and resolution operations
///
/// Covers the four failure families the resolver distinguishes:
/// network failures (timeout / connection / status / other, produced by
/// the retrying executor once its budget is exhausted), extraction
/// failures (an expected hidden field or script token is absent),
/// parse failures (the obfuscated array literal is malformed), and
/// upstream contract failures (the final API reply has the wrong shape).
#[derive(Error, Debug)]
pub enum MlwbdError {
    /// Failed to construct the HTTP client
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    /// Request timed out on every attempt
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Could not connect on any attempt
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Upstream answered with a non-2xx status on the final attempt
    #[error("HTTP status {status} for {url}")]
    BadStatus { status: u16, url: String },

    /// Any other transport-level failure
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// Expected hidden form field was not present in the page
    #[error("hidden field {0} not found")]
    FieldNotFound(&'static str),

    /// Expected inline-script token was not present in the response
    #[error("script token {0} not found")]
    TokenNotFound(&'static str),

    /// The obfuscated script array could not be parsed as literal data
    #[error("malformed script array: {0}")]
    MalformedArray(String),

    /// The final API reply did not match the expected shape
    #[error("unexpected upstream reply: {0}")]
    UnexpectedReply(String),
}

impl Serialize for MlwbdError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Result type alias for mlwbd operations
pub type Result<T> = std::result::Result<T, MlwbdError>;
