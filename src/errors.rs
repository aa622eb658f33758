//! Error types for the sticker diary.
//!
//! Library code returns these typed errors; the binary wraps everything in
//! `color_eyre::Report` at the edge.

use std::io;
use thiserror::Error;

/// Failures of the durable entry store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing slot could not be read or written.
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),

    /// The entry map could not be encoded.
    #[error("failed to encode diary entries: {0}")]
    Encode(#[from] serde_json::Error),

    /// The backend refused the write for a reason of its own.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Failures of the editorial generator.
///
/// Callers treat every variant the same way (the save proceeds without an
/// editorial); the variants only exist to make the log line useful.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The HTTP request could not be sent or the body could not be read.
    #[error("editorial request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("editorial service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The service answered, but not with a usable headline and body.
    #[error("malformed editorial response: {0}")]
    MalformedResponse(String),

    /// The call did not complete within the configured limit.
    #[error("editorial generation timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// No generator is configured.
    #[error("editorial generation unavailable: {0}")]
    Unavailable(String),
}

/// Invalid configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be {expected}, got {value:?}")]
    InvalidValue {
        name: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("could not determine a data directory; set STICKER_DIARY_FILE")]
    NoDataDir,
}

/// A date key that is not a canonical `YYYY-MM-DD` calendar date.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid date key {0:?}, expected YYYY-MM-DD")]
pub struct InvalidDateKey(pub String);
