//! Error types for configuration and fetch sessions.

use thiserror::Error;

/// Pre-flight configuration errors. These are fatal before any request is made.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The access token was not supplied
    #[error("Didn't find required APP_TOKEN in env")]
    MissingToken,

    /// A page size of zero would never make progress
    #[error("page size must be greater than zero")]
    ZeroPageSize,

    /// Larger than the API will ever return in one page
    #[error("page size must be at most {max}")]
    PageSizeTooLarge {
        /// Largest accepted page size
        max: usize,
    },
}

/// Errors that end a fetch session. Each one is delivered on the session's error channel.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The HTTP request could not be built (bad endpoint, bad header value)
    #[error("error creating HTTP request: {0}")]
    Request(#[source] reqwest::Error),

    /// Connection, DNS, TLS or timeout failure
    #[error("error making HTTP request: {0}")]
    Transport(#[source] reqwest::Error),

    /// The API answered with something other than 200
    #[error("api returned a non-200 status code: {status} {reason}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Canonical reason phrase
        reason: String,
    },

    /// The response body could not be read
    #[error("error reading response body: {0}")]
    Body(#[source] reqwest::Error),

    /// The response body was not a JSON array of records
    #[error("error unmarshaling JSON: {0}")]
    Decode(#[from] serde_json::Error),

    /// The session was cancelled by an interrupt
    #[error("search cancelled")]
    Cancelled,

    /// The record receiver was dropped before the session finished
    #[error("record consumer stopped reading")]
    ConsumerClosed,
}

impl FetchError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled)
    }
}
