//! Error types for MvnKit

use thiserror::Error;

/// Coarse classification of a [`FetchError`]
///
/// Callers use this to decide whether retrying later makes sense.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Anti-bot defense triggered; transient, back off and retry later
    Blocked,
    /// Timeout, connection failure or unexpected status; likely permanent for this input
    Network,
}

/// Errors that can occur during lookup operations
#[derive(Debug, Error)]
pub enum FetchError {
    /// The scraped host kept answering 403 after all retries
    #[error(
        "Access denied after {retries} retries. The site may have temporarily blocked this IP address."
    )]
    Blocked { retries: u32 },

    /// Server answered with a non-success status
    #[error("Request to {url} failed with HTTP {status}")]
    Status { status: u16, url: String },

    /// Request timed out
    #[error("Request timed out")]
    Timeout,

    /// Failed to connect to server
    #[error("Failed to connect to server")]
    ConnectError(#[source] reqwest::Error),

    /// Failed to build HTTP client
    #[error("Failed to create HTTP client")]
    ClientBuildError(#[source] reqwest::Error),

    /// URL could not be built from the configured host
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Other request error
    #[error("Request failed: {0}")]
    RequestError(String),
}

impl FetchError {
    /// Create an error from a reqwest error
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_connect() {
            FetchError::ConnectError(err)
        } else {
            FetchError::RequestError(err.to_string())
        }
    }

    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::Blocked { .. } => ErrorKind::Blocked,
            _ => ErrorKind::Network,
        }
    }

    /// True if the scraped host blocked the request
    pub fn is_blocked(&self) -> bool {
        self.kind() == ErrorKind::Blocked
    }
}

impl From<url::ParseError> for FetchError {
    fn from(err: url::ParseError) -> Self {
        FetchError::InvalidUrl(err.to_string())
    }
}
