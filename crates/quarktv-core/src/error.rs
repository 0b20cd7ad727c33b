//! Error types for QuarkTV Core

use thiserror::Error;

/// Result type alias for streaming client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Streaming client error types
#[derive(Error, Debug)]
pub enum Error {
    /// The provider answered with a non-success status. The body is read
    /// before this is raised so the diagnostic text is kept.
    #[error("HTTP error! status: {status} - {body}")]
    Request { status: u16, body: String },

    /// The response body was not valid JSON for the expected shape.
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// DNS, connect, TLS or caller-imposed timeout failures.
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// HTTP status code, if the provider responded at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Request { status, .. } => Some(*status),
            Error::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns true if retrying the same call could succeed.
    ///
    /// The client never retries on its own; this is for callers that do.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::Transport(_) => true,
            Error::Request { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Returns the error code for logs and analytics
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Request { .. } => "REQUEST",
            Error::Parse(_) => "PARSE",
            Error::Transport(_) => "TRANSPORT",
            Error::InvalidHeader(_) => "INVALID_HEADER",
            Error::InvalidConfig(_) => "INVALID_CONFIG",
        }
    }
}
