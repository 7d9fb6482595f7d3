//! Error types for the review thread client.

use thiserror::Error;

/// Result type used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur when fetching or rendering a thread.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Invalid request or parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Network failure while talking to the API
    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-success response from the API (other than not-found and auth failures)
    #[error("API error {status}: {name}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error name reported by the API, e.g. `ForbiddenError`
        name: String,
        /// Error message reported by the API
        message: String,
    },

    /// The requested note or forum does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Credentials were rejected, or a login was required
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Parse error when decoding API responses
    #[error("Parse error: {0}")]
    Parse(String),

    /// The fetched notes do not form a well-formed reply tree
    #[error("Malformed thread: {0}")]
    Structure(String),

    /// I/O error while writing reports or reading credentials
    #[error("I/O error: {0}")]
    Io(String),
}

impl Error {
    /// Whether this error came from rejected credentials.
    pub fn is_auth(&self) -> bool {
        matches!(self, Error::Authentication(_))
    }

    /// Whether this error came from fetching the thread (network, missing
    /// thread, missing permissions). Only these move on to the next access
    /// strategy.
    pub fn is_fetch(&self) -> bool {
        matches!(
            self,
            Error::Transport(_) | Error::Api { .. } | Error::NotFound(_) | Error::Parse(_)
        )
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Parse(err.to_string())
    }
}
