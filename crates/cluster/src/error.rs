//! Error types for control-plane operations

use thiserror::Error;

/// Result type alias for control-plane operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to the control plane
#[derive(Debug, Error)]
pub enum Error {
    /// Connection details are missing from the environment
    #[error("control plane endpoint not configured: set {0}")]
    MissingConfig(&'static str),

    /// Endpoint value is not a usable URL
    #[error("invalid control plane endpoint: {0}")]
    Endpoint(String),

    /// HTTP request failed
    #[error("HTTP request failed: {message}")]
    Http {
        /// Error message
        message: String,
        /// HTTP status code if available
        status: Option<u16>,
    },

    /// Response body was not what the API promises
    #[error("invalid API response: {0}")]
    InvalidResponse(String),
}

impl Error {
    /// Status code of the failing request, if there was a response at all
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => *status,
            _ => None,
        }
    }

    /// Object not found
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Write rejected because the name is already taken
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        self.status() == Some(409)
    }

    /// Write rejected as semantically invalid (immutable field changes)
    #[must_use]
    pub fn is_unprocessable(&self) -> bool {
        self.status() == Some(422)
    }
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => Self::Http {
                message: format!("HTTP {}", code),
                status: Some(code),
            },
            other => Self::Http {
                message: other.to_string(),
                status: None,
            },
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}
