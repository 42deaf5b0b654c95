// File: pinflow-common/src/error.rs

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Local input rejection; raised before anything is sent over the wire.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Transport-level failure (connect, DNS, timeout). Transient.
    #[error("Network error: {0}")]
    Network(String),

    /// The backend explicitly rejected the request (4xx/5xx with a message).
    #[error("Remote error: {0}")]
    Remote(String),

    /// 401 anywhere, or an otherwise invalid session. Fatal to the flow
    /// that hit it.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// The connection deadline elapsed without the account authenticating.
    #[error("Connection attempt timed out")]
    Timeout,

    /// A poll session for this poller is still running.
    #[error("A connection attempt is already in progress")]
    AlreadyInProgress,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    /// Transient failures are retried on the poll cadence; everything else
    /// halts the step that produced it.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Network(_))
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_status() {
            Error::Remote(e.to_string())
        } else {
            Error::Network(e.to_string())
        }
    }
}
