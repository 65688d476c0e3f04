use thiserror::Error;

/// Errors returned by [`DriftfolioClient`](crate::DriftfolioClient).
#[derive(Error, Debug)]
pub enum ClientError {
    /// The request was rejected locally before it was sent.
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] driftfolio_core::Error),

    /// The session was already invalidated or its token has expired.
    #[error("Session expired")]
    SessionExpired,

    /// The server answered 401. The session has been invalidated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("API error {status} ({code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl ClientError {
    /// HTTP status of the server response, if the error came from one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized(_) => Some(401),
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for errors after which the caller has to log in again.
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::SessionExpired | Self::Unauthorized(_))
    }
}
