use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// How a failure is surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Logged and replaced with placeholder or empty content.
    NetworkFailure,
    /// Shown as a message; the operation is aborted before anything is sent.
    ValidationFailure,
    /// Shown as an access-denied view.
    AuthorizationFailure,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Server returned {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("Parse error: {0}")]
    Decode(String),

    #[error("{0}")]
    Validation(String),

    #[error("Access denied for user {0}")]
    AccessDenied(i64),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) => ErrorKind::ValidationFailure,
            Error::AccessDenied(_) => ErrorKind::AuthorizationFailure,
            Error::Status { status, .. } if *status == StatusCode::FORBIDDEN => {
                ErrorKind::AuthorizationFailure
            }
            Error::Network(_) | Error::Status { .. } | Error::Decode(_) | Error::InvalidUrl(_) => {
                ErrorKind::NetworkFailure
            }
        }
    }
}
