use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use thiserror::Error;

/// AuthError
///
/// Every way a request can fail to present a usable credential. The gate never shows
/// these to the client: all of them end in the same login redirect.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("no credential presented")]
    MissingCredential,

    #[error("malformed credential: {0}")]
    Malformed(String),

    #[error("credential signature does not match")]
    InvalidSignature,

    #[error("credential expired")]
    Expired,

    #[error("unrecognized role `{0}`")]
    UnrecognizedRole(String),
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature => AuthError::InvalidSignature,
            ErrorKind::ExpiredSignature => AuthError::Expired,
            _ => AuthError::Malformed(err.to_string()),
        }
    }
}

/// ConfigError
///
/// Raised while building the immutable startup state (route matcher patterns).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid route pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

/// AppError
///
/// Handler-level failures of the page router.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("page not found: {0}")]
    PageNotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::PageNotFound(_) => StatusCode::NOT_FOUND,
        };

        (status, self.to_string()).into_response()
    }
}
