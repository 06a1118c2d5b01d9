//! Error types for token verification
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Auth Error Enum ==
/// Unified error type for authentication.
///
/// The cache never produces these; only configuration loading, the token
/// codec and the gate's structural checks do.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Startup configuration is missing or invalid
    #[error("configuration error: {0}")]
    Configuration(String),

    /// No credential presented
    #[error("missing token")]
    MissingToken,

    /// Malformed token, wrong algorithm or bad signature
    #[error("invalid token")]
    InvalidToken,

    /// Token is well formed but past its expiration
    #[error("token has expired")]
    ExpiredToken,

    /// Authenticated, but the role is not allowed here
    #[error("forbidden, admin access required")]
    Forbidden,

    /// Signing backend failure
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Whether this error means the caller must present (new) credentials.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            AuthError::MissingToken | AuthError::InvalidToken | AuthError::ExpiredToken
        )
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match &self {
            AuthError::MissingToken | AuthError::InvalidToken | AuthError::ExpiredToken => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::Configuration(_) | AuthError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for authentication.
pub type Result<T> = std::result::Result<T, AuthError>;
