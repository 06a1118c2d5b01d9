//! Authentication middleware
//!
//! Runs the verification gate for protected routes and attaches the
//! resulting [`Identity`] to the request.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::error::{AuthError, Result};
use crate::gate::Identity;

/// Authenticates the `Authorization` header and stores the caller's
/// [`Identity`] in the request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let header = match request.headers().get(AUTHORIZATION) {
        Some(value) => value.to_str().map_err(|_| AuthError::InvalidToken)?,
        None => "",
    };

    let identity = state.gate.authenticate(header)?;
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

/// Lets the request through only for an authenticated admin. Must run
/// after [`require_auth`].
pub async fn require_admin(request: Request, next: Next) -> Result<Response> {
    match request.extensions().get::<Identity>() {
        Some(identity) if identity.is_admin() => Ok(next.run(request).await),
        Some(_) => Err(AuthError::Forbidden),
        None => Err(AuthError::MissingToken),
    }
}
