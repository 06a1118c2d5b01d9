//! API Module
//!
//! Thin HTTP surface around the verification gate.
//!
//! # Endpoints
//! - `GET /health` - Health check endpoint (public)
//! - `GET /auth/me` - Identity of the bearer token (authenticated)
//! - `GET /admin/cache/stats` - Token cache statistics (admin only)

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use handlers::*;
pub use middleware::{require_admin, require_auth};
pub use routes::create_router;
