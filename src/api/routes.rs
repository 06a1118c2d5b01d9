//! API Routes
//!
//! Configures the Axum router with public, authenticated and admin routes.

use axum::{middleware, routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{cache_stats_handler, health_handler, me_handler, AppState};
use super::middleware::{require_admin, require_auth};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - Auth: `require_auth` on every route except `/health`
/// - Admin: `require_admin` on `/admin/*`, after authentication
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let admin = Router::new()
        .route("/admin/cache/stats", get(cache_stats_handler))
        .route_layer(middleware::from_fn(require_admin));

    let protected = Router::new()
        .route("/auth/me", get(me_handler))
        .merge(admin)
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/health", get(health_handler))
        .merge(protected)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
