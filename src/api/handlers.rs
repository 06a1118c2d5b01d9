//! API Handlers
//!
//! HTTP request handlers and the state they share.

use std::sync::Arc;

use axum::{extract::State, Extension, Json};

use crate::cache::{CacheStats, ShardedCache};
use crate::config::Config;
use crate::error::Result;
use crate::gate::{Identity, VerificationGate};
use crate::models::HealthResponse;
use crate::token::TokenCodec;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Token verification pipeline, including its cache
    pub gate: VerificationGate,
}

impl AppState {
    /// Creates a new AppState around an existing gate.
    pub fn new(gate: VerificationGate) -> Self {
        Self { gate }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Fails when the configuration has no usable signing secret.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let codec = TokenCodec::from_config(config)?;
        let cache = Arc::new(ShardedCache::from_config(config));
        let gate = VerificationGate::new(cache, Arc::new(codec), config.cache_ttl());
        Ok(Self::new(gate))
    }

    pub fn cache(&self) -> &Arc<ShardedCache> {
        self.gate.cache()
    }
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Handler for GET /auth/me
///
/// Echoes the identity attached by the auth middleware.
pub async fn me_handler(Extension(identity): Extension<Identity>) -> Json<Identity> {
    Json(identity)
}

/// Handler for GET /admin/cache/stats
pub async fn cache_stats_handler(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.cache().stats())
}
