//! Token Gate - cached request authentication
//!
//! Verifies signed bearer tokens behind a sharded TTL/LRU cache so that
//! steady-state requests skip signature checks.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod gate;
pub mod models;
pub mod tasks;
pub mod token;

pub use api::AppState;
pub use cache::{CacheStats, ShardedCache};
pub use config::Config;
pub use error::AuthError;
pub use gate::{Identity, VerificationGate};
pub use tasks::start_background_cleanup;
pub use token::{Claims, TokenCodec, TokenVerifier};
