//! Background Tasks Module
//!
//! Contains background tasks that run periodically for the process lifetime.
//!
//! # Tasks
//! - Token cache cleanup: sweeps expired entries out of every shard

mod cleanup;

pub use cleanup::start_background_cleanup;
