//! Configuration Module
//!
//! Handles loading and managing gate configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{AuthError, Result};

/// Default token lifetime (24 hours).
pub const DEFAULT_TOKEN_LIFETIME_SECS: u64 = 24 * 60 * 60;
/// Default cache residency TTL (10 minutes).
pub const DEFAULT_CACHE_TTL_SECS: u64 = 10 * 60;
/// Default background sweep period (5 minutes).
pub const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 5 * 60;
/// Default number of cache shards.
pub const DEFAULT_SHARD_COUNT: usize = 16;
/// Default capacity of a single shard.
pub const DEFAULT_SHARD_CAPACITY: usize = 128;
/// Default HTTP port of the server binary.
pub const DEFAULT_SERVER_PORT: u16 = 8080;

/// Gate configuration parameters.
///
/// Everything except the signing secret has a default.
#[derive(Clone)]
pub struct Config {
    /// HMAC secret used to sign and verify tokens
    pub jwt_secret: String,
    /// Lifetime of newly issued tokens in seconds
    pub token_lifetime: u64,
    /// Maximum time validated claims are served from cache, in seconds
    pub cache_ttl: u64,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Number of cache shards (power of two)
    pub shard_count: usize,
    /// Maximum number of entries per shard
    pub shard_capacity: usize,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a config with the given secret and all other values at their defaults.
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_lifetime: DEFAULT_TOKEN_LIFETIME_SECS,
            cache_ttl: DEFAULT_CACHE_TTL_SECS,
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL_SECS,
            shard_count: DEFAULT_SHARD_COUNT,
            shard_capacity: DEFAULT_SHARD_CAPACITY,
            server_port: DEFAULT_SERVER_PORT,
        }
    }

    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `JWT_SECRET` - Signing secret (required)
    /// - `TOKEN_LIFETIME_SECS` - Token lifetime (default: 86400)
    /// - `CACHE_TTL_SECS` - Cache residency TTL (default: 600)
    /// - `CLEANUP_INTERVAL_SECS` - Cleanup frequency (default: 300)
    /// - `CACHE_SHARDS` - Shard count, power of two (default: 16)
    /// - `SHARD_CAPACITY` - Entries per shard (default: 128)
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    ///
    /// A missing secret or an unparsable value is a startup failure.
    pub fn from_env() -> Result<Self> {
        let jwt_secret = env::var("JWT_SECRET").unwrap_or_default();

        let config = Self {
            jwt_secret,
            token_lifetime: parse_var("TOKEN_LIFETIME_SECS", DEFAULT_TOKEN_LIFETIME_SECS)?,
            cache_ttl: parse_var("CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS)?,
            cleanup_interval: parse_var("CLEANUP_INTERVAL_SECS", DEFAULT_CLEANUP_INTERVAL_SECS)?,
            shard_count: parse_var("CACHE_SHARDS", DEFAULT_SHARD_COUNT)?,
            shard_capacity: parse_var("SHARD_CAPACITY", DEFAULT_SHARD_CAPACITY)?,
            server_port: parse_var("SERVER_PORT", DEFAULT_SERVER_PORT)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants the cache and codec rely on.
    pub fn validate(&self) -> Result<()> {
        if self.jwt_secret.is_empty() {
            return Err(AuthError::Configuration(
                "JWT_SECRET environment variable is required".to_string(),
            ));
        }
        if self.shard_count == 0 || !self.shard_count.is_power_of_two() {
            return Err(AuthError::Configuration(format!(
                "CACHE_SHARDS must be a power of two, got {}",
                self.shard_count
            )));
        }
        if self.shard_capacity == 0 {
            return Err(AuthError::Configuration(
                "SHARD_CAPACITY must be greater than zero".to_string(),
            ));
        }
        if self.token_lifetime == 0 || self.cleanup_interval == 0 {
            return Err(AuthError::Configuration(
                "TOKEN_LIFETIME_SECS and CLEANUP_INTERVAL_SECS must be greater than zero"
                    .to_string(),
            ));
        }
        Ok(())
    }

    pub fn token_lifetime(&self) -> Duration {
        Duration::from_secs(self.token_lifetime)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval)
    }
}

// The secret never reaches logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("jwt_secret", &"[hidden]")
            .field("token_lifetime", &self.token_lifetime)
            .field("cache_ttl", &self.cache_ttl)
            .field("cleanup_interval", &self.cleanup_interval)
            .field("shard_count", &self.shard_count)
            .field("shard_capacity", &self.shard_capacity)
            .field("server_port", &self.server_port)
            .finish()
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AuthError::Configuration(format!("{} has an invalid value: {:?}", name, raw))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::new("secret");
        assert_eq!(config.token_lifetime, 86_400);
        assert_eq!(config.cache_ttl, 600);
        assert_eq!(config.cleanup_interval, 300);
        assert_eq!(config.shard_count, 16);
        assert_eq!(config.shard_capacity, 128);
        assert_eq!(config.server_port, 8080);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_secret() {
        let config = Config::new("");
        assert!(matches!(config.validate(), Err(AuthError::Configuration(_))));
    }

    #[test]
    fn test_validate_rejects_non_power_of_two_shards() {
        let mut config = Config::new("secret");
        config.shard_count = 12;
        assert!(matches!(config.validate(), Err(AuthError::Configuration(_))));

        config.shard_count = 0;
        assert!(matches!(config.validate(), Err(AuthError::Configuration(_))));
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let mut config = Config::new("secret");
        config.shard_capacity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_hides_secret() {
        let config = Config::new("super-secret-value");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret-value"));
        assert!(rendered.contains("[hidden]"));
    }

    #[test]
    fn test_durations() {
        let config = Config::new("secret");
        assert_eq!(config.cache_ttl(), Duration::from_secs(600));
        assert_eq!(config.cleanup_interval(), Duration::from_secs(300));
        assert_eq!(config.token_lifetime(), Duration::from_secs(86_400));
    }
}
