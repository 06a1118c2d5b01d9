//! Verification gate: cache in front of the token codec.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::{current_timestamp_ms, residency_deadline, ShardedCache};
use crate::error::{AuthError, Result};
use crate::gate::{extract_token, preflight};
use crate::token::{Claims, TokenVerifier};

/// Role granted administrative access.
pub const ADMIN_ROLE: &str = "Admin";

// == Identity ==
/// The facts a successful authentication hands to the request layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub user_id: u64,
    pub role: String,
    pub email: String,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            role: claims.role,
            email: claims.email,
        }
    }
}

// == Verification Gate ==
/// Authenticates `Authorization` headers.
///
/// Per request: extract, preflight, cache lookup, and on a miss codec
/// verification followed by a cache insert. The codec runs outside every
/// cache lock.
#[derive(Clone)]
pub struct VerificationGate {
    cache: Arc<ShardedCache>,
    verifier: Arc<dyn TokenVerifier>,
    residency: Duration,
}

impl VerificationGate {
    // == Constructor ==
    /// `residency` caps how long verified claims are served from cache.
    pub fn new(
        cache: Arc<ShardedCache>,
        verifier: Arc<dyn TokenVerifier>,
        residency: Duration,
    ) -> Self {
        Self {
            cache,
            verifier,
            residency,
        }
    }

    pub fn cache(&self) -> &Arc<ShardedCache> {
        &self.cache
    }

    // == Authenticate ==
    /// Authenticates a raw `Authorization` header value.
    pub fn authenticate(&self, auth_header: &str) -> Result<Identity> {
        let token = extract_token(auth_header)?;
        self.verify_token(token).map(Identity::from)
    }

    // == Verify Token ==
    /// Returns the claims for an already extracted token.
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        if !preflight(token) {
            warn!(len = token.len(), "token failed preflight");
            return Err(AuthError::InvalidToken);
        }

        if let Some(claims) = self.cache.get(token) {
            return Ok(claims);
        }

        let claims = self.verifier.verify(token).map_err(|err| {
            match &err {
                AuthError::ExpiredToken => debug!("rejected expired token"),
                other => warn!(error = %other, "rejected token"),
            }
            err
        })?;

        let residency_ms = i64::try_from(self.residency.as_millis()).unwrap_or(i64::MAX);
        let expires_at = residency_deadline(&claims, current_timestamp_ms(), residency_ms);
        self.cache.put(token, claims.clone(), expires_at);
        debug!(user_id = claims.user_id, "token verified and cached");

        Ok(claims)
    }
}
