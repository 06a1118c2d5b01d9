//! Token Claims Module
//!
//! Identity payload carried by a signed token.

use serde::{Deserialize, Serialize};

// == Claims ==
/// Identity asserted by a token. All instants are Unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject identifier
    pub user_id: u64,
    /// Role used for authorization (e.g. "Admin")
    pub role: String,
    /// Account email
    pub email: String,
    /// Issued at
    pub iat: i64,
    /// Not valid before
    pub nbf: i64,
    /// Expiration
    pub exp: i64,
}

impl Claims {
    // == Constructor ==
    /// Builds claims issued at `issued_at` and valid for `lifetime_secs`.
    pub fn new(
        user_id: u64,
        role: impl Into<String>,
        email: impl Into<String>,
        issued_at: i64,
        lifetime_secs: i64,
    ) -> Self {
        Self {
            user_id,
            role: role.into(),
            email: email.into(),
            iat: issued_at,
            nbf: issued_at,
            exp: issued_at.saturating_add(lifetime_secs),
        }
    }

    /// Expired once `now` reaches `exp`.
    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.exp
    }

    /// Expiration as Unix milliseconds, the unit the cache works in.
    pub fn expires_at_ms(&self) -> i64 {
        self.exp.saturating_mul(1000)
    }
}
