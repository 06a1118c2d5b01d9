//! Token Codec Module
//!
//! Signs and verifies HS256 tokens carrying [`Claims`].

use std::fmt;
use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use tracing::{debug, warn};

use crate::error::{AuthError, Result};
use crate::token::Claims;

/// The only algorithm the codec signs with or accepts.
pub const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

// == Token Verifier ==
/// Verification seam used by the gate.
pub trait TokenVerifier: Send + Sync {
    /// Cryptographically verifies `token` and returns its claims.
    fn verify(&self, token: &str) -> Result<Claims>;
}

// == Token Codec ==
/// Stateless HMAC token codec. Keys are derived once at construction and
/// only read afterwards.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime: Duration,
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &SIGNING_ALGORITHM)
            .field("lifetime", &self.lifetime)
            .field("keys", &"[hidden]")
            .finish()
    }
}

impl TokenCodec {
    // == Constructor ==
    /// Creates a codec for `secret`. An empty secret is a configuration error.
    pub fn new(secret: &str, lifetime: Duration) -> Result<Self> {
        if secret.is_empty() {
            return Err(AuthError::Configuration(
                "no signing secret configured".to_string(),
            ));
        }

        let mut validation = Validation::new(SIGNING_ALGORITHM);
        // Expiry and nbf are checked against an explicit instant in `verify_at`.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            lifetime,
        })
    }

    /// Creates a codec from the loaded configuration.
    pub fn from_config(config: &crate::config::Config) -> Result<Self> {
        Self::new(&config.jwt_secret, config.token_lifetime())
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    // == Issue ==
    /// Issues a token for the given identity, valid from now for the
    /// configured lifetime.
    pub fn issue(&self, user_id: u64, role: &str, email: &str) -> Result<String> {
        let lifetime = i64::try_from(self.lifetime.as_secs()).unwrap_or(i64::MAX);
        let claims = Claims::new(user_id, role, email, Utc::now().timestamp(), lifetime);
        self.sign(&claims)
    }

    // == Sign ==
    /// Signs explicit claims.
    pub fn sign(&self, claims: &Claims) -> Result<String> {
        encode(&Header::new(SIGNING_ALGORITHM), claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("failed to sign token: {}", e)))
    }

    // == Verify At ==
    /// Verifies `token` as of `now` (Unix seconds).
    ///
    /// Structure, algorithm and signature problems are `InvalidToken`;
    /// `now >= exp` is `ExpiredToken`.
    pub fn verify_at(&self, token: &str, now: i64) -> Result<Claims> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
                kind => {
                    warn!(error = ?kind, "token rejected");
                    AuthError::InvalidToken
                }
            }
        })?;

        let claims = data.claims;
        if claims.is_expired_at(now) {
            debug!(user_id = claims.user_id, exp = claims.exp, "token expired");
            return Err(AuthError::ExpiredToken);
        }
        if claims.nbf > now {
            warn!(user_id = claims.user_id, nbf = claims.nbf, "token used before nbf");
            return Err(AuthError::InvalidToken);
        }

        Ok(claims)
    }
}

impl TokenVerifier for TokenCodec {
    fn verify(&self, token: &str) -> Result<Claims> {
        self.verify_at(token, Utc::now().timestamp())
    }
}
