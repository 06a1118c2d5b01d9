//! Gate Module
//!
//! Request-time token verification: header extraction, structural
//! preflight, cache lookup and codec fallback.

mod preflight;
mod verification;

pub use preflight::{extract_token, preflight, BEARER_PREFIX, MIN_TOKEN_LEN};
pub use verification::{Identity, VerificationGate, ADMIN_ROLE};
