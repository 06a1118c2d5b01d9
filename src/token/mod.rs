//! Token Module
//!
//! Signed identity tokens: the claims they carry and the codec that signs
//! and verifies them.

mod claims;
mod codec;

pub use claims::Claims;
pub use codec::{TokenCodec, TokenVerifier, SIGNING_ALGORITHM};
