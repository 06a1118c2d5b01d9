//! Header extraction and cheap structural checks, run before any lock or
//! cryptographic work.

use crate::error::{AuthError, Result};

/// Required prefix of the `Authorization` header.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Shortest string that could plausibly be a signed token.
pub const MIN_TOKEN_LEN: usize = 10;

/// Extracts the token from an `Authorization` header value.
///
/// The header must carry the exact `Bearer ` prefix. An empty header, or a
/// prefix with nothing after it, is `MissingToken`; any other scheme or a
/// bare token is `InvalidToken`.
pub fn extract_token(auth_header: &str) -> Result<&str> {
    if auth_header.is_empty() {
        return Err(AuthError::MissingToken);
    }
    match auth_header.strip_prefix(BEARER_PREFIX) {
        Some("") => Err(AuthError::MissingToken),
        Some(token) => Ok(token),
        None if auth_header == BEARER_PREFIX.trim_end() => Err(AuthError::MissingToken),
        None => Err(AuthError::InvalidToken),
    }
}

/// Fast structural check: minimum length, printable ASCII only, and exactly
/// three non-empty segments separated by `.`.
///
/// Passing says nothing about validity; only the codec decides that.
pub fn preflight(token: &str) -> bool {
    let bytes = token.as_bytes();
    if bytes.len() < MIN_TOKEN_LEN {
        return false;
    }

    let mut dots = 0;
    let mut segment_len = 0;
    for &byte in bytes {
        match byte {
            b'.' => {
                if segment_len == 0 {
                    return false;
                }
                dots += 1;
                segment_len = 0;
            }
            32..=126 => segment_len += 1,
            _ => return false,
        }
    }

    dots == 2 && segment_len > 0
}
