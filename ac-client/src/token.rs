//! Bearer token claim decoding
//!
//! The token is `header.payload.signature`, each segment base64url.
//! Only the payload is decoded, and only `sub` and `groups[].authority`
//! are read. The signature is NOT verified: the backend stays the only
//! authority, the client just uses the claims to decide what to show.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use shared::client::TokenClaims;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token must have 3 dot-separated segments, found {0}")]
    Segments(usize),

    #[error("payload is not valid base64url: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("payload is not valid claims JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Decode the payload segment of a bearer token
pub fn decode_claims(token: &str) -> Result<TokenClaims, TokenError> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(TokenError::Segments(parts.len()));
    }

    // Some issuers pad the segments; the no-pad engine rejects '='.
    let payload = URL_SAFE_NO_PAD.decode(parts[1].trim_end_matches('='))?;
    Ok(serde_json::from_slice(&payload)?)
}
