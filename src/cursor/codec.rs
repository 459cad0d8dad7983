//! Cursor codec trait and the default base64-of-JSON codec

use base64::{engine::general_purpose::STANDARD, Engine as _};

use super::payload::CursorPayload;
use crate::errors::{PaginationError, PaginationResult};

/// Reversible conversion between a cursor payload and an opaque token.
///
/// Implementations must satisfy `decode(encode(p)) == p`.
pub trait CursorCodec: Send + Sync {
    /// Encode a payload into a token
    fn encode(&self, payload: &CursorPayload) -> PaginationResult<String>;

    /// Decode a token; malformed tokens fail with [`PaginationError::Decode`]
    fn decode(&self, token: &str) -> PaginationResult<CursorPayload>;
}

/// Standard base64 over the payload's JSON form.
///
/// Not signed: anyone can decode, edit and re-encode a token.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64JsonCodec;

impl CursorCodec for Base64JsonCodec {
    fn encode(&self, payload: &CursorPayload) -> PaginationResult<String> {
        let json = serde_json::to_vec(payload)
            .map_err(|e| PaginationError::Encode(e.to_string()))?;
        Ok(STANDARD.encode(json))
    }

    fn decode(&self, token: &str) -> PaginationResult<CursorPayload> {
        let bytes = STANDARD
            .decode(token.trim())
            .map_err(|e| PaginationError::decode(format!("not valid base64: {}", e)))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| PaginationError::decode(format!("malformed cursor payload: {}", e)))
    }
}
