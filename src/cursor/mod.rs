//! # Cursor Codec
//!
//! A cursor is an opaque token that records where a page ended together with
//! the ordering, filters and search it was produced under. Callers hand it
//! back verbatim; only a codec may look inside.
//!
//! The default codec ([`Base64JsonCodec`]) is reversible by anyone holding
//! the decoder. Wrap it in a [`SignedCursorCodec`] when tokens must not be
//! forged.

mod codec;
mod payload;
mod signed;

pub use codec::{Base64JsonCodec, CursorCodec};
pub use payload::CursorPayload;
pub use signed::SignedCursorCodec;
