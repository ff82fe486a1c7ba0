//! # Binary-safe codec
//!
//! Raw keystroke captures carry arbitrary bytes: NUL, escape markers, CSI
//! introducers, partial UTF-8. None of that survives a trip through a JSON
//! string literal or an external pretty-printer untouched, so the `raw` field
//! of every record is stored in the standard base64 alphabet
//! (`A-Z a-z 0-9 + /`, `=` padding).
//!
//! Encoding is delegated to the `base64` crate. Decoding runs a strict
//! validation pass first so that every rejection maps onto a precise
//! [`CodecError`] instead of a generic decode failure:
//!
//! - length must be a multiple of 4
//! - only alphabet symbols, plus `=` in the final one or two positions
//! - the final symbol must not carry stray low bits (canonical form)

use base64::engine::general_purpose::STANDARD;
use base64::{DecodeError, Engine as _};
use thiserror::Error;

const PAD: u8 = b'=';

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("encoded length {len} is not a multiple of 4")]
    InvalidLength { len: usize },

    #[error("invalid symbol {symbol:?} at offset {offset}")]
    InvalidSymbol { offset: usize, symbol: char },

    #[error("misplaced padding at offset {offset}")]
    InvalidPadding { offset: usize },

    #[error("non-canonical final symbol at offset {offset}")]
    NonCanonical { offset: usize },
}

/// Encodes bytes into padded base64 text. Empty input yields an empty string.
pub fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decodes text produced by [`encode`] back into the exact original bytes.
pub fn decode(text: &str) -> Result<Vec<u8>, CodecError> {
    validate(text)?;
    STANDARD.decode(text).map_err(|e| match e {
        DecodeError::InvalidByte(offset, PAD) => CodecError::InvalidPadding { offset },
        DecodeError::InvalidByte(offset, b) => CodecError::InvalidSymbol {
            offset,
            symbol: b as char,
        },
        DecodeError::InvalidLastSymbol(offset, _) => CodecError::NonCanonical { offset },
        DecodeError::InvalidLength(len) => CodecError::InvalidLength { len },
        _ => CodecError::InvalidPadding {
            offset: text.len().saturating_sub(2),
        },
    })
}

/// Returns true if `text` would decode successfully.
pub fn is_valid(text: &str) -> bool {
    decode(text).is_ok()
}

fn is_symbol(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'+' || b == b'/'
}

fn validate(text: &str) -> Result<(), CodecError> {
    let bytes = text.as_bytes();
    if bytes.len() % 4 != 0 {
        return Err(CodecError::InvalidLength { len: bytes.len() });
    }

    let trailing_pad = bytes.iter().rev().take_while(|&&b| b == PAD).count();
    let body_len = bytes.len() - trailing_pad;
    if trailing_pad > 2 {
        return Err(CodecError::InvalidPadding { offset: body_len });
    }

    for (offset, &b) in bytes[..body_len].iter().enumerate() {
        if b == PAD {
            return Err(CodecError::InvalidPadding { offset });
        }
        if !is_symbol(b) {
            // Every byte before `offset` is ASCII, so this is a char boundary.
            let symbol = text[offset..].chars().next().unwrap_or('\u{FFFD}');
            return Err(CodecError::InvalidSymbol { offset, symbol });
        }
    }

    Ok(())
}
