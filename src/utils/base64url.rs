//! Base64URL encoding/decoding per RFC 4648
//!
//! Thin wrapper around the `base64` crate. Decoding is strict: no padding,
//! URL-safe alphabet only, and non-zero trailing bits are rejected so every
//! byte sequence has exactly one encoding.

use crate::error::{Error, Result};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

/// Encode bytes to a Base64URL string
pub fn encode_bytes(input: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Encode a string to Base64URL
pub fn encode(input: &str) -> String {
    encode_bytes(input.as_bytes())
}

/// Decode a Base64URL string to bytes with a maximum decoded size
pub fn decode_bytes(input: &str, max_size: usize) -> Result<Vec<u8>> {
    // Reject before allocating: 4 chars carry 3 bytes
    if input.len() / 4 * 3 > max_size {
        return Err(Error::malformed(format!(
            "segment too large: {} characters (max decoded size: {} bytes)",
            input.len(),
            max_size
        )));
    }

    let result = URL_SAFE_NO_PAD
        .decode(input)
        .map_err(|e| Error::malformed(format!("Base64URL decode failed: {e}")))?;

    if result.len() > max_size {
        return Err(Error::malformed(format!(
            "decoded size exceeds limit: {} bytes (max: {})",
            result.len(),
            max_size
        )));
    }

    Ok(result)
}

/// Decode a Base64URL string to a UTF-8 string with a maximum decoded size
pub fn decode(input: &str, max_size: usize) -> Result<String> {
    decode_bytes(input, max_size).and_then(|bytes| {
        String::from_utf8(bytes).map_err(|e| Error::malformed(format!("invalid UTF-8: {e}")))
    })
}
