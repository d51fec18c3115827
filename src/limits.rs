//! Size limit constants for input validation

/// Maximum length for a token string (64KB)
pub(crate) const MAX_TOKEN_LENGTH: usize = 64 * 1024;

/// Maximum size for decoded header JSON (8KB)
pub(crate) const MAX_DECODED_HEADER_SIZE: usize = 8 * 1024;

/// Maximum size for decoded payload JSON (48KB)
pub(crate) const MAX_DECODED_PAYLOAD_SIZE: usize = 48 * 1024;

/// Maximum size for decoded signature bytes (1KB)
/// RSA-8192 signatures are 1024 bytes; everything else is smaller
pub(crate) const MAX_DECODED_SIGNATURE_SIZE: usize = 1024;

/// Maximum length for the header `alg` value
pub(crate) const MAX_ALG_LENGTH: usize = 16;

/// Maximum length for the header `kid` value
pub(crate) const MAX_KID_LENGTH: usize = 256;

/// Maximum leeway (300 seconds = 5 minutes)
/// Keeps leeway from effectively disabling expiration checks
pub(crate) const MAX_LEEWAY_SECONDS: u64 = 300;

/// Maximum nesting of arrays and objects inside one claim value
/// Decoded claims are converted recursively, so depth must be bounded first
pub(crate) const MAX_CLAIM_DEPTH: usize = 64;
