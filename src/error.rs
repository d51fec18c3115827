//! Errors for jwtcodec
//!
//! Every failure is returned to the immediate caller with its specific kind
//! intact. Nothing here is fatal to the process; all variants are per-call
//! outcomes. Use [`Error::kind`] to decide how to surface a failure.

use thiserror::Error;

/// JWT codec errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // ============================================================================
    // Usage Errors
    // ============================================================================
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Algorithm '{0}' is not supported or not enabled")]
    UnsupportedAlgorithm(String),

    #[error("Invalid claims: {0}")]
    InvalidClaims(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    // ============================================================================
    // Format Errors
    // ============================================================================
    #[error("Malformed token: {0}")]
    MalformedToken(String),

    // ============================================================================
    // Verification Errors
    // ============================================================================
    #[error("Signature verification failed")]
    SignatureMismatch,

    #[error("Algorithm mismatch: expected '{expected}', token declares '{found}'")]
    AlgorithmMismatch { expected: String, found: String },

    #[error("Token expired at {expired_at} (now: {now}, leeway: {leeway}s)")]
    TokenExpired {
        expired_at: i64,
        now: i64,
        leeway: u64,
    },

    #[error("Token not valid until {not_before} (now: {now}, leeway: {leeway}s)")]
    TokenNotYetValid {
        not_before: i64,
        now: i64,
        leeway: u64,
    },

    #[error("Token audience mismatch: expected '{expected}', found {found:?}")]
    AudienceMismatch {
        expected: String,
        found: Vec<String>,
    },

    #[error("Token issuer mismatch: expected '{expected}', found {found:?}")]
    IssuerMismatch {
        expected: String,
        found: Option<String>,
    },

    #[error("Required token claim '{0}' is missing")]
    MissingClaim(String),
}

/// Coarse classification of an [`Error`]
///
/// An HTTP layer maps these to status codes; the codec itself never does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The caller misused the API (bad key, unknown algorithm, bad claims or
    /// options). Not caused by the token, never worth retrying.
    Usage,
    /// The token is structurally broken.
    Malformed,
    /// The token is well-formed but must not be trusted.
    Rejected,
}

impl Error {
    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidKey(_)
            | Error::UnsupportedAlgorithm(_)
            | Error::InvalidClaims(_)
            | Error::InvalidConfiguration(_) => ErrorKind::Usage,
            Error::MalformedToken(_) => ErrorKind::Malformed,
            Error::SignatureMismatch
            | Error::AlgorithmMismatch { .. }
            | Error::TokenExpired { .. }
            | Error::TokenNotYetValid { .. }
            | Error::AudienceMismatch { .. }
            | Error::IssuerMismatch { .. }
            | Error::MissingClaim(_) => ErrorKind::Rejected,
        }
    }

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Error::MalformedToken(message.into())
    }

    pub(crate) fn invalid_key(message: impl Into<String>) -> Self {
        Error::InvalidKey(message.into())
    }
}

/// Result type alias for jwtcodec operations
pub type Result<T> = std::result::Result<T, Error>;
