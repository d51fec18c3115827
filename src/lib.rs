//! # jwtcodec - Issue and Verify JSON Web Tokens
//!
//! > Small, strict JWT codec for Rust.
//!
//! **jwtcodec** turns a set of claims into a signed compact token and back. It is a
//! library of plain functions: the application owns the keys and passes them in on
//! every call, nothing is cached, nothing is logged.
//!
//! ## Quick Start
//!
//! ```
//! use std::time::Duration;
//! use jwtcodec::{issue, verify, Algorithm, Claims, Error, Key};
//!
//! let key = Key::symmetric("secret");
//! let claims = Claims::new()
//!     .with_claim("name", "Kaif Khan")
//!     .with_claim("email", "kaif@email.com");
//!
//! let token = issue(&claims, &key, Algorithm::HS256, Some(Duration::from_secs(3600)))?;
//! let verified = verify(&token, &key, Algorithm::HS256)?;
//! assert_eq!(verified.get("email"), claims.get("email"));
//!
//! let wrong = Key::symmetric("wrong");
//! assert!(matches!(
//!     verify(&token, &wrong, Algorithm::HS256),
//!     Err(Error::SignatureMismatch)
//! ));
//! # Ok::<(), Error>(())
//! ```
//!
//! ## Verification Flow
//!
//! ```text
//! token string
//!     │ split into 3 segments
//!     ▼
//! header        `alg` must equal the expected algorithm
//!     │ signature over the raw header.payload bytes
//!     ▼
//! payload       decoded only after the signature matched
//!     │ Validation: exp, nbf, iss, aud, required claims
//!     ▼
//! Claims
//! ```
//!
//! [`decode`] skips everything after the split and returns untrusted header and
//! claims for inspection.
//!
//! ## Algorithm Support
//!
//! - **HMAC** (always enabled): HS256, HS384, HS512
//! - **RSA** (with `rsa` feature): RS256, RS384, RS512
//! - **ECDSA** (with `ecdsa` feature): ES256, ES384
//!
//! ## Keys
//!
//! ```ignore
//! Key::symmetric(b"your-256-bit-secret".to_vec())
//! Key::rsa_private(pkcs8_der)                 // signs and verifies RS*
//! Key::rsa_public(pkcs1_der)                  // verifies RS*
//! Key::ecdsa_private(pkcs8_der, EcdsaCurve::P256)
//! Key::ecdsa_public(point, EcdsaCurve::P256)
//! ```
//!
//! [`Key::verifying_key`] derives the public half of a private key.
//!
//! ## Claims Validation
//!
//! ```ignore
//! Validation::new(Algorithm::HS256)
//!     .require_issuer("https://issuer.example")
//!     .require_audience("my-api")
//!     .require_claim("email")
//!     .leeway(60)                              // at most 300 seconds
//! ```
//!
//! ## Features
//!
//! - **HMAC** (always enabled): HS256, HS384, HS512
//! - **`rsa`**: RSA algorithms (RS256, RS384, RS512)
//! - **`ecdsa`**: ECDSA algorithms (ES256, ES384)
//! - **`all-algorithms`**: Enable all asymmetric algorithms (RSA + ECDSA)
//!
//! ## Security
//!
//! ### Algorithm Confusion Prevention
//!
//! Callers always name the algorithm they expect. A token declaring anything
//! else, including `"none"`, fails with [`Error::AlgorithmMismatch`] before any
//! key is used.
//!
//! ### Timing Attack Protection
//!
//! HMAC signature verification uses constant-time comparison via the [`constant_time_eq`](https://crates.io/crates/constant_time_eq)
//! crate, preventing timing-based key recovery attacks.
//!
//! ### Strict Decoding
//!
//! Base64URL segments must be unpadded and canonical, and every input is
//! bounded in size before it is decoded.
//!
//! ## References
//!
//! - [RFC 7515](https://datatracker.ietf.org/doc/html/rfc7515) - JSON Web Signature (JWS)
//! - [RFC 7519](https://datatracker.ietf.org/doc/html/rfc7519) - JSON Web Token (JWT)
//! - [RFC 8725](https://datatracker.ietf.org/doc/html/rfc8725) - JSON Web Signature Best Practices

// Core modules
pub mod error;
pub(crate) mod limits;
pub mod utils;

// Algorithm system
mod algorithm;
pub mod keys;

// Claims and validation
pub mod claims;

// Token types
pub mod token;

// Issue / decode / verify
mod codec;

// ============================================================================
// PUBLIC API
// ============================================================================

pub use codec::{decode, issue, issue_with, verify, verify_with, IssueOptions};

pub use algorithm::Algorithm;
pub use claims::{ClaimValue, Claims, Validation};
pub use error::{Error, ErrorKind, Result};
pub use keys::Key;
pub use token::Header;

// Re-export curve type for ECDSA
#[cfg(feature = "ecdsa")]
pub use keys::EcdsaCurve;
