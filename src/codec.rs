//! Issue, decode and verify compact JWS tokens
//!
//! Verification runs in a fixed order:
//!
//! ```text
//! split into header.payload.signature      MalformedToken
//!     │
//! decode header, compare `alg`            MalformedToken / AlgorithmMismatch
//!     │
//! check signature over header.payload     SignatureMismatch / InvalidKey
//!     │
//! decode payload into Claims              MalformedToken
//!     │
//! validate exp, nbf, iss, aud, required   TokenExpired / TokenNotYetValid / ...
//! ```
//!
//! The payload is never decoded before its signature has been checked.

use std::time::Duration;

use crate::algorithm::Algorithm;
use crate::claims::{current_timestamp, Claims, Validation};
use crate::error::{Error, Result};
use crate::keys::Key;
use crate::limits::{MAX_DECODED_PAYLOAD_SIZE, MAX_KID_LENGTH, MAX_TOKEN_LENGTH};
use crate::token::{Header, TokenParts};
use crate::utils::base64url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expiry {
    In(Duration),
    At(i64),
}

/// Options for [`issue_with`]
///
/// ```
/// use std::time::Duration;
/// use jwtcodec::{Algorithm, IssueOptions};
///
/// let options = IssueOptions::new(Algorithm::HS256)
///     .expires_in(Duration::from_secs(3600))
///     .key_id("2024-01");
/// assert_eq!(options.algorithm(), Algorithm::HS256);
/// ```
#[derive(Debug, Clone)]
pub struct IssueOptions {
    algorithm: Algorithm,
    expiry: Option<Expiry>,
    not_before: Option<i64>,
    issued_at: Option<i64>,
    key_id: Option<String>,
}

impl IssueOptions {
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            expiry: None,
            not_before: None,
            issued_at: None,
            key_id: None,
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Set `exp` to `iat` plus this duration, in whole seconds
    pub fn expires_in(mut self, ttl: Duration) -> Self {
        self.expiry = Some(Expiry::In(ttl));
        self
    }

    /// Set `exp` to an absolute Unix timestamp
    pub fn expires_at(mut self, timestamp: i64) -> Self {
        self.expiry = Some(Expiry::At(timestamp));
        self
    }

    pub fn not_before(mut self, timestamp: i64) -> Self {
        self.not_before = Some(timestamp);
        self
    }

    /// Use this `iat` instead of the system clock
    pub fn issued_at(mut self, timestamp: i64) -> Self {
        self.issued_at = Some(timestamp);
        self
    }

    /// Emit a `kid` header
    pub fn key_id(mut self, kid: impl Into<String>) -> Self {
        self.key_id = Some(kid.into());
        self
    }
}

/// Issue a signed token
///
/// Sets `iat` to now and, when `expiry` is given, `exp` to `iat + expiry`.
/// The caller's claims are left untouched.
///
/// ```
/// use std::time::Duration;
/// use jwtcodec::{issue, verify, Algorithm, Claims, Key};
///
/// let key = Key::symmetric("secret");
/// let claims = Claims::new().with_claim("name", "Kaif Khan");
///
/// let token = issue(&claims, &key, Algorithm::HS256, Some(Duration::from_secs(60)))?;
/// let verified = verify(&token, &key, Algorithm::HS256)?;
/// assert_eq!(verified.get("name"), claims.get("name"));
/// # Ok::<(), jwtcodec::Error>(())
/// ```
pub fn issue(
    claims: &Claims,
    key: &Key,
    algorithm: Algorithm,
    expiry: Option<Duration>,
) -> Result<String> {
    let mut options = IssueOptions::new(algorithm);
    if let Some(ttl) = expiry {
        options = options.expires_in(ttl);
    }
    issue_with(claims, key, &options)
}

/// Issue a signed token with full control over header and time claims
pub fn issue_with(claims: &Claims, key: &Key, options: &IssueOptions) -> Result<String> {
    let issued_at = options.issued_at.unwrap_or_else(current_timestamp);

    let mut claims = claims.clone();
    claims.issued_at = Some(issued_at);
    match options.expiry {
        Some(Expiry::In(ttl)) => {
            let expiration = i64::try_from(ttl.as_secs())
                .ok()
                .and_then(|ttl| issued_at.checked_add(ttl))
                .ok_or_else(|| Error::InvalidClaims("expiry overflows 'exp'".to_string()))?;
            claims.expiration = Some(expiration);
        }
        Some(Expiry::At(timestamp)) => claims.expiration = Some(timestamp),
        None => {}
    }
    if let Some(timestamp) = options.not_before {
        claims.not_before = Some(timestamp);
    }

    let mut header = Header::new(options.algorithm);
    if let Some(kid) = &options.key_id {
        if kid.len() > MAX_KID_LENGTH {
            return Err(Error::InvalidConfiguration(format!(
                "key id too long ({} bytes, max: {MAX_KID_LENGTH})",
                kid.len()
            )));
        }
        header.key_id = Some(kid.clone());
    }

    let payload = claims.to_json()?;
    // Anything larger could never be verified
    if payload.len() > MAX_DECODED_PAYLOAD_SIZE {
        return Err(Error::InvalidClaims(format!(
            "payload too large: {} bytes (max: {MAX_DECODED_PAYLOAD_SIZE})",
            payload.len()
        )));
    }

    let signing_input = format!(
        "{}.{}",
        base64url::encode(&header.to_json()),
        base64url::encode(&payload)
    );
    let signature = options.algorithm.sign(&signing_input, key)?;

    let token = format!(
        "{signing_input}.{}",
        base64url::encode_bytes(&signature)
    );
    if token.len() > MAX_TOKEN_LENGTH {
        return Err(Error::InvalidClaims(format!(
            "token too large: {} bytes (max: {MAX_TOKEN_LENGTH})",
            token.len()
        )));
    }
    Ok(token)
}

/// Read header and claims without checking the signature or any claim
///
/// Nothing returned here is trustworthy. Use it to inspect a token (e.g.
/// its `kid`) before choosing how to verify it.
pub fn decode(token: &str) -> Result<(Header, Claims)> {
    let parts = TokenParts::split(token)?;
    let header = parts.header()?;
    let claims = parts.claims()?;
    Ok((header, claims))
}

/// Verify a token and return its claims
///
/// The token must declare exactly `algorithm`, carry a valid signature under
/// `key` and, if it has an `exp`, not be expired.
pub fn verify(token: &str, key: &Key, algorithm: Algorithm) -> Result<Claims> {
    verify_with(token, key, &Validation::new(algorithm))
}

/// Verify a token and validate its claims against `validation`
pub fn verify_with(token: &str, key: &Key, validation: &Validation) -> Result<Claims> {
    validation.check_configuration()?;

    let parts = TokenParts::split(token)?;
    let header = parts.header()?;

    let expected = validation.algorithm();
    if header.algorithm != expected.as_str() {
        return Err(Error::AlgorithmMismatch {
            expected: expected.as_str().to_string(),
            found: header.algorithm,
        });
    }

    // A signature that does not decode cannot match
    let signature = parts.signature().map_err(|_| Error::SignatureMismatch)?;
    expected.verify(parts.signing_input(), &signature, key)?;

    let claims = parts.claims()?;
    validation.validate(&claims)?;

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;

    fn key() -> Key {
        Key::symmetric("secret")
    }

    fn kaif() -> Claims {
        Claims::new()
            .with_claim("name", "Kaif Khan")
            .with_claim("email", "kaif@email.com")
    }

    #[test]
    fn test_issue_sets_timestamps_without_touching_input() {
        let claims = kaif();
        let options = IssueOptions::new(Algorithm::HS256)
            .issued_at(NOW)
            .expires_in(Duration::from_secs(3600));
        let token = issue_with(&claims, &key(), &options).unwrap();

        assert!(claims.issued_at.is_none());
        let (header, decoded) = decode(&token).unwrap();
        assert_eq!(header.algorithm_str(), "HS256");
        assert_eq!(header.token_type.as_deref(), Some("JWT"));
        assert_eq!(decoded.issued_at, Some(NOW));
        assert_eq!(decoded.expiration, Some(NOW + 3600));
        assert_eq!(decoded.get("email"), claims.get("email"));
    }

    #[test]
    fn test_issue_is_deterministic_for_hmac() {
        let options = IssueOptions::new(Algorithm::HS256).issued_at(NOW);
        let first = issue_with(&kaif(), &key(), &options).unwrap();
        let second = issue_with(&kaif(), &key(), &options).unwrap();
        assert_eq!(first, second);

        // Canonical header and payload
        let mut segments = first.split('.');
        assert_eq!(
            base64url::decode(segments.next().unwrap(), 1024).unwrap(),
            r#"{"alg":"HS256","typ":"JWT"}"#
        );
        assert_eq!(
            base64url::decode(segments.next().unwrap(), 1024).unwrap(),
            r#"{"email":"kaif@email.com","iat":1700000000,"name":"Kaif Khan"}"#
        );
    }

    #[test]
    fn test_issue_options() {
        let options = IssueOptions::new(Algorithm::HS384)
            .issued_at(NOW)
            .expires_at(NOW + 10)
            .not_before(NOW + 5)
            .key_id("k1");
        let token = issue_with(&kaif(), &key(), &options).unwrap();

        let (header, claims) = decode(&token).unwrap();
        assert_eq!(header.key_id(), Some("k1"));
        assert_eq!(header.parse_algorithm().unwrap(), Algorithm::HS384);
        assert_eq!(claims.expiration, Some(NOW + 10));
        assert_eq!(claims.not_before, Some(NOW + 5));
    }

    #[test]
    fn test_expiry_overflow() {
        let options = IssueOptions::new(Algorithm::HS256)
            .issued_at(NOW)
            .expires_in(Duration::from_secs(u64::MAX));
        assert!(matches!(
            issue_with(&kaif(), &key(), &options),
            Err(Error::InvalidClaims(_))
        ));
    }

    #[test]
    fn test_kid_too_long() {
        let options = IssueOptions::new(Algorithm::HS256).key_id("k".repeat(MAX_KID_LENGTH + 1));
        assert!(matches!(
            issue_with(&kaif(), &key(), &options),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_oversized_payload() {
        let claims = kaif().with_claim("blob", "x".repeat(MAX_DECODED_PAYLOAD_SIZE));
        assert!(matches!(
            issue(&claims, &key(), Algorithm::HS256, None),
            Err(Error::InvalidClaims(_))
        ));
    }

    #[test]
    fn test_issued_tokens_never_exceed_verifiable_length() {
        let options = IssueOptions::new(Algorithm::HS256).issued_at(NOW);
        let blob = |len: usize| Claims::new().with_claim("blob", "x".repeat(len));

        // Payload alone is under its cap, the encoded token is not
        let result = issue_with(&blob(49_100), &key(), &options);
        assert!(matches!(result, Err(Error::InvalidClaims(_))));

        // Largest blob that still issues must also verify
        let (mut ok, mut too_big) = (40_000, 49_100);
        while too_big - ok > 1 {
            let mid = (ok + too_big) / 2;
            match issue_with(&blob(mid), &key(), &options) {
                Ok(_) => ok = mid,
                Err(Error::InvalidClaims(_)) => too_big = mid,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
        let token = issue_with(&blob(ok), &key(), &options).unwrap();
        assert!(token.len() <= MAX_TOKEN_LENGTH);
        let claims = verify(&token, &key(), Algorithm::HS256).unwrap();
        assert_eq!(claims.get("blob").and_then(|v| v.as_str()).map(str::len), Some(ok));
    }

    #[test]
    fn test_verify_round_trip() {
        let token = issue(&kaif(), &key(), Algorithm::HS256, Some(Duration::from_secs(60))).unwrap();
        let claims = verify(&token, &key(), Algorithm::HS256).unwrap();
        assert_eq!(claims.custom(), kaif().custom());
        assert!(claims.expiration.is_some());
    }

    #[test]
    fn test_verify_checks_alg_before_signature() {
        let token = issue(&kaif(), &key(), Algorithm::HS256, None).unwrap();
        // Wrong key and wrong algorithm: the algorithm is reported
        assert!(matches!(
            verify(&token, &Key::symmetric("wrong"), Algorithm::HS512),
            Err(Error::AlgorithmMismatch { .. })
        ));
    }

    #[test]
    fn test_verify_checks_signature_before_payload() {
        let header = base64url::encode(r#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = base64url::encode("this is not json");
        let signing_input = format!("{header}.{payload}");

        let bogus = format!("{signing_input}.{}", base64url::encode_bytes(&[0; 32]));
        assert!(matches!(
            verify(&bogus, &key(), Algorithm::HS256),
            Err(Error::SignatureMismatch)
        ));

        // Correctly signed garbage gets past the signature and fails on structure
        let signature = Algorithm::HS256.sign(&signing_input, &key()).unwrap();
        let signed = format!("{signing_input}.{}", base64url::encode_bytes(&signature));
        assert!(matches!(
            verify(&signed, &key(), Algorithm::HS256),
            Err(Error::MalformedToken(_))
        ));
        // decode does not care about signatures
        assert!(matches!(decode(&bogus), Err(Error::MalformedToken(_))));
    }

    #[test]
    fn test_undecodable_signature_is_mismatch() {
        let token = issue(&kaif(), &key(), Algorithm::HS256, None).unwrap();
        let (signing_input, _) = token.rsplit_once('.').unwrap();
        let broken = format!("{signing_input}.!!!");
        assert!(matches!(
            verify(&broken, &key(), Algorithm::HS256),
            Err(Error::SignatureMismatch)
        ));
    }

    #[test]
    fn test_verify_with_fixed_clock() {
        let options = IssueOptions::new(Algorithm::HS256)
            .issued_at(NOW)
            .expires_in(Duration::from_secs(60));
        let token = issue_with(&kaif(), &key(), &options).unwrap();

        let at = |now| Validation::new(Algorithm::HS256).at(now);
        assert!(verify_with(&token, &key(), &at(NOW + 59)).is_ok());
        assert!(matches!(
            verify_with(&token, &key(), &at(NOW + 60)),
            Err(Error::TokenExpired { .. })
        ));
        assert!(verify_with(&token, &key(), &at(NOW + 60).leeway(5)).is_ok());
        assert!(matches!(
            verify_with(&token, &key(), &at(NOW).leeway(301)),
            Err(Error::InvalidConfiguration(_))
        ));
    }
}
