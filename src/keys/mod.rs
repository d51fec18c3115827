/// Key types for signing and verifying tokens
///
/// This module provides a type-safe abstraction over the supported key material:
/// - Symmetric secrets (HMAC algorithms, used for both signing and verification)
/// - RSA private keys (PKCS#8 DER) and public keys (PKCS#1 `RSAPublicKey` DER)
/// - ECDSA private keys (PKCS#8 DER) and public keys (uncompressed SEC1 points)
///
/// Keys are owned by the calling application and only borrowed by the codec.
/// Secret material is wiped on drop and never printed by `Debug`.
use crate::error::{Error, Result};

#[cfg(any(feature = "rsa", feature = "ecdsa"))]
use std::borrow::Cow;

use zeroize::{Zeroize, ZeroizeOnDrop};

#[cfg(any(feature = "rsa", feature = "ecdsa"))]
use ring::rand::SystemRandom;
#[cfg(any(feature = "rsa", feature = "ecdsa"))]
use ring::signature;

/// A key that can be used to issue or verify tokens
#[derive(Debug, Clone)]
pub enum Key {
    /// Shared secret for HMAC algorithms
    Symmetric(SymmetricKey),

    /// RSA private key, signs RS* tokens (and can verify them)
    #[cfg(feature = "rsa")]
    RsaPrivate(RsaPrivateKey),

    /// RSA public key, verifies RS* tokens
    #[cfg(feature = "rsa")]
    RsaPublic(RsaPublicKey),

    /// ECDSA private key, signs ES* tokens (and can verify them)
    #[cfg(feature = "ecdsa")]
    EcdsaPrivate(EcdsaPrivateKey),

    /// ECDSA public key, verifies ES* tokens
    #[cfg(feature = "ecdsa")]
    EcdsaPublic(EcdsaPublicKey),
}

impl Key {
    /// Create a symmetric key from secret bytes
    pub fn symmetric(secret: impl Into<Vec<u8>>) -> Self {
        Key::Symmetric(SymmetricKey::new(secret.into()))
    }

    /// Create an RSA private key from a PKCS#8 DER document
    #[cfg(feature = "rsa")]
    pub fn rsa_private(pkcs8: impl Into<Vec<u8>>) -> Self {
        Key::RsaPrivate(RsaPrivateKey::new(pkcs8.into()))
    }

    /// Create an RSA public key from a DER-encoded PKCS#1 `RSAPublicKey`
    #[cfg(feature = "rsa")]
    pub fn rsa_public(der: impl Into<Vec<u8>>) -> Self {
        Key::RsaPublic(RsaPublicKey::new(der.into()))
    }

    /// Create an ECDSA private key from a PKCS#8 DER document
    #[cfg(feature = "ecdsa")]
    pub fn ecdsa_private(pkcs8: impl Into<Vec<u8>>, curve: EcdsaCurve) -> Self {
        Key::EcdsaPrivate(EcdsaPrivateKey::new(pkcs8.into(), curve))
    }

    /// Create an ECDSA public key from an uncompressed SEC1 point (`04 || x || y`)
    #[cfg(feature = "ecdsa")]
    pub fn ecdsa_public(point: impl Into<Vec<u8>>, curve: EcdsaCurve) -> Self {
        Key::EcdsaPublic(EcdsaPublicKey::new(point.into(), curve))
    }

    /// Get key type name for error messages
    pub fn key_type(&self) -> &'static str {
        match self {
            Key::Symmetric(_) => "symmetric",
            #[cfg(feature = "rsa")]
            Key::RsaPrivate(_) => "RSA private",
            #[cfg(feature = "rsa")]
            Key::RsaPublic(_) => "RSA public",
            #[cfg(feature = "ecdsa")]
            Key::EcdsaPrivate(_) => "ECDSA private",
            #[cfg(feature = "ecdsa")]
            Key::EcdsaPublic(_) => "ECDSA public",
        }
    }

    /// Derive the key that verifies tokens signed by this key
    ///
    /// Private keys yield their public half; symmetric and public keys are
    /// returned unchanged.
    pub fn verifying_key(&self) -> Result<Key> {
        match self {
            #[cfg(feature = "rsa")]
            Key::RsaPrivate(key) => Ok(Key::rsa_public(key.public_key_der()?)),
            #[cfg(feature = "ecdsa")]
            Key::EcdsaPrivate(key) => Ok(Key::ecdsa_public(key.public_point()?, key.curve())),
            _ => Ok(self.clone()),
        }
    }

    fn mismatch(&self, algorithm: &str, expected: &str) -> Error {
        Error::invalid_key(format!(
            "{algorithm} requires {expected} key, got {} key",
            self.key_type()
        ))
    }

    /// Get the non-empty HMAC secret or fail with `InvalidKey`
    pub(crate) fn as_symmetric(&self, algorithm: &str) -> Result<&SymmetricKey> {
        match self {
            Key::Symmetric(key) if key.is_empty() => {
                Err(Error::invalid_key(format!("{algorithm} secret is empty")))
            }
            Key::Symmetric(key) => Ok(key),
            #[allow(unreachable_patterns)]
            _ => Err(self.mismatch(algorithm, "a symmetric")),
        }
    }

    /// Get the RSA private key needed for signing
    #[cfg(feature = "rsa")]
    pub(crate) fn as_rsa_signing(&self, algorithm: &str) -> Result<&RsaPrivateKey> {
        match self {
            Key::RsaPrivate(key) => Ok(key),
            _ => Err(self.mismatch(algorithm, "an RSA private")),
        }
    }

    /// Get the PKCS#1 public key DER needed for verification
    #[cfg(feature = "rsa")]
    pub(crate) fn rsa_verifying_der(&self, algorithm: &str) -> Result<Cow<'_, [u8]>> {
        match self {
            Key::RsaPublic(key) if key.as_der().is_empty() => {
                Err(Error::invalid_key(format!("{algorithm} public key is empty")))
            }
            Key::RsaPublic(key) => Ok(Cow::Borrowed(key.as_der())),
            Key::RsaPrivate(key) => Ok(Cow::Owned(key.public_key_der()?)),
            _ => Err(self.mismatch(algorithm, "an RSA")),
        }
    }

    /// Get the ECDSA private key for the given curve
    #[cfg(feature = "ecdsa")]
    pub(crate) fn as_ecdsa_signing(
        &self,
        algorithm: &str,
        curve: EcdsaCurve,
    ) -> Result<&EcdsaPrivateKey> {
        match self {
            Key::EcdsaPrivate(key) => {
                check_curve(algorithm, curve, key.curve())?;
                Ok(key)
            }
            _ => Err(self.mismatch(algorithm, "an ECDSA private")),
        }
    }

    /// Get the public point for the given curve
    #[cfg(feature = "ecdsa")]
    pub(crate) fn ecdsa_verifying_point(
        &self,
        algorithm: &str,
        curve: EcdsaCurve,
    ) -> Result<Cow<'_, [u8]>> {
        match self {
            Key::EcdsaPublic(key) => {
                check_curve(algorithm, curve, key.curve())?;
                if key.as_bytes().is_empty() {
                    return Err(Error::invalid_key(format!("{algorithm} public key is empty")));
                }
                Ok(Cow::Borrowed(key.as_bytes()))
            }
            Key::EcdsaPrivate(key) => {
                check_curve(algorithm, curve, key.curve())?;
                Ok(Cow::Owned(key.public_point()?))
            }
            _ => Err(self.mismatch(algorithm, "an ECDSA")),
        }
    }
}

#[cfg(feature = "ecdsa")]
fn check_curve(algorithm: &str, expected: EcdsaCurve, actual: EcdsaCurve) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(Error::invalid_key(format!(
            "{algorithm} requires curve {expected:?}, got {actual:?}"
        )))
    }
}

/// Shared secret for HMAC algorithms
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey {
    secret: Vec<u8>,
}

impl SymmetricKey {
    /// Create a new symmetric key
    pub fn new(secret: Vec<u8>) -> Self {
        Self { secret }
    }

    /// Get the secret bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.secret
    }

    /// Whether the secret has no bytes at all
    pub fn is_empty(&self) -> bool {
        self.secret.is_empty()
    }
}

impl std::fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymmetricKey")
            .field("len", &self.secret.len())
            .finish_non_exhaustive()
    }
}

impl From<Vec<u8>> for SymmetricKey {
    fn from(secret: Vec<u8>) -> Self {
        Self::new(secret)
    }
}

impl From<&[u8]> for SymmetricKey {
    fn from(secret: &[u8]) -> Self {
        Self::new(secret.to_vec())
    }
}

impl From<String> for SymmetricKey {
    fn from(secret: String) -> Self {
        Self::new(secret.into_bytes())
    }
}

impl From<&str> for SymmetricKey {
    fn from(secret: &str) -> Self {
        Self::new(secret.as_bytes().to_vec())
    }
}

/// RSA private key (PKCS#8 DER)
#[cfg(feature = "rsa")]
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct RsaPrivateKey {
    pkcs8: Vec<u8>,
}

#[cfg(feature = "rsa")]
impl RsaPrivateKey {
    /// Create a new RSA private key from PKCS#8 DER bytes
    pub fn new(pkcs8: Vec<u8>) -> Self {
        Self { pkcs8 }
    }

    /// Parse into a signing key pair
    pub(crate) fn key_pair(&self) -> Result<signature::RsaKeyPair> {
        signature::RsaKeyPair::from_pkcs8(&self.pkcs8)
            .map_err(|e| Error::invalid_key(format!("RSA private key rejected: {e}")))
    }

    /// DER-encoded PKCS#1 public key of this key pair
    pub fn public_key_der(&self) -> Result<Vec<u8>> {
        Ok(self.key_pair()?.public().as_ref().to_vec())
    }
}

#[cfg(feature = "rsa")]
impl std::fmt::Debug for RsaPrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RsaPrivateKey").finish_non_exhaustive()
    }
}

/// RSA public key (DER-encoded PKCS#1 `RSAPublicKey`)
#[cfg(feature = "rsa")]
#[derive(Debug, Clone)]
pub struct RsaPublicKey {
    der: Vec<u8>,
}

#[cfg(feature = "rsa")]
impl RsaPublicKey {
    /// Create a new RSA public key from DER bytes
    pub fn new(der: Vec<u8>) -> Self {
        Self { der }
    }

    /// Get the DER-encoded key bytes
    pub fn as_der(&self) -> &[u8] {
        &self.der
    }
}

/// ECDSA curve identifier
#[cfg(feature = "ecdsa")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EcdsaCurve {
    /// P-256 (secp256r1) curve
    P256,
    /// P-384 (secp384r1) curve
    P384,
}

#[cfg(feature = "ecdsa")]
impl EcdsaCurve {
    /// Signing algorithm; JWS uses the fixed-length `r || s` encoding (RFC 7518 §3.4)
    pub(crate) fn signing_algorithm(self) -> &'static signature::EcdsaSigningAlgorithm {
        match self {
            EcdsaCurve::P256 => &signature::ECDSA_P256_SHA256_FIXED_SIGNING,
            EcdsaCurve::P384 => &signature::ECDSA_P384_SHA384_FIXED_SIGNING,
        }
    }

    pub(crate) fn verification_algorithm(self) -> &'static signature::EcdsaVerificationAlgorithm {
        match self {
            EcdsaCurve::P256 => &signature::ECDSA_P256_SHA256_FIXED,
            EcdsaCurve::P384 => &signature::ECDSA_P384_SHA384_FIXED,
        }
    }
}

/// ECDSA private key (PKCS#8 DER)
#[cfg(feature = "ecdsa")]
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct EcdsaPrivateKey {
    pkcs8: Vec<u8>,
    #[zeroize(skip)]
    curve: EcdsaCurve,
}

#[cfg(feature = "ecdsa")]
impl EcdsaPrivateKey {
    /// Create a new ECDSA private key from PKCS#8 DER bytes
    pub fn new(pkcs8: Vec<u8>, curve: EcdsaCurve) -> Self {
        Self { pkcs8, curve }
    }

    /// Get the curve
    pub fn curve(&self) -> EcdsaCurve {
        self.curve
    }

    /// Parse into a signing key pair
    pub(crate) fn key_pair(&self, rng: &SystemRandom) -> Result<signature::EcdsaKeyPair> {
        signature::EcdsaKeyPair::from_pkcs8(self.curve.signing_algorithm(), &self.pkcs8, rng)
            .map_err(|e| {
                Error::invalid_key(format!("ECDSA {:?} private key rejected: {e}", self.curve))
            })
    }

    /// Uncompressed public point of this key pair
    pub fn public_point(&self) -> Result<Vec<u8>> {
        use ring::signature::KeyPair;

        let key_pair = self.key_pair(&SystemRandom::new())?;
        Ok(key_pair.public_key().as_ref().to_vec())
    }
}

#[cfg(feature = "ecdsa")]
impl std::fmt::Debug for EcdsaPrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EcdsaPrivateKey")
            .field("curve", &self.curve)
            .finish_non_exhaustive()
    }
}

/// ECDSA public key (uncompressed SEC1 point)
#[cfg(feature = "ecdsa")]
#[derive(Debug, Clone)]
pub struct EcdsaPublicKey {
    point: Vec<u8>,
    curve: EcdsaCurve,
}

#[cfg(feature = "ecdsa")]
impl EcdsaPublicKey {
    /// Create a new ECDSA public key from point bytes
    pub fn new(point: Vec<u8>, curve: EcdsaCurve) -> Self {
        Self { point, curve }
    }

    /// Get the point bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.point
    }

    /// Get the curve
    pub fn curve(&self) -> EcdsaCurve {
        self.curve
    }
}
