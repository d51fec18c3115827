use crate::algorithm::SigningAlgorithm;
use crate::error::{Error, Result};
use crate::keys::Key;

use ring::rand::SystemRandom;
use ring::signature::{self, UnparsedPublicKey};

/// RS256 algorithm (RSASSA-PKCS1-v1_5 with SHA-256)
pub struct RS256;

/// RS384 algorithm (RSASSA-PKCS1-v1_5 with SHA-384)
pub struct RS384;

/// RS512 algorithm (RSASSA-PKCS1-v1_5 with SHA-512)
pub struct RS512;

impl SigningAlgorithm for RS256 {
    fn name(&self) -> &'static str {
        "RS256"
    }

    fn sign(&self, signing_input: &str, key: &Key) -> Result<Vec<u8>> {
        sign_rsa(self.name(), signing_input, key, &signature::RSA_PKCS1_SHA256)
    }

    fn verify(&self, signing_input: &str, signature: &[u8], key: &Key) -> Result<()> {
        verify_rsa(
            self.name(),
            signing_input,
            signature,
            key,
            &signature::RSA_PKCS1_2048_8192_SHA256,
        )
    }
}

impl SigningAlgorithm for RS384 {
    fn name(&self) -> &'static str {
        "RS384"
    }

    fn sign(&self, signing_input: &str, key: &Key) -> Result<Vec<u8>> {
        sign_rsa(self.name(), signing_input, key, &signature::RSA_PKCS1_SHA384)
    }

    fn verify(&self, signing_input: &str, signature: &[u8], key: &Key) -> Result<()> {
        verify_rsa(
            self.name(),
            signing_input,
            signature,
            key,
            &signature::RSA_PKCS1_2048_8192_SHA384,
        )
    }
}

impl SigningAlgorithm for RS512 {
    fn name(&self) -> &'static str {
        "RS512"
    }

    fn sign(&self, signing_input: &str, key: &Key) -> Result<Vec<u8>> {
        sign_rsa(self.name(), signing_input, key, &signature::RSA_PKCS1_SHA512)
    }

    fn verify(&self, signing_input: &str, signature: &[u8], key: &Key) -> Result<()> {
        verify_rsa(
            self.name(),
            signing_input,
            signature,
            key,
            &signature::RSA_PKCS1_2048_8192_SHA512,
        )
    }
}

/// Generic RSA signing
fn sign_rsa(
    algorithm: &str,
    signing_input: &str,
    key: &Key,
    encoding: &'static dyn signature::RsaEncoding,
) -> Result<Vec<u8>> {
    let key_pair = key.as_rsa_signing(algorithm)?.key_pair()?;

    let rng = SystemRandom::new();
    let mut signature = vec![0u8; key_pair.public().modulus_len()];
    key_pair
        .sign(encoding, &rng, signing_input.as_bytes(), &mut signature)
        .map_err(|_| Error::invalid_key(format!("{algorithm} signing failed")))?;

    Ok(signature)
}

/// Generic RSA signature verification
///
/// ring does not separate "bad key encoding" from "bad signature", so a
/// public key that fails to parse surfaces as `SignatureMismatch`.
fn verify_rsa(
    algorithm: &str,
    signing_input: &str,
    signature: &[u8],
    key: &Key,
    verification: &'static dyn signature::VerificationAlgorithm,
) -> Result<()> {
    let public_key_der = key.rsa_verifying_der(algorithm)?;

    UnparsedPublicKey::new(verification, &*public_key_der)
        .verify(signing_input.as_bytes(), signature)
        .map_err(|_| Error::SignatureMismatch)
}
