use crate::algorithm::SigningAlgorithm;
use crate::error::{Error, Result};
use crate::keys::{EcdsaCurve, Key};

use ring::rand::SystemRandom;
use ring::signature::UnparsedPublicKey;

/// ES256 algorithm (ECDSA with P-256 and SHA-256)
pub struct ES256;

/// ES384 algorithm (ECDSA with P-384 and SHA-384)
pub struct ES384;

impl SigningAlgorithm for ES256 {
    fn name(&self) -> &'static str {
        "ES256"
    }

    fn sign(&self, signing_input: &str, key: &Key) -> Result<Vec<u8>> {
        sign_ecdsa(self.name(), signing_input, key, EcdsaCurve::P256)
    }

    fn verify(&self, signing_input: &str, signature: &[u8], key: &Key) -> Result<()> {
        verify_ecdsa(self.name(), signing_input, signature, key, EcdsaCurve::P256)
    }
}

impl SigningAlgorithm for ES384 {
    fn name(&self) -> &'static str {
        "ES384"
    }

    fn sign(&self, signing_input: &str, key: &Key) -> Result<Vec<u8>> {
        sign_ecdsa(self.name(), signing_input, key, EcdsaCurve::P384)
    }

    fn verify(&self, signing_input: &str, signature: &[u8], key: &Key) -> Result<()> {
        verify_ecdsa(self.name(), signing_input, signature, key, EcdsaCurve::P384)
    }
}

/// Generic ECDSA signing, producing the fixed-length `r || s` form
fn sign_ecdsa(
    algorithm: &str,
    signing_input: &str,
    key: &Key,
    curve: EcdsaCurve,
) -> Result<Vec<u8>> {
    let rng = SystemRandom::new();
    let key_pair = key.as_ecdsa_signing(algorithm, curve)?.key_pair(&rng)?;

    let signature = key_pair
        .sign(&rng, signing_input.as_bytes())
        .map_err(|_| Error::invalid_key(format!("{algorithm} signing failed")))?;

    Ok(signature.as_ref().to_vec())
}

/// Generic ECDSA signature verification
fn verify_ecdsa(
    algorithm: &str,
    signing_input: &str,
    signature: &[u8],
    key: &Key,
    curve: EcdsaCurve,
) -> Result<()> {
    let public_point = key.ecdsa_verifying_point(algorithm, curve)?;

    UnparsedPublicKey::new(curve.verification_algorithm(), &*public_point)
        .verify(signing_input.as_bytes(), signature)
        .map_err(|_| Error::SignatureMismatch)
}
