use crate::algorithm::SigningAlgorithm;
use crate::error::{Error, Result};
use crate::keys::Key;

use constant_time_eq::constant_time_eq;
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};
use zeroize::Zeroizing;

/// HS256 algorithm (HMAC with SHA-256)
pub struct HS256;

/// HS384 algorithm (HMAC with SHA-384)
pub struct HS384;

/// HS512 algorithm (HMAC with SHA-512)
pub struct HS512;

macro_rules! hmac_algorithm {
    ($algorithm:ident, $digest:ty) => {
        impl SigningAlgorithm for $algorithm {
            fn name(&self) -> &'static str {
                stringify!($algorithm)
            }

            fn sign(&self, signing_input: &str, key: &Key) -> Result<Vec<u8>> {
                let secret = key.as_symmetric(self.name())?;
                let mut mac = Hmac::<$digest>::new_from_slice(secret.as_bytes())
                    .map_err(|_| Error::invalid_key("HMAC key rejected"))?;
                mac.update(signing_input.as_bytes());
                Ok(mac.finalize().into_bytes().to_vec())
            }

            fn verify(&self, signing_input: &str, signature: &[u8], key: &Key) -> Result<()> {
                let expected = Zeroizing::new(self.sign(signing_input, key)?);
                verify_mac(&expected, signature)
            }
        }
    };
}

hmac_algorithm!(HS256, Sha256);
hmac_algorithm!(HS384, Sha384);
hmac_algorithm!(HS512, Sha512);

/// Compare MACs in constant time
fn verify_mac(expected: &[u8], provided: &[u8]) -> Result<()> {
    if provided.len() != expected.len() {
        return Err(Error::SignatureMismatch);
    }

    if constant_time_eq(provided, expected) {
        Ok(())
    } else {
        Err(Error::SignatureMismatch)
    }
}
