mod traits;

pub(crate) mod hmac;

#[cfg(feature = "rsa")]
pub(crate) mod rsa;

#[cfg(feature = "ecdsa")]
pub(crate) mod ecdsa;

pub(crate) use traits::SigningAlgorithm;

use crate::error::{Error, Result};
use crate::keys::Key;
use crate::limits::MAX_ALG_LENGTH;

use std::str::FromStr;

/// Signature algorithm, named by its JWS `alg` identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// HMAC with SHA-256
    HS256,

    /// HMAC with SHA-384
    HS384,

    /// HMAC with SHA-512
    HS512,

    /// RSA with SHA-256
    #[cfg(feature = "rsa")]
    RS256,

    /// RSA with SHA-384
    #[cfg(feature = "rsa")]
    RS384,

    /// RSA with SHA-512
    #[cfg(feature = "rsa")]
    RS512,

    /// ECDSA with P-256 and SHA-256
    #[cfg(feature = "ecdsa")]
    ES256,

    /// ECDSA with P-384 and SHA-384
    #[cfg(feature = "ecdsa")]
    ES384,
}

impl FromStr for Algorithm {
    type Err = Error;

    /// Parse an `alg` identifier; matching is case-sensitive
    fn from_str(s: &str) -> Result<Self> {
        if s.len() > MAX_ALG_LENGTH {
            return Err(Error::UnsupportedAlgorithm(format!(
                "identifier too long ({} bytes)",
                s.len()
            )));
        }

        match s {
            "HS256" => Ok(Algorithm::HS256),
            "HS384" => Ok(Algorithm::HS384),
            "HS512" => Ok(Algorithm::HS512),

            #[cfg(feature = "rsa")]
            "RS256" => Ok(Algorithm::RS256),
            #[cfg(feature = "rsa")]
            "RS384" => Ok(Algorithm::RS384),
            #[cfg(feature = "rsa")]
            "RS512" => Ok(Algorithm::RS512),

            #[cfg(feature = "ecdsa")]
            "ES256" => Ok(Algorithm::ES256),
            #[cfg(feature = "ecdsa")]
            "ES384" => Ok(Algorithm::ES384),

            "ES512" => Err(Error::UnsupportedAlgorithm(
                "ES512 (P-521) is not supported".to_string(),
            )),

            // Includes "none": unsigned tokens are never produced or accepted
            _ => Err(Error::UnsupportedAlgorithm(s.to_string())),
        }
    }
}

impl Algorithm {
    /// Every algorithm enabled in this build
    pub fn all() -> Vec<Algorithm> {
        vec![
            Algorithm::HS256,
            Algorithm::HS384,
            Algorithm::HS512,
            #[cfg(feature = "rsa")]
            Algorithm::RS256,
            #[cfg(feature = "rsa")]
            Algorithm::RS384,
            #[cfg(feature = "rsa")]
            Algorithm::RS512,
            #[cfg(feature = "ecdsa")]
            Algorithm::ES256,
            #[cfg(feature = "ecdsa")]
            Algorithm::ES384,
        ]
    }

    /// Convert to the JWS `alg` identifier
    pub fn as_str(&self) -> &'static str {
        self.implementation().name()
    }

    /// Check if algorithm is HMAC-based (symmetric)
    pub fn is_symmetric(&self) -> bool {
        matches!(
            self,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        )
    }

    /// Check if algorithm is asymmetric (RSA/ECDSA)
    pub fn is_asymmetric(&self) -> bool {
        !self.is_symmetric()
    }

    pub(crate) fn sign(&self, signing_input: &str, key: &Key) -> Result<Vec<u8>> {
        self.implementation().sign(signing_input, key)
    }

    pub(crate) fn verify(&self, signing_input: &str, signature: &[u8], key: &Key) -> Result<()> {
        self.implementation().verify(signing_input, signature, key)
    }

    fn implementation(&self) -> &'static dyn SigningAlgorithm {
        match self {
            Algorithm::HS256 => &hmac::HS256,
            Algorithm::HS384 => &hmac::HS384,
            Algorithm::HS512 => &hmac::HS512,

            #[cfg(feature = "rsa")]
            Algorithm::RS256 => &rsa::RS256,
            #[cfg(feature = "rsa")]
            Algorithm::RS384 => &rsa::RS384,
            #[cfg(feature = "rsa")]
            Algorithm::RS512 => &rsa::RS512,

            #[cfg(feature = "ecdsa")]
            Algorithm::ES256 => &ecdsa::ES256,
            #[cfg(feature = "ecdsa")]
            Algorithm::ES384 => &ecdsa::ES384,
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
