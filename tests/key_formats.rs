//! Key format and key misuse tests
//!
//! These tests verify which encodings each key type accepts and that every
//! unusable key surfaces as `InvalidKey` at issue time:
//! - empty secrets
//! - public keys offered for signing
//! - keys from the wrong algorithm family
//! - ECDSA keys on the wrong curve
//! - garbage PKCS#8 documents

use jwtcodec::*;

fn claims() -> Claims {
    Claims::new().with_subject("kaif")
}

// ============================================================================
// Symmetric Keys
// ============================================================================

#[test]
fn test_empty_secret() {
    for algorithm in [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512] {
        assert!(matches!(
            issue(&claims(), &Key::symmetric(""), algorithm, None),
            Err(Error::InvalidKey(_))
        ));
    }
}

#[test]
fn test_secret_sources_are_equivalent() {
    let from_str = Key::symmetric("secret");
    let from_bytes = Key::symmetric(b"secret".to_vec());
    let from_slice = Key::symmetric(&b"secret"[..]);

    let options = IssueOptions::new(Algorithm::HS256).issued_at(1_700_000_000);
    let a = issue_with(&claims(), &from_str, &options).unwrap();
    let b = issue_with(&claims(), &from_bytes, &options).unwrap();
    let c = issue_with(&claims(), &from_slice, &options).unwrap();
    assert_eq!(a, b);
    assert_eq!(b, c);
}

#[test]
fn test_secret_not_printed() {
    let key = Key::symmetric("hunter2-very-secret");
    assert!(!format!("{key:?}").contains("hunter2"));
}

// ============================================================================
// RSA Keys
// ============================================================================

#[cfg(feature = "rsa")]
mod rsa_key_formats {
    use super::*;
    use rsa::pkcs1::EncodeRsaPrivateKey;
    use rsa::pkcs8::EncodePrivateKey;
    use rsa::RsaPrivateKey;
    use std::sync::OnceLock;

    fn rsa_private_key() -> &'static RsaPrivateKey {
        static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
        KEY.get_or_init(|| {
            RsaPrivateKey::new(&mut rand::thread_rng(), 2048).expect("Failed to generate key")
        })
    }

    #[test]
    fn test_pkcs8_private_key() {
        let pkcs8 = rsa_private_key().to_pkcs8_der().unwrap();
        let key = Key::rsa_private(pkcs8.as_bytes());
        let token = issue(&claims(), &key, Algorithm::RS256, None).unwrap();
        assert!(verify(&token, &key.verifying_key().unwrap(), Algorithm::RS256).is_ok());
    }

    #[test]
    fn test_pkcs1_private_key_is_not_pkcs8() {
        let pkcs1 = rsa_private_key().to_pkcs1_der().unwrap();
        let key = Key::rsa_private(pkcs1.as_bytes());
        assert!(matches!(
            issue(&claims(), &key, Algorithm::RS256, None),
            Err(Error::InvalidKey(_))
        ));
    }

    #[test]
    fn test_pkcs1_public_key() {
        use rsa::pkcs1::EncodeRsaPublicKey;

        let pkcs8 = rsa_private_key().to_pkcs8_der().unwrap();
        let signer = Key::rsa_private(pkcs8.as_bytes());
        let token = issue(&claims(), &signer, Algorithm::RS512, None).unwrap();

        // PKCS#1 RSAPublicKey from the rsa crate matches what verifying_key derives
        let public_der = rsa_private_key().to_public_key().to_pkcs1_der().unwrap();
        let public = Key::rsa_public(public_der.as_bytes());
        assert!(verify(&token, &public, Algorithm::RS512).is_ok());
    }

    #[test]
    fn test_public_key_cannot_sign() {
        let public = Key::rsa_public(vec![0x30, 0x00]);
        assert!(matches!(
            issue(&claims(), &public, Algorithm::RS256, None),
            Err(Error::InvalidKey(_))
        ));
    }

    #[test]
    fn test_garbage_pkcs8() {
        for garbage in [vec![], vec![0xFF, 0xFE, 0xFD, 0xFC], vec![0x30, 0x82]] {
            assert!(matches!(
                issue(&claims(), &Key::rsa_private(garbage), Algorithm::RS256, None),
                Err(Error::InvalidKey(_))
            ));
        }
    }

    #[test]
    fn test_invalid_public_der_never_verifies() {
        let pkcs8 = rsa_private_key().to_pkcs8_der().unwrap();
        let token = issue(&claims(), &Key::rsa_private(pkcs8.as_bytes()), Algorithm::RS256, None)
            .unwrap();

        for der in [vec![0xFF, 0xFE, 0xFD, 0xFC], vec![0x30, 0x82]] {
            assert_eq!(
                verify(&token, &Key::rsa_public(der), Algorithm::RS256),
                Err(Error::SignatureMismatch)
            );
        }
        assert!(matches!(
            verify(&token, &Key::rsa_public(Vec::new()), Algorithm::RS256),
            Err(Error::InvalidKey(_))
        ));
    }

    #[test]
    fn test_symmetric_key_for_rsa() {
        assert!(matches!(
            issue(&claims(), &Key::symmetric("secret"), Algorithm::RS256, None),
            Err(Error::InvalidKey(_))
        ));
    }
}

// ============================================================================
// ECDSA Keys
// ============================================================================

#[cfg(feature = "ecdsa")]
mod ecdsa_key_formats {
    use super::*;
    use ring::rand::SystemRandom;
    use ring::signature::{EcdsaKeyPair, ECDSA_P256_SHA256_FIXED_SIGNING};

    fn p256_pkcs8() -> Vec<u8> {
        EcdsaKeyPair::generate_pkcs8(&ECDSA_P256_SHA256_FIXED_SIGNING, &SystemRandom::new())
            .unwrap()
            .as_ref()
            .to_vec()
    }

    #[test]
    fn test_declared_curve_must_match_document() {
        // A P-256 document labelled P-384 is rejected when parsed
        let key = Key::ecdsa_private(p256_pkcs8(), EcdsaCurve::P384);
        assert!(matches!(
            issue(&claims(), &key, Algorithm::ES384, None),
            Err(Error::InvalidKey(_))
        ));
    }

    #[test]
    fn test_wrong_curve_for_algorithm() {
        let key = Key::ecdsa_private(p256_pkcs8(), EcdsaCurve::P256);
        assert!(matches!(
            issue(&claims(), &key, Algorithm::ES384, None),
            Err(Error::InvalidKey(_))
        ));
    }

    #[test]
    fn test_public_key_cannot_sign() {
        let public = Key::ecdsa_private(p256_pkcs8(), EcdsaCurve::P256)
            .verifying_key()
            .unwrap();
        assert!(matches!(
            issue(&claims(), &public, Algorithm::ES256, None),
            Err(Error::InvalidKey(_))
        ));
    }

    #[test]
    fn test_garbage_pkcs8() {
        let key = Key::ecdsa_private(vec![0x30, 0x00], EcdsaCurve::P256);
        assert!(matches!(
            issue(&claims(), &key, Algorithm::ES256, None),
            Err(Error::InvalidKey(_))
        ));
        assert!(matches!(key.verifying_key(), Err(Error::InvalidKey(_))));
    }

    #[test]
    fn test_rsa_algorithm_with_ecdsa_key() {
        #[cfg(feature = "rsa")]
        {
            let key = Key::ecdsa_private(p256_pkcs8(), EcdsaCurve::P256);
            assert!(matches!(
                issue(&claims(), &key, Algorithm::RS256, None),
                Err(Error::InvalidKey(_))
            ));
        }
    }
}
