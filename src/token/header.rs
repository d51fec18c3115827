use crate::algorithm::Algorithm;
use crate::error::{Error, Result};
use crate::limits::{MAX_ALG_LENGTH, MAX_KID_LENGTH};
use miniserde::json::{self, Object, Value};
use miniserde::Deserialize;

/// JWT header (JOSE header)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Header {
    /// Algorithm used for signing, exactly as it appears in the token
    #[serde(rename = "alg")]
    pub algorithm: String,

    /// Token type (typically "JWT")
    #[serde(rename = "typ")]
    pub token_type: Option<String>,

    /// Key ID
    #[serde(rename = "kid")]
    pub key_id: Option<String>,
}

impl Header {
    pub(crate) fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm: algorithm.as_str().to_string(),
            token_type: Some("JWT".to_string()),
            key_id: None,
        }
    }

    /// Parse algorithm from header
    pub fn parse_algorithm(&self) -> Result<Algorithm> {
        self.algorithm.parse()
    }

    /// Get algorithm as string
    pub fn algorithm_str(&self) -> &str {
        &self.algorithm
    }

    /// Get key ID if present
    pub fn key_id(&self) -> Option<&str> {
        self.key_id.as_deref()
    }

    /// Canonical JSON, keys sorted
    pub(crate) fn to_json(&self) -> String {
        let mut object = Object::new();
        object.insert("alg".to_string(), Value::String(self.algorithm.clone()));
        if let Some(kid) = &self.key_id {
            object.insert("kid".to_string(), Value::String(kid.clone()));
        }
        if let Some(typ) = &self.token_type {
            object.insert("typ".to_string(), Value::String(typ.clone()));
        }
        json::to_string(&Value::Object(object))
    }

    pub(crate) fn from_json(text: &str) -> Result<Self> {
        let header: Header = json::from_str(text)
            .map_err(|_| Error::malformed("header is not a JSON object with a string 'alg'"))?;

        if header.algorithm.len() > MAX_ALG_LENGTH {
            return Err(Error::malformed(format!(
                "header 'alg' too long ({} bytes)",
                header.algorithm.len()
            )));
        }
        if header.key_id().is_some_and(|kid| kid.len() > MAX_KID_LENGTH) {
            return Err(Error::malformed("header 'kid' too long"));
        }

        Ok(header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_header_json() {
        let mut header = Header::new(Algorithm::HS256);
        assert_eq!(header.to_json(), r#"{"alg":"HS256","typ":"JWT"}"#);

        header.key_id = Some("key-1".to_string());
        assert_eq!(header.to_json(), r#"{"alg":"HS256","kid":"key-1","typ":"JWT"}"#);
    }

    #[test]
    fn test_parse_header() {
        let header = Header::from_json(r#"{"typ":"JWT","alg":"HS512","x5t":"ignored"}"#).unwrap();
        assert_eq!(header.algorithm_str(), "HS512");
        assert_eq!(header.token_type.as_deref(), Some("JWT"));
        assert_eq!(header.key_id(), None);
        assert_eq!(header.parse_algorithm().unwrap(), Algorithm::HS512);
    }

    #[test]
    fn test_unknown_alg_is_structurally_valid() {
        let header = Header::from_json(r#"{"alg":"none"}"#).unwrap();
        assert!(matches!(
            header.parse_algorithm(),
            Err(Error::UnsupportedAlgorithm(_))
        ));
    }

    #[test]
    fn test_invalid_headers() {
        for text in [
            r#"{"typ":"JWT"}"#,
            r#"{"alg":256}"#,
            r#"["HS256"]"#,
            r#"{"alg":"HS256""#,
            r#"{"alg":"HS256HS256HS256HS256"}"#,
        ] {
            assert!(
                matches!(Header::from_json(text), Err(Error::MalformedToken(_))),
                "{text} should be rejected"
            );
        }

        let long_kid = format!(r#"{{"alg":"HS256","kid":"{}"}}"#, "k".repeat(300));
        assert!(Header::from_json(&long_kid).is_err());
    }
}
