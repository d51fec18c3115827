mod validator;
mod value;

pub use validator::Validation;
pub use value::ClaimValue;

pub(crate) use validator::current_timestamp;

use std::collections::BTreeMap;

use miniserde::json::{self, Array, Number, Object, Value};

use crate::error::{Error, Result};
use crate::limits::MAX_CLAIM_DEPTH;

/// Names reserved by RFC 7519 Section 4.1
pub const REGISTERED_CLAIMS: [&str; 7] = ["iss", "sub", "aud", "exp", "nbf", "iat", "jti"];

/// JWT claim set
///
/// Registered claims from [RFC 7519 Section 4.1](https://datatracker.ietf.org/doc/html/rfc7519#section-4.1)
/// are typed fields; everything else lives in an ordered map of [`ClaimValue`]s.
///
/// ```
/// use jwtcodec::{Claims, ClaimValue};
///
/// let claims = Claims::new()
///     .with_subject("user-42")
///     .with_claim("name", "Kaif Khan")
///     .with_claim("email", "kaif@email.com");
///
/// assert_eq!(claims.subject.as_deref(), Some("user-42"));
/// assert_eq!(claims.get("name").and_then(ClaimValue::as_str), Some("Kaif Khan"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Claims {
    /// Issuer (iss) - identifies the principal that issued the JWT
    pub issuer: Option<String>,

    /// Subject (sub) - identifies the principal that is the subject of the JWT
    pub subject: Option<String>,

    /// Audience (aud) - recipients the JWT is intended for
    /// Serialized as a string when there is exactly one, otherwise as an array
    pub audience: Vec<String>,

    /// Expiration Time (exp) - seconds since Unix epoch
    pub expiration: Option<i64>,

    /// Not Before (nbf) - the JWT MUST NOT be accepted before this time
    pub not_before: Option<i64>,

    /// Issued At (iat) - time at which the JWT was issued
    pub issued_at: Option<i64>,

    /// JWT ID (jti) - unique identifier for the JWT
    pub jwt_id: Option<String>,

    custom: BTreeMap<String, ClaimValue>,
}

impl Claims {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Add an audience; may be called repeatedly
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience.push(audience.into());
        self
    }

    pub fn with_expiration(mut self, timestamp: i64) -> Self {
        self.expiration = Some(timestamp);
        self
    }

    pub fn with_not_before(mut self, timestamp: i64) -> Self {
        self.not_before = Some(timestamp);
        self
    }

    pub fn with_jwt_id(mut self, id: impl Into<String>) -> Self {
        self.jwt_id = Some(id.into());
        self
    }

    /// Set a claim by name, see [`Claims::insert`]
    pub fn with_claim(mut self, name: impl Into<String>, value: impl Into<ClaimValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Set a claim by name
    ///
    /// Registered names with a fitting value update the typed field (`Null`
    /// clears it). A registered name with an ill-typed value is kept as-is and
    /// makes issuing fail with `InvalidClaims`. Returns the previous custom
    /// value, if any.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<ClaimValue>,
    ) -> Option<ClaimValue> {
        let name = name.into();
        match self.set_registered(&name, value.into()) {
            Ok(()) => self.custom.remove(&name),
            Err(value) => self.custom.insert(name, value),
        }
    }

    /// Remove a custom claim
    pub fn remove(&mut self, name: &str) -> Option<ClaimValue> {
        self.custom.remove(name)
    }

    /// Look up a custom claim
    pub fn get(&self, name: &str) -> Option<&ClaimValue> {
        self.custom.get(name)
    }

    /// All custom claims, ordered by name
    pub fn custom(&self) -> &BTreeMap<String, ClaimValue> {
        &self.custom
    }

    /// Whether a claim with this name is present, registered or custom
    pub fn contains(&self, name: &str) -> bool {
        match name {
            "iss" => self.issuer.is_some(),
            "sub" => self.subject.is_some(),
            "aud" => !self.audience.is_empty(),
            "exp" => self.expiration.is_some(),
            "nbf" => self.not_before.is_some(),
            "iat" => self.issued_at.is_some(),
            "jti" => self.jwt_id.is_some(),
            _ => self.custom.contains_key(name),
        }
    }

    /// Serialize to canonical JSON (sorted keys, no whitespace)
    pub fn to_json(&self) -> Result<String> {
        Ok(json::to_string(&Value::Object(self.to_object()?)))
    }

    /// Parse a JSON object into claims
    ///
    /// Fails with `MalformedToken` if the text is not a JSON object or a
    /// registered claim has the wrong type.
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = json::from_str(text)
            .map_err(|_| Error::malformed("payload is not valid JSON"))?;
        match value {
            Value::Object(object) => Self::from_object(&object),
            _ => Err(Error::malformed("payload is not a JSON object")),
        }
    }

    fn from_object(object: &Object) -> Result<Self> {
        let mut claims = Claims::new();
        for (name, value) in object.iter() {
            if value::nesting_exceeds(value, MAX_CLAIM_DEPTH) {
                return Err(Error::malformed(format!(
                    "claim '{name}' is nested deeper than {MAX_CLAIM_DEPTH} levels"
                )));
            }
            if let Err(value) = claims.set_registered(name, ClaimValue::from_json(value)) {
                if is_registered(name) {
                    return Err(Error::malformed(format!(
                        "claim '{name}' has an invalid type"
                    )));
                }
                claims.custom.insert(name.clone(), value);
            }
        }
        Ok(claims)
    }

    fn to_object(&self) -> Result<Object> {
        if let Some(name) = self.custom.keys().find(|name| is_registered(name)) {
            return Err(Error::InvalidClaims(format!(
                "claim '{name}' has an invalid type for a registered claim"
            )));
        }

        for (name, value) in &self.custom {
            value.check_encodable(name, MAX_CLAIM_DEPTH)?;
        }

        let mut object = value::object_from_map(&self.custom);

        if let Some(issuer) = &self.issuer {
            object.insert("iss".to_string(), Value::String(issuer.clone()));
        }
        if let Some(subject) = &self.subject {
            object.insert("sub".to_string(), Value::String(subject.clone()));
        }
        match self.audience.as_slice() {
            [] => {}
            [single] => {
                object.insert("aud".to_string(), Value::String(single.clone()));
            }
            many => {
                let mut array = Array::new();
                array.extend(many.iter().cloned().map(Value::String));
                object.insert("aud".to_string(), Value::Array(array));
            }
        }
        if let Some(exp) = self.expiration {
            object.insert("exp".to_string(), timestamp_value(exp));
        }
        if let Some(nbf) = self.not_before {
            object.insert("nbf".to_string(), timestamp_value(nbf));
        }
        if let Some(iat) = self.issued_at {
            object.insert("iat".to_string(), timestamp_value(iat));
        }
        if let Some(jti) = &self.jwt_id {
            object.insert("jti".to_string(), Value::String(jti.clone()));
        }

        Ok(object)
    }

    /// Route a registered claim into its typed field
    ///
    /// Hands the value back when `name` is not registered or the type does not fit.
    fn set_registered(
        &mut self,
        name: &str,
        value: ClaimValue,
    ) -> std::result::Result<(), ClaimValue> {
        match (name, value) {
            ("iss", value) => self.issuer = string_claim(value)?,
            ("sub", value) => self.subject = string_claim(value)?,
            ("jti", value) => self.jwt_id = string_claim(value)?,
            ("exp", value) => self.expiration = timestamp_claim(value)?,
            ("nbf", value) => self.not_before = timestamp_claim(value)?,
            ("iat", value) => self.issued_at = timestamp_claim(value)?,
            ("aud", value) => self.audience = audience_claim(value)?,
            (_, value) => return Err(value),
        }
        Ok(())
    }
}

fn is_registered(name: &str) -> bool {
    REGISTERED_CLAIMS.contains(&name)
}

fn string_claim(value: ClaimValue) -> std::result::Result<Option<String>, ClaimValue> {
    match value {
        ClaimValue::Null => Ok(None),
        ClaimValue::String(s) => Ok(Some(s)),
        other => Err(other),
    }
}

/// NumericDate; fractional seconds are truncated
fn timestamp_claim(value: ClaimValue) -> std::result::Result<Option<i64>, ClaimValue> {
    match value {
        ClaimValue::Null => Ok(None),
        ClaimValue::Integer(n) => Ok(Some(n)),
        ClaimValue::Float(f) if f.is_finite() && f.abs() < i64::MAX as f64 => Ok(Some(f as i64)),
        other => Err(other),
    }
}

fn audience_claim(value: ClaimValue) -> std::result::Result<Vec<String>, ClaimValue> {
    match value {
        ClaimValue::Null => Ok(Vec::new()),
        ClaimValue::String(s) => Ok(vec![s]),
        ClaimValue::Array(items) if items.iter().all(|item| item.as_str().is_some()) => Ok(items
            .into_iter()
            .filter_map(|item| match item {
                ClaimValue::String(s) => Some(s),
                _ => None,
            })
            .collect()),
        other => Err(other),
    }
}

fn timestamp_value(timestamp: i64) -> Value {
    match u64::try_from(timestamp) {
        Ok(n) => Value::Number(Number::U64(n)),
        Err(_) => Value::Number(Number::I64(timestamp)),
    }
}
