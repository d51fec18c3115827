use crate::algorithm::Algorithm;
use crate::claims::Claims;
use crate::error::{Error, Result};
use crate::limits::MAX_LEEWAY_SECONDS;
use std::time::{SystemTime, UNIX_EPOCH};

/// What `verify_with` checks once the signature is known to be good
///
/// ```
/// use jwtcodec::{Algorithm, Validation};
///
/// let validation = Validation::new(Algorithm::HS256)
///     .leeway(30)
///     .require_issuer("https://issuer.example")
///     .require_audience("api");
/// assert_eq!(validation.algorithm(), Algorithm::HS256);
/// ```
#[derive(Debug, Clone)]
pub struct Validation {
    algorithm: Algorithm,

    /// Validate expiration time (exp claim)
    validate_exp: bool,

    /// Validate not-before time (nbf claim)
    validate_nbf: bool,

    /// Clock skew tolerance in seconds (default: 0)
    leeway_seconds: u64,

    required_audience: Option<String>,
    required_issuer: Option<String>,
    required_claims: Vec<String>,

    /// Fixed clock for deterministic checks
    now: Option<i64>,
}

impl Validation {
    /// Expect tokens signed with `algorithm`; checks `exp` and `nbf` with no leeway
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            validate_exp: true,
            validate_nbf: true,
            leeway_seconds: 0,
            required_audience: None,
            required_issuer: None,
            required_claims: Vec::new(),
            now: None,
        }
    }

    /// The only algorithm a token may declare
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Set clock skew tolerance (at most 300 seconds)
    pub fn leeway(mut self, seconds: u64) -> Self {
        self.leeway_seconds = seconds;
        self
    }

    /// Disable expiration validation
    pub fn no_exp_validation(mut self) -> Self {
        self.validate_exp = false;
        self
    }

    /// Disable not-before validation
    pub fn no_nbf_validation(mut self) -> Self {
        self.validate_nbf = false;
        self
    }

    /// Require `aud` to contain this value
    pub fn require_audience(mut self, audience: impl Into<String>) -> Self {
        self.required_audience = Some(audience.into());
        self
    }

    /// Require `iss` to equal this value
    pub fn require_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.required_issuer = Some(issuer.into());
        self
    }

    /// Require a claim to be present, registered or custom
    pub fn require_claim(mut self, name: impl Into<String>) -> Self {
        self.required_claims.push(name.into());
        self
    }

    /// Evaluate time-based claims at `timestamp` instead of the system clock
    pub fn at(mut self, timestamp: i64) -> Self {
        self.now = Some(timestamp);
        self
    }

    pub(crate) fn check_configuration(&self) -> Result<()> {
        if self.leeway_seconds > MAX_LEEWAY_SECONDS {
            return Err(Error::InvalidConfiguration(format!(
                "leeway of {}s exceeds maximum of {}s",
                self.leeway_seconds, MAX_LEEWAY_SECONDS
            )));
        }
        Ok(())
    }

    /// Validate claims of a token whose signature has already been checked
    pub(crate) fn validate(&self, claims: &Claims) -> Result<()> {
        let now = self.now.unwrap_or_else(current_timestamp);
        // Bounded by MAX_LEEWAY_SECONDS
        let leeway = self.leeway_seconds as i64;

        // A token is expired from the exp second onwards
        if self.validate_exp {
            if let Some(exp) = claims.expiration {
                if now >= exp.saturating_add(leeway) {
                    return Err(Error::TokenExpired {
                        expired_at: exp,
                        now,
                        leeway: self.leeway_seconds,
                    });
                }
            }
        }

        if self.validate_nbf {
            if let Some(nbf) = claims.not_before {
                if nbf > now.saturating_add(leeway) {
                    return Err(Error::TokenNotYetValid {
                        not_before: nbf,
                        now,
                        leeway: self.leeway_seconds,
                    });
                }
            }
        }

        if let Some(expected) = &self.required_issuer {
            if claims.issuer.as_deref() != Some(expected.as_str()) {
                return Err(Error::IssuerMismatch {
                    expected: expected.clone(),
                    found: claims.issuer.clone(),
                });
            }
        }

        if let Some(expected) = &self.required_audience {
            if claims.audience.is_empty() {
                return Err(Error::MissingClaim("aud".to_string()));
            }
            if !claims.audience.iter().any(|aud| aud == expected) {
                return Err(Error::AudienceMismatch {
                    expected: expected.clone(),
                    found: claims.audience.clone(),
                });
            }
        }

        if let Some(missing) = self
            .required_claims
            .iter()
            .find(|name| !claims.contains(name))
        {
            return Err(Error::MissingClaim(missing.clone()));
        }

        Ok(())
    }
}

/// Current Unix time in seconds
pub(crate) fn current_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;

    fn validation() -> Validation {
        Validation::new(Algorithm::HS256).at(NOW)
    }

    #[test]
    fn test_exp_boundary() {
        let live = Claims::new().with_expiration(NOW + 1);
        assert!(validation().validate(&live).is_ok());

        let at_exp = Claims::new().with_expiration(NOW);
        assert!(matches!(
            validation().validate(&at_exp),
            Err(Error::TokenExpired { expired_at: NOW, now: NOW, leeway: 0 })
        ));
    }

    #[test]
    fn test_exp_with_leeway() {
        let claims = Claims::new().with_expiration(NOW - 30);
        assert!(validation().validate(&claims).is_err());
        assert!(validation().leeway(31).validate(&claims).is_ok());
        assert!(validation().leeway(30).validate(&claims).is_err());
        assert!(validation().no_exp_validation().validate(&claims).is_ok());
    }

    #[test]
    fn test_nbf() {
        let claims = Claims::new().with_not_before(NOW + 10);
        assert!(matches!(
            validation().validate(&claims),
            Err(Error::TokenNotYetValid { not_before, .. }) if not_before == NOW + 10
        ));
        assert!(validation().leeway(10).validate(&claims).is_ok());
        assert!(validation().no_nbf_validation().validate(&claims).is_ok());

        let ready = Claims::new().with_not_before(NOW);
        assert!(validation().validate(&ready).is_ok());
    }

    #[test]
    fn test_missing_time_claims_pass() {
        assert!(validation().validate(&Claims::new()).is_ok());
    }

    #[test]
    fn test_issuer() {
        let claims = Claims::new().with_issuer("https://trusted.example");
        assert!(validation()
            .require_issuer("https://trusted.example")
            .validate(&claims)
            .is_ok());
        assert!(matches!(
            validation().require_issuer("https://other.example").validate(&claims),
            Err(Error::IssuerMismatch { .. })
        ));
        assert!(matches!(
            validation().require_issuer("x").validate(&Claims::new()),
            Err(Error::IssuerMismatch { found: None, .. })
        ));
    }

    #[test]
    fn test_audience() {
        let claims = Claims::new().with_audience("api").with_audience("web");
        assert!(validation().require_audience("web").validate(&claims).is_ok());
        assert!(matches!(
            validation().require_audience("admin").validate(&claims),
            Err(Error::AudienceMismatch { .. })
        ));
        assert!(matches!(
            validation().require_audience("api").validate(&Claims::new()),
            Err(Error::MissingClaim(name)) if name == "aud"
        ));
    }

    #[test]
    fn test_required_claims() {
        let claims = Claims::new().with_subject("kaif").with_claim("email", "kaif@email.com");
        assert!(validation()
            .require_claim("sub")
            .require_claim("email")
            .validate(&claims)
            .is_ok());
        assert!(matches!(
            validation().require_claim("role").validate(&claims),
            Err(Error::MissingClaim(name)) if name == "role"
        ));
    }

    #[test]
    fn test_leeway_limit() {
        assert!(validation().leeway(300).check_configuration().is_ok());
        assert!(matches!(
            validation().leeway(301).check_configuration(),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_current_timestamp_is_recent() {
        // 2023-11-14
        assert!(current_timestamp() > NOW);
    }
}
