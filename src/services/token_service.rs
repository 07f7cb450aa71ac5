//! Stateless bearer tokens.
//!
//! Tokens are HMAC-signed JWTs carrying the subject and an absolute UTC expiry.
//! Nothing is stored server-side, so any instance with the same secret can
//! verify a token, and a leaked token stays valid until it expires.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AuthConfig;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,

    #[error("Invalid token")]
    Invalid,

    #[error("Failed to sign token: {0}")]
    Signing(String),
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    /// Seconds since the Unix epoch; the token is rejected from this instant on.
    exp: i64,
    iat: i64,
}

/// Token issued at login.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

pub struct TokenService {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    #[must_use]
    pub fn new(algorithm: Algorithm, secret: &[u8], ttl: Duration) -> Self {
        Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    pub fn from_config(config: &AuthConfig) -> anyhow::Result<Self> {
        Ok(Self::new(
            config.algorithm()?,
            config.jwt_secret.as_bytes(),
            Duration::minutes(i64::from(config.token_ttl_minutes)),
        ))
    }

    pub fn issue(&self, subject: &str) -> Result<IssuedToken, TokenError> {
        self.issue_at(subject, Utc::now())
    }

    pub fn issue_at(&self, subject: &str, now: DateTime<Utc>) -> Result<IssuedToken, TokenError> {
        let expires_at = now + self.ttl;
        let claims = Claims {
            sub: subject.to_string(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Returns the subject of a valid, unexpired token.
    pub fn verify(&self, token: &str) -> Result<String, TokenError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<String, TokenError> {
        // Restricting to one algorithm rejects tokens signed with anything else.
        let mut validation = Validation::new(self.algorithm);
        // Expiry is checked below against `now`, with no leeway.
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            }
        })?;

        if now.timestamp() >= data.claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn service() -> TokenService {
        TokenService::new(Algorithm::HS256, b"test-secret", Duration::minutes(60))
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_issue_then_verify_returns_subject() {
        let svc = service();
        let issued = svc.issue_at("admin", t0()).unwrap();

        assert_eq!(issued.expires_at, t0() + Duration::minutes(60));
        assert_eq!(svc.verify_at(&issued.token, t0()).unwrap(), "admin");
        assert_eq!(
            svc.verify_at(&issued.token, t0() + Duration::minutes(59))
                .unwrap(),
            "admin"
        );
    }

    #[test]
    fn test_token_expires_exactly_at_ttl() {
        let svc = service();
        let issued = svc.issue_at("admin", t0()).unwrap();

        assert_eq!(
            svc.verify_at(&issued.token, t0() + Duration::minutes(60)),
            Err(TokenError::Expired)
        );
        assert_eq!(
            svc.verify_at(&issued.token, t0() + Duration::days(2)),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_fresh_token_verifies_against_wall_clock() {
        let svc = service();
        let issued = svc.issue("admin").unwrap();
        assert_eq!(svc.verify(&issued.token).unwrap(), "admin");
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let issued = service().issue_at("admin", t0()).unwrap();
        let other = TokenService::new(Algorithm::HS256, b"other-secret", Duration::minutes(60));

        assert_eq!(other.verify_at(&issued.token, t0()), Err(TokenError::Invalid));
    }

    #[test]
    fn test_tampered_payload_is_invalid() {
        let svc = service();
        let issued = svc.issue_at("admin", t0()).unwrap();
        let forged = svc.issue_at("intruder", t0()).unwrap();

        // Splice the forged payload onto the original signature.
        let original: Vec<&str> = issued.token.split('.').collect();
        let other: Vec<&str> = forged.token.split('.').collect();
        let spliced = format!("{}.{}.{}", original[0], other[1], original[2]);

        assert_eq!(svc.verify_at(&spliced, t0()), Err(TokenError::Invalid));
    }

    #[test]
    fn test_algorithm_mismatch_is_invalid() {
        let hs512 = TokenService::new(Algorithm::HS512, b"test-secret", Duration::minutes(60));
        let issued = hs512.issue_at("admin", t0()).unwrap();

        assert_eq!(service().verify_at(&issued.token, t0()), Err(TokenError::Invalid));
    }

    #[test]
    fn test_malformed_token_is_invalid() {
        let svc = service();
        assert_eq!(svc.verify_at("not-a-jwt", t0()), Err(TokenError::Invalid));
        assert_eq!(svc.verify_at("", t0()), Err(TokenError::Invalid));
    }
}
