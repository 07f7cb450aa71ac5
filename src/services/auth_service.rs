//! Domain service for admin authentication and authorization.
//!
//! Login resolves credentials to an [`AdminIdentity`] and issues a bearer
//! token; every admin request is then authorized from that token alone.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use super::token_service::TokenError;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Missing, malformed, expired or forged bearer token.
    #[error("{0}")]
    Unauthenticated(String),

    /// A valid token for a principal that may not use admin operations.
    #[error("Not authorized")]
    Unauthorized,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired | TokenError::Invalid => Self::Unauthenticated(err.to_string()),
            TokenError::Signing(msg) => Self::Internal(msg),
        }
    }
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Which strategy accepted the credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentitySource {
    Database,
    /// The unhashed login/password pair from process configuration.
    ConfigFallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminIdentity {
    /// `None` for the configuration fallback, which has no row.
    pub id: Option<i32>,
    pub username: String,
    pub source: IdentitySource,
}

#[derive(Debug, Clone)]
pub struct LoginResult {
    pub identity: AdminIdentity,
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Resolves a login/password pair to an admin identity.
    ///
    /// A persisted, active admin whose hash matches wins. Otherwise the pair is
    /// compared against the configured fallback, unless the persisted admin
    /// exists and is deactivated.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] when neither strategy accepts.
    async fn verify_credentials(
        &self,
        login: &str,
        password: &str,
    ) -> Result<AdminIdentity, AuthError>;

    /// Verifies credentials and issues a bearer token for the identity.
    async fn login(&self, login: &str, password: &str) -> Result<LoginResult, AuthError>;

    /// Checks a bearer token and returns the admin principal it names.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Unauthenticated`] if the token is missing, malformed, expired or forged
    /// - [`AuthError::Unauthorized`] if it names anyone but the configured admin
    fn authorize(&self, bearer_token: Option<&str>) -> Result<String, AuthError>;
}
