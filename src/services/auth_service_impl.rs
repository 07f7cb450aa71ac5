//! `SeaORM` implementation of the `AuthService` trait.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::AuthConfig;
use crate::db::{PasswordCheck, Store};
use crate::services::auth_service::{
    AdminIdentity, AuthError, AuthService, IdentitySource, LoginResult,
};
use crate::services::token_service::TokenService;

pub struct SeaOrmAuthService {
    store: Store,
    tokens: Arc<TokenService>,
    config: AuthConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, tokens: Arc<TokenService>, config: AuthConfig) -> Self {
        Self {
            store,
            tokens,
            config,
        }
    }

    fn matches_fallback(&self, login: &str, password: &str) -> bool {
        !self.config.admin_password.is_empty()
            && login == self.config.admin_login
            && password == self.config.admin_password
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn verify_credentials(
        &self,
        login: &str,
        password: &str,
    ) -> Result<AdminIdentity, AuthError> {
        match self.store.admins().check_password(login, password).await? {
            PasswordCheck::Valid(admin) => {
                return Ok(AdminIdentity {
                    id: Some(admin.id),
                    username: admin.username,
                    source: IdentitySource::Database,
                });
            }
            PasswordCheck::Inactive(admin) => {
                warn!("Login rejected for deactivated admin '{}'", admin.username);
                return Err(AuthError::InvalidCredentials);
            }
            PasswordCheck::Mismatch(_) | PasswordCheck::Unknown => {}
        }

        if self.matches_fallback(login, password) {
            debug!("Admin '{login}' authenticated via configuration fallback");
            return Ok(AdminIdentity {
                id: None,
                username: self.config.admin_login.clone(),
                source: IdentitySource::ConfigFallback,
            });
        }

        Err(AuthError::InvalidCredentials)
    }

    async fn login(&self, login: &str, password: &str) -> Result<LoginResult, AuthError> {
        let identity = self.verify_credentials(login, password).await?;
        let issued = self.tokens.issue(&identity.username)?;

        Ok(LoginResult {
            identity,
            access_token: issued.token,
            expires_at: issued.expires_at,
        })
    }

    fn authorize(&self, bearer_token: Option<&str>) -> Result<String, AuthError> {
        let token = bearer_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AuthError::Unauthenticated("Not authenticated".to_string()))?;

        let subject = self.tokens.verify(token)?;

        if subject != self.config.admin_login {
            debug!("Token subject '{subject}' is not the admin principal");
            return Err(AuthError::Unauthorized);
        }

        Ok(subject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SecurityConfig;
    use chrono::Duration;
    use jsonwebtoken::Algorithm;

    fn cheap_params() -> SecurityConfig {
        SecurityConfig {
            argon2_memory_cost_kib: 1024,
            argon2_time_cost: 1,
            argon2_parallelism: 1,
        }
    }

    async fn service(fallback_password: &str) -> (SeaOrmAuthService, Store) {
        let store = Store::new("sqlite::memory:").await.unwrap();
        let tokens = Arc::new(TokenService::new(
            Algorithm::HS256,
            b"unit-secret",
            Duration::minutes(5),
        ));
        let config = AuthConfig {
            admin_login: "admin".to_string(),
            admin_password: fallback_password.to_string(),
            ..AuthConfig::default()
        };
        (
            SeaOrmAuthService::new(store.clone(), tokens, config),
            store,
        )
    }

    #[tokio::test]
    async fn test_active_admin_with_matching_password_wins() {
        let (svc, store) = service("fallback").await;
        let admin = store
            .admins()
            .upsert("admin", "stored", &cheap_params())
            .await
            .unwrap();

        let identity = svc.verify_credentials("admin", "stored").await.unwrap();
        assert_eq!(identity.source, IdentitySource::Database);
        assert_eq!(identity.id, Some(admin.id));
    }

    #[tokio::test]
    async fn test_mismatch_falls_through_to_fallback() {
        let (svc, store) = service("fallback").await;
        store
            .admins()
            .upsert("admin", "stored", &cheap_params())
            .await
            .unwrap();

        let identity = svc.verify_credentials("admin", "fallback").await.unwrap();
        assert_eq!(identity.source, IdentitySource::ConfigFallback);
        assert_eq!(identity.id, None);

        assert!(matches!(
            svc.verify_credentials("admin", "neither").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_inactive_admin_blocks_fallback() {
        let (svc, store) = service("fallback").await;
        let admins = store.admins();
        admins
            .upsert("admin", "stored", &cheap_params())
            .await
            .unwrap();
        admins.set_active("admin", false).await.unwrap();

        for password in ["stored", "fallback"] {
            assert!(matches!(
                svc.verify_credentials("admin", password).await,
                Err(AuthError::InvalidCredentials)
            ));
        }
    }

    #[tokio::test]
    async fn test_unknown_login_uses_fallback_only() {
        let (svc, _) = service("fallback").await;

        let identity = svc.verify_credentials("admin", "fallback").await.unwrap();
        assert_eq!(identity.username, "admin");
        assert!(matches!(
            svc.verify_credentials("editor", "fallback").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_empty_fallback_password_disables_fallback() {
        let (svc, _) = service("").await;

        assert!(matches!(
            svc.verify_credentials("admin", "").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_authorize_accepts_only_admin_subject() {
        let (svc, _) = service("fallback").await;
        let issued = svc.tokens.issue("admin").unwrap();
        assert_eq!(svc.authorize(Some(&issued.token)).unwrap(), "admin");

        let other = svc.tokens.issue("editor").unwrap();
        assert!(matches!(
            svc.authorize(Some(&other.token)),
            Err(AuthError::Unauthorized)
        ));
        assert!(matches!(
            svc.authorize(None),
            Err(AuthError::Unauthenticated(_))
        ));
    }
}
