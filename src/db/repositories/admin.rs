use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tokio::task;
use tracing::warn;

use crate::config::SecurityConfig;
use crate::entities::admins;

/// Admin row without the password hash.
#[derive(Debug, Clone)]
pub struct Admin {
    pub id: i32,
    pub username: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<admins::Model> for Admin {
    fn from(model: admins::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Result of checking a password against a persisted admin.
#[derive(Debug, Clone)]
pub enum PasswordCheck {
    /// No admin with that username.
    Unknown,
    /// The admin exists but is deactivated; the password was not checked.
    Inactive(Admin),
    Mismatch(Admin),
    Valid(Admin),
}

pub struct AdminRepository {
    conn: DatabaseConnection,
}

impl AdminRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Looks up `username` and, if it is active, verifies `password` against its hash.
    /// Argon2 is CPU-heavy, so verification runs on the blocking pool. A hash that
    /// cannot be parsed counts as a mismatch.
    pub async fn check_password(&self, username: &str, password: &str) -> Result<PasswordCheck> {
        let admin = admins::Entity::find()
            .filter(admins::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query admin for password verification")?;

        let Some(admin) = admin else {
            return Ok(PasswordCheck::Unknown);
        };

        if !admin.is_active {
            return Ok(PasswordCheck::Inactive(Admin::from(admin)));
        }

        let password_hash = admin.password_hash.clone();
        let password = password.to_string();

        let verified = task::spawn_blocking(move || verify_password_hash(&password, &password_hash))
            .await
            .context("Password verification task panicked")?;

        let admin = Admin::from(admin);
        let is_valid = verified.unwrap_or_else(|e| {
            warn!("Stored password hash for admin '{}' is unusable: {e}", admin.username);
            false
        });
        Ok(if is_valid {
            PasswordCheck::Valid(admin)
        } else {
            PasswordCheck::Mismatch(admin)
        })
    }

    /// Creates an admin or, if the username exists, replaces its password and reactivates it.
    pub async fn upsert(
        &self,
        username: &str,
        password: &str,
        config: &SecurityConfig,
    ) -> Result<Admin> {
        let password = password.to_string();
        let config = config.clone();
        let password_hash = task::spawn_blocking(move || hash_password(&password, Some(&config)))
            .await
            .context("Password hashing task panicked")??;

        let now = chrono::Utc::now().to_rfc3339();

        let existing = admins::Entity::find()
            .filter(admins::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query admin for upsert")?;

        let model = if let Some(existing) = existing {
            let mut active: admins::ActiveModel = existing.into();
            active.password_hash = Set(password_hash);
            active.is_active = Set(true);
            active.updated_at = Set(now);
            active.update(&self.conn).await?
        } else {
            admins::ActiveModel {
                username: Set(username.to_string()),
                password_hash: Set(password_hash),
                is_active: Set(true),
                created_at: Set(now.clone()),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&self.conn)
            .await?
        };

        Ok(Admin::from(model))
    }

    /// Returns false when no admin has that username.
    pub async fn set_active(&self, username: &str, is_active: bool) -> Result<bool> {
        let result = admins::Entity::update_many()
            .col_expr(
                admins::Column::IsActive,
                sea_orm::sea_query::Expr::value(is_active),
            )
            .col_expr(
                admins::Column::UpdatedAt,
                sea_orm::sea_query::Expr::value(chrono::Utc::now().to_rfc3339()),
            )
            .filter(admins::Column::Username.eq(username))
            .exec(&self.conn)
            .await
            .context("Failed to update admin activation")?;

        Ok(result.rows_affected > 0)
    }
}

fn verify_password_hash(password: &str, password_hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

    // Params are read from the PHC string, so the default instance verifies any cost.
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Hash a password using Argon2id with optional custom params.
/// If config is None, uses the argon2 crate's default params.
pub fn hash_password(password: &str, config: Option<&SecurityConfig>) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let argon2 = if let Some(cfg) = config {
        let params = Params::new(
            cfg.argon2_memory_cost_kib,
            cfg.argon2_time_cost,
            cfg.argon2_parallelism,
            None,
        )
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    } else {
        Argon2::default()
    };

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}
