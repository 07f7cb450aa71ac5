use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub auth: AuthConfig,

    pub security: SecurityConfig,

    pub content: ContentConfig,

    pub telegram: TelegramConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// "pretty" or "json"
    pub log_format: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    pub max_db_connections: u32,

    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/eduhub.db".to_string(),
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,

    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            cors_allowed_origins: vec![
                "http://localhost:8080".to_string(),
                "http://localhost:5173".to_string(),
            ],
        }
    }
}

/// Bearer token signing and the single authorizable admin principal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub jwt_secret: String,

    /// HMAC algorithm identifier (HS256, HS384 or HS512)
    pub jwt_algorithm: String,

    pub token_ttl_minutes: u32,

    /// The only principal name the admin gate accepts.
    pub admin_login: String,

    /// Fallback password, compared verbatim when no persisted admin matched.
    pub admin_password: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "dev-secret".to_string(),
            jwt_algorithm: "HS256".to_string(),
            token_ttl_minutes: 60,
            admin_login: "admin".to_string(),
            admin_password: "admin123".to_string(),
        }
    }
}

impl AuthConfig {
    pub fn algorithm(&self) -> Result<jsonwebtoken::Algorithm> {
        let alg = jsonwebtoken::Algorithm::from_str(&self.jwt_algorithm)
            .map_err(|e| anyhow::anyhow!("Unknown JWT algorithm '{}': {e}", self.jwt_algorithm))?;

        match alg {
            jsonwebtoken::Algorithm::HS256
            | jsonwebtoken::Algorithm::HS384
            | jsonwebtoken::Algorithm::HS512 => Ok(alg),
            other => anyhow::bail!("JWT algorithm {other:?} needs a key pair; use HS256/HS384/HS512"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Argon2 memory cost in KiB (default: 8192 = 8MB)
    pub argon2_memory_cost_kib: u32,

    /// Argon2 time cost (iterations)
    pub argon2_time_cost: u32,

    pub argon2_parallelism: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            argon2_memory_cost_kib: 8192,
            argon2_time_cost: 3,
            argon2_parallelism: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Closed set of locale codes used to tag rows and to strip slug suffixes.
    pub locales: Vec<String>,

    pub default_locale: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            locales: vec![
                "ru".to_string(),
                "uz".to_string(),
                "en".to_string(),
                "ja".to_string(),
            ],
            default_locale: "ru".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    pub bot_token: Option<String>,

    pub chat_id: Option<String>,

    pub api_base_url: String,

    pub request_timeout_seconds: u64,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            chat_id: None,
            api_base_url: "https://api.telegram.org".to_string(),
            request_timeout_seconds: 10,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            server: ServerConfig::default(),
            auth: AuthConfig::default(),
            security: SecurityConfig::default(),
            content: ContentConfig::default(),
            telegram: TelegramConfig::default(),
        }
    }
}

impl Config {
    /// Loads `.env`, the first config file found, then environment overrides.
    pub fn load() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            info!("Loaded environment from: {}", path.display());
        }

        let mut config = Self::load_file()?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn load_file() -> Result<Self> {
        for path in &Self::config_paths() {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Applies the environment variable overrides through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL") {
            self.general.database_path = url;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("Invalid PORT: {port}"))?;
        }
        if let Some(origins) = lookup("CORS_ORIGINS") {
            self.server.cors_allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(secret) = lookup("JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        if let Some(alg) = lookup("JWT_ALGORITHM") {
            self.auth.jwt_algorithm = alg;
        }
        if let Some(minutes) = lookup("JWT_EXP_MINUTES") {
            self.auth.token_ttl_minutes = minutes
                .parse()
                .with_context(|| format!("Invalid JWT_EXP_MINUTES: {minutes}"))?;
        }
        if let Some(login) = lookup("ADMIN_LOGIN") {
            self.auth.admin_login = login;
        }
        if let Some(password) = lookup("ADMIN_PASSWORD") {
            self.auth.admin_password = password;
        }
        if let Some(token) = lookup("TELEGRAM_BOT_TOKEN") {
            self.telegram.bot_token = Some(token);
        }
        if let Some(chat_id) = lookup("TELEGRAM_CHAT_ID") {
            self.telegram.chat_id = Some(chat_id);
        }
        Ok(())
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("eduhub").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".eduhub").join("config.toml"));
        }

        paths
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = PathBuf::from("config.toml");
        if path.exists() {
            Ok(false)
        } else {
            Self::default().save_to_path(&path)?;
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.is_empty() {
            anyhow::bail!("auth.jwt_secret cannot be empty");
        }

        self.auth.algorithm()?;

        if self.auth.token_ttl_minutes == 0 {
            anyhow::bail!("auth.token_ttl_minutes must be > 0");
        }

        if self.auth.admin_login.is_empty() {
            anyhow::bail!("auth.admin_login cannot be empty");
        }

        if self.content.locales.is_empty() {
            anyhow::bail!("content.locales must list at least one locale code");
        }

        for (i, code) in self.content.locales.iter().enumerate() {
            if code.is_empty() || code.contains('-') {
                anyhow::bail!("Invalid locale code '{code}': must be non-empty and contain no '-'");
            }
            if self.content.locales[..i].contains(code) {
                anyhow::bail!("Duplicate locale code '{code}'");
            }
        }

        if !self.content.locales.contains(&self.content.default_locale) {
            anyhow::bail!(
                "content.default_locale '{}' is not one of content.locales",
                self.content.default_locale
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.auth.jwt_algorithm, "HS256");
        assert_eq!(config.auth.token_ttl_minutes, 60);
        assert_eq!(config.content.locales, vec!["ru", "uz", "en", "ja"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"

            [auth]
            token_ttl_minutes = 15

            [content]
            locales = ["ru", "en"]
            default_locale = "en"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.auth.token_ttl_minutes, 15);
        assert_eq!(config.auth.admin_login, "admin");
        assert_eq!(config.content.locales, vec!["ru", "en"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("JWT_SECRET", "s3cret"),
            ("JWT_EXP_MINUTES", "5"),
            ("ADMIN_LOGIN", "root"),
            ("CORS_ORIGINS", "https://a.example, https://b.example"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config
            .apply_env(|key| env.get(key).map(ToString::to_string))
            .unwrap();

        assert_eq!(config.auth.jwt_secret, "s3cret");
        assert_eq!(config.auth.token_ttl_minutes, 5);
        assert_eq!(config.auth.admin_login, "root");
        assert_eq!(
            config.server.cors_allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
    }

    #[test]
    fn test_env_override_rejects_bad_number() {
        let mut config = Config::default();
        let result = config.apply_env(|key| (key == "JWT_EXP_MINUTES").then(|| "soon".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        let mut config = Config::default();
        config.auth.jwt_algorithm = "RS256".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.auth.token_ttl_minutes = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.content.locales = vec!["en".to_string(), "en".to_string()];
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.content.locales = vec!["pt-br".to_string()];
        config.content.default_locale = "pt-br".to_string();
        assert!(config.validate().is_err());
    }
}
