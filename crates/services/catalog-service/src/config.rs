//! Catalog service configuration.

use std::env;
use std::fmt;

use common::{AppError, AppResult, DatabaseConfig, DocumentStoreConfig, JwtConfig, StorageBackend};
use domain::{
    DEFAULT_JWT_EXPIRATION_HOURS, MAX_JWT_EXPIRATION_HOURS, MIN_JWT_SECRET_LENGTH,
    MIN_PASSWORD_LENGTH,
};

/// Signing secret used by debug builds when `JWT_SECRET` is unset.
#[cfg(debug_assertions)]
const DEV_JWT_SECRET: &str = "dev-only-secret-change-me-0123456789abcdef";

/// Catalog service configuration.
#[derive(Clone)]
pub struct CatalogServiceConfig {
    /// Which backend the repositories run on
    pub storage: StorageBackend,
    pub database: DatabaseConfig,
    pub document: DocumentStoreConfig,
    pub jwt: JwtConfig,
    /// When set, `seed` also creates demo accounts with this password
    pub seed_demo_password: Option<String>,
}

impl CatalogServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let storage = match var("STORAGE_BACKEND") {
            Some(value) => value.parse()?,
            None => StorageBackend::default(),
        };

        let mut database = DatabaseConfig::default();
        if let Some(url) = var("DATABASE_URL") {
            database.url = url;
        }

        let mut document = DocumentStoreConfig::default();
        if let Some(url) = var("MONGODB_URL") {
            document.url = url;
        }
        if let Some(name) = var("MONGODB_DATABASE") {
            document.database = name;
        }

        let expiration_hours = match var("JWT_EXPIRATION_HOURS") {
            Some(value) => value
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|h| (1..=MAX_JWT_EXPIRATION_HOURS).contains(h))
                .ok_or_else(|| {
                    invalid(format!(
                        "JWT_EXPIRATION_HOURS must be an integer between 1 and {}",
                        MAX_JWT_EXPIRATION_HOURS
                    ))
                })?,
            None => DEFAULT_JWT_EXPIRATION_HOURS,
        };

        let jwt = JwtConfig {
            secret: jwt_secret(var("JWT_SECRET"))?,
            expiration_hours,
        };

        Ok(Self {
            storage,
            database,
            document,
            jwt,
            seed_demo_password: demo_password(var("SEED_DEMO_PASSWORD"))?,
        })
    }
}

fn demo_password(configured: Option<String>) -> AppResult<Option<String>> {
    match configured {
        Some(password) if password.len() < MIN_PASSWORD_LENGTH => Err(invalid(format!(
            "SEED_DEMO_PASSWORD must be at least {} characters",
            MIN_PASSWORD_LENGTH
        ))),
        other => Ok(other),
    }
}

fn jwt_secret(configured: Option<String>) -> AppResult<String> {
    #[cfg(debug_assertions)]
    let configured = configured.or_else(|| {
        tracing::warn!("JWT_SECRET not set, using the development secret");
        Some(DEV_JWT_SECRET.to_string())
    });

    let secret = configured.ok_or_else(|| invalid("JWT_SECRET must be set"))?;
    if secret.len() < MIN_JWT_SECRET_LENGTH {
        return Err(invalid(format!(
            "JWT_SECRET must be at least {} characters",
            MIN_JWT_SECRET_LENGTH
        )));
    }
    Ok(secret)
}

fn invalid(msg: impl Into<String>) -> AppError {
    AppError::bad_request(format!("Invalid configuration: {}", msg.into()))
}

impl fmt::Debug for CatalogServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogServiceConfig")
            .field("storage", &self.storage)
            .field("database", &self.database)
            .field("document", &self.document)
            .field("jwt", &self.jwt)
            .field(
                "seed_demo_password",
                &self.seed_demo_password.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> AppResult<CatalogServiceConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        CatalogServiceConfig::from_lookup(|key| vars.get(key).cloned())
    }

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn test_defaults() {
        let config = load(&[("JWT_SECRET", SECRET)]).unwrap();
        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.jwt.expiration_hours, DEFAULT_JWT_EXPIRATION_HOURS);
        assert_eq!(config.document.database, "catalog");
        assert!(config.seed_demo_password.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("STORAGE_BACKEND", "mongodb"),
            ("MONGODB_URL", "mongodb://db:27017"),
            ("MONGODB_DATABASE", "catalog_test"),
            ("JWT_SECRET", SECRET),
            ("JWT_EXPIRATION_HOURS", "2"),
            ("SEED_DEMO_PASSWORD", "demo-password"),
        ])
        .unwrap();

        assert_eq!(config.storage, StorageBackend::Document);
        assert_eq!(config.document.url, "mongodb://db:27017");
        assert_eq!(config.document.database, "catalog_test");
        assert_eq!(config.jwt.expiration_hours, 2);
        assert_eq!(config.seed_demo_password.as_deref(), Some("demo-password"));
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert!(load(&[("JWT_SECRET", SECRET), ("STORAGE_BACKEND", "redis")]).is_err());
        assert!(load(&[("JWT_SECRET", SECRET), ("JWT_EXPIRATION_HOURS", "soon")]).is_err());
        assert!(load(&[("JWT_SECRET", "short")]).is_err());
    }

    #[test]
    fn test_expiration_hours_upper_bound() {
        let max = MAX_JWT_EXPIRATION_HOURS.to_string();
        let config = load(&[("JWT_SECRET", SECRET), ("JWT_EXPIRATION_HOURS", &max)]).unwrap();
        assert_eq!(config.jwt.expiration_hours, MAX_JWT_EXPIRATION_HOURS);

        let over = (MAX_JWT_EXPIRATION_HOURS + 1).to_string();
        assert!(load(&[("JWT_SECRET", SECRET), ("JWT_EXPIRATION_HOURS", &over)]).is_err());
        assert!(load(&[("JWT_SECRET", SECRET), ("JWT_EXPIRATION_HOURS", "10000000000")]).is_err());
        assert!(load(&[("JWT_SECRET", SECRET), ("JWT_EXPIRATION_HOURS", "0")]).is_err());
    }

    #[test]
    fn test_short_demo_password_is_rejected() {
        let err = load(&[("JWT_SECRET", SECRET), ("SEED_DEMO_PASSWORD", "short")]).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_debug_hides_secrets() {
        let config = load(&[("JWT_SECRET", SECRET), ("SEED_DEMO_PASSWORD", "hunter22")]).unwrap();
        let printed = format!("{:?}", config);
        assert!(!printed.contains(SECRET));
        assert!(!printed.contains("hunter22"));
    }
}
