use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

/// Where documents are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    MongoDb,
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(StorageBackend::MongoDb),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(anyhow::anyhow!("Unknown STORAGE_BACKEND: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub environment: String,
    pub port: u16,
    pub storage_backend: StorageBackend,
    pub mongodb_uri: Option<String>,
    pub database_name: String,
    pub jwt_secret: String,
    /// Token validity window in days
    pub jwt_expiration_days: i64,
    /// Answer store failures and bad requests with 200 like the legacy server
    pub legacy_error_status: bool,
    pub log_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 5000,
            storage_backend: StorageBackend::Memory,
            mongodb_uri: None,
            database_name: "travelWorldDB".to_string(),
            jwt_secret: "development-secret-do-not-use-in-production".to_string(),
            jwt_expiration_days: 10,
            legacy_error_status: false,
            log_format: "pretty".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let storage_backend: StorageBackend = env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "mongodb".to_string())
            .parse()?;

        let mongodb_uri = env::var("MONGODB_URI").ok();
        if storage_backend == StorageBackend::MongoDb && mongodb_uri.is_none() {
            return Err(anyhow::anyhow!(
                "MONGODB_URI environment variable is required when STORAGE_BACKEND=mongodb"
            ));
        }

        let jwt_expiration_days: i64 = parse_var(
            "JWT_EXPIRATION_DAYS",
            env::var("JWT_EXPIRATION_DAYS").ok(),
            10,
        )?;
        if jwt_expiration_days <= 0 {
            return Err(anyhow::anyhow!(
                "JWT_EXPIRATION_DAYS must be at least 1, got {}",
                jwt_expiration_days
            ));
        }

        Ok(Config {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            port: parse_var("PORT", env::var("PORT").ok(), 5000)?,
            storage_backend,
            mongodb_uri,
            database_name: env::var("DATABASE_NAME")
                .unwrap_or_else(|_| "travelWorldDB".to_string()),
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable is required"))?,
            jwt_expiration_days,
            legacy_error_status: parse_var(
                "LEGACY_ERROR_STATUS",
                env::var("LEGACY_ERROR_STATUS").ok(),
                false,
            )?,
            log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),
        })
    }

    pub fn jwt_validity(&self) -> chrono::Duration {
        chrono::Duration::days(self.jwt_expiration_days)
    }
}

/// Parse an optional env value, falling back to `default` only when unset.
fn parse_var<T>(name: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid {} value {:?}: {}", name, value, e)),
        None => Ok(default),
    }
}
