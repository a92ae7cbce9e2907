//! Application configuration loaded from environment variables.

use std::env;

use quill_infra::{DatabaseConfig, InMemoryStoreConfig, RetryPolicy};

/// Deployment environment. Only `Development` exposes server error details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn from_env() -> Self {
        match env::var("APP_ENV").map(|v| v.to_lowercase()).as_deref() {
            Ok("development") | Ok("dev") => Environment::Development,
            _ => Environment::Production,
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub database: Option<DatabaseConfig>,
    pub retry: RetryPolicy,
    pub memory_store: InMemoryStoreConfig,
    /// `max-age` sent with the published feed.
    pub list_cache_max_age: u32,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: Environment::from_env(),
            database: DatabaseConfig::from_env(),
            retry: RetryPolicy::from_env(),
            memory_store: InMemoryStoreConfig::from_env(),
            list_cache_max_age: env::var("LIST_CACHE_MAX_AGE_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(300),
        }
    }
}
