//! Application state - shared across all handlers.
//!
//! Built once at startup. The store client inside is shared read-only by
//! every worker; nothing here changes per request.

use std::sync::Arc;

use quill_core::PostRepository;
use quill_core::ports::PostStore;
use quill_infra::{InMemoryPostStore, RetryingStore};

#[cfg(feature = "postgres")]
use quill_infra::PostgresPostStore;

use crate::config::AppConfig;
use crate::middleware::error::AppError;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostRepository,
    /// Include the cause of 500 responses in the body.
    pub expose_error_details: bool,
    pub list_cache_max_age: u32,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let store = Self::build_store(config).await;

        tracing::info!(
            environment = ?config.environment,
            "Application state initialized"
        );

        Self::with_store(store, config)
    }

    pub fn with_store(store: Arc<dyn PostStore>, config: &AppConfig) -> Self {
        Self {
            posts: PostRepository::new(store),
            expose_error_details: config.environment.is_development(),
            list_cache_max_age: config.list_cache_max_age,
        }
    }

    /// Map a repository failure, hiding internals outside development.
    pub fn error(&self, err: quill_core::PostError) -> AppError {
        AppError::from_post_error(err, self.expose_error_details)
    }

    #[cfg(feature = "postgres")]
    async fn build_store(config: &AppConfig) -> Arc<dyn PostStore> {
        let Some(db_config) = config.database.as_ref() else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Self::memory_store(config);
        };

        match quill_infra::database::connect(db_config).await {
            Ok(conn) => Arc::new(RetryingStore::new(
                PostgresPostStore::new(conn),
                config.retry.clone(),
            )),
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                Self::memory_store(config)
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn build_store(config: &AppConfig) -> Arc<dyn PostStore> {
        tracing::info!("Running without postgres feature - using in-memory store");
        Self::memory_store(config)
    }

    fn memory_store(config: &AppConfig) -> Arc<dyn PostStore> {
        if !config.memory_store.index_lag.is_zero() {
            tracing::info!(
                lag_ms = config.memory_store.index_lag.as_millis() as u64,
                "In-memory status index lags writes"
            );
        }
        Arc::new(RetryingStore::new(
            InMemoryPostStore::with_config(config.memory_store.clone()),
            config.retry.clone(),
        ))
    }
}
