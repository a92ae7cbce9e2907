//! # Quill Infrastructure
//!
//! Concrete implementations of the store port defined in `quill-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL post store via SeaORM

pub mod database;
pub mod store;

pub use database::DatabaseConfig;
pub use store::{InMemoryPostStore, InMemoryStoreConfig, RetryPolicy, RetryingStore};

#[cfg(feature = "postgres")]
pub use database::PostgresPostStore;
