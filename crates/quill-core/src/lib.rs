//! # Quill Core
//!
//! The domain layer of the Quill content store.
//! Validation, sanitization and the post repository live here; the store
//! itself is reached only through the [`ports::PostStore`] trait.

pub mod domain;
pub mod error;
pub mod ports;
pub mod repository;
pub mod sanitize;
pub mod validation;

pub use error::{PostError, StoreError};
pub use repository::PostRepository;
