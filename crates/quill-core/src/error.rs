//! Domain-level error types.

use thiserror::Error;
use uuid::Uuid;

/// Failures of the post repository, one variant per caller-visible outcome.
#[derive(Debug, Error)]
pub enum PostError {
    /// The candidate post broke one or more declared constraints.
    #[error("Validation failed: {}", .errors.join(", "))]
    Validation { errors: Vec<String> },

    /// The generated id already exists in the store. Retrying creates a new id.
    #[error("Post {post_id} already exists")]
    Conflict { post_id: Uuid },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Store boundary errors.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// A conditional write found the key already present.
    #[error("Record already exists: {key}")]
    Conflict { key: String },

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Store query failed: {0}")]
    Query(String),

    #[error("Unknown index: {0}")]
    UnknownIndex(String),

    /// A stored record could not be decoded into a post.
    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

impl StoreError {
    /// Whether retrying the same call may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}
