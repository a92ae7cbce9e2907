//! Key-value store port - the only path from the core to durable storage.

use async_trait::async_trait;

use crate::error::StoreError;

/// A stored record: a flat JSON object. Its layout belongs to the repository.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Secondary index over `status`, ordered by `createdAt`.
pub const STATUS_INDEX: &str = "status";

/// Definition of a secondary index: records are grouped by `partition_attr`
/// and ordered by `sort_attr` (compared as strings).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexDefinition {
    pub name: &'static str,
    pub partition_attr: &'static str,
    pub sort_attr: &'static str,
}

/// The index every post store must maintain.
pub const POST_INDEXES: &[IndexDefinition] = &[IndexDefinition {
    name: STATUS_INDEX,
    partition_attr: "status",
    sort_attr: "createdAt",
}];

/// An ordered, bounded lookup against a secondary index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexQuery {
    pub index: String,
    pub key: String,
    pub descending: bool,
    pub limit: usize,
}

impl IndexQuery {
    pub fn new(index: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            key: key.into(),
            descending: false,
            limit: usize::MAX,
        }
    }

    pub fn descending(mut self) -> Self {
        self.descending = true;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// Store trait - abstraction over key-value backends (Postgres, in-memory).
///
/// Secondary indexes may lag the primary records; callers must not assume
/// read-your-writes through `query_by_index`.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Insert `record` under `key` only if no record with that key exists.
    ///
    /// Fails with [`StoreError::Conflict`] when the key is taken.
    async fn put_if_absent(&self, key: &str, record: Record) -> Result<(), StoreError>;

    /// Query a secondary index, returning at most `query.limit` records in
    /// index order.
    async fn query_by_index(&self, query: &IndexQuery) -> Result<Vec<Record>, StoreError>;
}
