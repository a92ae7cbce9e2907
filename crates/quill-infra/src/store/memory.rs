//! In-memory post store - used when no database is configured, and in tests.
//!
//! Records live in a `HashMap`; each secondary index is a `BTreeMap` keyed by
//! `(sort value, record key)` per partition. Index entries can be held back
//! for a configurable lag to reproduce an eventually consistent index.
//! Note: Data is lost on process restart.

use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use quill_core::StoreError;
use quill_core::ports::{IndexDefinition, IndexQuery, POST_INDEXES, PostStore, Record};

/// In-memory store configuration.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStoreConfig {
    /// How long a new record stays invisible to index queries.
    pub index_lag: Duration,
}

impl InMemoryStoreConfig {
    pub fn from_env() -> Self {
        Self {
            index_lag: Duration::from_millis(
                std::env::var("STORE_INDEX_LAG_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(0),
            ),
        }
    }
}

/// partition value -> (sort value, key) -> visible from
type Partitions = HashMap<String, BTreeMap<(String, String), Instant>>;

#[derive(Default)]
struct StoreState {
    records: HashMap<String, Record>,
    indexes: HashMap<&'static str, Partitions>,
}

/// In-memory store maintaining the post secondary indexes.
pub struct InMemoryPostStore {
    state: RwLock<StoreState>,
    indexes: &'static [IndexDefinition],
    config: InMemoryStoreConfig,
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self::with_config(InMemoryStoreConfig::default())
    }

    pub fn with_config(config: InMemoryStoreConfig) -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
            indexes: POST_INDEXES,
            config,
        }
    }

    pub fn from_env() -> Self {
        Self::with_config(InMemoryStoreConfig::from_env())
    }

    /// Number of primary records, regardless of index visibility.
    pub async fn len(&self) -> usize {
        self.state.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn get(&self, key: &str) -> Option<Record> {
        self.state.read().await.records.get(key).cloned()
    }

    fn attr<'a>(record: &'a Record, name: &str) -> Option<&'a str> {
        record.get(name).and_then(serde_json::Value::as_str)
    }
}

impl Default for InMemoryPostStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    async fn put_if_absent(&self, key: &str, record: Record) -> Result<(), StoreError> {
        let mut state = self.state.write().await;

        if state.records.contains_key(key) {
            return Err(StoreError::Conflict {
                key: key.to_string(),
            });
        }

        let visible_from = Instant::now() + self.config.index_lag;
        for def in self.indexes {
            // Sparse: records without the indexed attributes are not indexed.
            let (Some(partition), Some(sort)) = (
                Self::attr(&record, def.partition_attr),
                Self::attr(&record, def.sort_attr),
            ) else {
                continue;
            };

            state
                .indexes
                .entry(def.name)
                .or_default()
                .entry(partition.to_string())
                .or_default()
                .insert((sort.to_string(), key.to_string()), visible_from);
        }

        state.records.insert(key.to_string(), record);
        tracing::debug!(key = %key, "Record stored");
        Ok(())
    }

    async fn query_by_index(&self, query: &IndexQuery) -> Result<Vec<Record>, StoreError> {
        if !self.indexes.iter().any(|def| def.name == query.index) {
            return Err(StoreError::UnknownIndex(query.index.clone()));
        }

        let state = self.state.read().await;
        let Some(entries) = state
            .indexes
            .get(query.index.as_str())
            .and_then(|partitions| partitions.get(&query.key))
        else {
            return Ok(Vec::new());
        };

        let now = Instant::now();
        let keys: Vec<&String> = if query.descending {
            entries
                .iter()
                .rev()
                .filter(|(_, visible_from)| **visible_from <= now)
                .take(query.limit)
                .map(|((_, key), _)| key)
                .collect()
        } else {
            entries
                .iter()
                .filter(|(_, visible_from)| **visible_from <= now)
                .take(query.limit)
                .map(|((_, key), _)| key)
                .collect()
        };

        keys.into_iter()
            .map(|key| {
                state.records.get(key).cloned().ok_or_else(|| {
                    StoreError::Corrupt(format!("index entry without record: {key}"))
                })
            })
            .collect()
    }
}
