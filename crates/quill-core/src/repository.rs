//! Post repository - the single owner of the post record layout.
//!
//! `create` validates, sanitizes and conditionally writes; `list_published`
//! reads the status index newest-first. Nothing is cached between calls.

use std::sync::Arc;

use crate::domain::{CandidatePost, Post, PostStatus};
use crate::error::{PostError, StoreError};
use crate::ports::{
    Clock, IdGenerator, IndexQuery, PostStore, Record, STATUS_INDEX, SystemClock, UuidGenerator,
};
use crate::sanitize::sanitize;
use crate::validation::validate;

pub const DEFAULT_LIST_LIMIT: usize = 50;
pub const MAX_LIST_LIMIT: usize = 100;

/// Resolve a caller-supplied page size: absent or zero means the default,
/// anything above [`MAX_LIST_LIMIT`] is clamped.
pub fn resolve_limit(requested: Option<usize>) -> usize {
    match requested {
        None | Some(0) => DEFAULT_LIST_LIMIT,
        Some(n) => n.min(MAX_LIST_LIMIT),
    }
}

#[derive(Clone)]
pub struct PostRepository {
    store: Arc<dyn PostStore>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl PostRepository {
    pub fn new(store: Arc<dyn PostStore>) -> Self {
        Self {
            store,
            ids: Arc::new(UuidGenerator),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Validate, sanitize and store a new post.
    ///
    /// Returns the post exactly as written. The store is not touched when
    /// validation fails.
    pub async fn create(&self, candidate: &CandidatePost) -> Result<Post, PostError> {
        let report = validate(candidate);
        if !report.valid {
            tracing::debug!(errors = ?report.errors, "Rejected invalid post");
            return Err(PostError::Validation {
                errors: report.errors,
            });
        }

        let now = self.clock.now();
        let post = Post {
            post_id: self.ids.next_id(),
            title: sanitize(candidate.title_str().unwrap_or_default()),
            content: sanitize(candidate.content_str().unwrap_or_default()),
            status: candidate
                .parsed_status()
                .and_then(Result::ok)
                .unwrap_or_default(),
            created_at: now,
            updated_at: now,
            tags: candidate
                .parsed_tags()
                .and_then(Result::ok)
                .unwrap_or_default(),
        };

        let key = post.post_id.to_string();
        match self.store.put_if_absent(&key, to_record(&post)?).await {
            Ok(()) => {
                tracing::info!(post_id = %post.post_id, status = %post.status, "Post created");
                Ok(post)
            }
            Err(StoreError::Conflict { .. }) => {
                tracing::warn!(post_id = %post.post_id, "Generated post id collided");
                Err(PostError::Conflict {
                    post_id: post.post_id,
                })
            }
            Err(e) => Err(PostError::Store(e)),
        }
    }

    /// Published posts, newest first, at most `limit` of them.
    ///
    /// The status index may lag recent writes. Either the whole page decodes
    /// or the call fails.
    pub async fn list_published(&self, limit: Option<usize>) -> Result<Vec<Post>, PostError> {
        let limit = resolve_limit(limit);
        let query = IndexQuery::new(STATUS_INDEX, PostStatus::Published.as_str())
            .descending()
            .limit(limit);

        let records = self.store.query_by_index(&query).await?;
        tracing::debug!(count = records.len(), limit, "Fetched published posts");

        let mut posts = records
            .into_iter()
            .map(from_record)
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(stray) = posts.iter().find(|p| p.status != PostStatus::Published) {
            return Err(StoreError::Corrupt(format!(
                "index returned {} post {}",
                stray.status, stray.post_id
            ))
            .into());
        }

        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posts.truncate(limit);
        Ok(posts)
    }
}

fn to_record(post: &Post) -> Result<Record, StoreError> {
    match serde_json::to_value(post) {
        Ok(serde_json::Value::Object(map)) => Ok(map),
        Ok(other) => Err(StoreError::Corrupt(format!(
            "post encoded as non-object: {other}"
        ))),
        Err(e) => Err(StoreError::Corrupt(e.to_string())),
    }
}

fn from_record(record: Record) -> Result<Post, StoreError> {
    serde_json::from_value(serde_json::Value::Object(record))
        .map_err(|e| StoreError::Corrupt(e.to_string()))
}
