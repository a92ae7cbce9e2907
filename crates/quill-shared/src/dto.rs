//! Data Transfer Objects - request types for the API.

use serde::{Deserialize, Serialize};

/// Query string accepted by `GET /api/posts`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListPostsQuery {
    /// Page size; defaults to 50, capped at 100.
    #[serde(default)]
    pub limit: Option<usize>,
}
