//! Error body returned by every failing endpoint.

use serde::{Deserialize, Serialize};

/// `{ "error": .., "details": [..], "detail": .. }`
///
/// `details` carries validation messages; `detail` carries the cause of a
/// server error and is only filled in development mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// A short, human-readable summary of the problem.
    pub error: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
            detail: None,
        }
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    // Common error constructors
    pub fn validation(details: Vec<String>) -> Self {
        Self::new("Validation failed").with_details(details)
    }

    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::new(error)
    }

    pub fn conflict() -> Self {
        Self::new("Post already exists")
    }

    pub fn internal_error() -> Self {
        Self::new("Internal server error")
    }
}
