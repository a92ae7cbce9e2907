use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Publication state of a post. Only `Published` posts are visible to readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(PostStatus::Draft),
            "published" => Ok(PostStatus::Published),
            _ => Err(()),
        }
    }
}

/// Post entity - a stored, immutable piece of content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub post_id: Uuid,
    pub title: String,
    pub content: String,
    pub status: PostStatus,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
    pub tags: Vec<String>,
}

/// Unvalidated post as submitted by a client.
///
/// Fields are kept as raw JSON so the validator can tell a missing field
/// apart from one of the wrong type. `null` counts as missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidatePost {
    #[serde(default)]
    pub title: Option<serde_json::Value>,
    #[serde(default)]
    pub content: Option<serde_json::Value>,
    #[serde(default)]
    pub status: Option<serde_json::Value>,
    #[serde(default)]
    pub tags: Option<serde_json::Value>,
}

impl CandidatePost {
    /// Convenience constructor for callers that already hold strings.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: Some(serde_json::Value::String(title.into())),
            content: Some(serde_json::Value::String(content.into())),
            status: None,
            tags: None,
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(serde_json::Value::String(status.into()));
        self
    }

    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = Some(serde_json::Value::Array(
            tags.into_iter()
                .map(|t| serde_json::Value::String(t.into()))
                .collect(),
        ));
        self
    }

    pub fn title_str(&self) -> Option<&str> {
        self.title.as_ref().and_then(serde_json::Value::as_str)
    }

    pub fn content_str(&self) -> Option<&str> {
        self.content.as_ref().and_then(serde_json::Value::as_str)
    }

    /// Requested status; `None` when absent or `null`, `Some(Err(()))` when unrecognised.
    pub fn parsed_status(&self) -> Option<Result<PostStatus, ()>> {
        match &self.status {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(s)) => Some(s.parse()),
            Some(_) => Some(Err(())),
        }
    }

    /// Requested tags; `Some(Err(()))` unless they form an array of strings.
    pub fn parsed_tags(&self) -> Option<Result<Vec<String>, ()>> {
        match &self.tags {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::Array(items)) => Some(
                items
                    .iter()
                    .map(|v| v.as_str().map(str::to_owned).ok_or(()))
                    .collect(),
            ),
            Some(_) => Some(Err(())),
        }
    }
}

/// Canonical ISO-8601 rendering used on the wire and as the store sort key.
///
/// Millisecond precision with a `Z` suffix keeps every value the same width,
/// so string order matches time order.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc))
}

pub(crate) mod timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_timestamp(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_timestamp(&raw).map_err(serde::de::Error::custom)
    }
}
