//! Domain entities - the core business objects.

mod post;

pub use post::{CandidatePost, Post, PostStatus, format_timestamp, parse_timestamp};
