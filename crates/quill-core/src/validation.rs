//! Shape and bounds checks for candidate posts.
//!
//! Every rule is evaluated so a client sees all of its mistakes at once.
//! Messages are stable and reported in rule order.

use crate::domain::CandidatePost;

pub const TITLE_MAX_CHARS: usize = 200;
pub const CONTENT_MAX_CHARS: usize = 10_000;

pub const TITLE_REQUIRED: &str = "title required";
pub const TITLE_TOO_LONG: &str = "title too long";
pub const CONTENT_REQUIRED: &str = "content required";
pub const CONTENT_TOO_LONG: &str = "content too long";
pub const INVALID_STATUS: &str = "invalid status";
pub const INVALID_TAGS: &str = "invalid tags";

/// Outcome of [`validate`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

pub fn validate(candidate: &CandidatePost) -> ValidationReport {
    let mut errors = Vec::new();

    check_text(
        candidate.title_str(),
        TITLE_MAX_CHARS,
        TITLE_REQUIRED,
        TITLE_TOO_LONG,
        &mut errors,
    );
    check_text(
        candidate.content_str(),
        CONTENT_MAX_CHARS,
        CONTENT_REQUIRED,
        CONTENT_TOO_LONG,
        &mut errors,
    );

    if let Some(Err(())) = candidate.parsed_status() {
        errors.push(INVALID_STATUS.to_string());
    }
    if let Some(Err(())) = candidate.parsed_tags() {
        errors.push(INVALID_TAGS.to_string());
    }

    ValidationReport::from_errors(errors)
}

fn check_text(
    value: Option<&str>,
    max_chars: usize,
    required: &str,
    too_long: &str,
    errors: &mut Vec<String>,
) {
    let trimmed = value.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        errors.push(required.to_string());
    } else if trimmed.chars().count() > max_chars {
        errors.push(too_long.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn candidate(value: serde_json::Value) -> CandidatePost {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_valid_post() {
        let report = validate(&CandidatePost::new("Hello", "World"));
        assert!(report.valid);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_missing_fields_report_every_error_in_order() {
        let report = validate(&candidate(json!({ "status": "archived", "tags": "x" })));
        assert!(!report.valid);
        assert_eq!(
            report.errors,
            vec![TITLE_REQUIRED, CONTENT_REQUIRED, INVALID_STATUS, INVALID_TAGS]
        );
    }

    #[test]
    fn test_whitespace_and_non_text_are_required_errors() {
        let report = validate(&candidate(json!({ "title": "   ", "content": 42 })));
        assert_eq!(report.errors, vec![TITLE_REQUIRED, CONTENT_REQUIRED]);
    }

    #[test]
    fn test_length_bounds_are_inclusive() {
        let at_limit = CandidatePost::new("a".repeat(200), "b".repeat(10_000));
        assert!(validate(&at_limit).valid);

        let over = CandidatePost::new("a".repeat(201), "b".repeat(10_001));
        assert_eq!(validate(&over).errors, vec![TITLE_TOO_LONG, CONTENT_TOO_LONG]);
    }

    #[test]
    fn test_length_measured_after_trim() {
        let padded = CandidatePost::new(format!("  {}  ", "a".repeat(200)), "ok");
        assert!(validate(&padded).valid);
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let title = "é".repeat(200);
        assert!(validate(&CandidatePost::new(title, "ok")).valid);
    }

    #[test]
    fn test_status_values() {
        assert!(validate(&CandidatePost::new("t", "c").with_status("draft")).valid);
        assert!(validate(&CandidatePost::new("t", "c").with_status("published")).valid);
        assert_eq!(
            validate(&CandidatePost::new("t", "c").with_status("PUBLISHED")).errors,
            vec![INVALID_STATUS]
        );
        let numeric = candidate(json!({ "title": "t", "content": "c", "status": 1 }));
        assert_eq!(validate(&numeric).errors, vec![INVALID_STATUS]);
    }
}
