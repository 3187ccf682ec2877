//! Parser for update lines from the backend poll endpoint.
//!
//! The endpoint answers one JSON object per poll: either a notification
//! (`{type, content, description}`) or the sentinel `{"type":"none"}`.

use crate::error::FeedError;
use crate::types::RawNotification;

/// Kind label the backend uses for "nothing queued".
pub const EMPTY_UPDATE_KIND: &str = "none";

/// Parse one update line.
///
/// Returns `Ok(None)` for blank lines and the empty sentinel. Duplicate
/// payloads are not filtered; each line is an independent notification.
pub fn parse_update_line(line: &str) -> Result<Option<RawNotification>, FeedError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let value: serde_json::Value = serde_json::from_str(line)?;
    if !value.is_object() {
        return Err(FeedError::NotAnObject);
    }
    if value["type"].as_str() == Some(EMPTY_UPDATE_KIND) {
        return Ok(None);
    }

    let raw: RawNotification = serde_json::from_value(value)?;
    Ok(Some(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_line_is_nothing() {
        assert!(parse_update_line("   ").expect("ok").is_none());
    }

    #[test]
    fn none_sentinel_is_nothing() {
        assert!(parse_update_line(r#"{"type":"none"}"#).expect("ok").is_none());
    }

    #[test]
    fn reaction_update_parses() {
        let raw = parse_update_line(r#"{"type":"reaction","content":"😮","description":"big diff"}"#)
            .expect("ok")
            .expect("some");
        assert_eq!(raw.kind.as_deref(), Some("reaction"));
        assert_eq!(raw.content, "😮");
        assert_eq!(raw.description, "big diff");
        assert!(raw.context_hash.is_none());
    }

    #[test]
    fn snake_case_context_hash_accepted() {
        let raw = parse_update_line(r#"{"type":"reaction","context_hash":"abc"}"#)
            .expect("ok")
            .expect("some");
        assert_eq!(raw.context_hash.as_deref(), Some("abc"));
    }

    #[test]
    fn partial_object_defaults() {
        let raw = parse_update_line(r#"{"description":"only text"}"#)
            .expect("ok")
            .expect("some");
        assert!(raw.kind.is_none());
        assert_eq!(raw.content, "");
    }

    #[test]
    fn malformed_json_is_error() {
        assert!(matches!(parse_update_line("{nope"), Err(FeedError::Json(_))));
    }

    #[test]
    fn non_object_is_error() {
        assert!(matches!(parse_update_line("[1,2]"), Err(FeedError::NotAnObject)));
        assert!(matches!(parse_update_line("\"x\""), Err(FeedError::NotAnObject)));
    }

    #[test]
    fn wrongly_typed_field_is_error() {
        assert!(matches!(
            parse_update_line(r#"{"type":"chat","content":5}"#),
            Err(FeedError::Json(_))
        ));
    }
}
