//! Event classifier: turns a [`RawNotification`] into a fully resolved
//! [`Notification`].
//!
//! Pure and infallible. Missing `type` defaults to reaction, an unknown
//! `type` gets the fallback policy, and a missing `context_hash` is filled
//! from the current scene.

use crate::policy::DisplayPolicy;
use crate::types::{EventKind, Notification, NotificationId, RawNotification};

/// Classify a raw notification.
///
/// * `current_context` - the context tracker's value at enqueue time.
/// * `seq` - per-engine sequence number, used only for id uniqueness.
/// * `now_ms` - enqueue time; becomes the ordering tiebreak.
pub fn classify(
    raw: RawNotification,
    current_context: Option<&str>,
    seq: u64,
    now_ms: u64,
) -> Notification {
    let kind = match raw.kind.as_deref().map(str::trim) {
        None | Some("") => EventKind::default(),
        Some(label) => EventKind::parse(label),
    };
    let policy = DisplayPolicy::for_kind(&kind);

    let context_hash = raw
        .context_hash
        .filter(|h| !h.is_empty())
        .or_else(|| current_context.map(str::to_owned));

    Notification {
        id: NotificationId::new(now_ms, seq),
        kind,
        content: raw.content,
        description: raw.description,
        context_hash,
        priority: policy.priority,
        display_duration_ms: policy.display_duration_ms,
        enqueued_at_ms: now_ms,
    }
}
