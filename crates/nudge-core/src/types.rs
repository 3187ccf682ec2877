use serde::{Deserialize, Serialize};
use std::fmt;

// ─── Event Kind ───────────────────────────────────────────────────

/// Semantic kind of a notification.
///
/// The five known kinds map onto the policy table in [`crate::policy`].
/// Any other label is kept verbatim in [`EventKind::Other`] so the render
/// layer can still show it; scheduling treats it with the fallback policy.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventKind {
    Insight,
    Proactive,
    Chat,
    #[default]
    Reaction,
    Observation,
    Other(String),
}

impl EventKind {
    pub const KNOWN: [Self; 5] = [
        Self::Insight,
        Self::Proactive,
        Self::Chat,
        Self::Reaction,
        Self::Observation,
    ];

    /// Parse a wire label. Never fails: unrecognized labels become `Other`.
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "insight" => Self::Insight,
            "proactive" => Self::Proactive,
            "chat" => Self::Chat,
            "reaction" => Self::Reaction,
            "observation" => Self::Observation,
            _ => Self::Other(label.to_owned()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Insight => "insight",
            Self::Proactive => "proactive",
            Self::Chat => "chat",
            Self::Reaction => "reaction",
            Self::Observation => "observation",
            Self::Other(label) => label,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for EventKind {
    fn from(label: String) -> Self {
        Self::parse(&label)
    }
}

impl From<EventKind> for String {
    fn from(kind: EventKind) -> Self {
        kind.as_str().to_owned()
    }
}

// ─── Raw Input ────────────────────────────────────────────────────

/// Unclassified notification as handed over by a producer.
///
/// Every field except the payload is optional; the classifier fills the
/// gaps instead of rejecting the input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawNotification {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "contextHash", skip_serializing_if = "Option::is_none")]
    pub context_hash: Option<String>,
}

impl RawNotification {
    pub fn new(
        kind: impl Into<String>,
        content: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            kind: Some(kind.into()),
            content: content.into(),
            description: description.into(),
            context_hash: None,
        }
    }

    #[must_use]
    pub fn with_context(mut self, hash: impl Into<String>) -> Self {
        self.context_hash = Some(hash.into());
        self
    }
}

// ─── Notification ─────────────────────────────────────────────────

/// Unique notification identifier: `n-{created_at_ms}-{seq}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(String);

impl NotificationId {
    pub fn new(created_at_ms: u64, seq: u64) -> Self {
        Self(format!("n-{created_at_ms}-{seq}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A fully classified notification.
///
/// `priority` and `display_duration_ms` are resolved once by the classifier
/// and never re-derived. Lower priority numbers are more important.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: EventKind,
    pub content: String,
    pub description: String,
    /// Scene the notification is scoped to; `None` means scene-independent.
    pub context_hash: Option<String>,
    pub priority: u8,
    pub display_duration_ms: u64,
    /// Ordering tiebreak within a priority band.
    pub enqueued_at_ms: u64,
}

impl Notification {
    /// Sort key used by the pending set: `(priority asc, enqueued_at asc)`.
    pub fn order_key(&self) -> (u8, u64) {
        (self.priority, self.enqueued_at_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parse_known_labels() {
        for kind in EventKind::KNOWN {
            assert_eq!(EventKind::parse(kind.as_str()), kind);
        }
        assert_eq!(EventKind::parse("Insight"), EventKind::Insight);
        assert_eq!(EventKind::parse(" chat "), EventKind::Chat);
    }

    #[test]
    fn kind_parse_unknown_keeps_label() {
        let kind = EventKind::parse("sparkle");
        assert_eq!(kind, EventKind::Other("sparkle".to_string()));
        assert!(!kind.is_known());
        assert_eq!(kind.to_string(), "sparkle");
    }

    #[test]
    fn kind_serializes_as_plain_string() {
        let json = serde_json::to_string(&EventKind::Proactive).expect("serialize");
        assert_eq!(json, "\"proactive\"");
        let back: EventKind = serde_json::from_str("\"observation\"").expect("deserialize");
        assert_eq!(back, EventKind::Observation);
    }

    #[test]
    fn raw_accepts_camel_case_context_hash() {
        let raw: RawNotification = serde_json::from_str(
            r#"{"type":"reaction","content":"👀","description":"hm","contextHash":"abc"}"#,
        )
        .expect("deserialize");
        assert_eq!(raw.kind.as_deref(), Some("reaction"));
        assert_eq!(raw.context_hash.as_deref(), Some("abc"));
    }

    #[test]
    fn raw_missing_fields_default() {
        let raw: RawNotification = serde_json::from_str("{}").expect("deserialize");
        assert_eq!(raw, RawNotification::default());
    }

    #[test]
    fn notification_id_format() {
        let id = NotificationId::new(1500, 7);
        assert_eq!(id.as_str(), "n-1500-7");
        assert_ne!(NotificationId::new(1500, 7), NotificationId::new(1500, 8));
    }
}
