//! Display policy table and engine configuration.
//!
//! The kind → (priority, duration) mapping is a closed table keyed by
//! [`EventKind`]. Unrecognized kinds resolve to [`FALLBACK_POLICY`], which is
//! the reaction entry (lowest priority tier).

use serde::{Deserialize, Serialize};

use crate::types::EventKind;

/// Maximum number of not-yet-displayed notifications.
pub const DEFAULT_PENDING_CAPACITY: usize = 5;

/// Floor before a displayed notification counts as having had a fair showing.
pub const DEFAULT_MIN_DWELL_MS: u64 = 3_000;

/// Highest priority number that is exempt from scene-staleness pruning.
pub const STALENESS_EXEMPT_MAX_PRIORITY: u8 = 2;

// ─── Display Policy ──────────────────────────────────────────────

/// Resolved scheduling attributes for a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayPolicy {
    /// Lower = more important.
    pub priority: u8,
    pub display_duration_ms: u64,
}

const INSIGHT_POLICY: DisplayPolicy = DisplayPolicy {
    priority: 1,
    display_duration_ms: 8_000,
};

const CHAT_POLICY: DisplayPolicy = DisplayPolicy {
    priority: 2,
    display_duration_ms: 6_000,
};

const REACTION_POLICY: DisplayPolicy = DisplayPolicy {
    priority: 3,
    display_duration_ms: 5_000,
};

/// Policy applied to kinds outside the table.
pub const FALLBACK_POLICY: DisplayPolicy = REACTION_POLICY;

impl DisplayPolicy {
    /// Look up the policy for a kind.
    pub fn for_kind(kind: &EventKind) -> Self {
        match kind {
            EventKind::Insight | EventKind::Proactive => INSIGHT_POLICY,
            EventKind::Chat => CHAT_POLICY,
            EventKind::Reaction | EventKind::Observation => REACTION_POLICY,
            EventKind::Other(_) => FALLBACK_POLICY,
        }
    }

    /// Whether notifications with this priority survive a scene change.
    pub fn is_staleness_exempt(priority: u8) -> bool {
        priority <= STALENESS_EXEMPT_MAX_PRIORITY
    }
}

// ─── Engine Config ───────────────────────────────────────────────

/// Tunables for the notification engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Pending set capacity (default 5). Values below 1 are clamped to 1.
    pub pending_capacity: usize,
    /// Minimum dwell in milliseconds (default 3000).
    pub min_dwell_ms: u64,
}

impl EngineConfig {
    pub fn new(pending_capacity: usize, min_dwell_ms: u64) -> Self {
        Self {
            pending_capacity: pending_capacity.max(1),
            min_dwell_ms,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pending_capacity: DEFAULT_PENDING_CAPACITY,
            min_dwell_ms: DEFAULT_MIN_DWELL_MS,
        }
    }
}
