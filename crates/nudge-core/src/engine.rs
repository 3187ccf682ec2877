//! Notification engine: the public facade over classifier, pending set,
//! context tracker, staleness pruner and display controller.
//!
//! Pure, deterministic state machine. Every operation takes `now_ms` from the
//! caller and is synchronous with respect to in-memory state; the caller is
//! responsible for invoking [`NotificationEngine::tick`] at or after
//! [`NotificationEngine::next_deadline_ms`].
//!
//! The slot is re-evaluated after every mutation of the pending set and after
//! every slot release, which is the only scheduling tick the engine needs.

use serde::{Deserialize, Serialize};

use crate::classifier::classify;
use crate::context::ContextTracker;
use crate::display::{DismissOutcome, DisplayController, DisplayEvent};
use crate::pending::PendingSet;
use crate::policy::{DisplayPolicy, EngineConfig};
use crate::types::{Notification, NotificationId, RawNotification};

// ─── Outcomes ────────────────────────────────────────────────────

/// Result of [`NotificationEngine::enqueue`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnqueueOutcome {
    pub id: NotificationId,
    /// Notifications dropped by the capacity bound. May include the new one.
    pub evicted: Vec<Notification>,
    pub events: Vec<DisplayEvent>,
}

/// Result of [`NotificationEngine::dismiss`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DismissReport {
    /// `None` if the slot was already empty.
    pub dismissed: Option<DismissOutcome>,
    pub events: Vec<DisplayEvent>,
}

/// Result of a staleness prune.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PruneOutcome {
    /// Scene the pending set was pruned against.
    pub target: String,
    /// Whether the context tracker's value changed as part of the prune.
    pub context_changed: bool,
    pub pruned: Vec<Notification>,
    pub events: Vec<DisplayEvent>,
}

/// Read-only view of the engine for the render layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub current: Option<Notification>,
    pub is_displaying: bool,
    pub queue_length: usize,
    pub current_context: Option<String>,
    pub pending: Vec<Notification>,
    pub shown_at_ms: Option<u64>,
    pub hide_at_ms: Option<u64>,
    pub min_dwell_elapsed: bool,
}

// ─── Engine ──────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct NotificationEngine {
    pending: PendingSet,
    context: ContextTracker,
    display: DisplayController,
    next_seq: u64,
}

impl NotificationEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            pending: PendingSet::with_capacity(config.pending_capacity),
            context: ContextTracker::new(),
            display: DisplayController::new(config.min_dwell_ms),
            next_seq: 1,
        }
    }

    /// Classify and queue a notification, then re-evaluate the slot.
    ///
    /// Never rejects: overflow is handled by evicting the least important,
    /// oldest pending notification.
    pub fn enqueue(&mut self, raw: RawNotification, now_ms: u64) -> EnqueueOutcome {
        let seq = self.next_seq;
        self.next_seq += 1;

        let notification = classify(raw, self.context.current(), seq, now_ms);
        let id = notification.id.clone();
        let evicted = self.pending.insert(notification);
        let events = self.reevaluate(now_ms);

        EnqueueOutcome {
            id,
            evicted,
            events,
        }
    }

    /// Forced dismissal of the displayed notification.
    ///
    /// Honored immediately even inside the minimum dwell. A no-op when idle.
    pub fn dismiss(&mut self, now_ms: u64) -> DismissReport {
        let dismissed = self.display.dismiss(now_ms);
        let events = self.reevaluate(now_ms);
        DismissReport { dismissed, events }
    }

    /// Prune pending notifications against an explicit scene, leaving the
    /// context tracker untouched.
    pub fn clear_stale(&mut self, context_hash: &str, now_ms: u64) -> PruneOutcome {
        self.prune(context_hash, false, now_ms)
    }

    /// Update the context tracker, then prune against the new scene.
    pub fn change_context(&mut self, context_hash: &str, now_ms: u64) -> PruneOutcome {
        let changed = self.context.set(context_hash);
        self.prune(context_hash, changed, now_ms)
    }

    /// Update the context tracker without pruning. Returns `true` on change.
    pub fn set_context(&mut self, context_hash: &str) -> bool {
        self.context.set(context_hash)
    }

    /// Fire due timers and fill the slot if it became free.
    pub fn tick(&mut self, now_ms: u64) -> Vec<DisplayEvent> {
        self.reevaluate(now_ms)
    }

    fn prune(&mut self, target: &str, context_changed: bool, now_ms: u64) -> PruneOutcome {
        let pruned = self.pending.retain(|n| is_fresh(n, target));
        let events = self.reevaluate(now_ms);
        PruneOutcome {
            target: target.to_owned(),
            context_changed,
            pruned,
            events,
        }
    }

    fn reevaluate(&mut self, now_ms: u64) -> Vec<DisplayEvent> {
        let mut events = self.display.fire_due(now_ms);
        while let Some(shown) = self.display.advance(&mut self.pending, now_ms) {
            events.push(DisplayEvent::Shown(shown.clone()));
            let due = self.display.fire_due(now_ms);
            if due.is_empty() {
                break;
            }
            events.extend(due);
        }
        events
    }

    // ─── Read accessors ──────────────────────────────────────────

    pub fn current(&self) -> Option<&Notification> {
        self.display.current()
    }

    pub fn is_displaying(&self) -> bool {
        self.display.is_displaying()
    }

    pub fn queue_length(&self) -> usize {
        self.pending.len()
    }

    pub fn current_context(&self) -> Option<&str> {
        self.context.current()
    }

    /// Pending notifications in display order.
    pub fn pending(&self) -> impl Iterator<Item = &Notification> {
        self.pending.iter()
    }

    pub fn next_deadline_ms(&self) -> Option<u64> {
        self.display.next_deadline_ms()
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        let occupant = self.display.occupant();
        EngineSnapshot {
            current: self.current().cloned(),
            is_displaying: self.is_displaying(),
            queue_length: self.queue_length(),
            current_context: self.current_context().map(str::to_owned),
            pending: self.pending().cloned().collect(),
            shown_at_ms: occupant.map(|o| o.shown_at_ms),
            hide_at_ms: occupant.map(|o| o.hide_at_ms),
            min_dwell_elapsed: occupant.is_some_and(|o| o.min_dwell_deadline_ms.is_none()),
        }
    }
}

impl Default for NotificationEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

/// A pending notification survives a scene change if it is exempt by
/// priority, scene-independent, or scoped to the target scene.
fn is_fresh(notification: &Notification, target: &str) -> bool {
    DisplayPolicy::is_staleness_exempt(notification.priority)
        || notification
            .context_hash
            .as_deref()
            .is_none_or(|hash| hash == target)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_kind() -> impl Strategy<Value = &'static str> {
        prop_oneof![
            Just("insight"),
            Just("proactive"),
            Just("chat"),
            Just("reaction"),
            Just("observation"),
            Just("mystery"),
        ]
    }

    fn arb_scene() -> impl Strategy<Value = Option<&'static str>> {
        prop_oneof![Just(None), Just(Some("a")), Just(Some("b")), Just(Some("c"))]
    }

    /// Engine whose slot is held by a long insight so enqueues stay pending.
    fn blocked_engine() -> NotificationEngine {
        let mut engine = NotificationEngine::default();
        engine.enqueue(RawNotification::new("insight", "", "blocker"), 0);
        engine
    }

    proptest! {
        /// Pending stays ordered by (priority, arrival) and bounded, and an
        /// eviction only ever removes the oldest item of the worst band.
        #[test]
        fn pending_sorted_bounded_and_evicts_worst_oldest(
            steps in proptest::collection::vec((arb_kind(), 0u64..3), 0..40),
        ) {
            let mut engine = blocked_engine();
            let mut now = 0u64;

            for (i, (kind, delta)) in steps.into_iter().enumerate() {
                now += delta;
                let outcome = engine.enqueue(RawNotification::new(kind, "", format!("e{i}")), now);

                let keys: Vec<_> = engine.pending().map(Notification::order_key).collect();
                prop_assert!(keys.windows(2).all(|w| w[0] <= w[1]), "unsorted: {:?}", keys);
                prop_assert!(engine.queue_length() <= 5);

                for evicted in &outcome.evicted {
                    for survivor in engine.pending() {
                        prop_assert!(evicted.priority >= survivor.priority);
                        if evicted.priority == survivor.priority {
                            prop_assert!(evicted.enqueued_at_ms <= survivor.enqueued_at_ms);
                        }
                    }
                }
            }
        }

        /// Whatever the scenes involved, a prune keeps every priority 1-2
        /// notification and only removes items scoped to another scene.
        #[test]
        fn clear_stale_keeps_exempt_priorities(
            items in proptest::collection::vec((arb_kind(), arb_scene()), 0..12),
            target in prop_oneof![Just("a"), Just("b"), Just("z")],
        ) {
            let mut engine = blocked_engine();
            for (i, (kind, scene)) in items.into_iter().enumerate() {
                let mut raw = RawNotification::new(kind, "", format!("e{i}"));
                raw.context_hash = scene.map(str::to_owned);
                engine.enqueue(raw, i as u64);
            }

            let exempt: Vec<NotificationId> = engine
                .pending()
                .filter(|n| DisplayPolicy::is_staleness_exempt(n.priority))
                .map(|n| n.id.clone())
                .collect();

            let outcome = engine.clear_stale(target, 20);

            for id in &exempt {
                prop_assert!(engine.pending().any(|n| &n.id == id), "exempt {} pruned", id);
            }
            for pruned in &outcome.pruned {
                prop_assert!(pruned.priority > 2);
                prop_assert!(pruned.context_hash.as_deref().is_some_and(|h| h != target));
            }
            prop_assert!(engine.pending().all(|n| is_fresh(n, target)));
        }
    }
}
