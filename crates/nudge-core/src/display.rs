//! Display controller: the single-slot state machine.
//!
//! ```text
//!            pending non-empty && advance allowed
//!   Idle ───────────────────────────────────────────▶ Occupied
//!    ▲                                                   │
//!    │        full-display deadline / forced dismiss     │
//!    └───────────────────────────────────────────────────┘
//! ```
//!
//! Timers are modelled as deadlines inside the state rather than as live
//! timer handles, so the machine is driven entirely by `now_ms` arguments.
//! The minimum-dwell deadline only flips `advance_allowed`; it never clears
//! the slot. A displayed notification is never preempted.

use crate::pending::PendingSet;
use crate::types::{Notification, NotificationId};

// ─── State ───────────────────────────────────────────────────────

/// The notification occupying the slot and its two deadlines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occupant {
    pub notification: Notification,
    pub shown_at_ms: u64,
    /// Armed until the minimum-dwell timer fires, then `None`.
    pub min_dwell_deadline_ms: Option<u64>,
    pub hide_at_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayState {
    Idle,
    Occupied(Occupant),
}

/// Transition record emitted by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayEvent {
    /// A notification entered the slot.
    Shown(Notification),
    /// The minimum dwell for the current notification elapsed.
    MinDwellElapsed(NotificationId),
    /// The full display duration elapsed and the slot was cleared.
    Expired(Notification),
}

/// Result of a forced dismissal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DismissOutcome {
    pub notification: Notification,
    /// `true` if dismissed before the minimum dwell elapsed.
    pub early: bool,
    pub shown_for_ms: u64,
}

// ─── Controller ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayController {
    state: DisplayState,
    advance_allowed: bool,
    min_dwell_ms: u64,
}

impl DisplayController {
    pub fn new(min_dwell_ms: u64) -> Self {
        Self {
            state: DisplayState::Idle,
            advance_allowed: true,
            min_dwell_ms,
        }
    }

    /// Take the front of `pending` into the slot if the slot is free.
    ///
    /// Returns the notification now shown, if a transition happened.
    pub fn advance(&mut self, pending: &mut PendingSet, now_ms: u64) -> Option<&Notification> {
        if !self.can_advance() {
            return None;
        }
        let notification = pending.pop_front()?;
        let hide_at_ms = now_ms.saturating_add(notification.display_duration_ms);
        self.state = DisplayState::Occupied(Occupant {
            notification,
            shown_at_ms: now_ms,
            min_dwell_deadline_ms: Some(now_ms.saturating_add(self.min_dwell_ms)),
            hide_at_ms,
        });
        self.advance_allowed = false;
        self.current()
    }

    /// Fire every deadline that is due at `now_ms`.
    pub fn fire_due(&mut self, now_ms: u64) -> Vec<DisplayEvent> {
        let mut events = Vec::new();
        let DisplayState::Occupied(occupant) = &mut self.state else {
            return events;
        };

        if occupant.min_dwell_deadline_ms.is_some_and(|d| d <= now_ms) {
            occupant.min_dwell_deadline_ms = None;
            self.advance_allowed = true;
            events.push(DisplayEvent::MinDwellElapsed(occupant.notification.id.clone()));
        }

        if occupant.hide_at_ms <= now_ms {
            if let Some(occupant) = self.clear() {
                events.push(DisplayEvent::Expired(occupant.notification));
            }
        }

        events
    }

    /// Forced dismissal. Always honored while occupied, even before the
    /// minimum dwell; a no-op when idle.
    pub fn dismiss(&mut self, now_ms: u64) -> Option<DismissOutcome> {
        let occupant = self.clear()?;
        Some(DismissOutcome {
            early: occupant.min_dwell_deadline_ms.is_some(),
            shown_for_ms: now_ms.saturating_sub(occupant.shown_at_ms),
            notification: occupant.notification,
        })
    }

    fn clear(&mut self) -> Option<Occupant> {
        let previous = std::mem::replace(&mut self.state, DisplayState::Idle);
        self.advance_allowed = true;
        match previous {
            DisplayState::Occupied(occupant) => Some(occupant),
            DisplayState::Idle => None,
        }
    }

    /// Earliest armed deadline, if any.
    pub fn next_deadline_ms(&self) -> Option<u64> {
        match &self.state {
            DisplayState::Idle => None,
            DisplayState::Occupied(o) => Some(
                o.min_dwell_deadline_ms
                    .map_or(o.hide_at_ms, |d| d.min(o.hide_at_ms)),
            ),
        }
    }

    pub fn can_advance(&self) -> bool {
        matches!(self.state, DisplayState::Idle) && self.advance_allowed
    }

    pub fn advance_allowed(&self) -> bool {
        self.advance_allowed
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    pub fn occupant(&self) -> Option<&Occupant> {
        match &self.state {
            DisplayState::Occupied(o) => Some(o),
            DisplayState::Idle => None,
        }
    }

    pub fn current(&self) -> Option<&Notification> {
        self.occupant().map(|o| &o.notification)
    }

    pub fn is_displaying(&self) -> bool {
        self.occupant().is_some()
    }
}

impl Default for DisplayController {
    fn default() -> Self {
        Self::new(crate::policy::DEFAULT_MIN_DWELL_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::classify;
    use crate::types::RawNotification;

    fn pending_with(kinds: &[&str]) -> PendingSet {
        let mut set = PendingSet::default();
        for (i, kind) in kinds.iter().enumerate() {
            set.insert(classify(
                RawNotification::new(*kind, "", format!("{kind}-{i}")),
                None,
                i as u64,
                i as u64,
            ));
        }
        set
    }

    #[test]
    fn idle_by_default() {
        let ctl = DisplayController::default();
        assert!(!ctl.is_displaying());
        assert!(ctl.can_advance());
        assert!(ctl.current().is_none());
        assert_eq!(ctl.next_deadline_ms(), None);
    }

    #[test]
    fn advance_on_empty_pending_stays_idle() {
        let mut ctl = DisplayController::default();
        let mut pending = PendingSet::default();
        assert!(ctl.advance(&mut pending, 0).is_none());
        assert!(!ctl.is_displaying());
    }

    #[test]
    fn advance_occupies_slot_and_arms_deadlines() {
        let mut ctl = DisplayController::default();
        let mut pending = pending_with(&["reaction"]);
        let shown = ctl.advance(&mut pending, 1_000).expect("shown");
        assert_eq!(shown.description, "reaction-0");
        assert!(pending.is_empty());
        assert!(!ctl.advance_allowed());

        let occupant = ctl.occupant().expect("occupied");
        assert_eq!(occupant.min_dwell_deadline_ms, Some(4_000));
        assert_eq!(occupant.hide_at_ms, 6_000);
        assert_eq!(ctl.next_deadline_ms(), Some(4_000));
    }

    #[test]
    fn occupied_slot_does_not_advance() {
        let mut ctl = DisplayController::default();
        let mut pending = pending_with(&["reaction", "insight"]);
        ctl.advance(&mut pending, 0);
        assert!(ctl.advance(&mut pending, 10).is_none());
        assert_eq!(pending.len(), 1);
    }

    #[test]
    fn min_dwell_unblocks_but_keeps_slot() {
        let mut ctl = DisplayController::default();
        let mut pending = pending_with(&["reaction", "reaction"]);
        ctl.advance(&mut pending, 0);

        assert!(ctl.fire_due(2_999).is_empty());
        let events = ctl.fire_due(3_000);
        assert!(matches!(events.as_slice(), [DisplayEvent::MinDwellElapsed(_)]));
        assert!(ctl.advance_allowed());
        assert!(ctl.is_displaying());
        assert!(!ctl.can_advance());
        assert!(ctl.advance(&mut pending, 3_001).is_none());
        assert_eq!(ctl.next_deadline_ms(), Some(5_000));
    }

    #[test]
    fn full_display_deadline_clears_slot() {
        let mut ctl = DisplayController::default();
        let mut pending = pending_with(&["reaction"]);
        ctl.advance(&mut pending, 0);
        ctl.fire_due(3_000);
        let events = ctl.fire_due(5_000);
        assert!(matches!(events.as_slice(), [DisplayEvent::Expired(n)] if n.description == "reaction-0"));
        assert!(!ctl.is_displaying());
        assert!(ctl.can_advance());
    }

    #[test]
    fn late_tick_fires_both_deadlines_in_order() {
        let mut ctl = DisplayController::default();
        let mut pending = pending_with(&["chat"]);
        ctl.advance(&mut pending, 0);
        let events = ctl.fire_due(60_000);
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], DisplayEvent::MinDwellElapsed(_)));
        assert!(matches!(events[1], DisplayEvent::Expired(_)));
    }

    #[test]
    fn dismiss_before_min_dwell_is_honored() {
        let mut ctl = DisplayController::default();
        let mut pending = pending_with(&["insight"]);
        ctl.advance(&mut pending, 0);
        let outcome = ctl.dismiss(1_200).expect("dismissed");
        assert!(outcome.early);
        assert_eq!(outcome.shown_for_ms, 1_200);
        assert!(!ctl.is_displaying());
        assert!(ctl.can_advance());
        assert_eq!(ctl.next_deadline_ms(), None);
    }

    #[test]
    fn dismiss_after_min_dwell_is_not_early() {
        let mut ctl = DisplayController::default();
        let mut pending = pending_with(&["insight"]);
        ctl.advance(&mut pending, 0);
        ctl.fire_due(3_500);
        let outcome = ctl.dismiss(4_000).expect("dismissed");
        assert!(!outcome.early);
    }

    #[test]
    fn dismiss_when_idle_is_noop() {
        let mut ctl = DisplayController::default();
        assert!(ctl.dismiss(0).is_none());
        assert!(ctl.can_advance());
    }

    #[test]
    fn fire_due_when_idle_is_noop() {
        let mut ctl = DisplayController::default();
        assert!(ctl.fire_due(1_000_000).is_empty());
    }

    #[test]
    fn min_dwell_longer_than_duration() {
        let mut ctl = DisplayController::new(10_000);
        let mut pending = pending_with(&["reaction"]);
        ctl.advance(&mut pending, 0);
        assert_eq!(ctl.next_deadline_ms(), Some(5_000));
        let events = ctl.fire_due(5_000);
        assert!(matches!(events.as_slice(), [DisplayEvent::Expired(_)]));
        assert!(ctl.can_advance());
    }
}
