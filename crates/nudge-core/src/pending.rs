//! Ordered pending set: capacity-bounded notifications waiting for the
//! display slot, kept sorted by `(priority asc, enqueued_at asc)`.
//!
//! Items are never reordered in place; removal and reinsertion are the only
//! mutation paths.

use crate::types::Notification;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSet {
    items: Vec<Notification>,
    capacity: usize,
}

impl PendingSet {
    /// Create an empty set. A capacity of 0 is treated as 1.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: Vec::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Insert in sorted position, then evict while over capacity.
    ///
    /// Equal keys keep insertion order, so the earlier `insert` wins.
    /// Eviction always targets the lowest-priority band and, within it, the
    /// oldest arrival. Returns the evicted notifications (usually empty).
    pub fn insert(&mut self, notification: Notification) -> Vec<Notification> {
        let key = notification.order_key();
        let pos = self.items.partition_point(|n| n.order_key() <= key);
        self.items.insert(pos, notification);

        let mut evicted = Vec::new();
        while self.items.len() > self.capacity {
            let Some(victim) = self.eviction_index() else {
                break;
            };
            evicted.push(self.items.remove(victim));
        }
        evicted
    }

    /// Index of the first (oldest) item in the highest-numbered priority band.
    fn eviction_index(&self) -> Option<usize> {
        let worst = self.items.last()?.priority;
        self.items.iter().position(|n| n.priority == worst)
    }

    /// Remove and return the most important, oldest notification.
    pub fn pop_front(&mut self) -> Option<Notification> {
        if self.items.is_empty() {
            None
        } else {
            Some(self.items.remove(0))
        }
    }

    /// Keep only notifications matching `keep`; survivors retain their order.
    /// Returns the removed notifications.
    pub fn retain<F>(&mut self, mut keep: F) -> Vec<Notification>
    where
        F: FnMut(&Notification) -> bool,
    {
        let (kept, removed): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.items).into_iter().partition(|n| keep(n));
        self.items = kept;
        removed
    }

    pub fn peek(&self) -> Option<&Notification> {
        self.items.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for PendingSet {
    fn default() -> Self {
        Self::with_capacity(crate::policy::DEFAULT_PENDING_CAPACITY)
    }
}
