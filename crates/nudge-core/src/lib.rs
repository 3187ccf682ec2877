//! nudge-core: single-slot notification scheduling engine.
//!
//! Classifies incoming notifications, keeps a small priority-ordered pending
//! set, drops scene-stale items, and decides which notification occupies the
//! one display slot and for how long. No IO, no async, no system clock: every
//! operation takes `now_ms` from the caller.

pub mod classifier;
pub mod clock;
pub mod context;
pub mod display;
pub mod engine;
pub mod error;
pub mod feed;
pub mod pending;
pub mod policy;
pub mod protocol;
pub mod types;

pub use clock::{Clock, ManualClock};
pub use context::{ContextTracker, scene_hash};
pub use display::{DismissOutcome, DisplayController, DisplayEvent, DisplayState};
pub use engine::{DismissReport, EngineSnapshot, EnqueueOutcome, NotificationEngine, PruneOutcome};
pub use error::{FeedError, ProtocolError};
pub use pending::PendingSet;
pub use policy::{DisplayPolicy, EngineConfig};
pub use types::{EventKind, Notification, NotificationId, RawNotification};
