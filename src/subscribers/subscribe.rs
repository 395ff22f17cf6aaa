//! # Subscriber trait
//!
//! `Subscribe` is the extension point for reacting to service events without
//! polling a broadcast receiver. Each subscriber is driven by its own worker
//! fed by a bounded queue owned by the [`SubscriberSet`](super::SubscriberSet).
//!
//! ## Contract
//! - Implementations may be slow; they never block the engine or other
//!   subscribers.
//! - On queue overflow the event is dropped for that subscriber and a
//!   `SubscriberOverflow` event is published.
//!
//! ## Example
//! ```rust
//! use nervekit::{Event, EventKind, Subscribe};
//!
//! struct TaskAudit;
//!
//! #[async_trait::async_trait]
//! impl Subscribe for TaskAudit {
//!     async fn on_event(&self, ev: &Event) {
//!         if ev.kind == EventKind::TaskError {
//!             // write audit record...
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "task-audit"
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Handler for service events.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handles one event.
    async fn on_event(&self, event: &Event);

    /// Name used in logs and diagnostic events.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Capacity of this subscriber's queue.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
