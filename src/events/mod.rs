//! Service events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to events emitted by the engine, its components and the
//! task handles it issues.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Service` (ready/error/end, task events), component
//!   [`Emitter`](crate::Emitter)s (namespaced component events),
//!   `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: user receivers from [`Service::subscribe`](crate::Service::subscribe)
//!   and the `SubscriberSet` listener.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};

pub(crate) use event::{END, READY};
