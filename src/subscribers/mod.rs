//! # Event subscribers.
//!
//! Subscribers observe the events a [`Service`](crate::Service) publishes on
//! its [`Bus`](crate::Bus) without owning a broadcast receiver.
//!
//! ```text
//!   Service / Emitter / Task ── publish ──► Bus ──► listener ──► SubscriberSet
//!                                                                  ├──► LogWriter
//!                                                                  ├──► Metrics
//!                                                                  └──► Custom ...
//! ```
//!
//! - [`Subscribe`]: the handler trait
//! - [`SubscriberSet`]: bounded per-subscriber queues and workers
//! - [`LogWriter`]: renders events through `tracing` (feature `logging`)

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
