//! Lifecycle engine.
//!
//! The public API from this module is [`Service`] and its [`ServiceBuilder`].
//!
//! Internal modules:
//! - [`service`]: connect/poweroff sequencing, task admission and events;
//! - [`builder`]: collaborator wiring and registration checks;
//! - [`registry`]: in-flight tasks and the drain condition;
//! - [`shutdown`]: cross-platform termination signals.

mod builder;
mod registry;
mod service;
mod shutdown;

pub use builder::ServiceBuilder;
pub use service::Service;
