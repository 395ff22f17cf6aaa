//! # Component contract.
//!
//! This module provides the pieces a pluggable component ("nerve") needs to
//! take part in the service lifecycle:
//! - [`Component`] - the lifecycle trait (`name`, `attach`, `init`, `exit`)
//! - [`Emitter`] - the handle a component uses to publish its namespaced events
//! - [`Wiring`] - reusable helper that stores emitters and fires through them
//! - [`validate`] - registration check run when a service is built
//!
//! ## Contract
//! ```text
//! Service::connect()                    Service::poweroff()
//!   ├─► component.attach(emitter)         ├─► (tasks drained)
//!   ├─► component.init()  ─ Err → fail    ├─► component.exit()  ─ Err → fail
//!   └─► wait emitter.fire("ready")        └─► wait emitter.fire("end")
//! ```

mod component;
mod validate;
mod wiring;

pub use component::{Component, ComponentRef, Emitter};
pub use validate::validate;
pub use wiring::Wiring;

pub(crate) use component::Signals;
pub(crate) use validate::validate_all;
