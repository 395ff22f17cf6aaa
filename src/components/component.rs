//! # Component trait and emitter handle.
//!
//! A [`Component`] is started and stopped in two phases:
//! 1. **dispatch**: `init()` / `exit()` return synchronously; an `Err` is an
//!    immediate failure of that phase.
//! 2. **signal**: completion is reported later by firing `ready` / `end`
//!    through the [`Emitter`] handed over in `attach()`.
//!
//! Signals may be fired from any thread or task, and may arrive before the
//! dispatch call returns.

use std::sync::Arc;

use tokio::sync::watch;

use crate::error::ComponentError;
use crate::events::{Bus, END, Event, READY};

/// Shared reference to a component.
pub type ComponentRef = Arc<dyn Component>;

/// # Pluggable subsystem with a start/stop lifecycle.
///
/// # Example
/// ```
/// use nervekit::{Component, ComponentError, Emitter, Wiring};
///
/// struct Cache {
///     wiring: Wiring,
/// }
///
/// impl Component for Cache {
///     fn name(&self) -> &str {
///         self.wiring.name()
///     }
///
///     fn attach(&self, emitter: Emitter) -> Result<(), ComponentError> {
///         self.wiring.attach(emitter);
///         Ok(())
///     }
///
///     fn init(&self) -> Result<(), ComponentError> {
///         // warm up synchronously, then report readiness
///         self.wiring.fire("ready")
///     }
///
///     fn exit(&self) -> Result<(), ComponentError> {
///         self.wiring.fire("end")
///     }
/// }
/// ```
pub trait Component: Send + Sync + 'static {
    /// Stable, non-empty name. Unique within one service.
    fn name(&self) -> &str;

    /// Receives the emitter bound to the service bus.
    ///
    /// Called once per `connect`, before `init`.
    fn attach(&self, emitter: Emitter) -> Result<(), ComponentError>;

    /// Begins startup. Must eventually fire `ready`.
    fn init(&self) -> Result<(), ComponentError>;

    /// Begins shutdown. Must eventually fire `end`.
    fn exit(&self) -> Result<(), ComponentError>;
}

/// Counters of lifecycle signals fired by one component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Signals {
    pub(crate) ready: u64,
    pub(crate) end: u64,
}

/// Publishes a component's events onto a service bus.
///
/// Every fired event is republished as `"{component}-{event}"`. Firing
/// `ready` or `end` also advances the counters the engine waits on.
#[derive(Clone, Debug)]
pub struct Emitter {
    component: Arc<str>,
    bus: Bus,
    signals: Arc<watch::Sender<Signals>>,
}

impl Emitter {
    /// Creates an emitter publishing on `bus` on behalf of `component`.
    pub fn new(component: impl Into<Arc<str>>, bus: Bus) -> Self {
        let (tx, _rx) = watch::channel(Signals::default());
        Self {
            component: component.into(),
            bus,
            signals: Arc::new(tx),
        }
    }

    /// Name of the component this emitter publishes for.
    pub fn component(&self) -> &str {
        &self.component
    }

    /// Fires `event` without detail.
    pub fn fire(&self, event: &str) {
        self.publish(Event::component(Arc::clone(&self.component), event));
    }

    /// Fires `event` with a human-readable detail.
    pub fn fire_with(&self, event: &str, detail: impl Into<Arc<str>>) {
        self.publish(Event::component(Arc::clone(&self.component), event).with_reason(detail));
    }

    /// Shorthand for `fire("ready")`.
    pub fn ready(&self) {
        self.fire(READY);
    }

    /// Shorthand for `fire("end")`.
    pub fn end(&self) {
        self.fire(END);
    }

    /// Watches the signal counters.
    pub(crate) fn watch(&self) -> watch::Receiver<Signals> {
        self.signals.subscribe()
    }

    // Bus first: observers see `{name}-ready` before the engine can react to it.
    fn publish(&self, ev: Event) {
        let signal = match ev.signal.as_deref() {
            Some(READY) => Some(true),
            Some(END) => Some(false),
            _ => None,
        };
        self.bus.publish(ev);

        match signal {
            Some(true) => self.signals.send_modify(|s| s.ready += 1),
            Some(false) => self.signals.send_modify(|s| s.end += 1),
            None => {}
        }
    }
}
