//! # Wiring: reusable emitter storage for components.
//!
//! Components usually embed a [`Wiring`] instead of storing emitters
//! themselves. It keeps every attached [`Emitter`] and fires through all of
//! them, so one component can be attached to more than one bus.
//!
//! ## Rules
//! - `fire` before any `attach` fails with [`ComponentError::NotAttached`]
//! - `event(t)` returns the namespaced topic `"{name}-{t}"`

use std::sync::{Arc, PoisonError, RwLock};

use crate::components::Emitter;
use crate::error::ComponentError;

/// Name plus attached emitters of a component.
#[derive(Debug)]
pub struct Wiring {
    name: Arc<str>,
    emitters: RwLock<Vec<Emitter>>,
}

impl Wiring {
    /// Creates an unattached wiring for the component `name`.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            emitters: RwLock::new(Vec::new()),
        }
    }

    /// Component name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds an emitter; subsequent fires go through it as well.
    pub fn attach(&self, emitter: Emitter) {
        self.emitters
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(emitter);
    }

    /// True once at least one emitter is attached.
    pub fn is_attached(&self) -> bool {
        !self
            .emitters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }

    /// Namespaced topic for `event`.
    pub fn event(&self, event: &str) -> String {
        format!("{}-{}", self.name, event)
    }

    /// Fires `event` through every attached emitter.
    pub fn fire(&self, event: &str) -> Result<(), ComponentError> {
        self.each(event, |e| e.fire(event))
    }

    /// Fires `event` with a detail through every attached emitter.
    pub fn fire_with(&self, event: &str, detail: &str) -> Result<(), ComponentError> {
        self.each(event, |e| e.fire_with(event, detail))
    }

    fn each(&self, event: &str, f: impl Fn(&Emitter)) -> Result<(), ComponentError> {
        let emitters = self.emitters.read().unwrap_or_else(PoisonError::into_inner);
        if emitters.is_empty() {
            return Err(ComponentError::NotAttached {
                name: self.name.to_string(),
                event: event.to_string(),
            });
        }
        emitters.iter().for_each(f);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Bus;

    #[test]
    fn fire_before_attach_fails() {
        let wiring = Wiring::new("nerve");
        assert!(!wiring.is_attached());
        let err = wiring.fire("ready").unwrap_err();
        assert_eq!(err.as_label(), "component_not_attached");
    }

    #[test]
    fn event_is_prefixed_with_name() {
        let wiring = Wiring::new("name");
        assert_eq!(wiring.event("event"), "name-event");
    }

    #[test]
    fn fire_reaches_every_attached_emitter() {
        let first = Bus::new(8);
        let second = Bus::new(8);
        let mut rx1 = first.subscribe();
        let mut rx2 = second.subscribe();

        let wiring = Wiring::new("name");
        wiring.attach(Emitter::new("name", first));
        wiring.attach(Emitter::new("name", second));
        wiring.fire_with("event", "arg1").unwrap();

        let a = rx1.try_recv().unwrap();
        let b = rx2.try_recv().unwrap();
        assert_eq!(a.topic(), wiring.event("event"));
        assert_eq!(b.topic(), wiring.event("event"));
        assert_eq!(a.reason.as_deref(), Some("arg1"));
    }
}
