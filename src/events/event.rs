//! # Events emitted by the lifecycle engine and its components.
//!
//! The [`EventKind`] enum classifies event types across four categories:
//! - **Service events**: `Ready`, `Error`, `End`
//! - **Task events**: `TaskComplete`, `TaskError`, `TaskEnd`
//! - **Component events**: `ComponentReady`, `ComponentEnd`, `ComponentSignal`
//! - **Subscriber events**: `SubscriberOverflow`, `SubscriberPanicked`
//!
//! The [`Event`] struct carries additional metadata such as timestamps,
//! component name, task id, reason, elapsed time and exit code.
//!
//! Every event has a string topic ([`Event::topic`]). Component events are
//! namespaced as `"{component}-{event}"`, so a component named `queue` firing
//! `ready` is observed as `queue-ready`.
//!
//! ## Example
//! ```rust
//! use nervekit::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::TaskError)
//!     .with_task("job-1")
//!     .with_reason("boom");
//!
//! assert_eq!(ev.topic(), "task-error");
//! assert_eq!(ev.task.as_deref(), Some("job-1"));
//!
//! let ev = Event::component("queue", "ready");
//! assert_eq!(ev.kind, EventKind::ComponentReady);
//! assert_eq!(ev.topic(), "queue-ready");
//! ```

use std::borrow::Cow;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Component event type that signals readiness.
pub(crate) const READY: &str = "ready";
/// Component event type that signals shutdown completion.
pub(crate) const END: &str = "end";

/// Classification of service events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    // === Service events ===
    /// Every component reported ready; the service accepts tasks.
    Ready,

    /// A startup, task or shutdown failure.
    ///
    /// Sets:
    /// - `reason`: failure message
    /// - `task`: task id (fatal task errors only)
    Error,

    /// Shutdown finished (or was forced by a duplicate poweroff).
    ///
    /// Sets:
    /// - `code`: exit code
    End,

    // === Task events ===
    /// Task completed successfully.
    ///
    /// Sets:
    /// - `task`: task id
    /// - `elapsed_ms`: time since registration
    TaskComplete,

    /// Task reported an error (recoverable or fatal).
    ///
    /// Sets:
    /// - `task`: task id
    /// - `reason`: error message
    TaskError,

    /// Task left the registry after `done` or `error`. Fires exactly once,
    /// after the task has been removed. Fatal failures end in `Error` instead.
    ///
    /// Sets:
    /// - `task`: task id
    TaskEnd,

    // === Component events ===
    /// Component fired `ready`.
    ///
    /// Sets:
    /// - `component`: component name
    ComponentReady,

    /// Component fired `end`.
    ///
    /// Sets:
    /// - `component`: component name
    ComponentEnd,

    /// Component fired any other event type.
    ///
    /// Sets:
    /// - `component`: component name
    /// - `signal`: event type
    /// - `reason`: optional detail
    ComponentSignal,

    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `component`: subscriber name
    /// - `reason`: panic message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `component`: subscriber name
    /// - `reason`: "queue full" or "worker closed"
    SubscriberOverflow,
}

impl EventKind {
    /// Fixed topic for non-component kinds.
    pub fn as_topic(&self) -> &'static str {
        match self {
            EventKind::Ready => "ready",
            EventKind::Error => "error",
            EventKind::End => "end",
            EventKind::TaskComplete => "task-complete",
            EventKind::TaskError => "task-error",
            EventKind::TaskEnd => "task-end",
            EventKind::ComponentReady => "component-ready",
            EventKind::ComponentEnd => "component-end",
            EventKind::ComponentSignal => "component-signal",
            EventKind::SubscriberPanicked => "subscriber-panicked",
            EventKind::SubscriberOverflow => "subscriber-overflow",
        }
    }

    /// True for events republished from a component.
    pub fn is_component(&self) -> bool {
        matches!(
            self,
            EventKind::ComponentReady | EventKind::ComponentEnd | EventKind::ComponentSignal
        )
    }

    /// True for subscriber diagnostics. These are not fanned out to subscribers.
    pub fn is_diagnostic(&self) -> bool {
        matches!(
            self,
            EventKind::SubscriberOverflow | EventKind::SubscriberPanicked
        )
    }
}

/// Service event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Component (or subscriber) name, if applicable.
    pub component: Option<Arc<str>>,
    /// Component event type for [`EventKind::ComponentSignal`].
    pub signal: Option<Arc<str>>,
    /// Task id, if applicable.
    pub task: Option<Arc<str>>,
    /// Human-readable reason or detail.
    pub reason: Option<Arc<str>>,
    /// Task duration in milliseconds.
    pub elapsed_ms: Option<u64>,
    /// Exit code carried by [`EventKind::End`].
    pub code: Option<i32>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            component: None,
            signal: None,
            task: None,
            reason: None,
            elapsed_ms: None,
            code: None,
        }
    }

    /// Creates a component event for `event` fired by `component`.
    ///
    /// `ready` and `end` map to their dedicated kinds; anything else becomes
    /// [`EventKind::ComponentSignal`].
    pub fn component(component: impl Into<Arc<str>>, event: &str) -> Self {
        let kind = match event {
            READY => EventKind::ComponentReady,
            END => EventKind::ComponentEnd,
            _ => EventKind::ComponentSignal,
        };
        let mut ev = Event::new(kind).with_component(component);
        ev.signal = Some(Arc::from(event));
        ev
    }

    /// Creates an `error` event.
    pub fn error(reason: impl Into<Arc<str>>) -> Self {
        Event::new(EventKind::Error).with_reason(reason)
    }

    /// Creates an `end` event with the given exit code.
    pub fn end(code: i32) -> Self {
        let mut ev = Event::new(EventKind::End);
        ev.code = Some(code);
        ev
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a task id.
    #[inline]
    pub fn with_task(mut self, task: impl Into<Arc<str>>) -> Self {
        self.task = Some(task.into());
        self
    }

    /// Attaches a component name.
    #[inline]
    pub fn with_component(mut self, component: impl Into<Arc<str>>) -> Self {
        self.component = Some(component.into());
        self
    }

    /// Attaches an elapsed duration (stored as milliseconds).
    #[inline]
    pub fn with_elapsed(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u64::MAX)) as u64;
        self.elapsed_ms = Some(ms);
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_component(subscriber)
            .with_reason(reason)
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_component(subscriber)
            .with_reason(info)
    }

    /// Returns the event's topic.
    ///
    /// Component events yield `"{component}-{event}"`; every other kind yields
    /// its fixed topic (`ready`, `task-end`, ...).
    pub fn topic(&self) -> Cow<'_, str> {
        match (self.kind.is_component(), &self.component, &self.signal) {
            (true, Some(component), Some(signal)) => Cow::Owned(format!("{component}-{signal}")),
            _ => Cow::Borrowed(self.kind.as_topic()),
        }
    }

    /// True if this is a component event fired by `component`.
    #[inline]
    pub fn is_from(&self, component: &str) -> bool {
        self.kind.is_component() && self.component.as_deref() == Some(component)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_numbers_increase() {
        let a = Event::new(EventKind::Ready);
        let b = Event::new(EventKind::Ready);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn component_events_are_namespaced() {
        let ev = Event::component("db", "end");
        assert_eq!(ev.kind, EventKind::ComponentEnd);
        assert_eq!(ev.topic(), "db-end");
        assert!(ev.is_from("db"));
        assert!(!ev.is_from("queue"));

        let ev = Event::component("db", "reconnected");
        assert_eq!(ev.kind, EventKind::ComponentSignal);
        assert_eq!(ev.topic(), "db-reconnected");
    }

    #[test]
    fn end_carries_code() {
        let ev = Event::end(1);
        assert_eq!(ev.code, Some(1));
        assert_eq!(ev.topic(), "end");
    }

    #[test]
    fn elapsed_is_stored_in_millis() {
        let ev = Event::new(EventKind::TaskComplete).with_elapsed(Duration::from_millis(1500));
        assert_eq!(ev.elapsed_ms, Some(1500));
    }
}
