//! # Service: the lifecycle engine.
//!
//! [`Service`] owns the registered components, the in-flight task registry and
//! the `started`/`exiting` flags, and drives the two coordinated transitions:
//!
//! ```text
//! connect():
//!   reporter.attach(source)
//!   for c in components: c.attach(emitter)      (fail-fast, no init on error)
//!   for c in components: snapshot ready; c.init()
//!   await every c fires `ready`                 (any order, even before init returns)
//!   reporter.init(); started = true; emit `ready`
//!
//! poweroff(code):
//!   exiting = true                              (synchronous, at call time)
//!   await task_count == 0                       (re-checked after every task-end)
//!   reporter.exit()
//!   for c in components: snapshot end; c.exit()
//!   await every c fires `end`
//!   emit `end(code)`
//! ```
//!
//! ## Rules
//! - State lives behind one mutex that is never held across `.await`.
//! - Component signals are counted on per-component `watch` channels; a wait
//!   takes its snapshot before `init`/`exit` is dispatched.
//! - No component's `exit` runs while a task is in flight.
//! - Every failure is both returned as `Err` and published as an `error` event.
//! - A second `poweroff` emits `error` and `end(1)` at once and does not wait
//!   for the first one.
//! - Subscribers are flushed and released once the first `poweroff` has
//!   emitted `end`, or when the last `Service` handle is dropped.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use futures::FutureExt;
use futures::future::{self, BoxFuture};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::registry::{self, Registry};
use super::shutdown::wait_for_shutdown_signal;
use crate::components::{Component, ComponentRef, Emitter, Signals};
use crate::config::ServiceConfig;
use crate::error::{ComponentError, LifecycleError, TaskError};
use crate::events::{Bus, Event, EventKind};
use crate::stats::{Stats, StatsReporter, StatsSource};
use crate::subscribers::{Subscribe, SubscriberSet};
use crate::tasks::{IdGenerator, Task, TaskOwner};

/// A registered component together with the emitter bound to it.
pub(crate) struct Slot {
    component: ComponentRef,
    emitter: Emitter,
}

impl Slot {
    pub(crate) fn new(component: ComponentRef, bus: &Bus) -> Self {
        let emitter = Emitter::new(component.name(), bus.clone());
        Self { component, emitter }
    }

    fn name(&self) -> &str {
        self.component.name()
    }
}

#[derive(Clone, Copy, Debug)]
enum Phase {
    Init,
    Exit,
}

impl Phase {
    fn count(self, s: Signals) -> u64 {
        match self {
            Phase::Init => s.ready,
            Phase::Exit => s.end,
        }
    }

    fn dispatch(self, c: &dyn Component) -> Result<(), ComponentError> {
        match self {
            Phase::Init => c.init(),
            Phase::Exit => c.exit(),
        }
    }

    fn failure(self, component: &str, source: ComponentError) -> LifecycleError {
        let component = component.to_string();
        match self {
            Phase::Init => LifecycleError::Init { component, source },
            Phase::Exit => LifecycleError::Exit { component, source },
        }
    }
}

type SignalWait = BoxFuture<'static, ()>;

struct State {
    connected: bool,
    started: bool,
    exiting: bool,
    tasks: Registry,
}

pub(crate) struct Parts {
    pub(crate) cfg: ServiceConfig,
    pub(crate) bus: Bus,
    pub(crate) slots: Vec<Slot>,
    pub(crate) stats: Option<Arc<dyn StatsReporter>>,
    pub(crate) ids: Arc<dyn IdGenerator>,
    pub(crate) subscribers: Vec<Arc<dyn Subscribe>>,
}

struct Inner {
    me: Weak<Inner>,
    cfg: ServiceConfig,
    bus: Bus,
    slots: Vec<Slot>,
    stats: Option<Arc<dyn StatsReporter>>,
    ids: Arc<dyn IdGenerator>,
    subscribers: Mutex<Vec<Arc<dyn Subscribe>>>,
    closing: CancellationToken,
    state: Mutex<State>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.closing.cancel();
    }
}

/// # Lifecycle engine for a set of components.
///
/// Cheap to clone; clones share the same engine.
///
/// # Example
/// ```no_run
/// use nervekit::{Service, ServiceConfig};
///
/// # async fn run(db: nervekit::ComponentRef) -> Result<(), nervekit::LifecycleError> {
/// let service = Service::builder(ServiceConfig::default())
///     .with_component(db)
///     .build()?;
///
/// service.connect().await?;
///
/// let task = service.new_task(None)?;
/// task.done();
///
/// service.poweroff(0).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Service {
    inner: Arc<Inner>,
}

impl Service {
    pub(crate) fn from_parts(parts: Parts) -> Self {
        let inner = Arc::new_cyclic(|me| Inner {
            me: me.clone(),
            cfg: parts.cfg,
            bus: parts.bus,
            slots: parts.slots,
            stats: parts.stats,
            ids: parts.ids,
            subscribers: Mutex::new(parts.subscribers),
            closing: CancellationToken::new(),
            state: Mutex::new(State {
                connected: false,
                started: false,
                exiting: false,
                tasks: Registry::new(),
            }),
        });
        Self { inner }
    }

    /// Starts every component and resolves once all of them are ready.
    ///
    /// On success `started` becomes true and `ready` is emitted. On failure
    /// `error` is emitted and the cause returned; components that already
    /// started are left running.
    pub async fn connect(&self) -> Result<(), LifecycleError> {
        {
            let mut st = self.inner.lock();
            if st.connected {
                return Err(LifecycleError::AlreadyConnected);
            }
            st.connected = true;
        }
        self.inner.start_subscribers();

        let res = self.inner.startup().await;
        if let Err(e) = &res {
            self.inner.report(e);
        }
        res
    }

    /// Admits a new task.
    ///
    /// Checked in order: the service is started, it is not exiting, the task
    /// cap is not reached, and an explicit `id` is not already in flight. The
    /// task is registered before this returns.
    pub fn new_task(&self, id: Option<&str>) -> Result<Task, LifecycleError> {
        let res = self.inner.admit(id);
        if let Err(e) = &res {
            debug!(reason = e.as_label(), "task rejected");
        }
        res
    }

    /// Stops the service: drains tasks, stops the reporter, exits every
    /// component, then emits `end(code)`.
    ///
    /// The `exiting` transition happens synchronously when this is called; the
    /// returned future performs the rest. Calling it again while exiting
    /// emits `error` and `end(1)` immediately and returns
    /// [`LifecycleError::AlreadyExiting`].
    pub fn poweroff(&self, code: i32) -> BoxFuture<'static, Result<(), LifecycleError>> {
        self.inner.poweroff(code)
    }

    /// Waits for a termination signal, then powers off with `code`.
    ///
    /// A second signal while the first shutdown is still draining forces the
    /// `end(1)` path.
    pub async fn poweroff_on_signal(&self, code: i32) -> Result<(), LifecycleError> {
        let signal = wait_for_shutdown_signal()
            .await
            .map_err(|e| LifecycleError::SignalListener {
                reason: e.to_string(),
            })?;
        info!(signal, "shutdown signal received");

        let mut first = self.poweroff(code);
        tokio::select! {
            res = &mut first => res,
            Ok(signal) = wait_for_shutdown_signal() => {
                warn!(signal, "second shutdown signal while exiting");
                self.poweroff(1).await
            }
        }
    }

    /// Current status snapshot.
    pub fn stats(&self) -> Stats {
        self.inner.stats()
    }

    /// `started && !exiting`.
    pub fn is_ok(&self) -> bool {
        self.stats().ok
    }

    /// True once every component has reported ready. Never reverts.
    pub fn is_started(&self) -> bool {
        self.inner.lock().started
    }

    /// True once `poweroff` has been called. Never reverts.
    pub fn is_exiting(&self) -> bool {
        self.inner.lock().exiting
    }

    /// Number of tasks in flight.
    pub fn task_count(&self) -> usize {
        self.inner.lock().tasks.len()
    }

    /// Looks up a registered component by name.
    pub fn component(&self, name: &str) -> Option<ComponentRef> {
        self.inner
            .slots
            .iter()
            .find(|s| s.name() == name)
            .map(|s| Arc::clone(&s.component))
    }

    /// Names of the registered components, in registration order.
    pub fn component_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.inner.slots.iter().map(Slot::name)
    }

    /// Receiver for every event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.inner.bus.subscribe()
    }

    /// The bus this service publishes on.
    pub fn bus(&self) -> &Bus {
        &self.inner.bus
    }

    /// Effective configuration.
    pub fn config(&self) -> &ServiceConfig {
        &self.inner.cfg
    }
}

impl std::fmt::Debug for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let st = self.inner.lock();
        f.debug_struct("Service")
            .field("components", &self.inner.slots.len())
            .field("started", &st.started)
            .field("exiting", &st.exiting)
            .field("tasks", &st.tasks.len())
            .finish()
    }
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn stats(&self) -> Stats {
        let st = self.lock();
        Stats {
            ok: st.started && !st.exiting,
            current_tasks: st.tasks.len(),
        }
    }

    fn report(&self, err: &LifecycleError) {
        error!(error = %err, label = err.as_label(), "lifecycle failure");
        self.bus.publish(Event::error(err.to_string()));
    }

    /// Forwards bus events to the configured subscribers until `closing` is
    /// cancelled, then flushes what is already queued and stops the workers.
    fn start_subscribers(&self) {
        let subs = std::mem::take(
            &mut *self
                .subscribers
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        if subs.is_empty() {
            return;
        }

        let set = SubscriberSet::new(subs, self.bus.clone());
        let mut rx = self.bus.subscribe();
        let closing = self.closing.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    res = rx.recv() => match res {
                        Ok(ev) => forward(&set, &ev),
                        Err(broadcast::error::RecvError::Lagged(n)) => {
                            warn!(skipped = n, "subscriber listener lagged");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                    _ = closing.cancelled() => break,
                }
            }

            loop {
                match rx.try_recv() {
                    Ok(ev) => forward(&set, &ev),
                    Err(broadcast::error::TryRecvError::Lagged(n)) => {
                        warn!(skipped = n, "subscriber listener lagged");
                    }
                    Err(_) => break,
                }
            }
            set.shutdown().await;
            debug!("subscribers stopped");
        });
    }

    async fn startup(&self) -> Result<(), LifecycleError> {
        if let Some(stats) = &self.stats {
            stats
                .attach(self.stats_source())
                .map_err(LifecycleError::Stats)?;
        }

        for slot in &self.slots {
            slot.component
                .attach(slot.emitter.clone())
                .map_err(|source| LifecycleError::Attach {
                    component: slot.name().to_string(),
                    source,
                })?;
            debug!(component = slot.name(), "component attached");
        }

        let waits = self.dispatch(Phase::Init)?;
        future::join_all(waits).await;

        if let Some(stats) = &self.stats {
            stats.init().map_err(LifecycleError::Stats)?;
        }

        self.lock().started = true;
        info!(components = self.slots.len(), "service ready");
        self.bus.publish(Event::new(EventKind::Ready));
        Ok(())
    }

    fn stats_source(&self) -> StatsSource {
        let me = self.me.clone();
        Arc::new(move || match me.upgrade() {
            Some(inner) => inner.stats(),
            None => Stats {
                ok: false,
                current_tasks: 0,
            },
        })
    }

    /// Calls `init`/`exit` on every component and returns the signal waits.
    ///
    /// Every component is dispatched even if an earlier one failed; the first
    /// failure is returned.
    fn dispatch(&self, phase: Phase) -> Result<Vec<SignalWait>, LifecycleError> {
        let mut waits = Vec::with_capacity(self.slots.len());
        let mut failure = None;

        for slot in &self.slots {
            let wait = signal_wait(slot, phase);
            debug!(component = slot.name(), ?phase, "dispatching");
            match phase.dispatch(slot.component.as_ref()) {
                Ok(()) => waits.push(wait),
                Err(source) => {
                    warn!(component = slot.name(), ?phase, error = %source, "component failed");
                    failure.get_or_insert_with(|| phase.failure(slot.name(), source));
                }
            }
        }

        match failure {
            Some(e) => Err(e),
            None => Ok(waits),
        }
    }

    fn admit(&self, id: Option<&str>) -> Result<Task, LifecycleError> {
        let owner: Arc<dyn TaskOwner> = match self.me.upgrade() {
            Some(inner) => inner,
            None => return Err(LifecycleError::Exiting),
        };
        let mut st = self.lock();
        if !st.started {
            return Err(LifecycleError::NotReady);
        }
        if st.exiting {
            return Err(LifecycleError::Exiting);
        }
        if let Some(limit) = self.cfg.task_limit() {
            if st.tasks.len() >= limit {
                return Err(LifecycleError::TooManyTasks { limit });
            }
        }

        let id: Arc<str> = match id {
            Some(id) => Arc::from(id),
            None => Arc::from(self.ids.generate()),
        };
        if !st.tasks.insert(Arc::clone(&id)) {
            return Err(LifecycleError::DuplicateTask { id: id.to_string() });
        }
        drop(st);

        debug!(task = %id, "task admitted");
        Ok(Task::new(id, owner))
    }

    fn poweroff(&self, code: i32) -> BoxFuture<'static, Result<(), LifecycleError>> {
        let (was_exiting, in_flight) = {
            let mut st = self.lock();
            (std::mem::replace(&mut st.exiting, true), st.tasks.len())
        };

        if was_exiting {
            let err = LifecycleError::AlreadyExiting;
            warn!(code, "{err}");
            self.bus.publish(Event::error(err.to_string()));
            self.bus.publish(Event::end(1));
            return future::ready(Err(err)).boxed();
        }

        info!(code, tasks = in_flight, "powering off");
        let Some(inner) = self.me.upgrade() else {
            return future::ready(Ok(())).boxed();
        };
        async move {
            let res = inner.shutdown(code).await;
            match &res {
                Ok(()) => inner.closing.cancel(),
                Err(e) => inner.report(e),
            }
            res
        }
        .boxed()
    }

    async fn shutdown(&self, code: i32) -> Result<(), LifecycleError> {
        let count = self.lock().tasks.watch();
        registry::drained(count).await;
        debug!("tasks drained");

        if let Some(stats) = &self.stats {
            stats.exit().map_err(LifecycleError::Stats)?;
        }

        let waits = self.dispatch(Phase::Exit)?;
        future::join_all(waits).await;

        info!(code, "service end");
        self.bus.publish(Event::end(code));
        Ok(())
    }
}

fn forward(set: &SubscriberSet, ev: &Event) {
    if !ev.kind.is_diagnostic() {
        set.emit(ev);
    }
}

/// Resolves once `slot` fires the phase's signal after this call.
fn signal_wait(slot: &Slot, phase: Phase) -> SignalWait {
    let emitter = slot.emitter.clone();
    let mut rx = emitter.watch();
    let seen = phase.count(*rx.borrow_and_update());

    async move {
        // `emitter` owns the sender, so the channel stays open for this wait.
        let _ = rx.wait_for(|s| phase.count(*s) > seen).await;
        debug!(component = emitter.component(), ?phase, "component signalled");
    }
    .boxed()
}

impl TaskOwner for Inner {
    fn on_done(&self, id: &str) {
        let mut st = self.lock();
        let Some(elapsed) = st.tasks.take(id) else {
            return;
        };
        self.bus.publish(
            Event::new(EventKind::TaskComplete)
                .with_task(id)
                .with_elapsed(elapsed),
        );
        self.bus.publish(Event::new(EventKind::TaskEnd).with_task(id));
        st.tasks.publish_count();
        debug!(task = id, elapsed_ms = elapsed.as_millis() as u64, "task complete");
    }

    fn on_error(&self, id: &str, err: TaskError) {
        let mut st = self.lock();
        if st.tasks.take(id).is_none() {
            return;
        }
        self.bus.publish(
            Event::new(EventKind::TaskError)
                .with_task(id)
                .with_reason(err.to_string()),
        );
        self.bus.publish(Event::new(EventKind::TaskEnd).with_task(id));
        st.tasks.publish_count();
        warn!(task = id, error = %err, label = err.as_label(), "task failed");
    }

    fn on_fatal(&self, id: &str, err: TaskError) {
        {
            let mut st = self.lock();
            if st.tasks.take(id).is_none() {
                return;
            }
            self.bus.publish(
                Event::new(EventKind::TaskError)
                    .with_task(id)
                    .with_reason(err.to_string()),
            );
            st.tasks.publish_count();
        }

        let fatal = LifecycleError::FatalTask {
            id: id.to_string(),
            source: Arc::new(err),
        };
        error!(task = id, error = %fatal, "task failed fatally, powering off");
        self.bus.publish(Event::error(fatal.to_string()).with_task(id));

        let shutdown = self.poweroff(1);
        match tokio::runtime::Handle::try_current() {
            Ok(rt) => {
                rt.spawn(async move {
                    if let Err(e) = shutdown.await {
                        debug!(error = %e, "poweroff after fatal task failed");
                    }
                });
            }
            Err(_) => warn!("no tokio runtime to drive poweroff after fatal task"),
        }
    }
}
