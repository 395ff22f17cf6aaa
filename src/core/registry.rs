//! # In-flight task registry.
//!
//! Maps task id to its registration instant and publishes the number of
//! in-flight tasks on a [`watch`] channel, so `poweroff` can wait for the
//! drain without polling.
//!
//! ## Rules
//! - Lives inside the engine's state mutex; every method is synchronous.
//! - [`Registry::insert`] publishes the new count immediately.
//! - [`Registry::take`] does not. The caller publishes its task events first
//!   and then calls [`Registry::publish_count`], so drain waiters wake only
//!   after `task-end` is on the bus.
//! - The drain check is the predicate `count == 0`, never a decrement.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tracing::debug;

pub(crate) struct Registry {
    tasks: HashMap<Arc<str>, Instant>,
    count: watch::Sender<usize>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        let (count, _rx) = watch::channel(0);
        Self {
            tasks: HashMap::new(),
            count,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Registers `id`. Returns `false` if it is already in flight.
    pub(crate) fn insert(&mut self, id: Arc<str>) -> bool {
        if self.tasks.contains_key(&id) {
            return false;
        }
        self.tasks.insert(id, Instant::now());
        self.publish_count();
        true
    }

    /// Unregisters `id`, returning how long it was in flight.
    pub(crate) fn take(&mut self, id: &str) -> Option<Duration> {
        self.tasks.remove(id).map(|at| at.elapsed())
    }

    pub(crate) fn publish_count(&self) {
        self.count.send_replace(self.tasks.len());
    }

    pub(crate) fn watch(&self) -> watch::Receiver<usize> {
        self.count.subscribe()
    }
}

/// Resolves once the published task count is zero.
pub(crate) async fn drained(mut count: watch::Receiver<usize>) {
    if count.wait_for(|n| *n == 0).await.is_err() {
        debug!("task counter closed while draining");
    }
}
