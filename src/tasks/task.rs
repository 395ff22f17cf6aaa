//! # Task handle.
//!
//! A [`Task`] is issued by [`Service::new_task`](crate::Service::new_task) and
//! represents one unit of in-flight work. While it exists, `poweroff` will not
//! stop any component.
//!
//! ## Terminal transitions
//! ```text
//! pending ──► done()   → task-complete(id, elapsed), task-end
//!         ├─► error(e) → task-error(id, e), task-end
//!         ├─► fatal(e) → task-error(id, e), error, poweroff(1)
//!         └─► (dropped) → reported as error(Abandoned)
//! ```
//!
//! The terminal methods take `self`, so a handle settles exactly once.

use std::fmt;
use std::sync::Arc;

use crate::error::TaskError;

/// Receiver of terminal task transitions (implemented by the engine).
pub(crate) trait TaskOwner: Send + Sync + 'static {
    fn on_done(&self, id: &str);
    fn on_error(&self, id: &str, err: TaskError);
    fn on_fatal(&self, id: &str, err: TaskError);
}

/// Handle for one unit of in-flight work.
///
/// # Example
/// ```no_run
/// # async fn run(service: nervekit::Service) -> Result<(), nervekit::LifecycleError> {
/// let task = service.new_task(None)?;
/// // ... process a message ...
/// task.done();
/// # Ok(())
/// # }
/// ```
pub struct Task {
    id: Arc<str>,
    owner: Arc<dyn TaskOwner>,
    settled: bool,
}

impl Task {
    pub(crate) fn new(id: Arc<str>, owner: Arc<dyn TaskOwner>) -> Self {
        Self {
            id,
            owner,
            settled: false,
        }
    }

    /// Task id (explicit or generated).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Reports successful completion.
    pub fn done(mut self) {
        self.settled = true;
        self.owner.on_done(&self.id);
    }

    /// Reports a recoverable failure. The service keeps running.
    pub fn error(mut self, err: impl fmt::Display) {
        self.settled = true;
        self.owner.on_error(
            &self.id,
            TaskError::Fail {
                error: err.to_string(),
            },
        );
    }

    /// Reports an unrecoverable failure. The service powers off with code 1.
    pub fn fatal(mut self, err: impl fmt::Display) {
        self.settled = true;
        self.owner.on_fatal(
            &self.id,
            TaskError::Fatal {
                error: err.to_string(),
            },
        );
    }
}

impl Drop for Task {
    fn drop(&mut self) {
        if !self.settled {
            self.owner.on_error(&self.id, TaskError::Abandoned);
        }
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("id", &self.id)
            .field("settled", &self.settled)
            .finish()
    }
}
