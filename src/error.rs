//! Error types used by the lifecycle engine, its components and tasks.
//!
//! This module defines four error enums:
//!
//! - [`LifecycleError`]: errors raised by the engine itself (startup, admission, shutdown).
//! - [`ComponentError`]: errors raised by components and by registration checks.
//! - [`TaskError`]: failures reported through a [`Task`](crate::Task) handle.
//! - [`StatsError`]: failures of a [`StatsReporter`](crate::StatsReporter).
//!
//! Every type provides `as_label` (stable snake_case label for logs/metrics).

use std::sync::Arc;

use thiserror::Error;

/// # Errors produced by a component or by component registration.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComponentError {
    /// The component reported an empty name.
    #[error("component name must be a non-empty string")]
    EmptyName,

    /// Two registered components share the same name.
    #[error("component name {name:?} is registered more than once")]
    DuplicateName {
        /// The conflicting name.
        name: String,
    },

    /// `fire` was called before the component was attached to an engine.
    #[error("component {name:?} fired {event:?} before being attached")]
    NotAttached {
        /// Component name.
        name: String,
        /// Event type that could not be fired.
        event: String,
    },

    /// Component-specific failure.
    #[error("{reason}")]
    Failed {
        /// Human-readable reason.
        reason: String,
    },
}

impl ComponentError {
    /// Shorthand for [`ComponentError::Failed`].
    pub fn failed(reason: impl Into<String>) -> Self {
        ComponentError::Failed {
            reason: reason.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ComponentError::EmptyName => "component_empty_name",
            ComponentError::DuplicateName { .. } => "component_duplicate_name",
            ComponentError::NotAttached { .. } => "component_not_attached",
            ComponentError::Failed { .. } => "component_failed",
        }
    }
}

/// # Errors produced by a stats reporter.
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum StatsError {
    /// Reporter was configured without a port.
    #[error("need to supply a port to initialise stats")]
    MissingPort,

    /// Listener could not be bound.
    #[error("failed to bind stats listener on {addr}: {reason}")]
    Bind {
        /// Address that was requested.
        addr: String,
        /// Underlying I/O error message.
        reason: String,
    },

    /// `init` was called on a reporter that is already serving.
    #[error("stats reporter is already running")]
    AlreadyRunning,

    /// Reporter-specific failure.
    #[error("{reason}")]
    Failed {
        /// Human-readable reason.
        reason: String,
    },
}

impl StatsError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            StatsError::MissingPort => "stats_missing_port",
            StatsError::Bind { .. } => "stats_bind",
            StatsError::AlreadyRunning => "stats_already_running",
            StatsError::Failed { .. } => "stats_failed",
        }
    }
}

/// # Failures reported through a task handle.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// Recoverable failure reported with [`Task::error`](crate::Task::error).
    #[error("task failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Unrecoverable failure reported with [`Task::fatal`](crate::Task::fatal).
    #[error("fatal task error: {error}")]
    Fatal {
        /// The underlying error message.
        error: String,
    },

    /// The handle was dropped without reaching a terminal state.
    #[error("task handle dropped before completion")]
    Abandoned,
}

impl TaskError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use nervekit::TaskError;
    ///
    /// let err = TaskError::Fatal { error: "disk gone".into() };
    /// assert_eq!(err.as_label(), "task_fatal");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Fail { .. } => "task_failed",
            TaskError::Fatal { .. } => "task_fatal",
            TaskError::Abandoned => "task_abandoned",
        }
    }

    /// Indicates whether the failure shuts the service down.
    pub fn is_fatal(&self) -> bool {
        matches!(self, TaskError::Fatal { .. })
    }
}

/// # Errors produced by the lifecycle engine.
///
/// Returned from [`Service`](crate::Service) operations. Every error that is
/// caused by a component, a task or the reporter is also published on the bus
/// as an `error` event.
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum LifecycleError {
    /// A component failed registration checks.
    #[error("invalid component: {0}")]
    Invalid(#[from] ComponentError),

    /// Binding a component to the bus failed.
    #[error("failed to attach component {component:?}: {source}")]
    Attach {
        /// Component name.
        component: String,
        /// Underlying failure.
        source: ComponentError,
    },

    /// A component's `init` failed synchronously.
    #[error("component {component:?} failed to init: {source}")]
    Init {
        /// Component name.
        component: String,
        /// Underlying failure.
        source: ComponentError,
    },

    /// A component's `exit` failed synchronously.
    #[error("component {component:?} failed to exit: {source}")]
    Exit {
        /// Component name.
        component: String,
        /// Underlying failure.
        source: ComponentError,
    },

    /// The stats reporter failed.
    #[error("stats reporter failed: {0}")]
    Stats(StatsError),


    /// `connect` was called more than once.
    #[error("service has already been connected")]
    AlreadyConnected,

    /// Task requested before the service was ready.
    #[error("can not create task until ready")]
    NotReady,

    /// Task requested while the service is exiting.
    #[error("can not create task while exiting")]
    Exiting,

    /// Task requested while the cap is reached.
    #[error("too many tasks being processed (limit {limit})")]
    TooManyTasks {
        /// Configured task cap.
        limit: usize,
    },

    /// Explicit task id is already in flight.
    #[error("task {id:?} is already in flight")]
    DuplicateTask {
        /// The requested id.
        id: String,
    },

    /// A task reported a fatal error.
    #[error("fatal task error")]
    FatalTask {
        /// Id of the failed task.
        id: String,
        /// The task's failure.
        source: Arc<TaskError>,
    },

    /// `poweroff` was called while already exiting.
    #[error("asked to poweroff while exiting; quitting immediately")]
    AlreadyExiting,

    /// OS signal handlers could not be installed.
    #[error("failed to listen for shutdown signals: {reason}")]
    SignalListener {
        /// Underlying I/O failure.
        reason: String,
    },
}

impl LifecycleError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use nervekit::LifecycleError;
    ///
    /// assert_eq!(LifecycleError::NotReady.as_label(), "service_not_ready");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            LifecycleError::Invalid(_) => "service_invalid_component",
            LifecycleError::Attach { .. } => "service_attach_failed",
            LifecycleError::Init { .. } => "service_init_failed",
            LifecycleError::Exit { .. } => "service_exit_failed",
            LifecycleError::Stats(_) => "service_stats_failed",
            LifecycleError::AlreadyConnected => "service_already_connected",
            LifecycleError::NotReady => "service_not_ready",
            LifecycleError::Exiting => "service_exiting",
            LifecycleError::TooManyTasks { .. } => "service_too_many_tasks",
            LifecycleError::DuplicateTask { .. } => "service_duplicate_task",
            LifecycleError::FatalTask { .. } => "service_fatal_task",
            LifecycleError::AlreadyExiting => "service_already_exiting",
            LifecycleError::SignalListener { .. } => "service_signal_listener",
        }
    }

    /// True for the admission rejections returned by [`Service::new_task`](crate::Service::new_task).
    pub fn is_admission(&self) -> bool {
        matches!(
            self,
            LifecycleError::NotReady
                | LifecycleError::Exiting
                | LifecycleError::TooManyTasks { .. }
                | LifecycleError::DuplicateTask { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_stable() {
        assert_eq!(ComponentError::EmptyName.as_label(), "component_empty_name");
        assert_eq!(StatsError::MissingPort.as_label(), "stats_missing_port");
        assert_eq!(TaskError::Abandoned.as_label(), "task_abandoned");
        assert_eq!(
            LifecycleError::TooManyTasks { limit: 3 }.as_label(),
            "service_too_many_tasks"
        );
    }

    #[test]
    fn component_error_converts_into_invalid() {
        let err: LifecycleError = ComponentError::EmptyName.into();
        assert!(matches!(err, LifecycleError::Invalid(ComponentError::EmptyName)));
    }

    #[test]
    fn admission_errors_are_classified() {
        assert!(LifecycleError::NotReady.is_admission());
        assert!(LifecycleError::Exiting.is_admission());
        assert!(LifecycleError::TooManyTasks { limit: 1 }.is_admission());
        assert!(!LifecycleError::AlreadyExiting.is_admission());
    }

    #[test]
    fn messages_match_rejections() {
        assert_eq!(LifecycleError::NotReady.to_string(), "can not create task until ready");
        assert_eq!(
            LifecycleError::Exiting.to_string(),
            "can not create task while exiting"
        );
        assert!(TaskError::Fatal { error: "x".into() }.is_fatal());
    }
}
