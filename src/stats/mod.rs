//! # Status snapshot and reporters.
//!
//! [`Stats`] is the pure read of service state returned by
//! [`Service::stats`](crate::Service::stats). A [`StatsReporter`] is an
//! optional collaborator that publishes it somewhere (for example over HTTP,
//! see `HttpStats`).
//!
//! ## Reporter lifecycle
//! ```text
//! Service::connect()   ─► reporter.attach(source)   (before any component starts)
//!                      ─► reporter.init()           (after every component is ready)
//! Service::poweroff()  ─► reporter.exit()           (after tasks drained, before components exit)
//! ```

#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::{HttpStats, HttpStatsConfig};

use std::sync::Arc;

use serde::Serialize;

use crate::error::StatsError;

/// Snapshot of service state.
///
/// Serializes as `{"ok": true, "currentTasks": 2}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    /// `started && !exiting`.
    pub ok: bool,
    /// Number of tasks in flight.
    pub current_tasks: usize,
}

/// Callback producing the current [`Stats`].
pub type StatsSource = Arc<dyn Fn() -> Stats + Send + Sync>;

/// Optional collaborator that exposes [`Stats`] outside the process.
pub trait StatsReporter: Send + Sync + 'static {
    /// Installs the callback used to read current stats.
    fn attach(&self, source: StatsSource) -> Result<(), StatsError>;

    /// Starts reporting.
    fn init(&self) -> Result<(), StatsError>;

    /// Stops reporting.
    fn exit(&self) -> Result<(), StatsError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_in_camel_case() {
        let stats = Stats {
            ok: true,
            current_tasks: 2,
        };
        assert_eq!(
            serde_json::to_string(&stats).unwrap(),
            r#"{"ok":true,"currentTasks":2}"#
        );
    }
}
