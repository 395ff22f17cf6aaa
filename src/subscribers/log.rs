//! # LogWriter: events as `tracing` lines
//!
//! Renders each [`Event`] as one `tracing` record under the `nervekit::events`
//! target. Failures log at `warn`/`error`, lifecycle milestones at `info`,
//! everything else at `debug`.
//!
//! ```text
//! INFO  nervekit::events: ready
//! DEBUG nervekit::events: task-complete task="3fa4c1d09e2b7a55" elapsed_ms=12
//! WARN  nervekit::events: task-error task="9c01aa7e4b3d2f10" reason="upstream timeout"
//! ERROR nervekit::events: error reason="fatal task error"
//! INFO  nervekit::events: end code=1
//! ```

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Subscriber that logs every event through `tracing`.
#[derive(Default, Debug, Clone, Copy)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let topic = e.topic();
        match e.kind {
            EventKind::Ready => info!(target: "nervekit::events", "{topic}"),
            EventKind::End => info!(target: "nervekit::events", code = ?e.code, "{topic}"),
            EventKind::Error => {
                error!(target: "nervekit::events", task = ?e.task, reason = ?e.reason, "{topic}")
            }
            EventKind::TaskComplete => {
                debug!(target: "nervekit::events", task = ?e.task, elapsed_ms = ?e.elapsed_ms, "{topic}")
            }
            EventKind::TaskError => {
                warn!(target: "nervekit::events", task = ?e.task, reason = ?e.reason, "{topic}")
            }
            EventKind::TaskEnd => debug!(target: "nervekit::events", task = ?e.task, "{topic}"),
            EventKind::ComponentReady | EventKind::ComponentEnd => {
                info!(target: "nervekit::events", "{topic}")
            }
            EventKind::ComponentSignal => {
                debug!(target: "nervekit::events", detail = ?e.reason, "{topic}")
            }
            EventKind::SubscriberOverflow | EventKind::SubscriberPanicked => {
                warn!(
                    target: "nervekit::events",
                    subscriber = ?e.component,
                    reason = ?e.reason,
                    "{topic}"
                )
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn handles_every_kind() {
        let writer = LogWriter::new();
        let events = [
            Event::new(EventKind::Ready),
            Event::error("fatal task error").with_task("t1"),
            Event::end(0),
            Event::new(EventKind::TaskComplete).with_task("t1"),
            Event::new(EventKind::TaskError).with_task("t1").with_reason("oops"),
            Event::new(EventKind::TaskEnd).with_task("t1"),
            Event::component("db", "ready"),
            Event::component("db", "end"),
            Event::component("db", "reconnected").with_reason("after 3 attempts"),
            Event::subscriber_overflow("audit", "queue full"),
            Event::subscriber_panicked("audit", "boom".to_string()),
        ];
        for ev in &events {
            writer.on_event(ev).await;
        }
        assert_eq!(writer.name(), "LogWriter");
    }
}
