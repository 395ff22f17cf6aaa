//! # Example: basic_service
//!
//! Two components with different startup styles, a handful of tasks, and a
//! drain-then-stop shutdown.
//!
//! Demonstrates how to:
//! - Implement [`Component`] on top of [`Wiring`].
//! - Signal `ready`/`end` later from a spawned task (the `queue` component).
//! - Observe the bus through [`LogWriter`].
//!
//! ## Flow
//! ```text
//! connect()
//!   ├─► db.init()     ─► db-ready (immediately)
//!   ├─► queue.init()  ─► spawn: sleep 300ms ─► queue-ready
//!   └─► ready
//! new_task() x3 ─► workers finish one by one ─► task-complete / task-end
//! poweroff(0)
//!   ├─► wait until task_count == 0
//!   ├─► db.exit(), queue.exit()
//!   └─► end(0)
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=debug cargo run --example basic_service
//! ```

use std::sync::Arc;
use std::time::Duration;

use nervekit::{
    Component, ComponentError, ComponentRef, Emitter, LogWriter, Service, ServiceConfig,
    Subscribe, Wiring,
};
use tracing_subscriber::EnvFilter;

/// Becomes ready as soon as `init` runs.
struct Database {
    wiring: Wiring,
}

impl Component for Database {
    fn name(&self) -> &str {
        self.wiring.name()
    }
    fn attach(&self, emitter: Emitter) -> Result<(), ComponentError> {
        self.wiring.attach(emitter);
        Ok(())
    }
    fn init(&self) -> Result<(), ComponentError> {
        self.wiring.fire("ready")
    }
    fn exit(&self) -> Result<(), ComponentError> {
        self.wiring.fire("end")
    }
}

/// Takes a while to connect and to close.
struct Queue {
    wiring: Arc<Wiring>,
    delay: Duration,
}

impl Queue {
    fn later(&self, event: &'static str) {
        let wiring = Arc::clone(&self.wiring);
        let delay = self.delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = wiring.fire_with("connection", event);
            let _ = wiring.fire(event);
        });
    }
}

impl Component for Queue {
    fn name(&self) -> &str {
        self.wiring.name()
    }
    fn attach(&self, emitter: Emitter) -> Result<(), ComponentError> {
        self.wiring.attach(emitter);
        Ok(())
    }
    fn init(&self) -> Result<(), ComponentError> {
        self.later("ready");
        Ok(())
    }
    fn exit(&self) -> Result<(), ComponentError> {
        self.later("end");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let db: ComponentRef = Arc::new(Database {
        wiring: Wiring::new("db"),
    });
    let queue: ComponentRef = Arc::new(Queue {
        wiring: Arc::new(Wiring::new("queue")),
        delay: Duration::from_millis(300),
    });

    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let service = Service::builder(ServiceConfig::default())
        .with_components([db, queue])
        .with_subscribers(subs)
        .build()?;

    service.connect().await?;

    for i in 1..=3u64 {
        let task = service.new_task(None)?;
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200 * i)).await;
            task.done();
        });
    }

    // Returns only after the three workers above have finished.
    service.poweroff(0).await?;
    tracing::info!(stats = ?service.stats(), "stopped");

    // let the LogWriter worker flush the final events
    tokio::time::sleep(Duration::from_millis(50)).await;
    Ok(())
}
