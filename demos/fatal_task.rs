//! # Example: fatal_task
//!
//! A task that hits an unrecoverable error takes the whole service down.
//!
//! ## Flow
//! ```text
//! task "import-7" ──► fatal("disk full")
//!     ├─► task-error(import-7)
//!     ├─► error("fatal task error")
//!     └─► poweroff(1) ─► wait for "import-8" ─► exit components ─► end(1)
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example fatal_task
//! ```

use std::time::Duration;

use nervekit::{EventKind, Service, ServiceConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "debug".into()))
        .init();

    let service = Service::new(ServiceConfig::default(), Vec::new())?;
    let mut events = service.subscribe();
    service.connect().await?;

    let slow = service.new_task(Some("import-8"))?;
    let doomed = service.new_task(Some("import-7"))?;

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        doomed.fatal("disk full");
    });
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(500)).await;
        slow.done();
    });

    loop {
        let ev = events.recv().await?;
        println!("[{}] task={:?} reason={:?}", ev.topic(), ev.task, ev.reason);
        if ev.kind == EventKind::End {
            println!("exit code {}", ev.code.unwrap_or_default());
            break;
        }
    }
    Ok(())
}
