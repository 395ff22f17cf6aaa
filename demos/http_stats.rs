//! # Example: http_stats
//!
//! Serves `/healthcheck`, `/ok` and `/stats` while a background loop keeps a
//! few tasks in flight. Ctrl-C (or SIGTERM) drains and stops; a second signal
//! forces `end(1)`.
//!
//! ## Run
//! ```bash
//! PORT=8080 cargo run --example http_stats
//! curl -i localhost:8080/stats
//! ```

use std::sync::Arc;
use std::time::Duration;

use nervekit::{HttpStats, HttpStatsConfig, LifecycleError, Service, ServiceConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let cfg = ServiceConfig {
        max_tasks: 4,
        ..ServiceConfig::default()
    };
    let service = Service::builder(cfg)
        .with_stats(Arc::new(HttpStats::new(HttpStatsConfig::port(port))))
        .build()?;
    service.connect().await?;

    let producer = service.clone();
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(Duration::from_millis(250));
        loop {
            tick.tick().await;
            match producer.new_task(None) {
                Ok(task) => {
                    tokio::spawn(async move {
                        tokio::time::sleep(Duration::from_secs(1)).await;
                        task.done();
                    });
                }
                Err(LifecycleError::TooManyTasks { .. }) => continue,
                Err(_) => break,
            }
        }
    });

    service.poweroff_on_signal(0).await?;
    Ok(())
}
