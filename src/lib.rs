//! # nervekit
//!
//! **nervekit** coordinates the startup and shutdown of a service built from
//! independently initializing subsystems ("components": a queue consumer, a
//! database pool, an HTTP listener...). It tracks in-flight units of work
//! ("tasks") so that shutdown drains them before any component is stopped,
//! and exposes liveness and stats through an optional reporter.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │  Component   │   │  Component   │   │  Component   │
//!     │   (queue)    │   │     (db)     │   │    (http)    │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            │ attach(Emitter)  │                  │
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Service (lifecycle engine)                                       │
//! │  - Bus (broadcast events, "{component}-{event}" namespacing)      │
//! │  - Registry (in-flight tasks, drain condition)                    │
//! │  - started / exiting flags                                        │
//! │  - StatsReporter (optional, e.g. HttpStats)                       │
//! └──────┬──────────────────┬──────────────────┬──────────────────────┘
//!        │ new_task()       │ publish          │ stats()
//!        ▼                  ▼                  ▼
//!     ┌──────────┐   ┌──────────────────┐   ┌────────────────────────┐
//!     │   Task   │   │  SubscriberSet   │   │ GET /healthcheck /stats│
//!     │ done /   │   │  (per-sub queues)│   └────────────────────────┘
//!     │ error /  │   └──────────────────┘
//!     │ fatal    │
//!     └──────────┘
//! ```
//!
//! ### Lifecycle
//! ```text
//! connect():  attach all ─► init all ─► await all `ready` ─► reporter.init ─► emit `ready`
//!
//! new_task(): started? ─► !exiting? ─► below max_tasks? ─► register ─► Task
//!
//!   Task::done()    ─► task-complete, task-end
//!   Task::error(e)  ─► task-error, task-end
//!   Task::fatal(e)  ─► task-error, error ─► poweroff(1)
//!
//! poweroff(code): exiting = true ─► await task_count == 0 ─► reporter.exit
//!                 ─► exit all ─► await all `end` ─► emit `end(code)`
//!
//! poweroff() again while exiting ─► emit `error`, `end(1)` immediately
//! ```
//!
//! ## Features
//! | Area              | Description                                                    | Key types / traits                          |
//! |-------------------|----------------------------------------------------------------|---------------------------------------------|
//! | **Components**    | Pluggable subsystems with a two-phase start/stop contract.     | [`Component`], [`Emitter`], [`Wiring`]      |
//! | **Engine**        | Ordered startup, task admission, drain-then-stop shutdown.     | [`Service`], [`ServiceBuilder`]             |
//! | **Tasks**         | Handles for in-flight work with exactly one terminal call.     | [`Task`], [`IdGenerator`], [`RandomHexId`]  |
//! | **Status**        | Pure snapshot and optional external reporter.                  | [`Stats`], [`StatsReporter`]                |
//! | **Subscriber API**| Hook into lifecycle events (logging, metrics, custom).         | [`Subscribe`], [`SubscriberSet`]            |
//! | **Errors**        | Typed errors with stable labels.                               | [`LifecycleError`], [`ComponentError`]      |
//! | **Configuration** | Task cap and bus capacity.                                     | [`ServiceConfig`]                           |
//!
//! ## Optional features
//! - `http` _(default)_: `HttpStats`, an axum server for `/healthcheck`, `/ok` and `/stats`.
//! - `logging` _(default)_: `LogWriter`, renders every event through `tracing`.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use nervekit::{Component, ComponentError, Emitter, Service, ServiceConfig, Wiring};
//!
//! struct Cache {
//!     wiring: Wiring,
//! }
//!
//! impl Component for Cache {
//!     fn name(&self) -> &str {
//!         self.wiring.name()
//!     }
//!     fn attach(&self, emitter: Emitter) -> Result<(), ComponentError> {
//!         self.wiring.attach(emitter);
//!         Ok(())
//!     }
//!     fn init(&self) -> Result<(), ComponentError> {
//!         self.wiring.fire("ready")
//!     }
//!     fn exit(&self) -> Result<(), ComponentError> {
//!         self.wiring.fire("end")
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cache = Arc::new(Cache { wiring: Wiring::new("cache") });
//!
//!     let service = Service::builder(ServiceConfig::default())
//!         .with_component(cache)
//!         .build()?;
//!
//!     service.connect().await?;
//!     assert!(service.is_ok());
//!
//!     let task = service.new_task(Some("job-1"))?;
//!     assert_eq!(service.stats().current_tasks, 1);
//!     task.done();
//!
//!     service.poweroff(0).await?;
//!     assert!(!service.is_ok());
//!     Ok(())
//! }
//! ```
mod components;
mod config;
mod core;
mod error;
mod events;
mod stats;
mod subscribers;
mod tasks;

// ---- Public re-exports ----

pub use components::{Component, ComponentRef, Emitter, Wiring, validate};
pub use config::ServiceConfig;
pub use core::{Service, ServiceBuilder};
pub use error::{ComponentError, LifecycleError, StatsError, TaskError};
pub use events::{Bus, Event, EventKind};
pub use stats::{Stats, StatsReporter, StatsSource};
pub use subscribers::{Subscribe, SubscriberSet};
pub use tasks::{IdGenerator, RandomHexId, Task};

// HTTP healthcheck/stats reporter.
// Enable with: `--features http`
#[cfg(feature = "http")]
pub use stats::{HttpStats, HttpStatsConfig};

// Built-in `tracing` subscriber.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
