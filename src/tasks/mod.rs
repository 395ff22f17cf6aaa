//! # Task handles and identifiers.
//!
//! This module provides the task-related types:
//! - [`Task`] - handle for one unit of in-flight work
//! - [`IdGenerator`] - pluggable source of task ids
//! - [`RandomHexId`] - default generator (random bytes, hex encoded)

mod id;
mod task;

pub use id::{IdGenerator, RandomHexId};
pub use task::Task;

pub(crate) use task::TaskOwner;
