//! # Service configuration.
//!
//! Provides [`ServiceConfig`] centralized settings for the lifecycle engine.
//!
//! ## Sentinel values
//! - `max_tasks = 0` → unbounded (no admission cap)
//! - `bus_capacity = 0` → clamped to 1 by [`Bus`](crate::Bus)

use serde::Deserialize;

/// Global configuration for a [`Service`](crate::Service).
///
/// ## Field semantics
/// - `max_tasks`: cap on in-flight tasks (`0` = unbounded)
/// - `bus_capacity`: event bus ring buffer size (min 1)
///
/// Deserializable so it can be embedded in an application's own config file;
/// missing fields take their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Maximum number of tasks in flight at once.
    ///
    /// - `0` = unbounded
    /// - `n > 0` = [`Service::new_task`](crate::Service::new_task) rejects once `n` tasks are in flight
    pub max_tasks: usize,

    /// Capacity of the event bus broadcast channel.
    ///
    /// Receivers that fall behind by more than `bus_capacity` events observe
    /// `Lagged` and skip the oldest items. Lifecycle coordination does not go
    /// through this buffer, so lag only affects observers.
    pub bus_capacity: usize,
}

impl ServiceConfig {
    /// Returns the task cap as an `Option`.
    ///
    /// - `None` → unbounded
    /// - `Some(n)` → at most `n` tasks in flight
    #[inline]
    pub fn task_limit(&self) -> Option<usize> {
        match self.max_tasks {
            0 => None,
            n => Some(n),
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for ServiceConfig {
    /// Default configuration:
    ///
    /// - `max_tasks = 0` (unbounded)
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            max_tasks: 0,
            bus_capacity: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_max_tasks_is_unbounded() {
        let cfg = ServiceConfig::default();
        assert_eq!(cfg.task_limit(), None);

        let cfg = ServiceConfig {
            max_tasks: 3,
            ..ServiceConfig::default()
        };
        assert_eq!(cfg.task_limit(), Some(3));
    }

    #[test]
    fn bus_capacity_is_clamped() {
        let cfg = ServiceConfig {
            bus_capacity: 0,
            ..ServiceConfig::default()
        };
        assert_eq!(cfg.bus_capacity_clamped(), 1);
    }

    #[test]
    fn deserializes_with_defaults() {
        let cfg: ServiceConfig = serde_json::from_str(r#"{"max_tasks": 8}"#).unwrap();
        assert_eq!(cfg.max_tasks, 8);
        assert_eq!(cfg.bus_capacity, 1024);
    }
}
