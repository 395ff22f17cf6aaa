//! # Task id generation.
//!
//! [`IdGenerator`] is injected into the service through
//! [`ServiceBuilder::with_id_generator`](crate::ServiceBuilder::with_id_generator).
//! Closures `Fn() -> String` implement it, which keeps tests deterministic:
//!
//! ```rust
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use nervekit::IdGenerator;
//!
//! let next = AtomicUsize::new(0);
//! let ids = move || format!("job-{}", next.fetch_add(1, Ordering::Relaxed));
//! assert_eq!(ids.generate(), "job-0");
//! assert_eq!(ids.generate(), "job-1");
//! ```

use std::fmt::Write as _;

use rand::RngCore;

/// Source of opaque, unique task ids.
pub trait IdGenerator: Send + Sync + 'static {
    /// Returns a fresh, non-empty id.
    fn generate(&self) -> String;
}

impl<F> IdGenerator for F
where
    F: Fn() -> String + Send + Sync + 'static,
{
    fn generate(&self) -> String {
        self()
    }
}

/// Random bytes from the thread-local RNG, hex encoded.
///
/// The default uses 8 bytes (16 hex characters).
#[derive(Debug, Clone, Copy)]
pub struct RandomHexId {
    bytes: usize,
}

impl RandomHexId {
    /// Number of random bytes used by [`RandomHexId::default`].
    pub const DEFAULT_BYTES: usize = 8;

    /// Creates a generator that draws `bytes` random bytes per id (min 1).
    pub fn new(bytes: usize) -> Self {
        Self {
            bytes: bytes.max(1),
        }
    }
}

impl Default for RandomHexId {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BYTES)
    }
}

impl IdGenerator for RandomHexId {
    fn generate(&self) -> String {
        let mut buf = vec![0u8; self.bytes];
        rand::rng().fill_bytes(&mut buf);

        let mut out = String::with_capacity(self.bytes * 2);
        for b in buf {
            let _ = write!(out, "{b:02x}");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn default_id_is_sixteen_hex_chars() {
        let id = RandomHexId::default().generate();
        assert_eq!(id.len(), 16);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn ids_do_not_repeat() {
        let generator = RandomHexId::default();
        let ids: HashSet<String> = (0..1000).map(|_| generator.generate()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn byte_count_is_clamped() {
        assert_eq!(RandomHexId::new(0).generate().len(), 2);
    }
}
