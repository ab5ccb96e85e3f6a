//! Backend that degrades to memory when the persistent store fails.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::warn;

use crate::backend::{KvBackend, MemoryBackend};
use crate::CacheError;

/// Wraps a persistent backend with an in-memory fallback.
///
/// The first error from the persistent backend switches the store into
/// degraded mode for the rest of its lifetime: every later read and write
/// goes to the in-memory copy and no error ever reaches the caller. A store
/// built with [`FallbackBackend::memory_only`] starts out degraded, which is
/// the equivalent of a browser with storage disabled.
pub struct FallbackBackend {
    primary: Option<Box<dyn KvBackend>>,
    memory: MemoryBackend,
    degraded: AtomicBool,
}

impl FallbackBackend {
    /// Wrap a persistent backend.
    pub fn new(primary: impl KvBackend + 'static) -> Self {
        Self {
            primary: Some(Box::new(primary)),
            memory: MemoryBackend::new(),
            degraded: AtomicBool::new(false),
        }
    }

    /// A store with no persistent backend at all.
    pub fn memory_only() -> Self {
        Self {
            primary: None,
            memory: MemoryBackend::new(),
            degraded: AtomicBool::new(true),
        }
    }

    /// Whether the store has fallen back to memory.
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::Relaxed)
    }

    fn active_primary(&self) -> Option<&dyn KvBackend> {
        if self.is_degraded() {
            None
        } else {
            self.primary.as_deref()
        }
    }

    fn degrade(&self, op: &str, err: &CacheError) {
        if !self.degraded.swap(true, Ordering::Relaxed) {
            warn!(operation = op, error = %err, "persistent storage unavailable, using in-memory fallback");
        }
    }
}

impl KvBackend for FallbackBackend {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        if let Some(primary) = self.active_primary() {
            match primary.get(key) {
                Ok(value) => return Ok(value),
                Err(e) => self.degrade("get", &e),
            }
        }
        self.memory.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        if let Some(primary) = self.active_primary() {
            match primary.set(key, value) {
                Ok(()) => return Ok(()),
                Err(e) => self.degrade("set", &e),
            }
        }
        self.memory.set(key, value)
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        if let Some(primary) = self.active_primary() {
            match primary.delete(key) {
                Ok(()) => return Ok(()),
                Err(e) => self.degrade("delete", &e),
            }
        }
        self.memory.delete(key)
    }

    fn keys(&self) -> Result<Vec<String>, CacheError> {
        if let Some(primary) = self.active_primary() {
            match primary.keys() {
                Ok(keys) => return Ok(keys),
                Err(e) => self.degrade("keys", &e),
            }
        }
        self.memory.keys()
    }
}
