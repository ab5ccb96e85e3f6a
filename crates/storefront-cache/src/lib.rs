//! Persistent key-value storage for the storefront cart.
//!
//! Backends behave like browser local storage: string keys and values, one
//! small JSON blob per entry. [`FallbackBackend`] keeps the cart working when
//! the persistent store is unavailable by switching to memory for the rest
//! of the session.
//!
//! # Example
//!
//! ```rust,ignore
//! use storefront_cache::{Cache, FallbackBackend, FileBackend};
//!
//! let backend = FallbackBackend::new(FileBackend::open("storage.json")?);
//! let cache = Cache::new(backend);
//!
//! cache.set("cart_v1", &items)?;
//! let items: Option<Vec<CartItem>> = cache.get("cart_v1")?;
//! cache.delete("cart_v1")?;
//! ```

mod backend;
mod error;
mod fallback;
mod kv;

pub use backend::{FileBackend, KvBackend, MemoryBackend};
pub use error::CacheError;
pub use fallback::FallbackBackend;
pub use kv::Cache;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, FallbackBackend, FileBackend, KvBackend, MemoryBackend};
}
