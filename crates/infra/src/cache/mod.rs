//! Availability cache.
//!
//! Read-through cache of availability snapshots. Never the source of truth
//! for write decisions: the reserve path does not consult it, so cache
//! failure or staleness cannot cause overselling. TTL exists purely as a
//! safety net for missed invalidations (e.g., a crash between commit and
//! invalidation).

mod in_memory;
#[cfg(feature = "redis")]
mod redis;

pub use in_memory::InMemoryAvailabilityCache;
#[cfg(feature = "redis")]
pub use redis::RedisAvailabilityCache;

use thiserror::Error;

use storefront_core::ProductId;
use storefront_inventory::AvailabilitySnapshot;

/// Cache operation error. Never propagated to inventory callers; the caching
/// wrapper logs a warning and reads the store directly.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache connection error: {0}")]
    Connection(String),

    #[error("cache command error: {0}")]
    Command(String),

    #[error("cache serialization error: {0}")]
    Serialization(String),
}

/// Snapshot cache keyed by product.
///
/// Shared-read, owner-invalidated: request paths only populate on miss, and
/// every ledger mutation deletes (never updates) the affected entry.
pub trait AvailabilityCache: Send + Sync {
    /// Return the snapshot if present and unexpired.
    fn get(&self, product_id: ProductId) -> Result<Option<AvailabilitySnapshot>, CacheError>;

    /// Populate after a read-through miss.
    fn put(&self, snapshot: &AvailabilitySnapshot) -> Result<(), CacheError>;

    /// Delete the entry so the next read is forced to the store.
    fn invalidate(&self, product_id: ProductId) -> Result<(), CacheError>;
}
