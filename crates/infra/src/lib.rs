//! Infrastructure layer: inventory stores, availability cache, migrations.

pub mod cache;
pub mod cached;
pub mod store;

pub use cache::{AvailabilityCache, CacheError, InMemoryAvailabilityCache};
#[cfg(feature = "redis")]
pub use cache::RedisAvailabilityCache;
pub use cached::CachedInventory;
pub use store::{InMemoryInventoryStore, PostgresInventoryStore};
