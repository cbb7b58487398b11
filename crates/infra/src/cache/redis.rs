//! Redis-backed availability cache.
//!
//! Snapshots are stored as JSON strings under `storefront:availability:<id>`
//! with a server-side TTL (`SET ... EX`). Invalidation is a `DEL`, never an
//! update, so a racing read repopulates from the store.

use std::sync::Arc;

use storefront_core::ProductId;
use storefront_inventory::AvailabilitySnapshot;

use super::{AvailabilityCache, CacheError};

const DEFAULT_KEY_PREFIX: &str = "storefront:availability";

#[derive(Debug, Clone)]
pub struct RedisAvailabilityCache {
    client: Arc<redis::Client>,
    key_prefix: String,
    ttl_secs: u64,
}

impl RedisAvailabilityCache {
    /// Create a cache against `redis_url` (e.g., "redis://localhost:6379").
    pub fn new(redis_url: impl AsRef<str>, ttl_secs: u64) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url.as_ref())
            .map_err(|e| CacheError::Connection(e.to_string()))?;

        Ok(Self {
            client: Arc::new(client),
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            ttl_secs,
        })
    }

    fn key(&self, product_id: ProductId) -> String {
        format!("{}:{}", self.key_prefix, product_id)
    }

    fn connection(&self) -> Result<redis::Connection, CacheError> {
        self.client
            .get_connection()
            .map_err(|e| CacheError::Connection(e.to_string()))
    }
}

impl AvailabilityCache for RedisAvailabilityCache {
    fn get(&self, product_id: ProductId) -> Result<Option<AvailabilitySnapshot>, CacheError> {
        let mut conn = self.connection()?;

        let payload: Option<String> = redis::cmd("GET")
            .arg(self.key(product_id))
            .query(&mut conn)
            .map_err(|e| CacheError::Command(e.to_string()))?;

        payload
            .map(|json| {
                serde_json::from_str(&json).map_err(|e| CacheError::Serialization(e.to_string()))
            })
            .transpose()
    }

    fn put(&self, snapshot: &AvailabilitySnapshot) -> Result<(), CacheError> {
        let mut conn = self.connection()?;

        let json = serde_json::to_string(snapshot)
            .map_err(|e| CacheError::Serialization(e.to_string()))?;

        redis::cmd("SET")
            .arg(self.key(snapshot.product_id))
            .arg(json)
            .arg("EX")
            .arg(self.ttl_secs)
            .query::<()>(&mut conn)
            .map_err(|e| CacheError::Command(e.to_string()))
    }

    fn invalidate(&self, product_id: ProductId) -> Result<(), CacheError> {
        let mut conn = self.connection()?;

        redis::cmd("DEL")
            .arg(self.key(product_id))
            .query::<()>(&mut conn)
            .map_err(|e| CacheError::Command(e.to_string()))
    }
}
