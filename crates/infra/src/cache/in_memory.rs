//! In-memory TTL cache for availability snapshots (default backend, tests/dev).

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use storefront_core::ProductId;
use storefront_inventory::AvailabilitySnapshot;

use super::{AvailabilityCache, CacheError};

#[derive(Debug)]
struct Entry {
    expires_at: Instant,
    snapshot: AvailabilitySnapshot,
}

/// RwLock + deadline map. Expired entries are treated as absent and
/// overwritten on the next populate.
#[derive(Debug)]
pub struct InMemoryAvailabilityCache {
    ttl: Duration,
    entries: RwLock<HashMap<ProductId, Entry>>,
}

impl InMemoryAvailabilityCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl AvailabilityCache for InMemoryAvailabilityCache {
    fn get(&self, product_id: ProductId) -> Result<Option<AvailabilitySnapshot>, CacheError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| CacheError::Command("cache lock poisoned".to_string()))?;

        Ok(entries.get(&product_id).and_then(|entry| {
            if entry.expires_at > Instant::now() {
                Some(entry.snapshot.clone())
            } else {
                None
            }
        }))
    }

    fn put(&self, snapshot: &AvailabilitySnapshot) -> Result<(), CacheError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| CacheError::Command("cache lock poisoned".to_string()))?;

        entries.insert(
            snapshot.product_id,
            Entry {
                expires_at: Instant::now() + self.ttl,
                snapshot: snapshot.clone(),
            },
        );
        Ok(())
    }

    fn invalidate(&self, product_id: ProductId) -> Result<(), CacheError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| CacheError::Command("cache lock poisoned".to_string()))?;

        entries.remove(&product_id);
        Ok(())
    }
}
