//! Read-through caching wrapper around an inventory store.
//!
//! Invalidation lives here, inside the mutation methods, so every write path
//! invalidates automatically instead of relying on call sites to remember.
//! Reads fall back to the store when the cache misbehaves; writes never touch
//! the cache beyond deleting entries.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use storefront_core::{OrderId, ProductId, ReservationId};
use storefront_inventory::{
    AvailabilitySnapshot, InventoryResult, InventoryService, InventorySummary, LineItem,
    Reservation,
};

use crate::cache::AvailabilityCache;

pub struct CachedInventory {
    inner: Arc<dyn InventoryService>,
    cache: Arc<dyn AvailabilityCache>,
}

impl CachedInventory {
    pub fn new(inner: Arc<dyn InventoryService>, cache: Arc<dyn AvailabilityCache>) -> Self {
        Self { inner, cache }
    }

    /// Delete the snapshot; failure is non-fatal (TTL bounds the staleness).
    fn invalidate(&self, product_id: ProductId) {
        if let Err(err) = self.cache.invalidate(product_id) {
            warn!(%product_id, "availability cache invalidation failed: {err}");
        }
    }
}

#[async_trait]
impl InventoryService for CachedInventory {
    async fn create(
        &self,
        product_id: ProductId,
        initial_quantity: i64,
        low_stock_threshold: i64,
        location: Option<String>,
    ) -> InventoryResult<InventorySummary> {
        let summary = self
            .inner
            .create(product_id, initial_quantity, low_stock_threshold, location)
            .await?;
        self.invalidate(product_id);
        Ok(summary)
    }

    async fn reserve_order(
        &self,
        order_id: OrderId,
        line_items: &[LineItem],
    ) -> InventoryResult<Vec<Reservation>> {
        // The store alone decides; a stale snapshot can never admit an order.
        let reservations = self.inner.reserve_order(order_id, line_items).await?;

        let products: HashSet<ProductId> =
            reservations.iter().map(|r| r.product_id).collect();
        for product_id in products {
            self.invalidate(product_id);
        }
        Ok(reservations)
    }

    async fn commit(&self, reservation_id: ReservationId) -> InventoryResult<Reservation> {
        let reservation = self.inner.commit(reservation_id).await?;
        self.invalidate(reservation.product_id);
        Ok(reservation)
    }

    async fn release(&self, reservation_id: ReservationId) -> InventoryResult<Reservation> {
        let reservation = self.inner.release(reservation_id).await?;
        self.invalidate(reservation.product_id);
        Ok(reservation)
    }

    async fn restock(
        &self,
        product_id: ProductId,
        delta: i64,
        location: Option<String>,
    ) -> InventoryResult<InventorySummary> {
        let summary = self.inner.restock(product_id, delta, location).await?;
        self.invalidate(product_id);
        Ok(summary)
    }

    async fn availability(&self, product_id: ProductId) -> InventoryResult<AvailabilitySnapshot> {
        match self.cache.get(product_id) {
            Ok(Some(snapshot)) => return Ok(snapshot),
            Ok(None) => {}
            Err(err) => {
                warn!(%product_id, "availability cache unavailable, reading store directly: {err}");
            }
        }

        let snapshot = self.inner.availability(product_id).await?;
        if let Err(err) = self.cache.put(&snapshot) {
            warn!(%product_id, "availability cache populate failed: {err}");
        }
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use chrono::Utc;
    use storefront_inventory::{InventoryError, StockStatus};

    use crate::cache::{CacheError, InMemoryAvailabilityCache};
    use crate::store::InMemoryInventoryStore;

    struct FailingCache;

    impl AvailabilityCache for FailingCache {
        fn get(&self, _: ProductId) -> Result<Option<AvailabilitySnapshot>, CacheError> {
            Err(CacheError::Connection("cache down".to_string()))
        }

        fn put(&self, _: &AvailabilitySnapshot) -> Result<(), CacheError> {
            Err(CacheError::Connection("cache down".to_string()))
        }

        fn invalidate(&self, _: ProductId) -> Result<(), CacheError> {
            Err(CacheError::Connection("cache down".to_string()))
        }
    }

    fn line(product_id: ProductId, quantity: i64) -> LineItem {
        LineItem {
            product_id,
            quantity,
        }
    }

    async fn wired(
        quantity: i64,
    ) -> (CachedInventory, Arc<InMemoryInventoryStore>, Arc<InMemoryAvailabilityCache>, ProductId)
    {
        let store = Arc::new(InMemoryInventoryStore::new());
        let cache = Arc::new(InMemoryAvailabilityCache::new(Duration::from_secs(60)));
        let cached = CachedInventory::new(store.clone(), cache.clone());
        let product_id = ProductId::new();
        cached.create(product_id, quantity, 2, None).await.unwrap();
        (cached, store, cache, product_id)
    }

    #[tokio::test]
    async fn read_through_populates_and_serves_until_invalidated() {
        let (cached, store, _cache, product_id) = wired(10).await;

        assert_eq!(
            cached.availability(product_id).await.unwrap().available_quantity,
            10
        );

        // Mutate the store behind the wrapper's back: the cached snapshot is
        // now stale and keeps being served.
        store
            .reserve_order(OrderId::new(), &[line(product_id, 4)])
            .await
            .unwrap();
        assert_eq!(
            cached.availability(product_id).await.unwrap().available_quantity,
            10
        );

        // A mutation through the wrapper invalidates, forcing a fresh read.
        cached.restock(product_id, 5, None).await.unwrap();
        assert_eq!(
            cached.availability(product_id).await.unwrap().available_quantity,
            11
        );
    }

    #[tokio::test]
    async fn stale_cache_cannot_cause_oversell() {
        let (cached, _store, cache, product_id) = wired(10).await;

        // Force a stale snapshot claiming far more stock than exists.
        cache
            .put(&AvailabilitySnapshot {
                product_id,
                available_quantity: 100,
                status: StockStatus::Sufficient,
                as_of: Utc::now(),
            })
            .unwrap();
        assert_eq!(
            cached.availability(product_id).await.unwrap().available_quantity,
            100
        );

        // The reserve path never consults the cache, so the true figure wins.
        let err = cached
            .reserve_order(OrderId::new(), &[line(product_id, 50)])
            .await
            .unwrap_err();
        match err {
            InventoryError::InsufficientStock {
                requested,
                available,
                ..
            } => {
                assert_eq!(requested, 50);
                assert_eq!(available, 10);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn every_mutation_invalidates() {
        let (cached, _store, cache, product_id) = wired(10).await;

        // Populate, then reserve through the wrapper: entry must be gone.
        cached.availability(product_id).await.unwrap();
        let reservations = cached
            .reserve_order(OrderId::new(), &[line(product_id, 3)])
            .await
            .unwrap();
        assert!(cache.get(product_id).unwrap().is_none());

        cached.availability(product_id).await.unwrap();
        cached.commit(reservations[0].reservation_id).await.unwrap();
        assert!(cache.get(product_id).unwrap().is_none());

        cached.availability(product_id).await.unwrap();
        cached.restock(product_id, 1, None).await.unwrap();
        assert!(cache.get(product_id).unwrap().is_none());

        assert_eq!(
            cached.availability(product_id).await.unwrap().available_quantity,
            8
        );
    }

    #[tokio::test]
    async fn cache_failure_degrades_to_store_reads() {
        let store = Arc::new(InMemoryInventoryStore::new());
        let cached = CachedInventory::new(store.clone(), Arc::new(FailingCache));
        let product_id = ProductId::new();
        cached.create(product_id, 10, 2, None).await.unwrap();

        // Reads and writes both succeed despite the cache erroring throughout.
        assert_eq!(
            cached.availability(product_id).await.unwrap().available_quantity,
            10
        );
        cached
            .reserve_order(OrderId::new(), &[line(product_id, 4)])
            .await
            .unwrap();
        assert_eq!(
            cached.availability(product_id).await.unwrap().available_quantity,
            6
        );
    }
}
