//! In-memory inventory store.
//!
//! Intended for tests/dev. A single mutex linearizes every operation, so the
//! all-or-nothing reservation semantics fall out of check-then-apply under one
//! guard. The guard is never held across an await point.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use storefront_core::{OrderId, ProductId, ReservationId};
use storefront_inventory::{
    AvailabilitySnapshot, Inventory, InventoryError, InventoryResult, InventoryService,
    InventorySummary, LineItem, Reservation, ReservationState,
};

#[derive(Debug, Default)]
struct State {
    inventory: HashMap<ProductId, Inventory>,
    reservations: HashMap<ReservationId, Reservation>,
}

/// Mutex-linearized inventory store with the same contract as the Postgres
/// backend.
#[derive(Debug, Default)]
pub struct InMemoryInventoryStore {
    state: Mutex<State>,
}

impl InMemoryInventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> InventoryResult<std::sync::MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| InventoryError::failed("inventory store lock poisoned"))
    }
}

#[async_trait]
impl InventoryService for InMemoryInventoryStore {
    async fn create(
        &self,
        product_id: ProductId,
        initial_quantity: i64,
        low_stock_threshold: i64,
        location: Option<String>,
    ) -> InventoryResult<InventorySummary> {
        let inv = Inventory::new(product_id, initial_quantity, low_stock_threshold, location)?;

        let mut state = self.lock()?;
        if state.inventory.contains_key(&product_id) {
            return Err(InventoryError::invalid_input(format!(
                "inventory already exists for product {product_id}"
            )));
        }
        let summary = inv.summary();
        state.inventory.insert(product_id, inv);
        Ok(summary)
    }

    async fn reserve_order(
        &self,
        order_id: OrderId,
        line_items: &[LineItem],
    ) -> InventoryResult<Vec<Reservation>> {
        if line_items.is_empty() {
            return Err(InventoryError::invalid_input(
                "order has no line items",
            ));
        }
        for item in line_items {
            if item.quantity <= 0 {
                return Err(InventoryError::invalid_input(
                    "reserve quantity must be positive",
                ));
            }
        }

        let now = Utc::now();
        let mut state = self.lock()?;

        // Apply against a scratch copy; on any shortage the copy is discarded,
        // mirroring a transaction rollback.
        let mut scratch = state.inventory.clone();
        let mut reservations = Vec::with_capacity(line_items.len());
        for item in line_items {
            let inv = scratch
                .get_mut(&item.product_id)
                .ok_or(InventoryError::ProductNotFound(item.product_id))?;
            if let Err(err) = inv.try_reserve(item.quantity) {
                // Report the availability the store holds now, not the
                // partially-applied scratch figure.
                return Err(match err {
                    InventoryError::InsufficientStock {
                        product_id,
                        requested,
                        ..
                    } => {
                        let available = state
                            .inventory
                            .get(&product_id)
                            .map(|inv| inv.available_quantity())
                            .unwrap_or(0);
                        InventoryError::insufficient(product_id, requested, available)
                    }
                    other => other,
                });
            }
            reservations.push(Reservation::pending(
                order_id,
                item.product_id,
                item.quantity,
                now,
            ));
        }

        state.inventory = scratch;
        for res in &reservations {
            state.reservations.insert(res.reservation_id, res.clone());
        }
        Ok(reservations)
    }

    async fn commit(&self, reservation_id: ReservationId) -> InventoryResult<Reservation> {
        let mut state = self.lock()?;
        let mut res = state
            .reservations
            .get(&reservation_id)
            .cloned()
            .ok_or(InventoryError::ReservationNotFound(reservation_id))?;

        if res.state.is_settled() {
            return Ok(res);
        }

        if let Some(inv) = state.inventory.get_mut(&res.product_id) {
            inv.commit_units(res.quantity);
        }
        res.state = ReservationState::Committed;
        state.reservations.insert(reservation_id, res.clone());
        Ok(res)
    }

    async fn release(&self, reservation_id: ReservationId) -> InventoryResult<Reservation> {
        let mut state = self.lock()?;
        let mut res = state
            .reservations
            .get(&reservation_id)
            .cloned()
            .ok_or(InventoryError::ReservationNotFound(reservation_id))?;

        if res.state.is_settled() {
            return Ok(res);
        }

        if let Some(inv) = state.inventory.get_mut(&res.product_id) {
            inv.release_units(res.quantity);
        }
        res.state = ReservationState::Released;
        state.reservations.insert(reservation_id, res.clone());
        Ok(res)
    }

    async fn restock(
        &self,
        product_id: ProductId,
        delta: i64,
        location: Option<String>,
    ) -> InventoryResult<InventorySummary> {
        let mut state = self.lock()?;
        let inv = state
            .inventory
            .get_mut(&product_id)
            .ok_or(InventoryError::ProductNotFound(product_id))?;
        inv.restock(delta, location, Utc::now())?;
        Ok(inv.summary())
    }

    async fn availability(&self, product_id: ProductId) -> InventoryResult<AvailabilitySnapshot> {
        let state = self.lock()?;
        let inv = state
            .inventory
            .get(&product_id)
            .ok_or(InventoryError::ProductNotFound(product_id))?;
        Ok(inv.snapshot(Utc::now()))
    }
}
