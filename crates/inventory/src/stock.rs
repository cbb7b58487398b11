//! Stock ledger entity and pure status derivation.
//!
//! `Inventory` is the single shared mutable resource in the core. The methods
//! here express every mutation as a guarded check-and-apply so the in-memory
//! store inherits the exact semantics the Postgres store enforces with atomic
//! conditional updates; neither path ever does a separate read-then-write.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::ProductId;

use crate::error::{InventoryError, InventoryResult};

/// Stock health for display and low-stock alerting. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    Sufficient,
    LowStock,
    OutOfStock,
}

/// Derive stock status from availability.
///
/// The boundary is inclusive: exactly at the threshold is `LowStock`, not
/// `Sufficient`.
pub fn derive_status(available_quantity: i64, low_stock_threshold: i64) -> StockStatus {
    if available_quantity <= 0 {
        StockStatus::OutOfStock
    } else if available_quantity <= low_stock_threshold {
        StockStatus::LowStock
    } else {
        StockStatus::Sufficient
    }
}

/// Authoritative inventory record, one per product.
///
/// Invariants after every committed mutation:
/// - `quantity >= 0`
/// - `0 <= reserved_quantity <= quantity`
/// - `available_quantity() == quantity - reserved_quantity`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inventory {
    product_id: ProductId,
    quantity: i64,
    reserved_quantity: i64,
    low_stock_threshold: i64,
    location: Option<String>,
    last_restocked_at: Option<DateTime<Utc>>,
}

impl Inventory {
    pub fn new(
        product_id: ProductId,
        initial_quantity: i64,
        low_stock_threshold: i64,
        location: Option<String>,
    ) -> InventoryResult<Self> {
        if initial_quantity < 0 {
            return Err(InventoryError::invalid_input(
                "initial quantity cannot be negative",
            ));
        }
        if low_stock_threshold < 0 {
            return Err(InventoryError::invalid_input(
                "low stock threshold cannot be negative",
            ));
        }
        Ok(Self {
            product_id,
            quantity: initial_quantity,
            reserved_quantity: 0,
            low_stock_threshold,
            location,
            last_restocked_at: None,
        })
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn reserved_quantity(&self) -> i64 {
        self.reserved_quantity
    }

    /// Units sellable right now.
    pub fn available_quantity(&self) -> i64 {
        self.quantity - self.reserved_quantity
    }

    pub fn low_stock_threshold(&self) -> i64 {
        self.low_stock_threshold
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn last_restocked_at(&self) -> Option<DateTime<Utc>> {
        self.last_restocked_at
    }

    pub fn status(&self) -> StockStatus {
        derive_status(self.available_quantity(), self.low_stock_threshold)
    }

    /// Provisionally claim `qty` units. Equivalent to the conditional update
    /// `SET reserved = reserved + qty WHERE available >= qty`; fails without
    /// side effects when availability is insufficient. Returns the new
    /// availability on success.
    pub fn try_reserve(&mut self, qty: i64) -> InventoryResult<i64> {
        if qty <= 0 {
            return Err(InventoryError::invalid_input(
                "reserve quantity must be positive",
            ));
        }
        let available = self.available_quantity();
        if available < qty {
            return Err(InventoryError::insufficient(self.product_id, qty, available));
        }
        self.reserved_quantity += qty;
        Ok(self.available_quantity())
    }

    /// Return `qty` reserved units to availability, floored at zero. The
    /// caller passes the exact quantity it reserved (tracked per token), never
    /// a recomputed one.
    pub fn release_units(&mut self, qty: i64) {
        self.reserved_quantity = (self.reserved_quantity - qty).max(0);
    }

    /// Convert `qty` reserved units into a permanent decrement (fulfillment).
    pub fn commit_units(&mut self, qty: i64) {
        self.quantity -= qty;
        self.reserved_quantity = (self.reserved_quantity - qty).max(0);
    }

    /// Add `delta` physical units, updating restock metadata.
    pub fn restock(
        &mut self,
        delta: i64,
        location: Option<String>,
        now: DateTime<Utc>,
    ) -> InventoryResult<()> {
        if delta <= 0 {
            return Err(InventoryError::invalid_input(
                "restock delta must be positive",
            ));
        }
        self.quantity += delta;
        if location.is_some() {
            self.location = location;
        }
        self.last_restocked_at = Some(now);
        Ok(())
    }

    pub fn summary(&self) -> InventorySummary {
        InventorySummary {
            product_id: self.product_id,
            quantity: self.quantity,
            reserved_quantity: self.reserved_quantity,
            available_quantity: self.available_quantity(),
            status: self.status(),
            low_stock_threshold: self.low_stock_threshold,
            location: self.location.clone(),
            last_restocked_at: self.last_restocked_at,
        }
    }

    pub fn snapshot(&self, as_of: DateTime<Utc>) -> AvailabilitySnapshot {
        AvailabilitySnapshot {
            product_id: self.product_id,
            available_quantity: self.available_quantity(),
            status: self.status(),
            as_of,
        }
    }
}

/// Full inventory view returned by write operations (create/restock).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySummary {
    pub product_id: ProductId,
    pub quantity: i64,
    pub reserved_quantity: i64,
    pub available_quantity: i64,
    pub status: StockStatus,
    pub low_stock_threshold: i64,
    pub location: Option<String>,
    pub last_restocked_at: Option<DateTime<Utc>>,
}

/// Point-in-time availability, the unit the cache stores. Disposable; never
/// authoritative; may be stale by at most the cache TTL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilitySnapshot {
    pub product_id: ProductId,
    pub available_quantity: i64,
    pub status: StockStatus,
    pub as_of: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inventory(quantity: i64, threshold: i64) -> Inventory {
        Inventory::new(ProductId::new(), quantity, threshold, None).unwrap()
    }

    #[test]
    fn status_boundaries_are_inclusive_at_threshold() {
        assert_eq!(derive_status(11, 10), StockStatus::Sufficient);
        assert_eq!(derive_status(10, 10), StockStatus::LowStock);
        assert_eq!(derive_status(1, 10), StockStatus::LowStock);
        assert_eq!(derive_status(0, 10), StockStatus::OutOfStock);
        assert_eq!(derive_status(-3, 10), StockStatus::OutOfStock);
    }

    #[test]
    fn reserve_reduces_availability_not_quantity() {
        let mut inv = inventory(10, 2);
        let available = inv.try_reserve(6).unwrap();
        assert_eq!(available, 4);
        assert_eq!(inv.quantity(), 10);
        assert_eq!(inv.reserved_quantity(), 6);
    }

    #[test]
    fn reserve_beyond_availability_fails_with_actual_available() {
        let mut inv = inventory(10, 2);
        inv.try_reserve(6).unwrap();

        let err = inv.try_reserve(6).unwrap_err();
        match err {
            InventoryError::InsufficientStock {
                requested,
                available,
                ..
            } => {
                assert_eq!(requested, 6);
                assert_eq!(available, 4);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }
        // Failed reserve leaves no side effects.
        assert_eq!(inv.available_quantity(), 4);
    }

    #[test]
    fn reserve_rejects_non_positive_quantities() {
        let mut inv = inventory(10, 2);
        assert!(matches!(
            inv.try_reserve(0),
            Err(InventoryError::InvalidInput(_))
        ));
        assert!(matches!(
            inv.try_reserve(-1),
            Err(InventoryError::InvalidInput(_))
        ));
    }

    #[test]
    fn release_restores_availability() {
        let mut inv = inventory(10, 2);
        inv.try_reserve(6).unwrap();
        inv.release_units(6);
        assert_eq!(inv.available_quantity(), 10);
        assert_eq!(inv.reserved_quantity(), 0);
    }

    #[test]
    fn release_is_floored_at_zero() {
        let mut inv = inventory(10, 2);
        inv.try_reserve(3).unwrap();
        inv.release_units(5);
        assert_eq!(inv.reserved_quantity(), 0);
        assert_eq!(inv.available_quantity(), 10);
    }

    #[test]
    fn commit_converts_reservation_into_real_decrement() {
        let mut inv = inventory(10, 2);
        inv.try_reserve(4).unwrap();
        inv.commit_units(4);
        assert_eq!(inv.quantity(), 6);
        assert_eq!(inv.reserved_quantity(), 0);
        assert_eq!(inv.available_quantity(), 6);
    }

    #[test]
    fn restock_updates_quantity_and_metadata() {
        let mut inv = inventory(1, 5);
        let now = Utc::now();
        inv.restock(9, Some("warehouse-b".into()), now).unwrap();
        assert_eq!(inv.quantity(), 10);
        assert_eq!(inv.location(), Some("warehouse-b"));
        assert_eq!(inv.last_restocked_at(), Some(now));
        assert_eq!(inv.status(), StockStatus::Sufficient);
    }

    #[test]
    fn restock_rejects_non_positive_delta() {
        let mut inv = inventory(1, 5);
        assert!(matches!(
            inv.restock(0, None, Utc::now()),
            Err(InventoryError::InvalidInput(_))
        ));
        assert!(matches!(
            inv.restock(-4, None, Utc::now()),
            Err(InventoryError::InvalidInput(_))
        ));
    }

    #[test]
    fn new_rejects_negative_initial_state() {
        assert!(Inventory::new(ProductId::new(), -1, 0, None).is_err());
        assert!(Inventory::new(ProductId::new(), 1, -1, None).is_err());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Reserve then release restores availability exactly.
            #[test]
            fn reserve_release_round_trips(
                quantity in 0i64..10_000,
                qty in 1i64..10_000,
            ) {
                let mut inv = inventory(quantity, 10);
                let before = inv.available_quantity();
                if inv.try_reserve(qty).is_ok() {
                    inv.release_units(qty);
                }
                prop_assert_eq!(inv.available_quantity(), before);
            }

            /// A sequence of reserves never drives availability negative and
            /// the accepted total never exceeds the starting quantity.
            #[test]
            fn reserves_never_oversell(
                quantity in 0i64..1_000,
                requests in proptest::collection::vec(1i64..200, 0..32),
            ) {
                let mut inv = inventory(quantity, 10);
                let mut accepted = 0i64;
                for qty in requests {
                    if inv.try_reserve(qty).is_ok() {
                        accepted += qty;
                    }
                }
                prop_assert!(accepted <= quantity);
                prop_assert!(inv.available_quantity() >= 0);
                prop_assert_eq!(inv.available_quantity(), quantity - accepted);
            }

            /// Derived status always agrees with the raw counters.
            #[test]
            fn status_matches_availability(
                available in -1_000i64..1_000,
                threshold in 0i64..1_000,
            ) {
                let status = derive_status(available, threshold);
                match status {
                    StockStatus::OutOfStock => prop_assert!(available <= 0),
                    StockStatus::LowStock => {
                        prop_assert!(available > 0 && available <= threshold)
                    }
                    StockStatus::Sufficient => prop_assert!(available > threshold),
                }
            }
        }
    }
}
