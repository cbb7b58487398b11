//! The inventory service seam.
//!
//! Both backends (Postgres, in-memory) implement this trait, and the caching
//! wrapper decorates it. Callers — the HTTP surface, the catalog read path —
//! only ever see the trait.

use async_trait::async_trait;

use storefront_core::{OrderId, ProductId, ReservationId};

use crate::error::InventoryResult;
use crate::reservation::{LineItem, Reservation};
use crate::stock::{AvailabilitySnapshot, InventorySummary};

/// Inventory operations exposed to collaborators.
///
/// Write-path contract: `reserve_order` is all-or-nothing across its line
/// items; `commit`/`release` are idempotent per token; no operation here ever
/// consults a cache for its decision.
#[async_trait]
pub trait InventoryService: Send + Sync {
    /// Seed the inventory row for a product. Duplicate creation is
    /// `InvalidInput`.
    async fn create(
        &self,
        product_id: ProductId,
        initial_quantity: i64,
        low_stock_threshold: i64,
        location: Option<String>,
    ) -> InventoryResult<InventorySummary>;

    /// Claim stock for every line item of an order as a single unit.
    ///
    /// Either all items are reserved (returns one pending [`Reservation`] per
    /// line, in the order given) or none are and the first shortage is
    /// reported as `InsufficientStock`.
    async fn reserve_order(
        &self,
        order_id: OrderId,
        line_items: &[LineItem],
    ) -> InventoryResult<Vec<Reservation>>;

    /// Finalize a reservation: units permanently leave stock. No-op if the
    /// token is already settled.
    async fn commit(&self, reservation_id: ReservationId) -> InventoryResult<Reservation>;

    /// Cancel a reservation: units return to availability. No-op if the token
    /// is already settled.
    async fn release(&self, reservation_id: ReservationId) -> InventoryResult<Reservation>;

    /// Add physical stock.
    async fn restock(
        &self,
        product_id: ProductId,
        delta: i64,
        location: Option<String>,
    ) -> InventoryResult<InventorySummary>;

    /// Point-in-time availability estimate. Advisory only: suitable for
    /// product pages and cart display, never for an allocation decision.
    async fn availability(&self, product_id: ProductId) -> InventoryResult<AvailabilitySnapshot>;
}
