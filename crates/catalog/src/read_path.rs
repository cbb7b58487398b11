//! Composition of catalog metadata with availability for display.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::ProductId;
use storefront_inventory::{InventoryError, InventoryService, StockStatus};

use crate::product::ProductCatalog;

/// Product page view: metadata plus a best-effort stock figure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductView {
    pub product_id: ProductId,
    pub name: String,
    pub price: u64,
    pub is_active: bool,
    pub available_quantity: i64,
    pub status: StockStatus,
    pub stock_as_of: DateTime<Utc>,
}

/// Read path for product pages and cart display.
///
/// The availability shown here is advisory: a cart can see "in stock"
/// immediately before checkout is rejected with insufficient stock. Binding
/// decisions happen only in the reserve path.
pub struct CatalogReadPath {
    catalog: Arc<dyn ProductCatalog>,
    inventory: Arc<dyn InventoryService>,
}

impl CatalogReadPath {
    pub fn new(catalog: Arc<dyn ProductCatalog>, inventory: Arc<dyn InventoryService>) -> Self {
        Self { catalog, inventory }
    }

    /// Compose the product view, or `None` when the catalog has no such
    /// product. A product without an inventory row renders as out of stock
    /// rather than failing the page.
    pub async fn product_view(&self, product_id: ProductId) -> Option<ProductView> {
        let product = self.catalog.product(product_id).await?;

        let (available_quantity, status, stock_as_of) =
            match self.inventory.availability(product_id).await {
                Ok(snapshot) => (
                    snapshot.available_quantity,
                    snapshot.status,
                    snapshot.as_of,
                ),
                Err(InventoryError::ProductNotFound(_)) => {
                    (0, StockStatus::OutOfStock, Utc::now())
                }
                Err(_) => (0, StockStatus::OutOfStock, Utc::now()),
            };

        Some(ProductView {
            product_id,
            name: product.name,
            price: product.price,
            is_active: product.is_active,
            available_quantity,
            status,
            stock_as_of,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::{InMemoryCatalog, ProductSummary};
    use async_trait::async_trait;
    use storefront_core::{OrderId, ReservationId};
    use storefront_inventory::{
        AvailabilitySnapshot, InventoryResult, InventorySummary, LineItem, Reservation,
    };

    struct FixedAvailability(i64);

    #[async_trait]
    impl InventoryService for FixedAvailability {
        async fn create(
            &self,
            _product_id: ProductId,
            _initial_quantity: i64,
            _low_stock_threshold: i64,
            _location: Option<String>,
        ) -> InventoryResult<InventorySummary> {
            unimplemented!("read-path test double")
        }

        async fn reserve_order(
            &self,
            _order_id: OrderId,
            _line_items: &[LineItem],
        ) -> InventoryResult<Vec<Reservation>> {
            unimplemented!("read-path test double")
        }

        async fn commit(&self, _reservation_id: ReservationId) -> InventoryResult<Reservation> {
            unimplemented!("read-path test double")
        }

        async fn release(&self, _reservation_id: ReservationId) -> InventoryResult<Reservation> {
            unimplemented!("read-path test double")
        }

        async fn restock(
            &self,
            _product_id: ProductId,
            _delta: i64,
            _location: Option<String>,
        ) -> InventoryResult<InventorySummary> {
            unimplemented!("read-path test double")
        }

        async fn availability(
            &self,
            product_id: ProductId,
        ) -> InventoryResult<AvailabilitySnapshot> {
            if self.0 < 0 {
                return Err(InventoryError::ProductNotFound(product_id));
            }
            Ok(AvailabilitySnapshot {
                product_id,
                available_quantity: self.0,
                status: storefront_inventory::derive_status(self.0, 10),
                as_of: Utc::now(),
            })
        }
    }

    fn catalog_with(product_id: ProductId) -> Arc<InMemoryCatalog> {
        let catalog = InMemoryCatalog::new();
        catalog.insert(ProductSummary {
            product_id,
            name: "Espresso Cup".to_string(),
            price: 1250,
            is_active: true,
        });
        Arc::new(catalog)
    }

    #[tokio::test]
    async fn composes_metadata_with_availability() {
        let product_id = ProductId::new();
        let read_path = CatalogReadPath::new(
            catalog_with(product_id),
            Arc::new(FixedAvailability(42)),
        );

        let view = read_path.product_view(product_id).await.unwrap();
        assert_eq!(view.name, "Espresso Cup");
        assert_eq!(view.available_quantity, 42);
        assert_eq!(view.status, StockStatus::Sufficient);
    }

    #[tokio::test]
    async fn missing_inventory_row_renders_out_of_stock() {
        let product_id = ProductId::new();
        let read_path = CatalogReadPath::new(
            catalog_with(product_id),
            Arc::new(FixedAvailability(-1)),
        );

        let view = read_path.product_view(product_id).await.unwrap();
        assert_eq!(view.available_quantity, 0);
        assert_eq!(view.status, StockStatus::OutOfStock);
    }

    #[tokio::test]
    async fn unknown_product_is_none() {
        let read_path = CatalogReadPath::new(
            Arc::new(InMemoryCatalog::new()),
            Arc::new(FixedAvailability(5)),
        );
        assert!(read_path.product_view(ProductId::new()).await.is_none());
    }
}
