//! Product metadata collaborator interface.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use storefront_core::ProductId;

/// Display metadata for one product, supplied by the catalog service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub product_id: ProductId,
    pub name: String,
    /// Price in smallest currency unit (e.g., cents).
    pub price: u64,
    pub is_active: bool,
}

/// Catalog collaborator: `product_id -> {name, price, is_active}`.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    async fn product(&self, product_id: ProductId) -> Option<ProductSummary>;
}

/// In-memory catalog for dev/test wiring.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    products: RwLock<HashMap<ProductId, ProductSummary>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, product: ProductSummary) {
        if let Ok(mut products) = self.products.write() {
            products.insert(product.product_id, product);
        }
    }
}

#[async_trait]
impl ProductCatalog for InMemoryCatalog {
    async fn product(&self, product_id: ProductId) -> Option<ProductSummary> {
        self.products
            .read()
            .ok()
            .and_then(|products| products.get(&product_id).cloned())
    }
}
