//! Application wiring: services, router, env-driven configuration.
//!
//! In-memory stores by default (dev/test). With the `redis` feature and
//! `USE_PERSISTENT_STORES=true`, the store is Postgres and the availability
//! cache is Redis. The catalog collaborator is an in-memory stand-in in both
//! modes; product metadata is owned by an external service in this system.

pub mod dto;
pub mod errors;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::Extension, Router};
use tower::ServiceBuilder;

use storefront_catalog::{CatalogReadPath, InMemoryCatalog};
use storefront_infra::{CachedInventory, InMemoryAvailabilityCache, InMemoryInventoryStore};
use storefront_inventory::InventoryService;

#[cfg(feature = "redis")]
use sqlx::postgres::PgPool;
#[cfg(feature = "redis")]
use storefront_infra::{PostgresInventoryStore, RedisAvailabilityCache};

/// Shared handle to the (cache-wrapped) inventory service.
pub type SharedInventory = Arc<dyn InventoryService>;

const DEFAULT_AVAILABILITY_TTL_SECS: u64 = 5;

fn availability_ttl_secs() -> u64 {
    std::env::var("AVAILABILITY_TTL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_AVAILABILITY_TTL_SECS)
}

fn build_in_memory_services() -> SharedInventory {
    let store = Arc::new(InMemoryInventoryStore::new());
    let cache = Arc::new(InMemoryAvailabilityCache::new(Duration::from_secs(
        availability_ttl_secs(),
    )));
    Arc::new(CachedInventory::new(store, cache))
}

#[cfg(feature = "redis")]
async fn build_persistent_services() -> SharedInventory {
    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set when USE_PERSISTENT_STORES=true");
    let redis_url =
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());

    let pool = PgPool::connect(&database_url)
        .await
        .expect("failed to connect to Postgres");

    let mut store = PostgresInventoryStore::new(pool);
    if let Some(timeout_ms) = std::env::var("RESERVATION_TIMEOUT_MS")
        .ok()
        .and_then(|v| v.parse().ok())
    {
        store = store.with_reservation_timeout(Duration::from_millis(timeout_ms));
    }
    store
        .run_migrations()
        .await
        .expect("failed to run inventory migrations");

    let cache = RedisAvailabilityCache::new(&redis_url, availability_ttl_secs())
        .expect("failed to create Redis availability cache");

    Arc::new(CachedInventory::new(Arc::new(store), Arc::new(cache)))
}

/// Build the full application router with its services wired in.
pub async fn build_app() -> Router {
    let use_persistent = std::env::var("USE_PERSISTENT_STORES")
        .map(|v| v == "true")
        .unwrap_or(false);

    #[cfg(feature = "redis")]
    let inventory: SharedInventory = if use_persistent {
        build_persistent_services().await
    } else {
        build_in_memory_services()
    };

    #[cfg(not(feature = "redis"))]
    let inventory: SharedInventory = {
        if use_persistent {
            tracing::warn!(
                "USE_PERSISTENT_STORES=true but the 'redis' feature is disabled; using in-memory stores"
            );
        }
        build_in_memory_services()
    };

    let catalog = Arc::new(InMemoryCatalog::new());
    let read_path = Arc::new(CatalogReadPath::new(catalog.clone(), inventory.clone()));

    Router::new()
        .nest("/inventory", routes::inventory::router())
        .nest("/reservations", routes::reservations::router())
        .nest("/products", routes::catalog::router())
        .merge(routes::system::router())
        .layer(
            ServiceBuilder::new()
                .layer(Extension(inventory))
                .layer(Extension(catalog))
                .layer(Extension(read_path)),
        )
}
