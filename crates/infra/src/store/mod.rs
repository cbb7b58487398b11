//! Inventory store backends.
//!
//! Both backends implement `storefront_inventory::InventoryService` with
//! identical semantics: all-or-nothing multi-item reservation, idempotent
//! settle per token, and mutations expressed as atomic conditional updates
//! (row-level in Postgres, mutex-linearized in memory).

mod in_memory;
mod postgres;

pub use in_memory::InMemoryInventoryStore;
pub use postgres::PostgresInventoryStore;
