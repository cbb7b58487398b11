//! Inventory domain core: authoritative stock bookkeeping per product.
//!
//! The entity here owns the counters (`quantity`, `reserved_quantity`) and the
//! pure derivations (`available_quantity`, `StockStatus`). Persistence and
//! caching adapters live in `storefront-infra` and implement the
//! [`InventoryService`] seam defined in this crate.

pub mod error;
pub mod reservation;
pub mod service;
pub mod stock;

pub use error::{InventoryError, InventoryResult};
pub use reservation::{LineItem, Reservation, ReservationState};
pub use service::InventoryService;
pub use stock::{
    derive_status, AvailabilitySnapshot, Inventory, InventorySummary, StockStatus,
};
