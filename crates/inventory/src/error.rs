//! Inventory error taxonomy.
//!
//! Every failure the ledger or coordinator can produce is a typed variant so
//! callers can tell "out of stock, adjust the cart" (terminal, user-facing)
//! from "try again with a fresh attempt" (transient). `InsufficientStock` is an
//! expected business rejection and is never logged at error level.

use thiserror::Error;

use storefront_core::{ProductId, ReservationId};

/// Result type used by the stock ledger and reservation coordinator.
pub type InventoryResult<T> = Result<T, InventoryError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InventoryError {
    /// Business rejection: the requested quantity exceeds current availability.
    /// Carries the figure actually available so the client can adjust instead
    /// of blindly retrying.
    #[error("insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: ProductId,
        requested: i64,
        available: i64,
    },

    /// No inventory row exists for this product.
    #[error("product not found: {0}")]
    ProductNotFound(ProductId),

    /// No reservation exists for this token (distinct from an already-settled
    /// token, which is an idempotent no-op).
    #[error("reservation not found: {0}")]
    ReservationNotFound(ReservationId),

    /// Malformed request: non-positive quantity/delta, empty order, duplicate
    /// inventory row.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Transaction, timeout or store failure. Retryable by the caller with a
    /// new attempt; never retried internally.
    #[error("reservation failed: {0}")]
    ReservationFailed(String),
}

impl InventoryError {
    pub fn insufficient(product_id: ProductId, requested: i64, available: i64) -> Self {
        Self::InsufficientStock {
            product_id,
            requested,
            available,
        }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn failed(msg: impl Into<String>) -> Self {
        Self::ReservationFailed(msg.into())
    }

    /// Whether the caller may usefully retry the same request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ReservationFailed(_))
    }
}
