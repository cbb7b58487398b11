//! Shared kernel: strongly-typed identifiers and the cross-cutting error model.

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{OrderId, ProductId, ReservationId};
