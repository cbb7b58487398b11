//! Reservation lifecycle types.
//!
//! A reservation is a provisional claim one order line holds on stock. It is
//! created atomically with the order's checkout transaction and always
//! terminates as committed (units leave stock) or released (units return to
//! availability) — never left dangling.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::{OrderId, ProductId, ReservationId};

/// One line of an order: what to claim, and how much.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: ProductId,
    pub quantity: i64,
}

/// Reservation lifecycle. `Pending` is the only state holding reserved units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationState {
    Pending,
    Committed,
    Released,
}

impl ReservationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Committed => "committed",
            Self::Released => "released",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "committed" => Some(Self::Committed),
            "released" => Some(Self::Released),
            _ => None,
        }
    }

    /// A settled token (committed or released) makes further settle calls
    /// idempotent no-ops.
    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// A per-line-item claim. The recorded `quantity` is the exact amount the
/// ledger reserved and is the only amount ever committed or released for this
/// token; double-settling is prevented by the state transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub reservation_id: ReservationId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: i64,
    pub state: ReservationState,
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    pub fn pending(
        order_id: OrderId,
        product_id: ProductId,
        quantity: i64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            reservation_id: ReservationId::new(),
            order_id,
            product_id,
            quantity,
            state: ReservationState::Pending,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_round_trips_through_strings() {
        for state in [
            ReservationState::Pending,
            ReservationState::Committed,
            ReservationState::Released,
        ] {
            assert_eq!(ReservationState::parse(state.as_str()), Some(state));
        }
        assert_eq!(ReservationState::parse("cancelled"), None);
    }

    #[test]
    fn only_pending_is_unsettled() {
        assert!(!ReservationState::Pending.is_settled());
        assert!(ReservationState::Committed.is_settled());
        assert!(ReservationState::Released.is_settled());
    }
}
