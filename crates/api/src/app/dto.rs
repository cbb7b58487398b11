//! Request/response shapes for the HTTP surface.

use serde::{Deserialize, Serialize};

use storefront_core::{OrderId, ProductId, ReservationId};
use storefront_inventory::{LineItem, Reservation, ReservationState};

#[derive(Debug, Deserialize)]
pub struct CreateInventoryRequest {
    pub product_id: ProductId,
    pub initial_quantity: i64,
    #[serde(default)]
    pub low_stock_threshold: i64,
    pub location: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RestockRequest {
    pub delta: i64,
    pub location: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LineItemRequest {
    pub product_id: ProductId,
    pub quantity: i64,
}

impl From<&LineItemRequest> for LineItem {
    fn from(req: &LineItemRequest) -> Self {
        Self {
            product_id: req.product_id,
            quantity: req.quantity,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ReserveRequest {
    pub order_id: OrderId,
    pub line_items: Vec<LineItemRequest>,
}

#[derive(Debug, Serialize)]
pub struct ReservationResponse {
    pub reservation_id: ReservationId,
    pub product_id: ProductId,
    pub quantity: i64,
    pub state: ReservationState,
}

impl From<&Reservation> for ReservationResponse {
    fn from(res: &Reservation) -> Self {
        Self {
            reservation_id: res.reservation_id,
            product_id: res.product_id,
            quantity: res.quantity,
            state: res.state,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReserveResponse {
    pub order_id: OrderId,
    pub reservations: Vec<ReservationResponse>,
}

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub product_id: ProductId,
    pub name: String,
    pub price: u64,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}
