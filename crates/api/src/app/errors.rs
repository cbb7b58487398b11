use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use storefront_inventory::InventoryError;

/// Map the inventory taxonomy onto HTTP. Insufficient stock is a structured
/// 409 naming the offending product and the quantity actually available, so
/// clients can adjust the cart instead of blindly retrying.
pub fn inventory_error_to_response(err: InventoryError) -> axum::response::Response {
    match err {
        InventoryError::InsufficientStock {
            product_id,
            requested,
            available,
        } => (
            StatusCode::CONFLICT,
            axum::Json(json!({
                "error": "insufficient_stock",
                "product_id": product_id,
                "requested": requested,
                "available": available,
            })),
        )
            .into_response(),
        InventoryError::ProductNotFound(product_id) => json_error(
            StatusCode::NOT_FOUND,
            "product_not_found",
            format!("product not found: {product_id}"),
        ),
        InventoryError::ReservationNotFound(reservation_id) => json_error(
            StatusCode::NOT_FOUND,
            "reservation_not_found",
            format!("reservation not found: {reservation_id}"),
        ),
        InventoryError::InvalidInput(msg) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_input", msg)
        }
        InventoryError::ReservationFailed(msg) => {
            json_error(StatusCode::SERVICE_UNAVAILABLE, "reservation_failed", msg)
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
