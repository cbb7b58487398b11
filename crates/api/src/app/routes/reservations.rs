use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};

use storefront_core::ReservationId;
use storefront_inventory::LineItem;

use crate::app::{dto, errors, SharedInventory};

pub fn router() -> Router {
    Router::new()
        .route("/", post(reserve))
        .route("/:id/commit", post(commit))
        .route("/:id/release", post(release))
}

/// All-or-nothing claim for every line item of an order. A shortage on any
/// line rejects the whole order with a 409 naming the offender.
pub async fn reserve(
    Extension(inventory): Extension<SharedInventory>,
    Json(body): Json<dto::ReserveRequest>,
) -> axum::response::Response {
    let line_items: Vec<LineItem> = body.line_items.iter().map(LineItem::from).collect();

    match inventory.reserve_order(body.order_id, &line_items).await {
        Ok(reservations) => (
            StatusCode::CREATED,
            Json(dto::ReserveResponse {
                order_id: body.order_id,
                reservations: reservations.iter().map(Into::into).collect(),
            }),
        )
            .into_response(),
        Err(e) => errors::inventory_error_to_response(e),
    }
}

pub async fn commit(
    Extension(inventory): Extension<SharedInventory>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let reservation_id: ReservationId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_id",
                "invalid reservation id",
            )
        }
    };

    match inventory.commit(reservation_id).await {
        Ok(reservation) => {
            (StatusCode::OK, Json(dto::ReservationResponse::from(&reservation))).into_response()
        }
        Err(e) => errors::inventory_error_to_response(e),
    }
}

pub async fn release(
    Extension(inventory): Extension<SharedInventory>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let reservation_id: ReservationId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_id",
                "invalid reservation id",
            )
        }
    };

    match inventory.release(reservation_id).await {
        Ok(reservation) => {
            (StatusCode::OK, Json(dto::ReservationResponse::from(&reservation))).into_response()
        }
        Err(e) => errors::inventory_error_to_response(e),
    }
}
