use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use storefront_core::ProductId;

use crate::app::{dto, errors, SharedInventory};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_inventory))
        .route("/:id/restock", post(restock))
        .route("/:id/availability", get(get_availability))
}

pub async fn create_inventory(
    Extension(inventory): Extension<SharedInventory>,
    Json(body): Json<dto::CreateInventoryRequest>,
) -> axum::response::Response {
    match inventory
        .create(
            body.product_id,
            body.initial_quantity,
            body.low_stock_threshold,
            body.location,
        )
        .await
    {
        Ok(summary) => (StatusCode::CREATED, Json(summary)).into_response(),
        Err(e) => errors::inventory_error_to_response(e),
    }
}

pub async fn restock(
    Extension(inventory): Extension<SharedInventory>,
    Path(id): Path<String>,
    Json(body): Json<dto::RestockRequest>,
) -> axum::response::Response {
    let product_id: ProductId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id")
        }
    };

    match inventory.restock(product_id, body.delta, body.location).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => errors::inventory_error_to_response(e),
    }
}

/// Cache-backed, best-effort freshness. Advisory only; carts must not treat
/// this as a guarantee that checkout will succeed.
pub async fn get_availability(
    Extension(inventory): Extension<SharedInventory>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let product_id: ProductId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id")
        }
    };

    match inventory.availability(product_id).await {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(e) => errors::inventory_error_to_response(e),
    }
}
