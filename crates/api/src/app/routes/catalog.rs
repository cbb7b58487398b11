use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use storefront_catalog::{CatalogReadPath, InMemoryCatalog, ProductSummary};
use storefront_core::ProductId;

use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_product))
        .route("/:id", get(get_product))
}

/// Dev stand-in for the external catalog service: registers display metadata
/// so the read path has something to compose.
pub async fn create_product(
    Extension(catalog): Extension<Arc<InMemoryCatalog>>,
    Json(body): Json<dto::CreateProductRequest>,
) -> axum::response::Response {
    catalog.insert(ProductSummary {
        product_id: body.product_id,
        name: body.name,
        price: body.price,
        is_active: body.is_active,
    });

    (
        StatusCode::CREATED,
        Json(serde_json::json!({ "product_id": body.product_id })),
    )
        .into_response()
}

pub async fn get_product(
    Extension(read_path): Extension<Arc<CatalogReadPath>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let product_id: ProductId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id")
        }
    };

    match read_path.product_view(product_id).await {
        Some(view) => (StatusCode::OK, Json(view)).into_response(),
        None => errors::json_error(StatusCode::NOT_FOUND, "not_found", "product not found"),
    }
}
