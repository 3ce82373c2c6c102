use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use kaite_catalog::{MerchCategory, MerchProduct};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct ProductsQuery {
    pub category: Option<String>,
}

/// Listing envelope the shop page expects
#[derive(Debug, Serialize)]
pub struct ProductsResponse {
    pub success: bool,
    pub products: Vec<MerchProduct>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/shop/products", get(list_products))
        .route("/api/shop/products/{id}", get(get_product))
}

/// GET /api/shop/products?category=
async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductsQuery>,
) -> (StatusCode, Json<ProductsResponse>) {
    let category = match query.category.as_deref().filter(|c| !c.trim().is_empty()) {
        None => None,
        Some(raw) => match raw.parse::<MerchCategory>() {
            Ok(category) => Some(category),
            Err(error) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ProductsResponse { success: false, products: Vec::new(), error: Some(error) }),
                )
            }
        },
    };

    let products = state.merch.list(category);
    (StatusCode::OK, Json(ProductsResponse { success: true, products, error: None }))
}

/// GET /api/shop/products/{id}
async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Json<MerchProduct>, AppError> {
    state
        .merch
        .get(&product_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFoundError(format!("Product not found: {}", product_id)))
}
