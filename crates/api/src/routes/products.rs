//! Product catalog route handlers.
//!
//! A path segment that is not a product id gets the same 404 as an id that
//! does not exist.

use axum::{
    Json,
    extract::{Path, State, rejection::{JsonRejection, PathRejection}},
    http::StatusCode,
};
use tracing::instrument;

use toko_core::ProductId;

use crate::error::Result;
use crate::models::product::{Product, ProductPayload};
use crate::state::AppState;

type IdPath = std::result::Result<Path<ProductId>, PathRejection>;
type Payload = std::result::Result<Json<ProductPayload>, JsonRejection>;

/// List every product.
///
/// GET /products
///
/// # Errors
///
/// Returns 500 on storage failure.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    Ok(Json(state.catalog().list().await?))
}

/// Show a single product.
///
/// GET /products/{id}
///
/// # Errors
///
/// Returns 404 if the product does not exist.
pub async fn show(State(state): State<AppState>, id: IdPath) -> Result<Json<Product>> {
    let Path(id) = id?;
    Ok(Json(state.catalog().get(id).await?))
}

/// Create a product.
///
/// POST /products
///
/// # Errors
///
/// Returns 400 for a malformed or invalid body.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    payload: Payload,
) -> Result<(StatusCode, Json<Product>)> {
    let Json(payload) = payload?;
    let product = state.catalog().create(payload).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Replace every field of a product.
///
/// PUT /products/{id}
///
/// # Errors
///
/// Returns 404 if the product does not exist and 400 for a malformed,
/// partial or invalid body.
#[instrument(skip_all)]
pub async fn update(
    State(state): State<AppState>,
    id: IdPath,
    payload: Payload,
) -> Result<Json<Product>> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    Ok(Json(state.catalog().update(id, payload).await?))
}

/// Delete a product.
///
/// DELETE /products/{id}
///
/// # Errors
///
/// Returns 404 if the product does not exist.
#[instrument(skip_all)]
pub async fn destroy(State(state): State<AppState>, id: IdPath) -> Result<StatusCode> {
    let Path(id) = id?;
    state.catalog().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
