//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health          - Liveness check
//! GET    /health/ready    - Readiness check (pings storage)
//!
//! # Auth
//! POST   /register        - Create an account
//! POST   /login           - Exchange credentials for a token
//!
//! # Products
//! GET    /products        - List products
//! POST   /products        - Create a product
//! GET    /products/{id}   - Product detail
//! PUT    /products/{id}   - Replace a product
//! DELETE /products/{id}   - Delete a product
//! ```

pub mod auth;
pub mod products;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the application routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .nest("/products", product_routes())
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::destroy),
        )
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if storage is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
