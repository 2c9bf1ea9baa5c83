//! Catalog error types.

use thiserror::Error;

use toko_core::ProductId;

use crate::db::RepositoryError;

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No product with this id.
    #[error("product {0} not found")]
    NotFound(ProductId),

    /// The payload failed validation.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
