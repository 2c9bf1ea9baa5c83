//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::db::{ProductRepository, ProductStore, RepositoryError, UserRepository, UserStore};
use crate::services::auth::{
    Argon2Hasher, AuthError, AuthService, CredentialHasher, RandomTokenIssuer, TokenIssuer,
};
use crate::services::catalog::CatalogService;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. Storage is injected at
/// construction, so the same router runs against `PostgreSQL` or the
/// in-memory stores.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    auth: AuthService,
    catalog: CatalogService,
}

impl AppState {
    /// Create a new application state from its collaborators.
    #[must_use]
    pub fn new(
        users: Arc<dyn UserStore>,
        products: Arc<dyn ProductStore>,
        hasher: Arc<dyn CredentialHasher>,
        tokens: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                auth: AuthService::new(users, hasher, tokens),
                catalog: CatalogService::new(products),
            }),
        }
    }

    /// Create application state backed by `PostgreSQL`.
    #[must_use]
    pub fn postgres(pool: PgPool, hasher: Argon2Hasher) -> Self {
        Self::new(
            Arc::new(UserRepository::new(pool.clone())),
            Arc::new(ProductRepository::new(pool)),
            Arc::new(hasher),
            Arc::new(RandomTokenIssuer),
        )
    }

    /// Get a reference to the authentication service.
    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }

    /// Get a reference to the product catalog service.
    #[must_use]
    pub fn catalog(&self) -> &CatalogService {
        &self.inner.catalog
    }

    /// Precompute per-process auth state before serving requests.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordHash` if the decoy hash cannot be computed.
    pub async fn warm_up(&self) -> Result<(), AuthError> {
        self.auth().warm_up().await
    }

    /// Check that every backing store is reachable.
    ///
    /// # Errors
    ///
    /// Returns the first store error encountered.
    pub async fn ping(&self) -> Result<(), RepositoryError> {
        self.auth().ping().await?;
        self.catalog().ping().await
    }
}
