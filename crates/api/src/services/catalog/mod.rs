//! Product catalog service.
//!
//! Thin layer over a [`ProductStore`]: validates client payloads, turns
//! "no such row" into [`CatalogError::NotFound`] and logs writes.

mod error;

pub use error::CatalogError;

use std::sync::Arc;

use toko_core::{Price, ProductId};

use crate::db::{ProductStore, RepositoryError};
use crate::models::product::{Product, ProductDraft, ProductPayload};

/// Product catalog service.
pub struct CatalogService {
    products: Arc<dyn ProductStore>,
}

impl CatalogService {
    /// Create a new catalog service.
    #[must_use]
    pub fn new(products: Arc<dyn ProductStore>) -> Self {
        Self { products }
    }

    /// Every product, ordered by id. Empty catalog is an empty list.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the store fails.
    pub async fn list(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.list().await?)
    }

    /// A single product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if no product has this id.
    pub async fn get(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.products
            .get(id)
            .await?
            .ok_or(CatalogError::NotFound(id))
    }

    /// Create a product and return it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidInput` if the payload fails validation;
    /// nothing reaches storage in that case.
    pub async fn create(&self, payload: ProductPayload) -> Result<Product, CatalogError> {
        let draft = validate(payload)?;
        let product = self.products.create(&draft).await?;

        tracing::info!(product_id = %product.id, "Product created");
        Ok(product)
    }

    /// Replace every writable field of an existing product.
    ///
    /// Concurrent updates to the same id are last-write-wins.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidInput` if the payload fails validation,
    /// or `CatalogError::NotFound` if no product has this id. Neither writes.
    pub async fn update(
        &self,
        id: ProductId,
        payload: ProductPayload,
    ) -> Result<Product, CatalogError> {
        let draft = validate(payload)?;
        let product = self
            .products
            .update(id, &draft)
            .await?
            .ok_or(CatalogError::NotFound(id))?;

        tracing::info!(product_id = %id, "Product updated");
        Ok(product)
    }

    /// Remove a product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if no product has this id.
    pub async fn delete(&self, id: ProductId) -> Result<(), CatalogError> {
        if !self.products.delete(id).await? {
            return Err(CatalogError::NotFound(id));
        }

        tracing::info!(product_id = %id, "Product deleted");
        Ok(())
    }

    /// Check that the backing product store is reachable.
    ///
    /// # Errors
    ///
    /// Returns the store's error if it cannot be reached.
    pub async fn ping(&self) -> Result<(), RepositoryError> {
        self.products.ping().await
    }
}

fn validate(payload: ProductPayload) -> Result<ProductDraft, CatalogError> {
    let ProductPayload {
        name,
        description,
        price,
        image_url,
    } = payload;

    let price = Price::new(price).map_err(|e| CatalogError::InvalidInput(e.to_string()))?;

    Ok(ProductDraft {
        name,
        description,
        price,
        image_url,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::db::MemoryProductStore;

    fn service() -> CatalogService {
        CatalogService::new(Arc::new(MemoryProductStore::new()))
    }

    fn payload(name: &str, price: Decimal) -> ProductPayload {
        ProductPayload {
            name: name.to_owned(),
            description: "Blue".to_owned(),
            price,
            image_url: "http://x/p.png".to_owned(),
        }
    }

    #[tokio::test]
    async fn test_empty_catalog_lists_nothing() {
        assert!(service().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let catalog = service();
        let created = catalog
            .create(payload("Mug", Decimal::new(150, 1)))
            .await
            .unwrap();

        let fetched = catalog.get(created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.price.amount(), Decimal::new(15, 0));
    }

    #[tokio::test]
    async fn test_negative_price_is_invalid_and_not_stored() {
        let catalog = service();
        let err = catalog
            .create(payload("Mug", Decimal::new(-2, 0)))
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::InvalidInput(_)));
        assert!(catalog.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_zero_price_is_allowed() {
        let product = service()
            .create(payload("Sticker", Decimal::ZERO))
            .await
            .unwrap();
        assert_eq!(product.price.amount(), Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_update_replaces_fields_and_keeps_id() {
        let catalog = service();
        let created = catalog
            .create(payload("Mug", Decimal::new(15, 0)))
            .await
            .unwrap();

        let updated = catalog
            .update(created.id, payload("Cup", Decimal::new(20, 0)))
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Cup");
        assert_eq!(catalog.get(created.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let catalog = service();
        let err = catalog
            .update(ProductId::new(999), payload("Cup", Decimal::ONE))
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::NotFound(id) if id == ProductId::new(999)));
        assert!(catalog.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let catalog = service();
        let created = catalog
            .create(payload("Mug", Decimal::ONE))
            .await
            .unwrap();

        catalog.delete(created.id).await.unwrap();

        assert!(matches!(
            catalog.get(created.id).await.unwrap_err(),
            CatalogError::NotFound(_)
        ));
        assert!(matches!(
            catalog.delete(created.id).await.unwrap_err(),
            CatalogError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_delete_leaves_other_products() {
        let catalog = service();
        let a = catalog.create(payload("A", Decimal::ONE)).await.unwrap();
        let b = catalog.create(payload("B", Decimal::ONE)).await.unwrap();

        catalog.delete(a.id).await.unwrap();

        let remaining = catalog.list().await.unwrap();
        assert_eq!(remaining, vec![b]);
    }
}
