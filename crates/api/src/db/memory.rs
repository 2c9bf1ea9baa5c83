//! In-process stores with the same contract as the `PostgreSQL` repositories.
//!
//! Used by the test suites and for running the API without a database.
//! Identifiers are assigned from a monotonically increasing counter that
//! starts at 1 and never reuses a value, matching `BIGSERIAL`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use toko_core::{Email, ProductId, UserId};

use super::{ProductStore, RepositoryError, UserStore};
use crate::models::product::{Product, ProductDraft};
use crate::models::user::{NewUser, User};

#[derive(Debug)]
struct Table<K, V> {
    last_id: i64,
    rows: BTreeMap<K, V>,
}

impl<K, V> Default for Table<K, V> {
    fn default() -> Self {
        Self {
            last_id: 0,
            rows: BTreeMap::new(),
        }
    }
}

impl<K, V> Table<K, V> {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }
}

/// In-memory [`UserStore`].
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    table: RwLock<Table<UserId, User>>,
}

impl MemoryUserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    /// Whether no users are stored.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, user: &NewUser) -> Result<UserId, RepositoryError> {
        let mut table = self.table.write().await;
        if table.rows.values().any(|u| u.email == user.email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        let id = UserId::new(table.next_id());
        table.rows.insert(
            id,
            User {
                id,
                username: user.username.clone(),
                email: user.email.clone(),
                password: user.password.clone(),
                created_at: Utc::now(),
            },
        );
        Ok(id)
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let table = self.table.read().await;
        Ok(table.rows.values().find(|u| &u.email == email).cloned())
    }
}

/// In-memory [`ProductStore`].
#[derive(Debug, Default)]
pub struct MemoryProductStore {
    table: RwLock<Table<ProductId, Product>>,
}

impl MemoryProductStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn create(&self, draft: &ProductDraft) -> Result<Product, RepositoryError> {
        let mut table = self.table.write().await;
        let id = ProductId::new(table.next_id());
        let now = Utc::now();
        let product = Product {
            id,
            name: draft.name.clone(),
            description: draft.description.clone(),
            price: draft.price,
            image_url: draft.image_url.clone(),
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(id, product.clone());
        Ok(product)
    }

    async fn update(
        &self,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<Option<Product>, RepositoryError> {
        let mut table = self.table.write().await;
        let Some(product) = table.rows.get_mut(&id) else {
            return Ok(None);
        };

        product.name.clone_from(&draft.name);
        product.description.clone_from(&draft.description);
        product.price = draft.price;
        product.image_url.clone_from(&draft.image_url);
        product.updated_at = Utc::now();
        Ok(Some(product.clone()))
    }

    async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use toko_core::{HashedPassword, Price};

    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            username: "alice".to_owned(),
            email: Email::parse(email).unwrap(),
            password: HashedPassword::from_encoded("$argon2id$stub".to_owned()),
        }
    }

    fn draft(name: &str) -> ProductDraft {
        ProductDraft {
            name: name.to_owned(),
            description: "Blue".to_owned(),
            price: Price::new(Decimal::new(15, 1)).unwrap(),
            image_url: "http://x/p.png".to_owned(),
        }
    }

    #[tokio::test]
    async fn test_user_ids_increase() {
        let store = MemoryUserStore::new();
        let first = store.create(&new_user("a@x.com")).await.unwrap();
        let second = store.create(&new_user("b@x.com")).await.unwrap();
        assert!(second > first);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = MemoryUserStore::new();
        store.create(&new_user("a@x.com")).await.unwrap();
        let err = store.create(&new_user("a@x.com")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_find_by_email_missing() {
        let store = MemoryUserStore::new();
        let email = Email::parse("ghost@x.com").unwrap();
        assert!(store.find_by_email(&email).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_product_ids_are_not_reused_after_delete() {
        let store = MemoryProductStore::new();
        let first = store.create(&draft("Pen")).await.unwrap();
        assert!(store.delete(first.id).await.unwrap());
        let second = store.create(&draft("Ink")).await.unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_update_missing_product_writes_nothing() {
        let store = MemoryProductStore::new();
        let updated = store.update(ProductId::new(99), &draft("Pen")).await.unwrap();
        assert!(updated.is_none());
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_id() {
        let store = MemoryProductStore::new();
        for name in ["a", "b", "c"] {
            store.create(&draft(name)).await.unwrap();
        }
        let ids: Vec<_> = store.list().await.unwrap().iter().map(|p| p.id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }
}
