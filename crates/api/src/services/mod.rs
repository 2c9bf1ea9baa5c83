//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Registration and login (password hashing, token issuance)
//! - `catalog` - Product catalog CRUD
//!
//! Services are constructed once with their collaborators injected and are
//! stateless between requests; every call re-reads from storage.

pub mod auth;
pub mod catalog;

pub use auth::{AuthError, AuthService};
pub use catalog::{CatalogError, CatalogService};
