//! Domain models.
//!
//! These types are separate from database row types and wire payloads;
//! repositories convert rows into them and services validate payloads into
//! them.

pub mod product;
pub mod user;

pub use product::{Product, ProductDraft, ProductPayload};
pub use user::{NewUser, User};
