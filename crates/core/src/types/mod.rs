//! Core types for Toko.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod credential;
pub mod email;
pub mod id;
pub mod price;

pub use credential::HashedPassword;
pub use email::{Email, EmailError};
pub use id::*;
pub use price::{Price, PriceError};
