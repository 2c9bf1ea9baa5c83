//! Toko Core - Shared domain types.
//!
//! This crate provides the types shared by every Toko component:
//! - `api` - HTTP backend for accounts and the product catalog
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP. The optional `postgres` feature adds `sqlx` encode/decode
//! implementations so the types can be bound directly in queries.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, emails, prices, and password hashes

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
