//! Product domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use toko_core::{Price, ProductId};

/// A catalog product as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    /// Unique product ID, immutable once assigned.
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
    /// Opaque image reference; not checked for format or reachability.
    pub image_url: String,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last written.
    pub updated_at: DateTime<Utc>,
}

/// Validated product fields, used for both create and full-replace update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub image_url: String,
}

/// Product fields as received from a client.
///
/// Every field is required; a payload with a missing key fails to
/// deserialize rather than zeroing the column. The price is a raw decimal
/// here so the catalog can report a negative amount as invalid input.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductPayload {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image_url: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{"name":"Mug","description":"Stoneware","image_url":"/m.png","price":"#;

    fn parse(price: &str) -> ProductPayload {
        serde_json::from_str(&format!("{PAYLOAD}{price}}}")).unwrap()
    }

    #[test]
    fn test_payload_price_accepts_number_or_string() {
        assert_eq!(parse("1.5").price, Decimal::new(15, 1));
        assert_eq!(parse("\"1.5\"").price, Decimal::new(15, 1));
    }

    #[test]
    fn test_payload_keeps_negative_price_for_validation() {
        assert_eq!(parse("-2").price, Decimal::from(-2));
    }

    #[test]
    fn test_payload_requires_every_field() {
        let missing = r#"{"name":"Mug","description":"Stoneware","price":1}"#;
        assert!(serde_json::from_str::<ProductPayload>(missing).is_err());
    }
}
