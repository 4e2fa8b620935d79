//! Product records owned by the local store.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// Physical package dimensions in centimetres.
///
/// Used by the shipping calculator and mirrored into the remote catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub length: Decimal,
    pub width: Decimal,
    pub height: Decimal,
}

impl Dimensions {
    /// Volume in cubic centimetres.
    #[must_use]
    pub fn volume(&self) -> Decimal {
        self.length * self.width * self.height
    }
}

/// A product in the local catalog.
///
/// Mutated on add/edit/sale; mirrored into WooCommerce with the local
/// [`ProductId`] carried in remote metadata so the reverse lookup can
/// reconstruct local-shaped records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    /// Short display name shown on lists and receipts.
    pub description: String,
    /// Longer free-form description of the item.
    pub item_description: String,
    pub price: Price,
    pub quantity: u32,
    pub category: String,
    /// URL of the product image, when one was uploaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    /// Shipping weight in kilograms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<Decimal>,
}

impl Product {
    /// Whether the stock on hand is at or below the given threshold.
    #[must_use]
    pub const fn is_low_stock(&self, threshold: u32) -> bool {
        self.quantity <= threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Product {
        Product {
            id: ProductId::new(1),
            description: "Caneca".to_string(),
            item_description: "Caneca de ceramica 300ml".to_string(),
            price: Price::from_centavos(2500),
            quantity: 10,
            category: "Cozinha".to_string(),
            image: None,
            dimensions: Some(Dimensions {
                length: Decimal::new(12, 0),
                width: Decimal::new(9, 0),
                height: Decimal::new(10, 0),
            }),
            weight: Some(Decimal::new(35, 2)),
        }
    }

    #[test]
    fn test_volume() {
        let dims = sample().dimensions.expect("dimensions");
        assert_eq!(dims.volume(), Decimal::new(1080, 0));
    }

    #[test]
    fn test_low_stock() {
        let product = sample();
        assert!(product.is_low_stock(10));
        assert!(!product.is_low_stock(9));
    }

    #[test]
    fn test_optional_fields_omitted() {
        let mut product = sample();
        product.dimensions = None;
        product.weight = None;
        let json = serde_json::to_value(&product).expect("serialize");
        assert!(json.get("dimensions").is_none());
        assert!(json.get("weight").is_none());
    }
}
