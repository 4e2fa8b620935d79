//! Shipping quote types.
//!
//! [`ShippingOption`] values are ephemeral: computed per request by the
//! shipping calculator, shown to the operator, never persisted.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::price::Price;

/// Package measurements submitted for a quote.
///
/// Weight in kilograms, dimensions in centimetres. All values must be
/// strictly positive; the calculator rejects anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfo {
    pub weight: Decimal,
    pub length: Decimal,
    pub width: Decimal,
    pub height: Decimal,
}

impl PackageInfo {
    /// Volume in cubic centimetres.
    #[must_use]
    pub fn volume(&self) -> Decimal {
        self.length * self.width * self.height
    }
}

/// Origin and destination of a shipment, as CEP strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteInfo {
    pub zip_code_origin: String,
    pub zip_code_destination: String,
}

/// A shipping carrier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Carrier {
    pub id: String,
    pub name: String,
    /// Brand color used by the quote list UI.
    pub color: String,
}

/// Unit of a delivery estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryUnit {
    #[default]
    Dias,
    Horas,
}

/// Estimated delivery window for a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryEstimate {
    pub min: u32,
    pub max: u32,
    pub unit: DeliveryUnit,
}

/// One priced delivery service offered by a carrier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingOption {
    pub carrier: Carrier,
    pub service: String,
    pub price: Price,
    pub delivery_time: DeliveryEstimate,
    pub features: Vec<String>,
    /// Promotional discount amount. Shown alongside the price but not
    /// subtracted from the sort key.
    pub discount: Price,
    /// Set on exactly one option per quote: the lowest raw price.
    #[serde(default)]
    pub is_cheapest: bool,
    /// Set on exactly one option per quote: the lowest `delivery_time.max`.
    #[serde(default)]
    pub is_fastest: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_volume() {
        let package = PackageInfo {
            weight: Decimal::ONE,
            length: Decimal::new(20, 0),
            width: Decimal::new(15, 0),
            height: Decimal::new(10, 0),
        };
        assert_eq!(package.volume(), Decimal::new(3000, 0));
    }

    #[test]
    fn test_delivery_unit_serde() {
        let json = serde_json::to_string(&DeliveryUnit::Dias).expect("serialize");
        assert_eq!(json, "\"dias\"");
    }
}
