//! Finalized sales.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::id::SaleId;
use super::price::Price;

/// How a sale was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Dinheiro,
    Cartao,
    Pix,
    Prazo,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dinheiro => write!(f, "dinheiro"),
            Self::Cartao => write!(f, "cartao"),
            Self::Pix => write!(f, "pix"),
            Self::Prazo => write!(f, "prazo"),
        }
    }
}

/// One line of a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleItem {
    pub description: String,
    pub quantity: u32,
    /// Unit price at the time of sale.
    pub price: Price,
}

impl SaleItem {
    /// Line subtotal (unit price times quantity).
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.price * rust_decimal::Decimal::from(self.quantity)
    }
}

/// A finalized sale.
///
/// Immutable once recorded; referenced by receipts and shipping labels,
/// so its ID is preserved across backup restores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    pub id: SaleId,
    pub date: NaiveDate,
    pub time: NaiveTime,
    /// Client name as registered at the time of sale.
    pub client: String,
    /// Vendor name as registered at the time of sale.
    pub vendor: String,
    pub items: Vec<SaleItem>,
    pub payment_method: PaymentMethod,
    pub total: Price,
}
