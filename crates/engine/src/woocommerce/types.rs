//! Wire types for the WooCommerce REST API.
//!
//! Only the fields this adapter reads or writes are modelled; the remote
//! schema is much larger and owned by WooCommerce.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A product as returned by `GET /products`.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteProduct {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub regular_price: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub stock_quantity: Option<i64>,
    #[serde(default)]
    pub categories: Vec<RemoteCategoryRef>,
    #[serde(default)]
    pub images: Vec<RemoteImage>,
    #[serde(default)]
    pub meta_data: Vec<MetaData>,
}

impl RemoteProduct {
    /// Value of a metadata entry by key, if present.
    #[must_use]
    pub fn meta(&self, key: &str) -> Option<&Value> {
        self.meta_data
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| &entry.value)
    }
}

/// A category reference attached to a remote product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteCategoryRef {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A category as returned by `GET /products/categories`.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteCategory {
    pub id: i64,
    pub name: String,
}

/// A product image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteImage {
    pub src: String,
}

/// A product metadata entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaData {
    pub key: String,
    pub value: Value,
}

/// A registered webhook.
#[derive(Debug, Clone, Deserialize)]
pub struct Webhook {
    pub id: i64,
    pub topic: String,
    pub delivery_url: String,
    #[serde(default)]
    pub status: String,
}

/// Minimized field set sent on updates.
///
/// Deliberately small so an update never clobbers remote-managed fields
/// (attributes, variations, SEO plugins and the like).
#[derive(Debug, Clone, Serialize)]
pub struct ProductUpdate {
    pub name: String,
    pub regular_price: String,
    pub description: String,
    pub sku: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<RemoteImage>,
}

/// Field set sent on creates: the minimized set plus status/type
/// defaults, stock and the local-ID metadata entry.
#[derive(Debug, Clone, Serialize)]
pub struct ProductCreate {
    pub name: String,
    #[serde(rename = "type")]
    pub product_type: String,
    pub status: String,
    pub regular_price: String,
    pub description: String,
    pub sku: String,
    pub manage_stock: bool,
    pub stock_quantity: i64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<RemoteCategoryRef>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<RemoteImage>,
    pub meta_data: Vec<MetaData>,
}
