//! The local store adapter.
//!
//! The UI, the backup engine and the sync adapter all read and write
//! application data through the [`Store`] trait; nothing else in the
//! engine touches persistence. [`LocalStore`] is the shipped
//! implementation: a single JSON document on disk, single-writer.
//!
//! Primary keys are assigned by the store from a monotonic sequence.
//! `replace_*` operations implement the restore contract: clear the
//! collection, insert the incoming records, reassign keys (except sales,
//! which keep theirs), and tally rejected records without aborting.

mod local;

pub use local::LocalStore;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::Value;
use thiserror::Error;

use balcao_core::{
    Client, Dimensions, PaymentMethod, Price, Product, Sale, SaleItem, Vendor,
};
use chrono::{NaiveDate, NaiveTime};

/// Errors that can occur at the persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the store document failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The store document is not valid JSON for the expected shape.
    #[error("corrupt store document: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// A record failed validation and was not written.
    #[error("record rejected: {0}")]
    Rejected(String),

    /// No record matches the given key.
    #[error("not found: {0}")]
    NotFound(String),
}

/// A product draft before the store assigns its ID.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub description: String,
    pub item_description: String,
    pub price: Price,
    pub quantity: u32,
    pub category: String,
    pub image: Option<String>,
    pub dimensions: Option<Dimensions>,
    pub weight: Option<Decimal>,
}

/// A client draft before the store assigns its ID.
#[derive(Debug, Clone)]
pub struct NewClient {
    pub name: String,
    pub document: String,
    pub cep: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// A vendor draft before the store assigns its ID.
#[derive(Debug, Clone)]
pub struct NewVendor {
    pub name: String,
    pub document: String,
    pub cep: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// A finalized sale before the store assigns its ID.
#[derive(Debug, Clone)]
pub struct NewSale {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub client: String,
    pub vendor: String,
    pub items: Vec<SaleItem>,
    pub payment_method: PaymentMethod,
    pub total: Price,
}

/// Outcome of a clear-then-insert collection replacement.
///
/// Rejected records are counted, not fatal: the rest of the batch is
/// still written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaceOutcome {
    /// Records written.
    pub written: usize,
    /// Records rejected by validation.
    pub failed: usize,
}

/// The store adapter interface.
///
/// Collection getters return snapshots; mutations go through the draft
/// types so the store owns key assignment.
#[async_trait]
pub trait Store: Send + Sync {
    async fn products(&self) -> Result<Vec<Product>, StoreError>;
    async fn clients(&self) -> Result<Vec<Client>, StoreError>;
    async fn vendors(&self) -> Result<Vec<Vendor>, StoreError>;
    async fn sales(&self) -> Result<Vec<Sale>, StoreError>;

    async fn insert_product(&self, draft: NewProduct) -> Result<Product, StoreError>;
    async fn insert_client(&self, draft: NewClient) -> Result<Client, StoreError>;
    async fn insert_vendor(&self, draft: NewVendor) -> Result<Vendor, StoreError>;

    /// Overwrite an existing product in place, matched by ID.
    async fn update_product(&self, product: Product) -> Result<(), StoreError>;

    /// Persist a finalized sale and assign its ID.
    async fn record_sale(&self, draft: NewSale) -> Result<Sale, StoreError>;

    /// Clear-then-insert, reassigning primary keys.
    async fn replace_products(&self, products: Vec<Product>) -> Result<ReplaceOutcome, StoreError>;
    /// Clear-then-insert, reassigning primary keys.
    async fn replace_clients(&self, clients: Vec<Client>) -> Result<ReplaceOutcome, StoreError>;
    /// Clear-then-insert, reassigning primary keys.
    async fn replace_vendors(&self, vendors: Vec<Vendor>) -> Result<ReplaceOutcome, StoreError>;
    /// Clear-then-insert, preserving the incoming sale IDs.
    async fn replace_sales(&self, sales: Vec<Sale>) -> Result<ReplaceOutcome, StoreError>;

    /// Read a persisted settings document.
    async fn setting(&self, key: &str) -> Result<Option<Value>, StoreError>;
    /// Overwrite a persisted settings document.
    async fn put_setting(&self, key: &str, value: Value) -> Result<(), StoreError>;
}
