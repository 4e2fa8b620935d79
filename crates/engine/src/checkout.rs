//! Sale recording and stock helpers.
//!
//! Checkout owns the arithmetic the UI must never reimplement: party
//! lookup, line totals, and the stock decrement that accompanies a
//! finalized sale.

use chrono::Local;
use thiserror::Error;
use tracing::debug;

use balcao_core::{Client, PaymentMethod, Price, Product, Sale, SaleItem, Vendor};

use crate::store::{NewSale, Store, StoreError};

/// Errors raised while recording a sale.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The draft is missing or malformed data.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A line asks for more units than the catalog has.
    #[error("insufficient stock for \"{description}\": {available} on hand, {requested} requested")]
    InsufficientStock {
        description: String,
        available: u32,
        requested: u32,
    },

    /// The store failed underneath.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// A sale as assembled at the counter, before totals and timestamps.
#[derive(Debug, Clone)]
pub struct SaleDraft {
    pub client: String,
    pub vendor: String,
    pub items: Vec<SaleItem>,
    pub payment_method: PaymentMethod,
}

/// Look up a client by name (case-insensitive) or document (exact).
///
/// # Errors
///
/// Returns an error when the store snapshot fails.
pub async fn find_client(store: &dyn Store, query: &str) -> Result<Option<Client>, StoreError> {
    let query = query.trim();
    Ok(store.clients().await?.into_iter().find(|c| {
        c.name.eq_ignore_ascii_case(query) || c.document == query
    }))
}

/// Look up a vendor by name (case-insensitive) or document (exact).
///
/// # Errors
///
/// Returns an error when the store snapshot fails.
pub async fn find_vendor(store: &dyn Store, query: &str) -> Result<Option<Vendor>, StoreError> {
    let query = query.trim();
    Ok(store.vendors().await?.into_iter().find(|v| {
        v.name.eq_ignore_ascii_case(query) || v.document == query
    }))
}

/// Record a finalized sale: validate the draft, decrement stock for
/// catalog items, compute the total and persist.
///
/// Lines whose description matches a catalog product must be covered by
/// stock on hand; descriptions with no catalog match are accepted as-is
/// (one-off counter items).
///
/// # Errors
///
/// Returns [`CheckoutError::InvalidInput`] for an empty or malformed
/// draft, [`CheckoutError::InsufficientStock`] when a line overdraws the
/// catalog, and a store error when persistence fails.
pub async fn record_sale(store: &dyn Store, draft: SaleDraft) -> Result<Sale, CheckoutError> {
    if draft.items.is_empty() {
        return Err(CheckoutError::InvalidInput(
            "sale must have at least one item".to_string(),
        ));
    }
    if draft.items.iter().any(|item| item.quantity == 0) {
        return Err(CheckoutError::InvalidInput(
            "item quantity must be at least 1".to_string(),
        ));
    }

    // Validate stock across the whole draft before mutating anything.
    let products = store.products().await?;
    let mut decrements: Vec<Product> = Vec::new();
    for item in &draft.items {
        let Some(product) = products
            .iter()
            .find(|p| p.description == item.description)
        else {
            debug!(item = %item.description, "sale line has no catalog product");
            continue;
        };
        if product.quantity < item.quantity {
            return Err(CheckoutError::InsufficientStock {
                description: item.description.clone(),
                available: product.quantity,
                requested: item.quantity,
            });
        }
        let mut updated = product.clone();
        updated.quantity -= item.quantity;
        decrements.push(updated);
    }

    for product in decrements {
        store.update_product(product).await?;
    }

    let total: Price = draft.items.iter().map(SaleItem::subtotal).sum();
    let now = Local::now();
    let sale = store
        .record_sale(NewSale {
            date: now.date_naive(),
            time: now.time(),
            client: draft.client,
            vendor: draft.vendor,
            items: draft.items,
            payment_method: draft.payment_method,
            total,
        })
        .await?;
    Ok(sale)
}

/// Products at or below the low-stock threshold.
///
/// # Errors
///
/// Returns an error when the store snapshot fails.
pub async fn low_stock(store: &dyn Store, threshold: u32) -> Result<Vec<Product>, StoreError> {
    let mut products: Vec<Product> = store
        .products()
        .await?
        .into_iter()
        .filter(|p| p.is_low_stock(threshold))
        .collect();
    products.sort_by_key(|p| p.quantity);
    Ok(products)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::{LocalStore, NewClient, NewProduct};

    async fn seeded_store() -> LocalStore {
        let store = LocalStore::in_memory();
        store
            .insert_product(NewProduct {
                description: "Caneca".to_string(),
                item_description: String::new(),
                price: Price::from_centavos(2500),
                quantity: 5,
                category: "Cozinha".to_string(),
                image: None,
                dimensions: None,
                weight: None,
            })
            .await
            .unwrap();
        store
            .insert_client(NewClient {
                name: "Maria Souza".to_string(),
                document: "123.456.789-00".to_string(),
                cep: None,
                phone: None,
                email: None,
            })
            .await
            .unwrap();
        store
    }

    fn draft(quantity: u32) -> SaleDraft {
        SaleDraft {
            client: "Maria Souza".to_string(),
            vendor: "Balcao".to_string(),
            items: vec![SaleItem {
                description: "Caneca".to_string(),
                quantity,
                price: Price::from_centavos(2500),
            }],
            payment_method: PaymentMethod::Pix,
        }
    }

    #[tokio::test]
    async fn test_record_sale_totals_and_decrements_stock() {
        let store = seeded_store().await;
        let sale = record_sale(&store, draft(2)).await.unwrap();

        assert_eq!(sale.total, Price::from_centavos(5000));
        let products = store.products().await.unwrap();
        assert_eq!(products.first().unwrap().quantity, 3);
        assert_eq!(store.sales().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_record_sale_rejects_overdraw_without_mutation() {
        let store = seeded_store().await;
        let err = record_sale(&store, draft(6)).await.unwrap_err();
        assert!(matches!(err, CheckoutError::InsufficientStock { .. }));

        // Nothing was decremented and no sale was written.
        assert_eq!(store.products().await.unwrap().first().unwrap().quantity, 5);
        assert!(store.sales().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_record_sale_rejects_empty_draft() {
        let store = seeded_store().await;
        let mut empty = draft(1);
        empty.items.clear();
        assert!(matches!(
            record_sale(&store, empty).await.unwrap_err(),
            CheckoutError::InvalidInput(_)
        ));
    }

    #[tokio::test]
    async fn test_unknown_item_passes_through() {
        let store = seeded_store().await;
        let mut custom = draft(1);
        custom.items.push(SaleItem {
            description: "Embrulho de presente".to_string(),
            quantity: 1,
            price: Price::from_centavos(500),
        });

        let sale = record_sale(&store, custom).await.unwrap();
        assert_eq!(sale.total, Price::from_centavos(3000));
    }

    #[tokio::test]
    async fn test_find_client_by_name_or_document() {
        let store = seeded_store().await;
        assert!(find_client(&store, "maria souza").await.unwrap().is_some());
        assert!(find_client(&store, "123.456.789-00")
            .await
            .unwrap()
            .is_some());
        assert!(find_client(&store, "Joao").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_low_stock_filters_and_sorts() {
        let store = seeded_store().await;
        store
            .insert_product(NewProduct {
                description: "Prato".to_string(),
                item_description: String::new(),
                price: Price::from_centavos(1200),
                quantity: 1,
                category: "Cozinha".to_string(),
                image: None,
                dimensions: None,
                weight: None,
            })
            .await
            .unwrap();

        let low = low_stock(&store, 5).await.unwrap();
        assert_eq!(low.len(), 2);
        assert_eq!(low.first().unwrap().description, "Prato");

        let lower = low_stock(&store, 1).await.unwrap();
        assert_eq!(lower.len(), 1);
    }
}
