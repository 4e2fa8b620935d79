//! File-backed store implementation.
//!
//! The whole store is one JSON document, loaded at open and rewritten on
//! every mutation. This mirrors the application's persistence model: a
//! small single-operator dataset with one writer, where durability per
//! mutation matters more than write throughput.

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use balcao_core::{Client, ClientId, Product, ProductId, Sale, Vendor, VendorId};

use super::{
    NewClient, NewProduct, NewSale, NewVendor, ReplaceOutcome, Store, StoreError,
};

/// The persisted document.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreData {
    /// Monotonic primary-key sequence, shared by all collections.
    seq: i64,
    #[serde(default)]
    products: Vec<Product>,
    #[serde(default)]
    clients: Vec<Client>,
    #[serde(default)]
    vendors: Vec<Vendor>,
    #[serde(default)]
    sales: Vec<Sale>,
    #[serde(default)]
    settings: BTreeMap<String, Value>,
}

impl StoreData {
    fn next_id(&mut self) -> i64 {
        self.seq += 1;
        self.seq
    }
}

/// Single-writer local store backed by one JSON document.
pub struct LocalStore {
    path: Option<PathBuf>,
    data: Mutex<StoreData>,
}

impl LocalStore {
    /// Open (or create) a store document at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing document cannot be read or parsed.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let data = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "store document absent, starting empty");
                StoreData::default()
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path: Some(path),
            data: Mutex::new(data),
        })
    }

    /// An in-memory store that never touches disk. Used by tests and by
    /// restore previews.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            path: None,
            data: Mutex::new(StoreData::default()),
        }
    }

    async fn flush(&self, data: &StoreData) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let bytes = serde_json::to_vec_pretty(data)?;
        tokio::fs::write(path, bytes).await?;
        Ok(())
    }
}

fn validate_product(product: &Product) -> Result<(), StoreError> {
    if product.description.trim().is_empty() {
        return Err(StoreError::Rejected(
            "product description must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_party(name: &str, document: &str) -> Result<(), StoreError> {
    if name.trim().is_empty() {
        return Err(StoreError::Rejected("name must not be empty".to_string()));
    }
    if document.trim().is_empty() {
        return Err(StoreError::Rejected(
            "document must not be empty".to_string(),
        ));
    }
    Ok(())
}

#[async_trait]
impl Store for LocalStore {
    async fn products(&self) -> Result<Vec<Product>, StoreError> {
        Ok(self.data.lock().await.products.clone())
    }

    async fn clients(&self) -> Result<Vec<Client>, StoreError> {
        Ok(self.data.lock().await.clients.clone())
    }

    async fn vendors(&self) -> Result<Vec<Vendor>, StoreError> {
        Ok(self.data.lock().await.vendors.clone())
    }

    async fn sales(&self) -> Result<Vec<Sale>, StoreError> {
        Ok(self.data.lock().await.sales.clone())
    }

    async fn insert_product(&self, draft: NewProduct) -> Result<Product, StoreError> {
        let mut data = self.data.lock().await;
        let product = Product {
            id: ProductId::new(data.next_id()),
            description: draft.description,
            item_description: draft.item_description,
            price: draft.price,
            quantity: draft.quantity,
            category: draft.category,
            image: draft.image,
            dimensions: draft.dimensions,
            weight: draft.weight,
        };
        validate_product(&product)?;
        data.products.push(product.clone());
        self.flush(&data).await?;
        Ok(product)
    }

    async fn insert_client(&self, draft: NewClient) -> Result<Client, StoreError> {
        validate_party(&draft.name, &draft.document)?;
        let mut data = self.data.lock().await;
        let client = Client {
            id: ClientId::new(data.next_id()),
            name: draft.name,
            document: draft.document,
            cep: draft.cep,
            phone: draft.phone,
            email: draft.email,
        };
        data.clients.push(client.clone());
        self.flush(&data).await?;
        Ok(client)
    }

    async fn insert_vendor(&self, draft: NewVendor) -> Result<Vendor, StoreError> {
        validate_party(&draft.name, &draft.document)?;
        let mut data = self.data.lock().await;
        let vendor = Vendor {
            id: VendorId::new(data.next_id()),
            name: draft.name,
            document: draft.document,
            cep: draft.cep,
            phone: draft.phone,
            email: draft.email,
        };
        data.vendors.push(vendor.clone());
        self.flush(&data).await?;
        Ok(vendor)
    }

    async fn update_product(&self, product: Product) -> Result<(), StoreError> {
        validate_product(&product)?;
        let mut data = self.data.lock().await;
        let Some(slot) = data.products.iter_mut().find(|p| p.id == product.id) else {
            return Err(StoreError::NotFound(format!("product {}", product.id)));
        };
        *slot = product;
        self.flush(&data).await?;
        Ok(())
    }

    async fn record_sale(&self, draft: NewSale) -> Result<Sale, StoreError> {
        let mut data = self.data.lock().await;
        let sale = Sale {
            id: balcao_core::SaleId::new(data.next_id()),
            date: draft.date,
            time: draft.time,
            client: draft.client,
            vendor: draft.vendor,
            items: draft.items,
            payment_method: draft.payment_method,
            total: draft.total,
        };
        data.sales.push(sale.clone());
        self.flush(&data).await?;
        Ok(sale)
    }

    async fn replace_products(&self, products: Vec<Product>) -> Result<ReplaceOutcome, StoreError> {
        let mut data = self.data.lock().await;
        data.products.clear();
        let mut outcome = ReplaceOutcome::default();
        for mut product in products {
            if let Err(e) = validate_product(&product) {
                warn!(error = %e, "skipping product on replace");
                outcome.failed += 1;
                continue;
            }
            product.id = ProductId::new(data.next_id());
            data.products.push(product);
            outcome.written += 1;
        }
        self.flush(&data).await?;
        Ok(outcome)
    }

    async fn replace_clients(&self, clients: Vec<Client>) -> Result<ReplaceOutcome, StoreError> {
        let mut data = self.data.lock().await;
        data.clients.clear();
        let mut outcome = ReplaceOutcome::default();
        for mut client in clients {
            if let Err(e) = validate_party(&client.name, &client.document) {
                warn!(error = %e, "skipping client on replace");
                outcome.failed += 1;
                continue;
            }
            client.id = ClientId::new(data.next_id());
            data.clients.push(client);
            outcome.written += 1;
        }
        self.flush(&data).await?;
        Ok(outcome)
    }

    async fn replace_vendors(&self, vendors: Vec<Vendor>) -> Result<ReplaceOutcome, StoreError> {
        let mut data = self.data.lock().await;
        data.vendors.clear();
        let mut outcome = ReplaceOutcome::default();
        for mut vendor in vendors {
            if let Err(e) = validate_party(&vendor.name, &vendor.document) {
                warn!(error = %e, "skipping vendor on replace");
                outcome.failed += 1;
                continue;
            }
            vendor.id = VendorId::new(data.next_id());
            data.vendors.push(vendor);
            outcome.written += 1;
        }
        self.flush(&data).await?;
        Ok(outcome)
    }

    async fn replace_sales(&self, sales: Vec<Sale>) -> Result<ReplaceOutcome, StoreError> {
        let mut data = self.data.lock().await;
        data.sales.clear();
        let mut outcome = ReplaceOutcome::default();
        for sale in sales {
            // Sales keep their IDs; keep the sequence ahead of them so new
            // records never collide.
            data.seq = data.seq.max(sale.id.as_i64());
            data.sales.push(sale);
            outcome.written += 1;
        }
        self.flush(&data).await?;
        Ok(outcome)
    }

    async fn setting(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.data.lock().await.settings.get(key).cloned())
    }

    async fn put_setting(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut data = self.data.lock().await;
        data.settings.insert(key.to_string(), value);
        self.flush(&data).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use balcao_core::Price;

    fn product_draft(description: &str) -> NewProduct {
        NewProduct {
            description: description.to_string(),
            item_description: String::new(),
            price: Price::from_centavos(1000),
            quantity: 5,
            category: "Geral".to_string(),
            image: None,
            dimensions: None,
            weight: None,
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() {
        let store = LocalStore::in_memory();
        let a = store.insert_product(product_draft("A")).await.unwrap();
        let b = store.insert_product(product_draft("B")).await.unwrap();
        assert_eq!(a.id.as_i64() + 1, b.id.as_i64());
    }

    #[tokio::test]
    async fn test_replace_products_reassigns_ids_and_tallies_failures() {
        let store = LocalStore::in_memory();
        let a = store.insert_product(product_draft("A")).await.unwrap();

        let mut restored_bad = a.clone();
        restored_bad.description = String::new();
        let mut restored_ok = a.clone();
        restored_ok.id = ProductId::new(999);

        let outcome = store
            .replace_products(vec![restored_bad, restored_ok])
            .await
            .unwrap();
        assert_eq!(outcome, ReplaceOutcome { written: 1, failed: 1 });

        let products = store.products().await.unwrap();
        assert_eq!(products.len(), 1);
        // Old key 999 dropped; the store assigned a fresh one.
        let first = products.first().unwrap();
        assert_ne!(first.id.as_i64(), 999);
    }

    #[tokio::test]
    async fn test_replace_sales_preserves_ids() {
        use balcao_core::{PaymentMethod, Sale, SaleId};
        use chrono::{NaiveDate, NaiveTime};

        let store = LocalStore::in_memory();
        let sale = Sale {
            id: SaleId::new(41),
            date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            time: NaiveTime::from_hms_opt(14, 30, 0).unwrap(),
            client: "Maria".to_string(),
            vendor: "Loja".to_string(),
            items: vec![],
            payment_method: PaymentMethod::Pix,
            total: Price::ZERO,
        };
        store.replace_sales(vec![sale.clone()]).await.unwrap();

        let sales = store.sales().await.unwrap();
        assert_eq!(sales.first().unwrap().id, SaleId::new(41));

        // Sequence moved past the preserved key.
        let product = store.insert_product(product_draft("C")).await.unwrap();
        assert!(product.id.as_i64() > 41);
    }

    #[tokio::test]
    async fn test_settings_roundtrip() {
        let store = LocalStore::in_memory();
        assert!(store.setting("configuracoes").await.unwrap().is_none());
        store
            .put_setting("configuracoes", serde_json::json!({"tema": "escuro"}))
            .await
            .unwrap();
        let value = store.setting("configuracoes").await.unwrap().unwrap();
        assert_eq!(value["tema"], "escuro");
    }

    #[tokio::test]
    async fn test_open_missing_file_starts_empty() {
        let path = std::env::temp_dir().join(format!(
            "balcao-store-test-{}.json",
            std::process::id()
        ));
        let _ = tokio::fs::remove_file(&path).await;

        let store = LocalStore::open(&path).await.unwrap();
        assert!(store.products().await.unwrap().is_empty());

        store.insert_product(product_draft("Persisted")).await.unwrap();
        drop(store);

        let reopened = LocalStore::open(&path).await.unwrap();
        let products = reopened.products().await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products.first().unwrap().description, "Persisted");

        let _ = tokio::fs::remove_file(&path).await;
    }
}
