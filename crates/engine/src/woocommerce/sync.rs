//! Product sync between the local catalog and WooCommerce.
//!
//! Push mirrors local products into the remote store, keyed by a
//! deterministic SKU; pull reconstructs local-shaped records from remote
//! products that carry the local-ID metadata entry. Batches are
//! processed one product at a time; a per-item failure never aborts the
//! batch, and the whole run can be cancelled between items.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use balcao_core::{Price, Product, ProductId};

use super::client::{WooApi, WooError};
use super::types::{
    MetaData, ProductCreate, ProductUpdate, RemoteCategoryRef, RemoteImage, RemoteProduct,
    Webhook,
};

/// Metadata key carrying the local product ID on remote products.
pub const LOCAL_ID_META_KEY: &str = "_pdv_local_id";

/// Deterministic SKU for a local product.
#[must_use]
pub fn sku_for(id: ProductId) -> String {
    format!("PDV-{id}")
}

/// Cooperative cancellation flag checked between batch items.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; the batch stops before its next item.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Outcome of one product in a sync batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    Created,
    Updated,
    Failed,
    /// The pre-flight probe failed; no call was attempted for this item.
    ConnectionFailed,
    /// The batch was cancelled before this item was attempted.
    Cancelled,
}

/// Per-product sync outcome.
#[derive(Debug, Clone, Serialize)]
pub struct SyncDetail {
    pub local_id: ProductId,
    pub description: String,
    pub remote_id: Option<i64>,
    pub status: SyncStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregated result of a sync batch. `details` is index-aligned with
/// the input batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    pub created: usize,
    pub updated: usize,
    pub failed: usize,
    pub cancelled: usize,
    pub details: Vec<SyncDetail>,
}

impl SyncReport {
    /// The batch succeeded iff nothing failed.
    #[must_use]
    pub const fn success(&self) -> bool {
        self.failed == 0
    }

    fn record(&mut self, detail: SyncDetail) {
        match detail.status {
            SyncStatus::Created => self.created += 1,
            SyncStatus::Updated => self.updated += 1,
            SyncStatus::Failed | SyncStatus::ConnectionFailed => self.failed += 1,
            SyncStatus::Cancelled => self.cancelled += 1,
        }
        self.details.push(detail);
    }
}

/// Case-insensitive remote category name→id map, fetched once and
/// reused across the batch; unresolved names are created on demand.
struct CategoryResolver {
    by_name: Option<HashMap<String, i64>>,
}

impl CategoryResolver {
    const fn new() -> Self {
        Self { by_name: None }
    }

    async fn resolve(&mut self, api: &dyn WooApi, name: &str) -> Result<i64, WooError> {
        if self.by_name.is_none() {
            let categories = api.list_categories().await?;
            self.by_name = Some(
                categories
                    .into_iter()
                    .map(|c| (c.name.to_lowercase(), c.id))
                    .collect(),
            );
        }
        // populated just above
        let Some(map) = self.by_name.as_mut() else {
            return Err(WooError::Parse("category map unavailable".to_string()));
        };

        let key = name.to_lowercase();
        if let Some(id) = map.get(&key) {
            return Ok(*id);
        }
        let created = api.create_category(name).await?;
        map.insert(key, created.id);
        Ok(created.id)
    }
}

fn update_payload(product: &Product) -> ProductUpdate {
    ProductUpdate {
        name: product.description.clone(),
        regular_price: product.price.amount().to_string(),
        description: product.item_description.clone(),
        sku: sku_for(product.id),
        images: product
            .image
            .iter()
            .map(|src| RemoteImage { src: src.clone() })
            .collect(),
    }
}

fn create_payload(product: &Product, category_id: Option<i64>) -> ProductCreate {
    ProductCreate {
        name: product.description.clone(),
        product_type: "simple".to_string(),
        status: "publish".to_string(),
        regular_price: product.price.amount().to_string(),
        description: product.item_description.clone(),
        sku: sku_for(product.id),
        manage_stock: true,
        stock_quantity: i64::from(product.quantity),
        categories: category_id
            .map(|id| RemoteCategoryRef { id, name: None })
            .into_iter()
            .collect(),
        images: product
            .image
            .iter()
            .map(|src| RemoteImage { src: src.clone() })
            .collect(),
        meta_data: vec![MetaData {
            key: LOCAL_ID_META_KEY.to_string(),
            value: Value::from(product.id.as_i64()),
        }],
    }
}

/// Push a batch of local products into the WooCommerce catalog.
///
/// A failed pre-flight probe reports the whole batch as
/// `connection_failed` without attempting any further call. Otherwise
/// products are upserted sequentially, keyed by SKU; each item's outcome
/// is recorded in input order and one failure never aborts the rest.
pub async fn sync_products_to_woocommerce(
    products: &[Product],
    api: &dyn WooApi,
    cancel: &CancelToken,
) -> SyncReport {
    let mut report = SyncReport::default();

    if let Err(e) = api.probe().await {
        warn!(error = %e, "WooCommerce unreachable, failing whole batch");
        for product in products {
            report.record(SyncDetail {
                local_id: product.id,
                description: product.description.clone(),
                remote_id: None,
                status: SyncStatus::ConnectionFailed,
                error: Some(e.to_string()),
            });
        }
        return report;
    }

    let mut categories = CategoryResolver::new();

    for product in products {
        if cancel.is_cancelled() {
            report.record(SyncDetail {
                local_id: product.id,
                description: product.description.clone(),
                remote_id: None,
                status: SyncStatus::Cancelled,
                error: None,
            });
            continue;
        }

        let detail = match sync_one(product, api, &mut categories).await {
            Ok((status, remote_id)) => SyncDetail {
                local_id: product.id,
                description: product.description.clone(),
                remote_id: Some(remote_id),
                status,
                error: None,
            },
            Err(e) => {
                warn!(product = %product.id, error = %e, "product sync failed");
                SyncDetail {
                    local_id: product.id,
                    description: product.description.clone(),
                    remote_id: None,
                    status: SyncStatus::Failed,
                    error: Some(e.to_string()),
                }
            }
        };
        report.record(detail);
    }

    info!(
        created = report.created,
        updated = report.updated,
        failed = report.failed,
        cancelled = report.cancelled,
        "product sync finished"
    );
    report
}

async fn sync_one(
    product: &Product,
    api: &dyn WooApi,
    categories: &mut CategoryResolver,
) -> Result<(SyncStatus, i64), WooError> {
    let sku = sku_for(product.id);
    if let Some(remote) = api.find_product_by_sku(&sku).await? {
        let updated = api
            .update_product(remote.id, &update_payload(product))
            .await?;
        return Ok((SyncStatus::Updated, updated.id));
    }

    let category_id = if product.category.trim().is_empty() {
        None
    } else {
        Some(categories.resolve(api, &product.category).await?)
    };
    let created = api
        .create_product(&create_payload(product, category_id))
        .await?;
    Ok((SyncStatus::Created, created.id))
}

/// Reconstruct local-shaped product records from the remote catalog.
///
/// Only remote products carrying the local-ID metadata entry are
/// considered; the rest of the remote catalog is not ours. Unparseable
/// prices default to zero with a warning rather than failing the pull.
///
/// # Errors
///
/// Returns an error when a page listing fails; already-collected pages
/// are not returned partially.
pub async fn products_from_woocommerce(api: &dyn WooApi) -> Result<Vec<Product>, WooError> {
    let mut products = Vec::new();
    let mut page = 1;
    loop {
        let remote_page = api.list_products(page).await?;
        if remote_page.is_empty() {
            break;
        }
        for remote in remote_page {
            if let Some(product) = local_shape(&remote) {
                products.push(product);
            }
        }
        page += 1;
    }
    Ok(products)
}

/// Map one remote product back to the local shape, when it is ours.
fn local_shape(remote: &RemoteProduct) -> Option<Product> {
    let local_id = match remote.meta(LOCAL_ID_META_KEY)? {
        Value::Number(n) => n.as_i64()?,
        Value::String(s) => s.parse().ok()?,
        _ => return None,
    };

    let price = remote.regular_price.parse::<Decimal>().unwrap_or_else(|_| {
        warn!(
            remote_id = remote.id,
            raw = %remote.regular_price,
            "unparseable remote price, defaulting to zero"
        );
        Decimal::ZERO
    });

    Some(Product {
        id: ProductId::new(local_id),
        description: remote.name.clone(),
        item_description: remote.description.clone(),
        price: Price::new(price),
        quantity: remote
            .stock_quantity
            .and_then(|q| u32::try_from(q).ok())
            .unwrap_or(0),
        category: remote
            .categories
            .first()
            .and_then(|c| c.name.clone())
            .unwrap_or_else(|| "Geral".to_string()),
        image: remote.images.first().map(|i| i.src.clone()),
        dimensions: None,
        weight: None,
    })
}

/// Point the webhook for a topic at the given delivery URL, creating it
/// when absent and updating it when it drifted. Never duplicates a
/// topic's hook.
///
/// # Errors
///
/// Returns an error when the webhook endpoints fail.
pub async fn ensure_webhook(
    api: &dyn WooApi,
    topic: &str,
    delivery_url: &str,
) -> Result<Webhook, WooError> {
    let existing = api.list_webhooks().await?;
    if let Some(hook) = existing.into_iter().find(|h| h.topic == topic) {
        if hook.delivery_url == delivery_url {
            return Ok(hook);
        }
        return api.update_webhook(hook.id, delivery_url).await;
    }
    api.create_webhook(topic, delivery_url).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use super::super::types::RemoteCategory;

    /// Scripted in-memory WooCommerce double.
    #[derive(Default)]
    struct FakeWoo {
        state: Mutex<FakeState>,
    }

    #[derive(Default)]
    struct FakeState {
        probe_fails: bool,
        products: Vec<RemoteProduct>,
        categories: Vec<RemoteCategory>,
        webhooks: Vec<Webhook>,
        /// SKUs whose create/update calls fail.
        poisoned_skus: Vec<String>,
        next_id: i64,
        category_creates: usize,
        create_calls: usize,
        update_calls: usize,
    }

    impl FakeWoo {
        fn failing_probe() -> Self {
            let fake = Self::default();
            fake.state.lock().unwrap().probe_fails = true;
            fake
        }

        fn poison(&self, sku: &str) {
            self.state.lock().unwrap().poisoned_skus.push(sku.to_string());
        }

        fn with_category(self, id: i64, name: &str) -> Self {
            self.state.lock().unwrap().categories.push(RemoteCategory {
                id,
                name: name.to_string(),
            });
            self
        }

        fn remote_product(&self, sku: &str) -> Option<RemoteProduct> {
            self.state
                .lock()
                .unwrap()
                .products
                .iter()
                .find(|p| p.sku == sku)
                .cloned()
        }
    }

    #[async_trait]
    impl WooApi for FakeWoo {
        async fn probe(&self) -> Result<(), WooError> {
            if self.state.lock().unwrap().probe_fails {
                return Err(WooError::ConnectionFailed("refused".to_string()));
            }
            Ok(())
        }

        async fn list_categories(&self) -> Result<Vec<RemoteCategory>, WooError> {
            Ok(self.state.lock().unwrap().categories.clone())
        }

        async fn create_category(&self, name: &str) -> Result<RemoteCategory, WooError> {
            let mut state = self.state.lock().unwrap();
            state.next_id += 1;
            state.category_creates += 1;
            let category = RemoteCategory {
                id: state.next_id,
                name: name.to_string(),
            };
            state.categories.push(category.clone());
            Ok(category)
        }

        async fn find_product_by_sku(
            &self,
            sku: &str,
        ) -> Result<Option<RemoteProduct>, WooError> {
            Ok(self.remote_product(sku))
        }

        async fn create_product(
            &self,
            payload: &ProductCreate,
        ) -> Result<RemoteProduct, WooError> {
            let mut state = self.state.lock().unwrap();
            state.create_calls += 1;
            if state.poisoned_skus.contains(&payload.sku) {
                return Err(WooError::Api {
                    status: 500,
                    message: "simulated failure".to_string(),
                });
            }
            state.next_id += 1;
            let remote = RemoteProduct {
                id: state.next_id,
                name: payload.name.clone(),
                sku: payload.sku.clone(),
                regular_price: payload.regular_price.clone(),
                description: payload.description.clone(),
                stock_quantity: Some(payload.stock_quantity),
                categories: payload.categories.clone(),
                images: payload.images.clone(),
                meta_data: payload.meta_data.clone(),
            };
            state.products.push(remote.clone());
            Ok(remote)
        }

        async fn update_product(
            &self,
            id: i64,
            payload: &ProductUpdate,
        ) -> Result<RemoteProduct, WooError> {
            let mut state = self.state.lock().unwrap();
            state.update_calls += 1;
            if state.poisoned_skus.contains(&payload.sku) {
                return Err(WooError::Api {
                    status: 500,
                    message: "simulated failure".to_string(),
                });
            }
            let remote = state
                .products
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or(WooError::Api {
                    status: 404,
                    message: "no such product".to_string(),
                })?;
            remote.name = payload.name.clone();
            remote.regular_price = payload.regular_price.clone();
            remote.description = payload.description.clone();
            Ok(remote.clone())
        }

        async fn list_products(&self, page: u32) -> Result<Vec<RemoteProduct>, WooError> {
            if page == 1 {
                Ok(self.state.lock().unwrap().products.clone())
            } else {
                Ok(vec![])
            }
        }

        async fn list_webhooks(&self) -> Result<Vec<Webhook>, WooError> {
            Ok(self.state.lock().unwrap().webhooks.clone())
        }

        async fn create_webhook(
            &self,
            topic: &str,
            delivery_url: &str,
        ) -> Result<Webhook, WooError> {
            let mut state = self.state.lock().unwrap();
            state.next_id += 1;
            let hook = Webhook {
                id: state.next_id,
                topic: topic.to_string(),
                delivery_url: delivery_url.to_string(),
                status: "active".to_string(),
            };
            state.webhooks.push(hook.clone());
            Ok(hook)
        }

        async fn update_webhook(&self, id: i64, delivery_url: &str) -> Result<Webhook, WooError> {
            let mut state = self.state.lock().unwrap();
            let hook = state
                .webhooks
                .iter_mut()
                .find(|h| h.id == id)
                .ok_or(WooError::Api {
                    status: 404,
                    message: "no such webhook".to_string(),
                })?;
            hook.delivery_url = delivery_url.to_string();
            Ok(hook.clone())
        }
    }

    fn product(id: i64, description: &str, category: &str) -> Product {
        Product {
            id: ProductId::new(id),
            description: description.to_string(),
            item_description: format!("{description} em estoque"),
            price: Price::from_centavos(2500),
            quantity: 4,
            category: category.to_string(),
            image: None,
            dimensions: None,
            weight: None,
        }
    }

    #[tokio::test]
    async fn test_probe_failure_fails_whole_batch_without_calls() {
        let api = FakeWoo::failing_probe();
        let batch = vec![product(1, "Caneca", "Cozinha"), product(2, "Prato", "Cozinha")];

        let report = sync_products_to_woocommerce(&batch, &api, &CancelToken::new()).await;

        assert_eq!(report.failed, 2);
        assert_eq!(report.created, 0);
        assert_eq!(report.updated, 0);
        assert!(!report.success());
        assert!(report
            .details
            .iter()
            .all(|d| d.status == SyncStatus::ConnectionFailed));

        let state = api.state.lock().unwrap();
        assert_eq!(state.create_calls, 0);
        assert_eq!(state.update_calls, 0);
    }

    #[tokio::test]
    async fn test_creates_then_updates_by_sku() {
        let api = FakeWoo::default();
        let batch = vec![product(1, "Caneca", "Cozinha")];

        let first = sync_products_to_woocommerce(&batch, &api, &CancelToken::new()).await;
        assert_eq!(first.created, 1);
        assert!(first.success());

        let remote = api.remote_product("PDV-1").unwrap();
        assert_eq!(
            remote.meta(LOCAL_ID_META_KEY),
            Some(&serde_json::json!(1))
        );

        let second = sync_products_to_woocommerce(&batch, &api, &CancelToken::new()).await;
        assert_eq!(second.created, 0);
        assert_eq!(second.updated, 1);
        assert_eq!(second.details[0].remote_id, first.details[0].remote_id);
    }

    #[tokio::test]
    async fn test_one_failure_does_not_abort_batch() {
        let api = FakeWoo::default();
        api.poison("PDV-2");
        let batch = vec![
            product(1, "Caneca", "Cozinha"),
            product(2, "Prato", "Cozinha"),
            product(3, "Copo", "Cozinha"),
        ];

        let report = sync_products_to_woocommerce(&batch, &api, &CancelToken::new()).await;

        assert_eq!(report.created, 2);
        assert_eq!(report.failed, 1);
        assert!(!report.success());
        assert_eq!(report.details.len(), 3);
        assert_eq!(report.details[1].status, SyncStatus::Failed);
        assert!(report.details[1].error.as_deref().is_some());
        assert_eq!(report.details[2].status, SyncStatus::Created);
    }

    #[tokio::test]
    async fn test_category_resolved_case_insensitively_and_created_once() {
        let api = FakeWoo::default().with_category(7, "Cozinha");
        let batch = vec![
            product(1, "Caneca", "COZINHA"),
            product(2, "Vaso", "Jardim"),
            product(3, "Regador", "jardim"),
        ];

        let report = sync_products_to_woocommerce(&batch, &api, &CancelToken::new()).await;
        assert_eq!(report.created, 3);

        let state = api.state.lock().unwrap();
        // "Cozinha" matched the existing category; "Jardim" was created once.
        assert_eq!(state.category_creates, 1);
        let caneca = state.products.iter().find(|p| p.sku == "PDV-1").unwrap();
        assert_eq!(caneca.categories[0].id, 7);
    }

    #[tokio::test]
    async fn test_cancellation_between_items() {
        let api = FakeWoo::default();
        let cancel = CancelToken::new();
        cancel.cancel();
        let batch = vec![product(1, "Caneca", "Cozinha"), product(2, "Prato", "Cozinha")];

        let report = sync_products_to_woocommerce(&batch, &api, &cancel).await;

        assert_eq!(report.cancelled, 2);
        assert_eq!(report.details.len(), 2);
        assert!(report.success());
        assert_eq!(api.state.lock().unwrap().create_calls, 0);
    }

    #[tokio::test]
    async fn test_pull_reconstructs_local_shape() {
        let api = FakeWoo::default().with_category(7, "Cozinha");
        let batch = vec![product(3, "Caneca", "Cozinha")];
        sync_products_to_woocommerce(&batch, &api, &CancelToken::new()).await;

        let pulled = products_from_woocommerce(&api).await.unwrap();
        assert_eq!(pulled.len(), 1);
        let first = pulled.first().unwrap();
        assert_eq!(first.id, ProductId::new(3));
        assert_eq!(first.description, "Caneca");
        assert_eq!(first.price, Price::from_centavos(2500));
        assert_eq!(first.quantity, 4);
    }

    #[tokio::test]
    async fn test_pull_ignores_foreign_products() {
        let api = FakeWoo::default();
        api.state.lock().unwrap().products.push(RemoteProduct {
            id: 99,
            name: "Nao e nosso".to_string(),
            sku: "OTHER-99".to_string(),
            regular_price: "10.00".to_string(),
            description: String::new(),
            stock_quantity: None,
            categories: vec![],
            images: vec![],
            meta_data: vec![],
        });

        let pulled = products_from_woocommerce(&api).await.unwrap();
        assert!(pulled.is_empty());
    }

    #[tokio::test]
    async fn test_ensure_webhook_creates_then_updates() {
        let api = FakeWoo::default();

        let created = ensure_webhook(&api, "product.updated", "https://n8n.example/a")
            .await
            .unwrap();
        assert_eq!(created.delivery_url, "https://n8n.example/a");

        let updated = ensure_webhook(&api, "product.updated", "https://n8n.example/b")
            .await
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.delivery_url, "https://n8n.example/b");
        assert_eq!(api.state.lock().unwrap().webhooks.len(), 1);
    }
}
