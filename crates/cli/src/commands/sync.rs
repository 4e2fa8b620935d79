//! WooCommerce sync commands.
//!
//! # Usage
//!
//! ```bash
//! balcao sync push      # mirror local products into the remote catalog
//! balcao sync pull      # rebuild the local catalog from PDV-owned remote products
//! balcao sync webhook   # point the stock webhook at the configured delivery URL
//! ```
//!
//! # Environment Variables
//!
//! - `WOOCOMMERCE_URL` - Base store URL
//! - `WOOCOMMERCE_CONSUMER_KEY` / `WOOCOMMERCE_CONSUMER_SECRET` - REST credentials
//! - `WOOCOMMERCE_WEBHOOK_DELIVERY_URL` - Target for `sync webhook`

use thiserror::Error;
use tracing::{info, warn};

use balcao_engine::config::WooCommerceConfig;
use balcao_engine::store::{Store, StoreError};
use balcao_engine::woocommerce::{
    ensure_webhook, products_from_woocommerce, sync_products_to_woocommerce, CancelToken,
    SyncReport, WooClient, WooError,
};

use super::OpenError;

/// Webhook topic used to propagate stock updates.
const STOCK_WEBHOOK_TOPIC: &str = "product.updated";

/// Errors that can occur during sync commands.
#[derive(Debug, Error)]
pub enum SyncCommandError {
    #[error(transparent)]
    Open(#[from] OpenError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Woo(#[from] WooError),

    #[error(transparent)]
    Backup(#[from] super::backup::BackupCommandError),

    #[error("WooCommerce is not configured; set WOOCOMMERCE_URL and credentials")]
    NotConfigured,

    #[error("webhook delivery URL is not configured; set WOOCOMMERCE_WEBHOOK_DELIVERY_URL")]
    NoDeliveryUrl,
}

fn require_woo(config: Option<&WooCommerceConfig>) -> Result<WooClient, SyncCommandError> {
    let config = config.ok_or(SyncCommandError::NotConfigured)?;
    Ok(WooClient::new(config)?)
}

/// A cancel token that trips on Ctrl-C, so a long batch can be aborted
/// between items.
fn cancel_on_ctrl_c() -> CancelToken {
    let cancel = CancelToken::new();
    let trip = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("cancellation requested, stopping after the current item");
            trip.cancel();
        }
    });
    cancel
}

/// Push the local catalog to WooCommerce.
///
/// # Errors
///
/// Returns an error when configuration or the store fails; per-product
/// outcomes are reported, not thrown.
pub async fn push() -> Result<(), SyncCommandError> {
    let (config, store) = super::open_store().await?;
    let client = require_woo(config.woocommerce.as_ref())?;

    let products = store.products().await?;
    info!(count = products.len(), "pushing products to WooCommerce");

    let report = sync_products_to_woocommerce(&products, &client, &cancel_on_ctrl_c()).await;
    print_report(&report);
    Ok(())
}

/// Pull PDV-owned products from WooCommerce into the local store.
///
/// # Errors
///
/// Returns an error when the remote listing or the store replace fails.
pub async fn pull() -> Result<(), SyncCommandError> {
    let (config, store) = super::open_store().await?;
    let client = require_woo(config.woocommerce.as_ref())?;

    let products = products_from_woocommerce(&client).await?;
    info!(count = products.len(), "pulled PDV-owned products");

    let outcome = store.replace_products(products).await?;
    info!(
        written = outcome.written,
        failed = outcome.failed,
        "local catalog replaced"
    );

    super::backup::auto_backup_if_enabled(&config, &store).await?;
    Ok(())
}

/// Register or update the stock webhook.
///
/// # Errors
///
/// Returns an error when configuration is incomplete or the webhook
/// endpoints fail.
pub async fn webhook() -> Result<(), SyncCommandError> {
    let (config, _) = super::open_store().await?;
    let woo = config
        .woocommerce
        .as_ref()
        .ok_or(SyncCommandError::NotConfigured)?;
    let delivery_url = woo
        .webhook_delivery_url
        .as_deref()
        .ok_or(SyncCommandError::NoDeliveryUrl)?;

    let client = WooClient::new(woo)?;
    let hook = ensure_webhook(&client, STOCK_WEBHOOK_TOPIC, delivery_url).await?;
    info!(id = hook.id, topic = %hook.topic, url = %hook.delivery_url, "webhook in place");
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_report(report: &SyncReport) {
    println!(
        "{} criado(s), {} atualizado(s), {} falha(s), {} cancelado(s)",
        report.created, report.updated, report.failed, report.cancelled
    );
    for detail in &report.details {
        let remote = detail
            .remote_id
            .map_or_else(|| "-".to_string(), |id| id.to_string());
        let error = detail.error.as_deref().unwrap_or("");
        println!(
            "  #{:<6} {:<30} remoto={:<8} {:?} {}",
            detail.local_id, detail.description, remote, detail.status, error
        );
    }
}
