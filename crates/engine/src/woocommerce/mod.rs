//! WooCommerce sync adapter.
//!
//! The local catalog is the source of truth; the remote store is a
//! mirror. Local products map to remote ones through two conventions:
//! a deterministic SKU (`PDV-{local_id}`) used for upsert lookups, and a
//! metadata entry carrying the local ID used by the reverse lookup.
//!
//! # Example
//!
//! ```rust,ignore
//! use balcao_engine::woocommerce::{
//!     sync_products_to_woocommerce, CancelToken, WooClient,
//! };
//!
//! let client = WooClient::new(&config)?;
//! let report = sync_products_to_woocommerce(&products, &client, &CancelToken::new()).await;
//! println!("{} criados, {} atualizados, {} falhas", report.created, report.updated, report.failed);
//! ```

mod client;
mod sync;
pub mod types;

pub use client::{WooApi, WooClient, WooError};
pub use sync::{
    ensure_webhook, products_from_woocommerce, sku_for, sync_products_to_woocommerce,
    CancelToken, SyncDetail, SyncReport, SyncStatus, LOCAL_ID_META_KEY,
};
