//! Stock reports.
//!
//! # Usage
//!
//! ```bash
//! balcao stock low                 # configured threshold
//! balcao stock low --threshold 2   # explicit threshold
//! ```

use thiserror::Error;

use balcao_engine::checkout::low_stock;
use balcao_engine::store::StoreError;

use super::OpenError;

/// Errors that can occur during stock commands.
#[derive(Debug, Error)]
pub enum StockCommandError {
    #[error(transparent)]
    Open(#[from] OpenError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Print the low-stock report.
///
/// # Errors
///
/// Returns an error when the store snapshot fails.
pub async fn low(threshold: Option<u32>) -> Result<(), StockCommandError> {
    let (config, store) = super::open_store().await?;
    let threshold = threshold.unwrap_or(config.low_stock_threshold);

    let products = low_stock(&store, threshold).await?;
    print_products(threshold, &products);
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_products(threshold: u32, products: &[balcao_core::Product]) {
    if products.is_empty() {
        println!("Nenhum produto com estoque <= {threshold}.");
        return;
    }
    println!("{} produto(s) com estoque <= {threshold}:", products.len());
    for product in products {
        println!(
            "  #{:<6} {:<30} {:>4} un.  {}",
            product.id,
            product.description,
            product.quantity,
            product.price.display()
        );
    }
}
