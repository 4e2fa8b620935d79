//! CLI command implementations.
//!
//! Every command loads [`EngineConfig`] from the environment, opens the
//! local store and drives the engine; status goes to tracing, data output
//! goes to stdout.

pub mod backup;
pub mod quote;
pub mod seed;
pub mod stock;
pub mod sync;

use balcao_engine::config::{ConfigError, EngineConfig};
use balcao_engine::store::{LocalStore, StoreError};

/// Load configuration and open the configured store document.
pub async fn open_store() -> Result<(EngineConfig, LocalStore), OpenError> {
    let config = EngineConfig::from_env()?;
    let store = LocalStore::open(&config.store_path).await?;
    Ok((config, store))
}

/// Errors shared by command start-up.
#[derive(Debug, thiserror::Error)]
pub enum OpenError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
