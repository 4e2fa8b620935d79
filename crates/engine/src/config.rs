//! Engine configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional (with defaults)
//! - `BALCAO_STORE_PATH` - Local store file (default: ./balcao-store.json)
//! - `BALCAO_BACKUP_DIR` - Directory for backup archives (default: ./backups)
//! - `BALCAO_AUTO_BACKUP` - Create a backup after mutating commands (default: false)
//! - `BALCAO_BACKUP_FORMAT` - Default backup renderer (default: structured-data)
//! - `BALCAO_LOW_STOCK_THRESHOLD` - Stock level considered "low" (default: 5)
//!
//! ## Optional (WooCommerce sync; the whole block is absent unless set)
//! - `WOOCOMMERCE_URL` - Base store URL (e.g., <https://loja.example.com>)
//! - `WOOCOMMERCE_CONSUMER_KEY` - REST API consumer key (required with URL)
//! - `WOOCOMMERCE_CONSUMER_SECRET` - REST API consumer secret (required with URL)
//! - `WOOCOMMERCE_WEBHOOK_DELIVERY_URL` - Delivery URL for the stock webhook

use std::path::PathBuf;
use std::str::FromStr;

use secrecy::SecretString;
use thiserror::Error;

use crate::backup::BackupFormat;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Path of the local store document.
    pub store_path: PathBuf,
    /// Backup engine settings.
    pub backup: BackupSettings,
    /// Stock level at or below which a product is reported as low.
    pub low_stock_threshold: u32,
    /// WooCommerce sync settings, when the sync adapter is configured.
    pub woocommerce: Option<WooCommerceConfig>,
}

/// Backup engine settings.
#[derive(Debug, Clone)]
pub struct BackupSettings {
    /// Directory where backup archives are written.
    pub dir: PathBuf,
    /// Create a backup automatically after mutating commands.
    pub auto: bool,
    /// Renderer used when none is requested explicitly.
    pub format: BackupFormat,
}

/// WooCommerce REST API configuration.
///
/// Implements `Debug` manually to redact the consumer secret.
#[derive(Clone)]
pub struct WooCommerceConfig {
    /// Base store URL (the `/wp-json/wc/v3` prefix is appended by the client).
    pub base_url: String,
    /// REST API consumer key.
    pub consumer_key: String,
    /// REST API consumer secret.
    pub consumer_secret: SecretString,
    /// Delivery URL the stock webhook should point at, when webhooks are used.
    pub webhook_delivery_url: Option<String>,
}

impl std::fmt::Debug for WooCommerceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WooCommerceConfig")
            .field("base_url", &self.base_url)
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"[REDACTED]")
            .field("webhook_delivery_url", &self.webhook_delivery_url)
            .finish()
    }
}

impl EngineConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a set variable fails to parse, or if the
    /// WooCommerce URL is set without its key/secret.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let store_path = PathBuf::from(get_env_or_default(
            "BALCAO_STORE_PATH",
            "./balcao-store.json",
        ));
        let backup = BackupSettings::from_env()?;
        let low_stock_threshold = parse_env_or_default("BALCAO_LOW_STOCK_THRESHOLD", 5)?;
        let woocommerce = WooCommerceConfig::from_env()?;

        Ok(Self {
            store_path,
            backup,
            low_stock_threshold,
            woocommerce,
        })
    }
}

impl BackupSettings {
    fn from_env() -> Result<Self, ConfigError> {
        let dir = PathBuf::from(get_env_or_default("BALCAO_BACKUP_DIR", "./backups"));
        let auto = parse_env_or_default("BALCAO_AUTO_BACKUP", false)?;
        let format_raw = get_env_or_default("BALCAO_BACKUP_FORMAT", "structured-data");
        let format = BackupFormat::from_str(&format_raw)
            .map_err(|e| ConfigError::InvalidEnvVar("BALCAO_BACKUP_FORMAT".to_string(), e))?;
        Ok(Self { dir, auto, format })
    }
}

impl WooCommerceConfig {
    /// Returns `None` when `WOOCOMMERCE_URL` is unset; key and secret are
    /// required once the URL is present.
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(base_url) = get_optional_env("WOOCOMMERCE_URL") else {
            return Ok(None);
        };
        let consumer_key = get_required_env("WOOCOMMERCE_CONSUMER_KEY")?;
        let consumer_secret = SecretString::from(get_required_env("WOOCOMMERCE_CONSUMER_SECRET")?);
        let webhook_delivery_url = get_optional_env("WOOCOMMERCE_WEBHOOK_DELIVERY_URL");

        Ok(Some(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            consumer_key,
            consumer_secret,
            webhook_delivery_url,
        }))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to a default when unset.
fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_woocommerce_debug_redacts_secret() {
        let config = WooCommerceConfig {
            base_url: "https://loja.example.com".to_string(),
            consumer_key: "ck_visible".to_string(),
            consumer_secret: SecretString::from("cs_super_secret_value"),
            webhook_delivery_url: None,
        };

        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("ck_visible"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("cs_super_secret_value"));
    }

    #[test]
    fn test_parse_env_or_default_uses_default_when_unset() {
        let value: u32 = parse_env_or_default("BALCAO_TEST_UNSET_VAR", 7).unwrap();
        assert_eq!(value, 7);
    }
}
