//! Backup commands.
//!
//! # Usage
//!
//! ```bash
//! # Write a timestamped archive in the configured backup directory
//! balcao backup create
//!
//! # Pick a renderer and an explicit output path
//! balcao backup create --format component-view --output /tmp/backup.zip
//!
//! # Restore an archive into the local store
//! balcao backup restore ./backups/balcao-backup-20260806-153000.zip
//! ```

use std::path::PathBuf;
use std::str::FromStr;

use chrono::Utc;
use thiserror::Error;
use tracing::info;

use balcao_engine::backup::{
    apply_restore, backup_file_name, create_backup, restore_backup, BackupError, BackupFormat,
};
use balcao_engine::config::EngineConfig;
use balcao_engine::store::LocalStore;

use super::OpenError;

/// Errors that can occur during backup commands.
#[derive(Debug, Error)]
pub enum BackupCommandError {
    #[error(transparent)]
    Open(#[from] OpenError),

    #[error(transparent)]
    Backup(#[from] BackupError),

    #[error("Invalid backup format: {0}")]
    InvalidFormat(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Create a backup archive from the local store.
///
/// # Errors
///
/// Returns an error when the store cannot be read or the archive cannot
/// be written.
pub async fn create(
    format: Option<&str>,
    output: Option<&str>,
) -> Result<(), BackupCommandError> {
    let (config, store) = super::open_store().await?;

    let format = match format {
        Some(raw) => BackupFormat::from_str(raw).map_err(BackupCommandError::InvalidFormat)?,
        None => config.backup.format,
    };

    let path = write_archive(&config, &store, format, output.map(PathBuf::from)).await?;
    info!(path = %path.display(), format = %format, "backup created");
    Ok(())
}

/// Restore a backup archive into the local store.
///
/// # Errors
///
/// Returns an error when the archive is unusable; per-section problems
/// are skipped and reported, not fatal.
pub async fn restore(archive: &str) -> Result<(), BackupCommandError> {
    let (_, store) = super::open_store().await?;

    let bytes = tokio::fs::read(archive).await?;
    let restored = restore_backup(&bytes)?;
    info!(sections = restored.sections.len(), "archive parsed");

    let report = apply_restore(&store, &restored).await?;
    info!(
        sections = report.sections_restored,
        written = report.records_written,
        failed = report.records_failed,
        "restore finished"
    );
    for skipped in &report.skipped {
        tracing::warn!(
            section = %skipped.section,
            reason = %skipped.reason,
            "section skipped"
        );
    }
    Ok(())
}

/// Write an archive for the current store contents and return its path.
pub async fn write_archive(
    config: &EngineConfig,
    store: &LocalStore,
    format: BackupFormat,
    output: Option<PathBuf>,
) -> Result<PathBuf, BackupCommandError> {
    let bytes = create_backup(store, format).await?;
    let path = match output {
        Some(path) => path,
        None => {
            tokio::fs::create_dir_all(&config.backup.dir).await?;
            config.backup.dir.join(backup_file_name(Utc::now()))
        }
    };
    tokio::fs::write(&path, bytes).await?;
    Ok(path)
}

/// Create a backup after a mutating command when auto-backup is on.
pub async fn auto_backup_if_enabled(
    config: &EngineConfig,
    store: &LocalStore,
) -> Result<(), BackupCommandError> {
    if !config.backup.auto {
        return Ok(());
    }
    let path = write_archive(config, store, config.backup.format, None).await?;
    info!(path = %path.display(), "auto-backup created");
    Ok(())
}
