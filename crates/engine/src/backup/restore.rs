//! Restore: container parsing and store application.
//!
//! Parsing and writing are separate steps so callers can inspect what a
//! container holds before committing it to the store.

use std::collections::BTreeMap;
use std::io::{Cursor, Read};

use tracing::{info, warn};
use zip::result::ZipError;
use zip::ZipArchive;

use balcao_core::{Client, Product, Sale, Vendor};

use super::archive::{parse_manifest, Manifest, MANIFEST_FILE};
use super::render::extract_section;
use super::{BackupError, BackupFormat, Section, SectionEnvelope};
use crate::store::{ReplaceOutcome, Store};

/// The recoverable contents of a backup container.
#[derive(Debug)]
pub struct RestoredArchive {
    /// Parsed manifest, when its data block was readable.
    pub manifest: Option<Manifest>,
    /// One recovered envelope per section found in the container.
    pub sections: BTreeMap<Section, SectionEnvelope>,
}

/// A section that was present but could not be applied.
#[derive(Debug, Clone)]
pub struct SkippedSection {
    pub section: String,
    pub reason: String,
}

/// Outcome of applying a restored archive to the store.
#[derive(Debug, Default)]
pub struct RestoreReport {
    pub sections_restored: usize,
    pub records_written: usize,
    pub records_failed: usize,
    pub skipped: Vec<SkippedSection>,
}

impl RestoreReport {
    fn absorb(&mut self, outcome: ReplaceOutcome) {
        self.sections_restored += 1;
        self.records_written += outcome.written;
        self.records_failed += outcome.failed;
    }

    fn skip(&mut self, section: Section, reason: String) {
        warn!(section = %section, reason = %reason, "skipping section on restore");
        self.skipped.push(SkippedSection {
            section: section.name().to_string(),
            reason,
        });
    }
}

/// Parse a backup container.
///
/// For each of the eight known sections, the three renderer variants are
/// probed in order; the first that extracts wins. Per-section failures
/// are logged and skipped.
///
/// # Errors
///
/// Returns [`BackupError::InvalidArchive`] when the bytes are not a zip
/// or the `README.md` manifest is missing, and
/// [`BackupError::EmptyArchive`] when no section could be recovered.
pub fn restore_backup(bytes: &[u8]) -> Result<RestoredArchive, BackupError> {
    let mut zip = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| BackupError::InvalidArchive(format!("not a readable zip container: {e}")))?;

    let Some(manifest_text) = read_entry(&mut zip, MANIFEST_FILE) else {
        return Err(BackupError::InvalidArchive(format!(
            "manifest {MANIFEST_FILE} missing"
        )));
    };
    let manifest = parse_manifest(&manifest_text);
    if manifest.is_none() {
        warn!("manifest present but its data block is unreadable");
    }

    let mut sections = BTreeMap::new();
    for section in Section::ALL {
        for format in BackupFormat::ALL {
            let name = format!("{}.{}", section.name(), format.extension());
            let Some(text) = read_entry(&mut zip, &name) else {
                continue;
            };
            match extract_section(format, &text) {
                Ok(envelope) if !envelope.is_supported() => {
                    warn!(
                        file = %name,
                        version = envelope.format_version,
                        "section written by a newer version, skipping"
                    );
                }
                Ok(envelope) => {
                    sections.insert(section, envelope);
                    break;
                }
                Err(e) => {
                    warn!(file = %name, error = %e, "failed to extract section variant");
                }
            }
        }
    }

    if sections.is_empty() {
        return Err(BackupError::EmptyArchive);
    }

    info!(sections = sections.len(), "recovered backup sections");
    Ok(RestoredArchive { manifest, sections })
}

/// Apply a restored archive to the store.
///
/// Collections are replaced (clear-then-insert; the store reassigns
/// primary keys, except for sales); scalar sections overwrite their
/// settings keys. Per-record write failures are tallied, never fatal.
///
/// # Errors
///
/// Returns an error only when the store itself fails at the document
/// level (e.g., the backing file cannot be written).
pub async fn apply_restore(
    store: &dyn Store,
    archive: &RestoredArchive,
) -> Result<RestoreReport, BackupError> {
    let mut report = RestoreReport::default();

    for (section, envelope) in &archive.sections {
        let payload = envelope.payload.clone();
        if let Some(key) = section.settings_key() {
            store.put_setting(key, payload).await?;
            report.sections_restored += 1;
            report.records_written += 1;
            continue;
        }

        match section {
            Section::Produtos => match serde_json::from_value::<Vec<Product>>(payload) {
                Ok(records) => report.absorb(store.replace_products(records).await?),
                Err(e) => report.skip(*section, e.to_string()),
            },
            Section::Clientes => match serde_json::from_value::<Vec<Client>>(payload) {
                Ok(records) => report.absorb(store.replace_clients(records).await?),
                Err(e) => report.skip(*section, e.to_string()),
            },
            Section::Fornecedores => match serde_json::from_value::<Vec<Vendor>>(payload) {
                Ok(records) => report.absorb(store.replace_vendors(records).await?),
                Err(e) => report.skip(*section, e.to_string()),
            },
            Section::Vendas => match serde_json::from_value::<Vec<Sale>>(payload) {
                Ok(records) => report.absorb(store.replace_sales(records).await?),
                Err(e) => report.skip(*section, e.to_string()),
            },
            _ => {}
        }
    }

    info!(
        sections = report.sections_restored,
        written = report.records_written,
        failed = report.records_failed,
        "restore applied"
    );
    Ok(report)
}

/// Read one zip entry to a string; absent or unreadable entries are `None`.
fn read_entry(zip: &mut ZipArchive<Cursor<&[u8]>>, name: &str) -> Option<String> {
    let mut entry = match zip.by_name(name) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => return None,
        Err(e) => {
            warn!(file = %name, error = %e, "unreadable archive entry");
            return None;
        }
    };
    let mut text = String::new();
    match entry.read_to_string(&mut text) {
        Ok(_) => Some(text),
        Err(e) => {
            warn!(file = %name, error = %e, "archive entry is not utf-8 text");
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::backup::create_backup;
    use crate::store::LocalStore;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn zip_with(files: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, contents) in files {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(contents.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_not_a_zip_is_invalid() {
        let err = restore_backup(b"definitely not a zip").unwrap_err();
        assert!(matches!(err, BackupError::InvalidArchive(_)));
    }

    #[test]
    fn test_missing_manifest_is_invalid() {
        let bytes = zip_with(&[("Produtos.json", "{}")]);
        let err = restore_backup(&bytes).unwrap_err();
        assert!(matches!(err, BackupError::InvalidArchive(_)));
    }

    #[test]
    fn test_manifest_but_no_recoverable_sections_is_empty() {
        let bytes = zip_with(&[
            (MANIFEST_FILE, "# Backup Balcao\n"),
            ("Produtos.json", "not an envelope"),
        ]);
        let err = restore_backup(&bytes).unwrap_err();
        assert!(matches!(err, BackupError::EmptyArchive));
    }

    #[tokio::test]
    async fn test_fresh_backup_restores_all_sections() {
        let store = LocalStore::in_memory();
        let bytes = create_backup(&store, BackupFormat::ComponentView)
            .await
            .unwrap();
        let restored = restore_backup(&bytes).unwrap();
        assert_eq!(restored.sections.len(), 8);
        assert!(restored.manifest.is_some());

        let report = apply_restore(&store, &restored).await.unwrap();
        assert_eq!(report.sections_restored, 8);
        assert!(report.skipped.is_empty());
    }
}
