//! Backup container creation.
//!
//! Gathers section snapshots from the store, renders one artifact per
//! section, and packages everything with a `README.md` manifest into a
//! single deflated zip.

use std::collections::BTreeMap;
use std::io::{Cursor, Write};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use zip::write::SimpleFileOptions;

use super::envelope::{SectionEnvelope, SECTION_FORMAT_VERSION};
use super::render::{embed_raw, render_section, MD_DATA_BEGIN, MD_DATA_END};
use super::{BackupError, BackupFormat, Section};
use crate::store::Store;

/// Name of the manifest file; restore requires its presence.
pub const MANIFEST_FILE: &str = "README.md";

/// The archive manifest: counts and generation metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub format_version: u32,
    pub generated_at: DateTime<Utc>,
    pub format: BackupFormat,
    /// Record count per section, in manifest order.
    pub sections: BTreeMap<String, usize>,
}

/// File name for a backup container generated at the given instant.
#[must_use]
pub fn backup_file_name(generated_at: DateTime<Utc>) -> String {
    format!(
        "balcao-backup-{}.zip",
        generated_at.format("%Y%m%d-%H%M%S")
    )
}

/// Create a backup container from the current store contents.
///
/// Every known section is written, including empty collections, so that
/// restore can distinguish "empty" from "absent".
///
/// # Errors
///
/// Returns an error if a store snapshot fails or the container cannot be
/// written.
pub async fn create_backup(
    store: &dyn Store,
    format: BackupFormat,
) -> Result<Vec<u8>, BackupError> {
    let generated_at = Utc::now();
    let mut counts = BTreeMap::new();
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for section in Section::ALL {
        let (payload, count) = section_snapshot(store, section).await?;
        counts.insert(section.name().to_string(), count);

        let envelope = SectionEnvelope::new(section.name(), count, generated_at, payload);
        let artifact = render_section(format, &envelope)?;
        let file_name = format!("{}.{}", section.name(), format.extension());
        debug!(file = %file_name, count, "writing backup artifact");
        writer.start_file(file_name, options)?;
        writer.write_all(artifact.as_bytes())?;
    }

    let manifest = Manifest {
        format_version: SECTION_FORMAT_VERSION,
        generated_at,
        format,
        sections: counts,
    };
    writer.start_file(MANIFEST_FILE, options)?;
    writer.write_all(render_manifest(&manifest)?.as_bytes())?;

    let cursor = writer.finish()?;
    Ok(cursor.into_inner())
}

/// Snapshot one section as its canonical payload plus record count.
async fn section_snapshot(
    store: &dyn Store,
    section: Section,
) -> Result<(Value, usize), BackupError> {
    let snapshot = match section {
        Section::Produtos => {
            let records = store.products().await?;
            (serde_json::to_value(&records)?, records.len())
        }
        Section::Clientes => {
            let records = store.clients().await?;
            (serde_json::to_value(&records)?, records.len())
        }
        Section::Fornecedores => {
            let records = store.vendors().await?;
            (serde_json::to_value(&records)?, records.len())
        }
        Section::Vendas => {
            let records = store.sales().await?;
            (serde_json::to_value(&records)?, records.len())
        }
        Section::Configuracoes
        | Section::Usuarios
        | Section::Rastreamento
        | Section::Logistica => {
            // settings_key is always present for scalar sections
            let key = section.settings_key().unwrap_or_default();
            match store.setting(key).await? {
                Some(value) => (value, 1),
                None => (Value::Object(serde_json::Map::new()), 0),
            }
        }
    };
    Ok(snapshot)
}

fn render_manifest(manifest: &Manifest) -> Result<String, BackupError> {
    let mut out = String::new();
    out.push_str("# Backup Balcao\n\n");
    out.push_str(&format!(
        "Gerado em: {}\n",
        manifest.generated_at.to_rfc3339()
    ));
    out.push_str(&format!("Formato: {}\n\n", manifest.format));
    out.push_str("| Secao | Registros |\n|---|---|\n");
    for (section, count) in &manifest.sections {
        out.push_str(&format!("| {section} | {count} |\n"));
    }
    out.push('\n');
    out.push_str(&embed_raw(
        &serde_json::to_vec(manifest)?,
        MD_DATA_BEGIN,
        MD_DATA_END,
    ));
    Ok(out)
}

/// Parse the manifest data block out of the `README.md` text.
pub(super) fn parse_manifest(text: &str) -> Option<Manifest> {
    let json = super::render::extract_block(text, MD_DATA_BEGIN, MD_DATA_END).ok()?;
    serde_json::from_str(&json).ok()
}
