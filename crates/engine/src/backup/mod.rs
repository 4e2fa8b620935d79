//! Backup/export engine.
//!
//! A backup is a zipped container holding one artifact per entity section
//! plus a `README.md` manifest. Every artifact embeds the same canonical
//! [`SectionEnvelope`] JSON payload; the three renderers differ only in
//! presentation:
//!
//! - `structured-data` (`.json`) - the envelope itself, pretty-printed
//! - `tabular-markdown` (`.md`) - a Markdown table view with the envelope
//!   embedded in a comment block
//! - `component-view` (`.jsx`) - a read-only React component view with
//!   the envelope embedded in a comment block
//!
//! Restore never parses the presentation: it lifts the embedded envelope
//! out of whichever variant is present and parses it structurally, so the
//! restored payload is bit-identical regardless of renderer.

mod archive;
mod envelope;
mod render;
mod restore;

pub use archive::{backup_file_name, create_backup, Manifest, MANIFEST_FILE};
pub use envelope::{SectionEnvelope, SECTION_FORMAT_VERSION};
pub use render::{extract_section, render_section};
pub use restore::{apply_restore, restore_backup, RestoreReport, RestoredArchive, SkippedSection};

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::StoreError;

/// Errors raised by the backup engine.
#[derive(Debug, Error)]
pub enum BackupError {
    /// The container is structurally unusable (not a zip, or no manifest).
    #[error("invalid archive: {0}")]
    InvalidArchive(String),

    /// The container was readable but no entity section could be recovered.
    #[error("empty archive: no entity sections could be recovered")]
    EmptyArchive,

    /// An artifact's embedded data block is missing or malformed.
    #[error("malformed section data: {0}")]
    MalformedSection(String),

    /// The store rejected a restore write at the document level.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Envelope serialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Writing the container failed.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Reading or writing archive bytes failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The eight entity sections of a backup archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Section {
    Produtos,
    Clientes,
    Fornecedores,
    Vendas,
    Configuracoes,
    Usuarios,
    Rastreamento,
    Logistica,
}

impl Section {
    /// Every known section, in manifest order.
    pub const ALL: [Self; 8] = [
        Self::Produtos,
        Self::Clientes,
        Self::Fornecedores,
        Self::Vendas,
        Self::Configuracoes,
        Self::Usuarios,
        Self::Rastreamento,
        Self::Logistica,
    ];

    /// Section name as used for artifact file stems and manifest rows.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Produtos => "Produtos",
            Self::Clientes => "Clientes",
            Self::Fornecedores => "Fornecedores",
            Self::Vendas => "Vendas",
            Self::Configuracoes => "Configuracoes",
            Self::Usuarios => "Usuarios",
            Self::Rastreamento => "Rastreamento",
            Self::Logistica => "Logistica",
        }
    }

    /// Whether this section is an array-valued collection (as opposed to
    /// a scalar settings document).
    #[must_use]
    pub const fn is_collection(self) -> bool {
        matches!(
            self,
            Self::Produtos | Self::Clientes | Self::Fornecedores | Self::Vendas
        )
    }

    /// Settings key backing a scalar section; `None` for collections.
    #[must_use]
    pub const fn settings_key(self) -> Option<&'static str> {
        match self {
            Self::Configuracoes => Some("configuracoes"),
            Self::Usuarios => Some("usuarios"),
            Self::Rastreamento => Some("rastreamento"),
            Self::Logistica => Some("logistica"),
            _ => None,
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The renderer used for a backup's artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BackupFormat {
    #[default]
    StructuredData,
    TabularMarkdown,
    ComponentView,
}

impl BackupFormat {
    /// Every renderer, in the order restore probes file variants.
    pub const ALL: [Self; 3] = [
        Self::StructuredData,
        Self::TabularMarkdown,
        Self::ComponentView,
    ];

    /// Artifact file extension for this renderer.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::StructuredData => "json",
            Self::TabularMarkdown => "md",
            Self::ComponentView => "jsx",
        }
    }

    /// The kebab-case name used on the CLI and in the manifest.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StructuredData => "structured-data",
            Self::TabularMarkdown => "tabular-markdown",
            Self::ComponentView => "component-view",
        }
    }
}

impl std::fmt::Display for BackupFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackupFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "structured-data" => Ok(Self::StructuredData),
            "tabular-markdown" => Ok(Self::TabularMarkdown),
            "component-view" => Ok(Self::ComponentView),
            other => Err(format!("unknown backup format: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_names_cover_all() {
        let names: Vec<_> = Section::ALL.iter().map(|s| s.name()).collect();
        assert_eq!(names.len(), 8);
        assert!(names.contains(&"Produtos"));
        assert!(names.contains(&"Logistica"));
    }

    #[test]
    fn test_scalar_sections_have_settings_keys() {
        for section in Section::ALL {
            assert_eq!(section.settings_key().is_some(), !section.is_collection());
        }
    }

    #[test]
    fn test_format_parse_roundtrip() {
        for format in BackupFormat::ALL {
            let parsed: BackupFormat = format.as_str().parse().expect("parse");
            assert_eq!(parsed, format);
        }
        assert!("yaml".parse::<BackupFormat>().is_err());
    }
}
