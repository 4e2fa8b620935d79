//! Section artifact renderers.
//!
//! Each renderer produces a human-oriented presentation of a section and
//! embeds the canonical envelope in a delimited comment block, encoded as
//! base64 so the presentation syntax can never collide with the data.
//! Extraction is the inverse: locate the marker lines, decode, parse.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::Value;

use super::envelope::SectionEnvelope;
use super::{BackupError, BackupFormat};

pub(super) const MD_DATA_BEGIN: &str = "<!-- balcao:data:begin";
pub(super) const MD_DATA_END: &str = "balcao:data:end -->";
const JSX_DATA_BEGIN: &str = "/* balcao:data:begin";
const JSX_DATA_END: &str = "balcao:data:end */";

/// Render a section envelope with the given renderer.
///
/// # Errors
///
/// Returns an error if the envelope fails to serialize.
pub fn render_section(
    format: BackupFormat,
    envelope: &SectionEnvelope,
) -> Result<String, BackupError> {
    match format {
        BackupFormat::StructuredData => Ok(format!(
            "{}\n",
            serde_json::to_string_pretty(envelope)?
        )),
        BackupFormat::TabularMarkdown => render_markdown(envelope),
        BackupFormat::ComponentView => render_component(envelope),
    }
}

/// Recover the envelope from an artifact rendered by the given renderer.
///
/// # Errors
///
/// Returns [`BackupError::MalformedSection`] when the data block is
/// absent or does not decode, and a serialization error when the decoded
/// block is not a valid envelope.
pub fn extract_section(format: BackupFormat, text: &str) -> Result<SectionEnvelope, BackupError> {
    let json = match format {
        BackupFormat::StructuredData => text.to_string(),
        BackupFormat::TabularMarkdown => extract_block(text, MD_DATA_BEGIN, MD_DATA_END)?,
        BackupFormat::ComponentView => extract_block(text, JSX_DATA_BEGIN, JSX_DATA_END)?,
    };
    Ok(serde_json::from_str(&json)?)
}

fn embed_block(envelope: &SectionEnvelope, begin: &str, end: &str) -> Result<String, BackupError> {
    Ok(embed_raw(&serde_json::to_vec(envelope)?, begin, end))
}

/// Wrap serialized JSON in a base64 data block between marker lines.
pub(super) fn embed_raw(json: &[u8], begin: &str, end: &str) -> String {
    let encoded = BASE64.encode(json);
    format!("{begin}\n{encoded}\n{end}\n")
}

/// Recover the JSON text of a data block between marker lines.
pub(super) fn extract_block(text: &str, begin: &str, end: &str) -> Result<String, BackupError> {
    let mut encoded = String::new();
    let mut inside = false;
    for line in text.lines() {
        let line = line.trim();
        if line == begin {
            inside = true;
            continue;
        }
        if line == end {
            if !inside {
                break;
            }
            let bytes = BASE64
                .decode(&encoded)
                .map_err(|e| BackupError::MalformedSection(format!("bad base64: {e}")))?;
            return String::from_utf8(bytes)
                .map_err(|e| BackupError::MalformedSection(format!("bad utf-8: {e}")));
        }
        if inside {
            encoded.push_str(line);
        }
    }
    Err(BackupError::MalformedSection(
        "data block markers not found".to_string(),
    ))
}

// =============================================================================
// Markdown renderer
// =============================================================================

fn render_markdown(envelope: &SectionEnvelope) -> Result<String, BackupError> {
    let mut out = String::new();
    out.push_str(&format!("# {}\n\n", envelope.section));
    out.push_str(&format!(
        "{} registro(s), gerado em {}.\n\n",
        envelope.count,
        envelope.generated_at.to_rfc3339()
    ));

    if let Value::Array(records) = &envelope.payload {
        out.push_str(&markdown_table(records));
    } else {
        out.push_str("```json\n");
        out.push_str(&serde_json::to_string_pretty(&envelope.payload)?);
        out.push_str("\n```\n");
    }

    out.push('\n');
    out.push_str(&embed_block(envelope, MD_DATA_BEGIN, MD_DATA_END)?);
    Ok(out)
}

fn markdown_table(records: &[Value]) -> String {
    let Some(Value::Object(first)) = records.first() else {
        return "_Nenhum registro._\n".to_string();
    };

    let columns: Vec<&String> = first.keys().collect();
    let mut out = String::new();

    out.push('|');
    for column in &columns {
        out.push_str(&format!(" {column} |"));
    }
    out.push('\n');
    out.push('|');
    for _ in &columns {
        out.push_str("---|");
    }
    out.push('\n');

    for record in records {
        out.push('|');
        for column in &columns {
            let cell = record
                .get(column.as_str())
                .map_or_else(String::new, render_cell);
            out.push_str(&format!(" {cell} |"));
        }
        out.push('\n');
    }
    out
}

fn render_cell(value: &Value) -> String {
    let raw = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    // Pipes would break the table layout.
    raw.replace('|', "\\|")
}

// =============================================================================
// Component-view renderer
// =============================================================================

fn render_component(envelope: &SectionEnvelope) -> Result<String, BackupError> {
    let pretty = serde_json::to_string_pretty(&envelope.payload)?;
    // Backticks would terminate the template literal below.
    let pretty = pretty.replace('`', "\\`");

    let mut out = String::new();
    out.push_str("// Gerado pelo Balcao. Visao somente leitura de backup.\n\n");
    out.push_str(&format!(
        "export function {}View() {{\n  return (\n    <section className=\"backup-section\">\n",
        envelope.section
    ));
    out.push_str(&format!("      <h2>{}</h2>\n", envelope.section));
    out.push_str(&format!(
        "      <p>{} registro(s) em {}</p>\n",
        envelope.count,
        envelope.generated_at.to_rfc3339()
    ));
    out.push_str(&format!("      <pre>{{`{pretty}`}}</pre>\n"));
    out.push_str("    </section>\n  );\n}\n\n");
    out.push_str(&embed_block(envelope, JSX_DATA_BEGIN, JSX_DATA_END)?);
    Ok(out)
}
