//! The canonical section payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Version stamp written into every envelope. Bump when the payload
/// contract changes; restore skips envelopes from a newer version.
pub const SECTION_FORMAT_VERSION: u32 = 1;

/// The tagged JSON envelope embedded in every backup artifact.
///
/// This is the single source of truth for restore. The renderers wrap it
/// in presentation; none of the presentation is ever parsed back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionEnvelope {
    pub format_version: u32,
    /// Section name, matching the artifact file stem.
    pub section: String,
    /// Record count for collections; 0 or 1 for scalar documents.
    pub count: usize,
    pub generated_at: DateTime<Utc>,
    /// The serialized entity collection or settings document.
    pub payload: Value,
}

impl SectionEnvelope {
    /// Build an envelope for a collection payload.
    #[must_use]
    pub fn new(
        section: &str,
        count: usize,
        generated_at: DateTime<Utc>,
        payload: Value,
    ) -> Self {
        Self {
            format_version: SECTION_FORMAT_VERSION,
            section: section.to_string(),
            count,
            generated_at,
            payload,
        }
    }

    /// Whether this envelope's version is readable by this build.
    #[must_use]
    pub const fn is_supported(&self) -> bool {
        self.format_version <= SECTION_FORMAT_VERSION
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_serde_roundtrip() {
        let envelope = SectionEnvelope::new(
            "Produtos",
            2,
            Utc::now(),
            serde_json::json!([{"description": "Caneca"}, {"description": "Prato"}]),
        );
        let json = serde_json::to_string(&envelope).unwrap();
        let back: SectionEnvelope = serde_json::from_str(&json).unwrap();
        assert_eq!(back, envelope);
    }

    #[test]
    fn test_future_version_unsupported() {
        let mut envelope =
            SectionEnvelope::new("Produtos", 0, Utc::now(), Value::Array(vec![]));
        assert!(envelope.is_supported());
        envelope.format_version = SECTION_FORMAT_VERSION + 1;
        assert!(!envelope.is_supported());
    }
}
