//! Input document records and their classification results.
//!
//! A [`Work`] is one document from the input corpus: an optional stable id, an
//! optional title, and a bag of additional fields. Which field holds the
//! document body (abstract, summary, full text) varies by deployment, so the
//! body field name is configuration, not schema.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One input document.
///
/// Extra fields are kept as raw JSON values so corpora from different sources
/// round-trip without a fixed schema; the pipeline only ever reads the one
/// configured body field as a string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Work {
    /// Stable external identifier, if the source provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Document title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// All remaining fields of the source record.
    #[serde(flatten)]
    pub fields: BTreeMap<String, serde_json::Value>,
}

impl Work {
    /// Create a work with only a title set.
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Set the stable identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set an extra field to a string value.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields
            .insert(name.into(), serde_json::Value::String(value.into()));
        self
    }

    /// The title, or the empty string when absent.
    pub fn title_or_empty(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    /// The named field as text, or the empty string when absent or non-string.
    pub fn field_text(&self, field: &str) -> &str {
        self.fields
            .get(field)
            .and_then(|v| v.as_str())
            .unwrap_or("")
    }

    /// The stable id, or a synthesized `work-<ordinal>` id for sources
    /// without identifiers.
    pub fn display_id(&self, ordinal: usize) -> String {
        match &self.id {
            Some(id) => id.clone(),
            None => format!("work-{ordinal}"),
        }
    }
}

/// Category labels assigned to one work by the classifier.
///
/// `categories` holds leaf category *names* from the taxonomy the classifier
/// was given; an empty list means the document fit no category with
/// confidence, which is a valid outcome rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkClassification {
    /// Identifier of the classified work.
    pub work_id: String,
    /// Title of the classified work.
    #[serde(default)]
    pub title: String,
    /// Assigned leaf category names, possibly empty.
    #[serde(default)]
    pub categories: Vec<String>,
    /// The model's free-text justification for the assignment.
    #[serde(default)]
    pub rationale: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_text_reads_string_fields() {
        let work = Work::with_title("T").with_field("abstract", "Body text.");
        assert_eq!(work.field_text("abstract"), "Body text.");
        assert_eq!(work.field_text("missing"), "");
    }

    #[test]
    fn field_text_ignores_non_string_values() {
        let mut work = Work::with_title("T");
        work.fields
            .insert("abstract".into(), serde_json::json!(42));
        assert_eq!(work.field_text("abstract"), "");
    }

    #[test]
    fn display_id_falls_back_to_ordinal() {
        let with_id = Work::with_title("A").with_id("w1");
        let without_id = Work::with_title("B");
        assert_eq!(with_id.display_id(0), "w1");
        assert_eq!(without_id.display_id(3), "work-3");
    }

    #[test]
    fn work_deserializes_extra_fields() {
        let json = r#"{"id": "w9", "title": "Paper", "abstract": "Text", "year": 2021}"#;
        let work: Work = serde_json::from_str(json).unwrap();
        assert_eq!(work.display_id(0), "w9");
        assert_eq!(work.field_text("abstract"), "Text");
        assert_eq!(work.fields["year"], serde_json::json!(2021));
    }
}
