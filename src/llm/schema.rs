//! Response schema for taxonomy evaluation.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Scored evaluation of a merged taxonomy. Advisory only; immutable once
/// produced and never gates downstream stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxonomyEvaluation {
    /// How well the taxonomy covers the corpus, 1-5.
    pub coverage: u8,
    /// Quality of the hierarchy's structure, 1-5.
    pub structure: u8,
    /// Quality of the category descriptions, 1-5.
    pub description_quality: u8,
    /// Free-text strengths.
    #[serde(default)]
    pub strengths: String,
    /// Free-text gaps.
    #[serde(default)]
    pub gaps: String,
    /// Ordered list of suggested follow-up actions.
    #[serde(default)]
    pub action_items: Vec<String>,
}

impl TaxonomyEvaluation {
    /// Check that all three scores are in the 1-5 range.
    ///
    /// Out-of-range scores are a schema violation, not something to clamp.
    pub fn validate(&self) -> Result<(), ModelError> {
        for (field, score) in [
            ("coverage", self.coverage),
            ("structure", self.structure),
            ("description_quality", self.description_quality),
        ] {
            if !(1..=5).contains(&score) {
                return Err(ModelError::SchemaViolation {
                    expected: "TaxonomyEvaluation",
                    message: format!("{field} score out of range 1-5: {score}"),
                });
            }
        }
        Ok(())
    }
}
