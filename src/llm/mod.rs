//! Model-call boundary: the taxonomy oracle and its Ollama-backed client.
//!
//! The pipeline treats "generate a category tree", "merge trees", "score a
//! taxonomy", and "classify a document" as black-box calls behind the
//! [`TaxonomyOracle`] trait, so tests can substitute a deterministic fake.
//! Structured output is manual parse-and-validate: a JSON object is extracted
//! from the model's text and deserialized into the expected schema; malformed
//! output fails that call, it is never coerced.

pub mod prompts;
pub mod schema;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::taxonomy::Taxonomy;
use crate::work::WorkClassification;

use schema::TaxonomyEvaluation;

/// One method per model task. Each returns a validated schema value or the
/// failure of that call.
pub trait TaxonomyOracle {
    /// Produce a taxonomy grounded in one batch's rendered corpus text.
    fn generate_taxonomy(&self, corpus: &str) -> Result<Taxonomy, ModelError>;

    /// Merge per-batch taxonomies into one hierarchy.
    fn merge_taxonomies(&self, batches: &[Taxonomy]) -> Result<Taxonomy, ModelError>;

    /// Score a merged taxonomy on the 1-5 rubric.
    fn evaluate_taxonomy(&self, taxonomy: &Taxonomy) -> Result<TaxonomyEvaluation, ModelError>;

    /// Assign zero-or-more leaf category names plus a rationale to one document.
    fn classify_work(
        &self,
        taxonomy: &Taxonomy,
        work_id: &str,
        title: &str,
        body: &str,
    ) -> Result<WorkClassification, ModelError>;
}

/// Configuration for the Ollama client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    /// Base URL for the Ollama API.
    pub base_url: String,
    /// Model name to use.
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".into(),
            model: "llama3.2".into(),
            timeout_secs: 120,
        }
    }
}

/// Client for the Ollama REST API.
pub struct OllamaClient {
    config: OllamaConfig,
    available: bool,
    /// Models available locally after `probe()`.
    available_models: Vec<String>,
}

impl OllamaClient {
    /// Create a new Ollama client with the given configuration.
    pub fn new(config: OllamaConfig) -> Self {
        Self {
            config,
            available: false,
            available_models: Vec::new(),
        }
    }

    /// Probe the Ollama server to check availability.
    ///
    /// Sends a lightweight request to the `/api/tags` endpoint and parses the
    /// list of locally available models.
    pub fn probe(&mut self) -> bool {
        let url = format!("{}/api/tags", self.config.base_url);
        let agent = ureq::AgentBuilder::new()
            .timeout(std::time::Duration::from_secs(5))
            .build();

        match agent.get(&url).call() {
            Ok(resp) => {
                if resp.status() != 200 {
                    self.available = false;
                    return false;
                }
                self.available = true;

                if let Ok(body) = resp.into_string() {
                    if let Ok(json) = serde_json::from_str::<serde_json::Value>(&body) {
                        self.available_models = json["models"]
                            .as_array()
                            .map(|arr| {
                                arr.iter()
                                    .filter_map(|m| m["name"].as_str().map(|s| s.to_string()))
                                    .collect()
                            })
                            .unwrap_or_default();
                    }
                }

                true
            }
            Err(_) => {
                self.available = false;
                self.available_models.clear();
                false
            }
        }
    }

    /// Whether the Ollama server is available.
    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Whether the configured model is locally available.
    pub fn has_model(&self) -> bool {
        let target = &self.config.model;
        self.available_models
            .iter()
            .any(|m| m == target || m.split(':').next() == Some(target))
    }

    /// Get the model name being used.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Generate a completion from a prompt with a system instruction.
    fn generate(&self, prompt: &str, system: &str) -> Result<String, ModelError> {
        if !self.available {
            return Err(ModelError::Unavailable {
                url: self.config.base_url.clone(),
            });
        }

        let url = format!("{}/api/generate", self.config.base_url);
        let agent = ureq::AgentBuilder::new()
            .timeout(std::time::Duration::from_secs(self.config.timeout_secs))
            .build();

        let body = serde_json::json!({
            "model": self.config.model,
            "prompt": prompt,
            "system": system,
            "stream": false,
        });

        let body_str = serde_json::to_string(&body).map_err(|e| ModelError::RequestFailed {
            message: format!("JSON serialize error: {e}"),
        })?;

        let resp = agent
            .post(&url)
            .set("Content-Type", "application/json")
            .send_string(&body_str)
            .map_err(|e: ureq::Error| ModelError::RequestFailed {
                message: e.to_string(),
            })?;

        let resp_str = resp.into_string().map_err(|e| ModelError::ResponseParse {
            message: e.to_string(),
        })?;

        let json: serde_json::Value =
            serde_json::from_str(&resp_str).map_err(|e| ModelError::ResponseParse {
                message: e.to_string(),
            })?;

        json["response"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| ModelError::ResponseParse {
                message: "missing 'response' field".into(),
            })
    }
}

impl TaxonomyOracle for OllamaClient {
    fn generate_taxonomy(&self, corpus: &str) -> Result<Taxonomy, ModelError> {
        let response = self.generate(corpus, prompts::GENERATE_SYSTEM)?;
        parse_schema::<Taxonomy>(&response, "Taxonomy")
    }

    fn merge_taxonomies(&self, batches: &[Taxonomy]) -> Result<Taxonomy, ModelError> {
        let payload = prompts::merge_payload(batches);
        let response = self.generate(&payload, prompts::MERGE_SYSTEM)?;
        parse_schema::<Taxonomy>(&response, "Taxonomy")
    }

    fn evaluate_taxonomy(&self, taxonomy: &Taxonomy) -> Result<TaxonomyEvaluation, ModelError> {
        let payload = prompts::evaluate_payload(taxonomy);
        let response = self.generate(&payload, prompts::EVALUATE_SYSTEM)?;
        let evaluation = parse_schema::<TaxonomyEvaluation>(&response, "TaxonomyEvaluation")?;
        evaluation.validate()?;
        Ok(evaluation)
    }

    fn classify_work(
        &self,
        taxonomy: &Taxonomy,
        work_id: &str,
        title: &str,
        body: &str,
    ) -> Result<WorkClassification, ModelError> {
        let payload = prompts::classify_payload(taxonomy, work_id, title, body);
        let response = self.generate(&payload, prompts::CLASSIFY_SYSTEM)?;
        let parsed = parse_schema::<ClassificationResponse>(&response, "WorkClassification")?;
        Ok(WorkClassification {
            work_id: work_id.to_string(),
            title: title.to_string(),
            categories: parsed.categories,
            rationale: parsed.rationale,
        })
    }
}

impl std::fmt::Debug for OllamaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OllamaClient")
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.model)
            .field("available", &self.available)
            .finish()
    }
}

/// Shape of the classifier's raw JSON reply; id and title are filled in by
/// the caller rather than trusted from the model.
#[derive(Debug, Deserialize)]
struct ClassificationResponse {
    #[serde(default)]
    categories: Vec<String>,
    #[serde(default)]
    rationale: String,
}

/// Extract the JSON object embedded in the model's text output.
fn extract_json_object<'a>(text: &'a str, expected: &'static str) -> Result<&'a str, ModelError> {
    let trimmed = text.trim();
    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        return Ok(trimmed);
    }
    // Models sometimes wrap the object in prose or code fences.
    let start = trimmed.find('{');
    let end = trimmed.rfind('}');
    match (start, end) {
        (Some(s), Some(e)) if e > s => Ok(&trimmed[s..=e]),
        _ => Err(ModelError::NoJsonPayload { expected }),
    }
}

/// Extract and deserialize the expected schema from model text.
fn parse_schema<T: DeserializeOwned>(text: &str, expected: &'static str) -> Result<T, ModelError> {
    let json = extract_json_object(text, expected)?;
    serde_json::from_str(json).map_err(|e| ModelError::SchemaViolation {
        expected,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_unreachable_returns_false() {
        let config = OllamaConfig {
            base_url: "http://127.0.0.1:1".into(), // unreachable port
            ..Default::default()
        };
        let mut client = OllamaClient::new(config);
        assert!(!client.probe());
        assert!(!client.is_available());
    }

    #[test]
    fn generate_when_unavailable_returns_error() {
        let client = OllamaClient::new(OllamaConfig::default());
        let result = client.generate_taxonomy("some corpus");
        assert!(matches!(result, Err(ModelError::Unavailable { .. })));
    }

    #[test]
    fn default_config_values() {
        let config = OllamaConfig::default();
        assert_eq!(config.base_url, "http://localhost:11434");
        assert_eq!(config.model, "llama3.2");
        assert_eq!(config.timeout_secs, 120);
    }

    #[test]
    fn parse_schema_accepts_bare_object() {
        let text = r#"{"category_list": [{"name": "Systems", "description": "d"}]}"#;
        let taxonomy: Taxonomy = parse_schema(text, "Taxonomy").unwrap();
        assert_eq!(taxonomy.category_list[0].name, "Systems");
    }

    #[test]
    fn parse_schema_unwraps_prose_and_fences() {
        let text = "Here is the taxonomy:\n```json\n{\"category_list\": []}\n```";
        let taxonomy: Taxonomy = parse_schema(text, "Taxonomy").unwrap();
        assert!(taxonomy.is_empty());
    }

    #[test]
    fn parse_schema_without_json_is_no_payload() {
        let err = parse_schema::<Taxonomy>("I could not comply.", "Taxonomy").unwrap_err();
        assert!(matches!(err, ModelError::NoJsonPayload { .. }));
    }

    #[test]
    fn parse_schema_wrong_shape_is_schema_violation() {
        let err =
            parse_schema::<schema::TaxonomyEvaluation>(r#"{"coverage": "high"}"#, "TaxonomyEvaluation")
                .unwrap_err();
        assert!(matches!(err, ModelError::SchemaViolation { .. }));
    }

    #[test]
    fn classification_response_defaults_missing_fields() {
        let parsed: ClassificationResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.categories.is_empty());
        assert!(parsed.rationale.is_empty());
    }
}
