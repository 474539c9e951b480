//! Pipeline configuration: defaults, TOML file loading, validation.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::llm::OllamaConfig;

/// Configuration for a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Maximum documents per generation batch.
    pub batch_size: usize,
    /// Name of the document field holding the body text.
    pub body_field: String,
    /// Maximum rendered label length for the leveling transform.
    pub max_label_chars: usize,
    /// Model endpoint configuration.
    pub ollama: OllamaConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            batch_size: 5,
            body_field: "abstract".into(),
            max_label_chars: 25,
            ollama: OllamaConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Check configuration invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }
        if self.body_field.is_empty() {
            return Err(ConfigError::EmptyBodyField);
        }
        Ok(())
    }

    /// Load and validate a configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = toml::from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }
}
