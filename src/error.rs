//! Rich diagnostic error types for the taxogen pipeline.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes and help text so users know exactly what went wrong and
//! how to fix it. Model-response validation failures carry the underlying schema
//! violation details all the way to the user.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the taxogen crate.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain (error codes, help text, source chains) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum TaxogenError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// Model boundary errors
// ---------------------------------------------------------------------------

/// Errors from the external model-call boundary.
#[derive(Debug, Error, Diagnostic)]
pub enum ModelError {
    #[error("Ollama is not available at {url}")]
    #[diagnostic(
        code(taxogen::model::unavailable),
        help("Start Ollama with `ollama serve`, or point --ollama-url at a running server.")
    )]
    Unavailable { url: String },

    #[error("model request failed: {message}")]
    #[diagnostic(
        code(taxogen::model::request_failed),
        help("Check that the model server is running and the configured model is pulled.")
    )]
    RequestFailed { message: String },

    #[error("failed to read model response: {message}")]
    #[diagnostic(
        code(taxogen::model::response_parse),
        help("The server returned a response body that is not valid JSON.")
    )]
    ResponseParse { message: String },

    #[error("no JSON payload found in model output while expecting {expected}")]
    #[diagnostic(
        code(taxogen::model::no_json_payload),
        help(
            "The model replied with free text instead of the requested JSON object. \
             Retry the run, or switch to a model that follows formatting instructions."
        )
    )]
    NoJsonPayload { expected: &'static str },

    #[error("model output does not match the {expected} schema: {message}")]
    #[diagnostic(
        code(taxogen::model::schema_violation),
        help(
            "The model produced JSON that fails schema validation. The run is aborted \
             rather than silently coercing malformed output."
        )
    )]
    SchemaViolation {
        expected: &'static str,
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Pipeline errors
// ---------------------------------------------------------------------------

/// Errors raised while driving the pipeline state machine.
#[derive(Debug, Error, Diagnostic)]
pub enum PipelineError {
    #[error("pipeline stage \"{stage}\" failed")]
    #[diagnostic(
        code(taxogen::pipeline::stage_failed),
        help(
            "A stage's model call failed, so the run was aborted without producing \
             a partial graph. The source error below has the details."
        )
    )]
    Stage {
        stage: &'static str,
        #[source]
        #[diagnostic_source]
        source: ModelError,
    },
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors in pipeline configuration, from defaults, a TOML file, or CLI flags.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("batch size must be a positive integer")]
    #[diagnostic(
        code(taxogen::config::zero_batch_size),
        help("Set `batch_size` to at least 1.")
    )]
    ZeroBatchSize,

    #[error("body field name must not be empty")]
    #[diagnostic(
        code(taxogen::config::empty_body_field),
        help("Set `body_field` to the name of the document field holding the text, e.g. \"abstract\".")
    )]
    EmptyBodyField,

    #[error("failed to read config file {path}")]
    #[diagnostic(
        code(taxogen::config::io),
        help("Check that the file exists and is readable.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {message}")]
    #[diagnostic(
        code(taxogen::config::parse),
        help("The file must be valid TOML matching the PipelineConfig fields.")
    )]
    Parse { path: String, message: String },
}

/// Convenience alias for functions returning taxogen results.
pub type TaxogenResult<T> = std::result::Result<T, TaxogenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_error_converts_to_taxogen_error() {
        let err = ModelError::NoJsonPayload {
            expected: "Taxonomy",
        };
        let top: TaxogenError = err.into();
        assert!(matches!(
            top,
            TaxogenError::Model(ModelError::NoJsonPayload { .. })
        ));
    }

    #[test]
    fn pipeline_error_keeps_stage_and_source() {
        let err = PipelineError::Stage {
            stage: "generate",
            source: ModelError::RequestFailed {
                message: "connection refused".into(),
            },
        };
        let msg = format!("{err}");
        assert!(msg.contains("generate"));
        let source = std::error::Error::source(&err).unwrap();
        assert!(format!("{source}").contains("connection refused"));
    }

    #[test]
    fn schema_violation_message_carries_details() {
        let err = ModelError::SchemaViolation {
            expected: "TaxonomyEvaluation",
            message: "coverage out of range: 7".into(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("TaxonomyEvaluation"));
        assert!(msg.contains("out of range"));
    }
}
