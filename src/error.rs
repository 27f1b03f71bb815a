//! Error types for model loading and inference

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the prediction core.
#[derive(Error, Debug)]
pub enum PredictorError {
    /// The model artifact could not be read or deserialized. Fatal at startup.
    #[error("Model unavailable at '{}': {reason}", .path.display())]
    ModelUnavailable { path: PathBuf, reason: String },

    /// The loaded model failed on a structurally valid record.
    #[error("Prediction failed in model '{model}': {source}")]
    PredictionFailed {
        model: String,
        #[source]
        source: anyhow::Error,
    },

    /// A record (or a model's fitted columns) does not match the feature schema.
    #[error("Schema mismatch: missing [{}], unexpected [{}]", .missing.join(", "), .unexpected.join(", "))]
    SchemaMismatch {
        missing: Vec<String>,
        unexpected: Vec<String>,
    },

    /// Fitted columns name the schema's fields but not in schema order.
    #[error("Column order mismatch at position {position}: expected '{expected}', found '{found}'")]
    ColumnOrder {
        position: usize,
        expected: String,
        found: String,
    },
}

impl PredictorError {
    pub(crate) fn unavailable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        PredictorError::ModelUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether the process can keep accepting submissions after this error.
    ///
    /// Load and model/schema binding errors are fatal; per-submission errors are not.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PredictorError::PredictionFailed { .. } | PredictorError::SchemaMismatch { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, PredictorError>;
