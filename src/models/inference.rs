//! Inference adapter: feature record in, single prediction out

use super::Regressor;
use crate::error::{PredictorError, Result};
use crate::feature_assembler::{FeatureAssembler, FeatureTable};
use crate::schema::FeatureSchema;
use crate::types::{FeatureRecord, Prediction};
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error};

/// Runs a borrowed model on schema-ordered single-row tables.
///
/// The adapter holds no mutable state; calling [`predict`](Self::predict)
/// twice with the same record yields the same prediction.
pub struct InferenceAdapter<'m> {
    model: &'m dyn Regressor,
    assembler: FeatureAssembler,
}

impl<'m> InferenceAdapter<'m> {
    /// Bind a model to a schema.
    ///
    /// Fails with [`PredictorError::SchemaMismatch`] or
    /// [`PredictorError::ColumnOrder`] when the model records the columns it
    /// was fitted on and they differ from the schema.
    pub fn new(model: &'m dyn Regressor, schema: FeatureSchema) -> Result<Self> {
        if let Some(fitted) = model.feature_names() {
            schema.check_columns(fitted)?;
        }
        Ok(Self {
            model,
            assembler: FeatureAssembler::new(schema),
        })
    }

    pub fn schema(&self) -> &FeatureSchema {
        self.assembler.schema()
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Predict one value for `record`.
    pub fn predict(&self, record: &FeatureRecord) -> Result<Prediction> {
        let table = self.assembler.assemble(record)?;
        let outputs = self.run_model(&table)?;

        let value = match outputs.as_slice() {
            [value] => *value,
            other => {
                return Err(self.failed(anyhow::anyhow!(
                    "expected 1 prediction for 1 row, got {}",
                    other.len()
                )))
            }
        };
        if !value.is_finite() {
            return Err(self.failed(anyhow::anyhow!("model returned non-finite value {}", value)));
        }

        debug!(
            model = %self.model.name(),
            prediction = value,
            "Prediction complete"
        );

        Ok(Prediction::new(value))
    }

    fn run_model(&self, table: &FeatureTable) -> Result<Vec<f64>> {
        let model = self.model;
        match panic::catch_unwind(AssertUnwindSafe(|| model.predict(table))) {
            Ok(Ok(outputs)) => Ok(outputs),
            Ok(Err(e)) => Err(self.failed(e)),
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                Err(self.failed(anyhow::anyhow!("model panicked: {}", message)))
            }
        }
    }

    fn failed(&self, source: anyhow::Error) -> PredictorError {
        error!(
            model = %self.model.name(),
            error = %source,
            "Model inference failed"
        );
        PredictorError::PredictionFailed {
            model: self.model.name().to_string(),
            source,
        }
    }
}
