//! ONNX Runtime backed regressor

use super::Regressor;
use crate::feature_assembler::FeatureTable;
use anyhow::{Context, Result};
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

/// Output name skl2onnx gives regressor predictions.
const SKL2ONNX_OUTPUT: &str = "variable";

/// Regressor exported to ONNX, run through an ONNX Runtime session.
pub struct OnnxRegressor {
    name: String,
    /// ONNX Runtime needs exclusive access per run
    session: Mutex<Session>,
    input_name: String,
    output_name: String,
}

/// The graph must take exactly one input: the `[rows, features]` matrix.
fn feature_input(inputs: &[&str]) -> Result<String> {
    match inputs {
        [name] => Ok(name.to_string()),
        other => anyhow::bail!(
            "expected a single feature-matrix input, graph declares {}",
            other.len()
        ),
    }
}

/// Pick the prediction among the graph outputs, preferring skl2onnx naming.
fn regression_output(outputs: &[&str]) -> Option<String> {
    outputs
        .iter()
        .find(|&&o| o == SKL2ONNX_OUTPUT)
        .or_else(|| {
            outputs
                .iter()
                .find(|o| o.contains("predict") || o.contains("output"))
        })
        .or_else(|| outputs.first())
        .map(|o| o.to_string())
}

impl OnnxRegressor {
    /// Open a session on an ONNX file and bind its feature input and prediction output.
    pub fn from_file<P: AsRef<Path>>(path: P, name: &str, intra_threads: usize) -> Result<Self> {
        let path = path.as_ref();

        info!(model = %name, path = %path.display(), threads = intra_threads, "Loading ONNX model");

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(intra_threads)?
            .commit_from_file(path)
            .with_context(|| format!("Failed to load model from {:?}", path))?;

        let inputs: Vec<&str> = session.inputs.iter().map(|i| i.name.as_str()).collect();
        let outputs: Vec<&str> = session.outputs.iter().map(|o| o.name.as_str()).collect();

        let input_name = feature_input(&inputs)?;
        let output_name =
            regression_output(&outputs).context("Model graph declares no outputs")?;

        info!(
            model = %name,
            input = %input_name,
            output = %output_name,
            "ONNX session ready"
        );

        Ok(Self {
            name: name.to_string(),
            session: Mutex::new(session),
            input_name,
            output_name,
        })
    }
}

impl Regressor for OnnxRegressor {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, table: &FeatureTable) -> Result<Vec<f64>> {
        let shape = vec![table.n_rows() as i64, table.n_cols() as i64];
        let input_tensor = Tensor::from_array((shape, table.to_f32()))
            .context("Failed to create input tensor")?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;

        let outputs = session.run(ort::inputs![self.input_name.as_str() => input_tensor])?;

        let output = outputs
            .get(self.output_name.as_str())
            .with_context(|| format!("Model produced no output named '{}'", self.output_name))?;

        // [rows, 1] from skl2onnx regressors, [rows] from some other exporters
        let (shape, data) = output
            .try_extract_tensor::<f32>()
            .context("Model output is not a float tensor")?;

        debug!(model = %self.name, shape = ?shape, "Extracted regression output");

        Ok(data.iter().map(|&v| v as f64).collect())
    }
}
