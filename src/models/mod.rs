//! Pre-fitted regression models and the inference adapter

pub mod gbdt;
pub mod inference;
pub mod linear;
pub mod loader;
#[cfg(feature = "onnx")]
pub mod onnx;

use crate::feature_assembler::FeatureTable;

pub use gbdt::GradientBoostingRegressor;
pub use inference::InferenceAdapter;
pub use linear::LinearRegressor;
pub use loader::{ArtifactFormat, ModelLoader};
#[cfg(feature = "onnx")]
pub use onnx::OnnxRegressor;

/// A loaded, read-only regression model.
///
/// Implementations return exactly one value per table row, in row order.
pub trait Regressor: Send + Sync {
    /// Short name used in logs and error messages.
    fn name(&self) -> &str;

    /// Predict one value per row of `table`.
    fn predict(&self, table: &FeatureTable) -> anyhow::Result<Vec<f64>>;

    /// Column names the model was fitted on, when the artifact records them.
    fn feature_names(&self) -> Option<&[String]> {
        None
    }
}
