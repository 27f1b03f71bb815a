//! Model artifact loader

use super::gbdt::GradientBoostingRegressor;
use super::linear::LinearRegressor;
#[cfg(feature = "onnx")]
use super::onnx::OnnxRegressor;
use super::Regressor;
use crate::error::{PredictorError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
#[cfg(feature = "onnx")]
use std::sync::OnceLock;
use tracing::{info, warn};

/// Serialization format of a model artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactFormat {
    /// Decide by file extension
    #[default]
    Auto,
    Onnx,
    Json,
}

impl ArtifactFormat {
    /// Resolve `Auto` from the file extension.
    pub fn resolve(self, path: &Path) -> std::result::Result<Self, String> {
        if self != ArtifactFormat::Auto {
            return Ok(self);
        }
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("onnx") => Ok(ArtifactFormat::Onnx),
            Some("json") => Ok(ArtifactFormat::Json),
            other => Err(format!(
                "cannot infer model format from extension {:?}",
                other.unwrap_or("")
            )),
        }
    }
}

/// Parameter dump of a fitted model, tagged by model kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    LinearRegression(LinearRegressor),
    GradientBoosting(GradientBoostingRegressor),
}

impl ModelArtifact {
    pub fn into_regressor(self) -> anyhow::Result<Box<dyn Regressor>> {
        match self {
            ModelArtifact::LinearRegression(model) => {
                model.validate()?;
                Ok(Box::new(model))
            }
            ModelArtifact::GradientBoosting(model) => {
                model.validate()?;
                Ok(Box::new(model))
            }
        }
    }
}

/// Outcome of the process-wide ONNX Runtime initialisation.
#[cfg(feature = "onnx")]
static ORT_INIT: OnceLock<std::result::Result<(), String>> = OnceLock::new();

/// Run `init` at most once per `cell`, returning its outcome on every call.
#[cfg(feature = "onnx")]
fn init_once(
    cell: &OnceLock<std::result::Result<(), String>>,
    init: impl FnOnce() -> std::result::Result<(), String>,
) -> anyhow::Result<()> {
    cell.get_or_init(init)
        .clone()
        .map_err(|e| anyhow::anyhow!("ONNX Runtime initialization failed: {}", e))
}

/// Loader for serialized regression models
pub struct ModelLoader {
    format: ArtifactFormat,
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl ModelLoader {
    /// Loader that infers the format from the file extension, single-threaded ONNX
    pub fn new() -> Self {
        Self {
            format: ArtifactFormat::Auto,
            onnx_threads: 1,
        }
    }

    pub fn with_format(mut self, format: ArtifactFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_threads(mut self, onnx_threads: usize) -> Self {
        self.onnx_threads = onnx_threads.max(1);
        self
    }

    /// Load a model from file.
    ///
    /// Any failure (missing file, unknown format, corrupt content) is
    /// reported as [`PredictorError::ModelUnavailable`].
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Box<dyn Regressor>> {
        let path = path.as_ref();

        if !path.is_file() {
            warn!(path = %path.display(), "Model file not found");
            return Err(PredictorError::unavailable(path, "file not found"));
        }

        let format = self
            .format
            .resolve(path)
            .map_err(|reason| PredictorError::unavailable(path, reason))?;

        let model = match format {
            ArtifactFormat::Onnx => self.load_onnx(path),
            ArtifactFormat::Json => Self::load_json(path),
            ArtifactFormat::Auto => unreachable!("format resolved above"),
        }
        .map_err(|e| PredictorError::unavailable(path, format!("{:#}", e)))?;

        info!(
            model = %model.name(),
            path = %path.display(),
            format = ?format,
            "Model ready"
        );

        Ok(model)
    }

    #[cfg(feature = "onnx")]
    fn load_onnx(&self, path: &Path) -> anyhow::Result<Box<dyn Regressor>> {
        init_once(&ORT_INIT, || {
            ort::init().commit().map_err(|e| e.to_string())?;
            info!(onnx_threads = self.onnx_threads, "ONNX Runtime initialized");
            Ok(())
        })?;

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("onnx_model");
        Ok(Box::new(OnnxRegressor::from_file(
            path,
            name,
            self.onnx_threads,
        )?))
    }

    #[cfg(not(feature = "onnx"))]
    fn load_onnx(&self, _path: &Path) -> anyhow::Result<Box<dyn Regressor>> {
        anyhow::bail!("built without ONNX support (enable the `onnx` feature)")
    }

    fn load_json(path: &Path) -> anyhow::Result<Box<dyn Regressor>> {
        let bytes = std::fs::read(path)?;
        let artifact: ModelArtifact = serde_json::from_slice(&bytes)?;
        artifact.into_regressor()
    }
}

impl Default for ModelLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature_assembler::FeatureTable;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gradient_boosting_model.onnx");

        match ModelLoader::new().load(&path) {
            Err(PredictorError::ModelUnavailable { path: p, reason }) => {
                assert_eq!(p, path);
                assert_eq!(reason, "file not found");
            }
            Err(other) => panic!("unexpected error {:?}", other),
            Ok(_) => panic!("missing model must not load"),
        }
    }

    #[cfg(feature = "onnx")]
    #[test]
    fn test_failed_runtime_init_is_reported_every_time() {
        let cell = OnceLock::new();
        let mut calls = 0;

        let first = init_once(&cell, || {
            calls += 1;
            Err("library not found".to_string())
        });
        let second = init_once(&cell, || {
            calls += 1;
            Ok(())
        });

        assert_eq!(calls, 1);
        assert!(first.unwrap_err().to_string().contains("library not found"));
        assert!(second.unwrap_err().to_string().contains("library not found"));
    }

    #[cfg(feature = "onnx")]
    #[test]
    fn test_successful_runtime_init_runs_once() {
        let cell = OnceLock::new();
        let mut calls = 0;
        for _ in 0..3 {
            init_once(&cell, || {
                calls += 1;
                Ok(())
            })
            .unwrap();
        }
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_format_resolution() {
        let auto = ArtifactFormat::Auto;
        assert_eq!(auto.resolve(Path::new("m.onnx")), Ok(ArtifactFormat::Onnx));
        assert_eq!(auto.resolve(Path::new("m.JSON")), Ok(ArtifactFormat::Json));
        assert!(auto.resolve(Path::new("m.joblib")).is_err());
        assert_eq!(
            ArtifactFormat::Json.resolve(Path::new("m.bin")),
            Ok(ArtifactFormat::Json)
        );
    }

    #[test]
    fn test_load_linear_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "linear.json",
            r#"{"kind": "linear_regression", "coefficients": [1.5, 2.0], "intercept": 3.0}"#,
        );

        let model = ModelLoader::new().load(&path).unwrap();
        assert_eq!(model.name(), "linear_regression");

        let table = FeatureTable::from_rows(vec!["a", "b"], vec![2.0, 1.0]).unwrap();
        assert_eq!(model.predict(&table).unwrap(), vec![8.0]);
    }

    #[test]
    fn test_load_gradient_boosting_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "gbr.json",
            r#"{
                "kind": "gradient_boosting",
                "init": 10.0,
                "learning_rate": 0.1,
                "n_features": 1,
                "trees": [{
                    "children_left": [1, -1, -1],
                    "children_right": [2, -1, -1],
                    "feature": [0, -2, -2],
                    "threshold": [0.5, -2.0, -2.0],
                    "value": [0.0, -10.0, 10.0]
                }]
            }"#,
        );

        let model = ModelLoader::new().load(&path).unwrap();
        let table = FeatureTable::from_rows(vec!["x"], vec![0.0, 1.0]).unwrap();
        assert_eq!(model.predict(&table).unwrap(), vec![9.0, 11.0]);
    }

    #[test]
    fn test_corrupt_json_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "broken.json", "{not json");

        assert!(matches!(
            ModelLoader::new().load(&path),
            Err(PredictorError::ModelUnavailable { .. })
        ));
    }

    #[test]
    fn test_invalid_tree_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "gbr.json",
            r#"{
                "kind": "gradient_boosting",
                "init": 0.0,
                "learning_rate": 0.1,
                "n_features": 1,
                "trees": [{
                    "children_left": [0],
                    "children_right": [0],
                    "feature": [0],
                    "threshold": [0.5],
                    "value": [1.0]
                }]
            }"#,
        );

        match ModelLoader::new().load(&path) {
            Err(PredictorError::ModelUnavailable { reason, .. }) => {
                assert!(reason.contains("invalid child index"), "{}", reason);
            }
            Err(other) => panic!("unexpected error {:?}", other),
            Ok(_) => panic!("cyclic tree must not load"),
        }
    }

    #[test]
    fn test_unknown_extension_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "gradient_boosting_model.joblib", "binary");

        assert!(matches!(
            ModelLoader::new().load(&path),
            Err(PredictorError::ModelUnavailable { .. })
        ));
    }
}
