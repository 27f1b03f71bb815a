//! Prediction values and the report rendered for a submission

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Scalar model output for one record.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Prediction(f64);

impl Prediction {
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl From<Prediction> for f64 {
    fn from(p: Prediction) -> Self {
        p.0
    }
}

/// Outcome of one submission as emitted by the JSON front end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionReport {
    /// Model variant that produced the value
    pub variant: String,

    /// What was predicted
    pub target: String,

    /// Raw model output
    pub prediction: Prediction,

    /// Currency-formatted value
    pub formatted: String,

    /// Report generation timestamp
    pub predicted_at: DateTime<Utc>,
}

impl PredictionReport {
    pub fn new(variant: &str, target: &str, prediction: Prediction, formatted: String) -> Self {
        Self {
            variant: variant.to_string(),
            target: target.to_string(),
            prediction,
            formatted,
            predicted_at: Utc::now(),
        }
    }
}
