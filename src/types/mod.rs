//! Record and prediction types

pub mod prediction;
pub mod record;

pub use prediction::{Prediction, PredictionReport};
pub use record::FeatureRecord;
