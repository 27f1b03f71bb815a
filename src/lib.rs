//! Household Income Predictor Library
//!
//! Loads a pre-fitted regression model once, lays out survey fields in the
//! exact column order the model was fitted with, and returns a single
//! income prediction per submission.

pub mod config;
pub mod error;
pub mod feature_assembler;
pub mod form;
pub mod logging;
pub mod models;
pub mod presenter;
pub mod schema;
pub mod types;

pub use config::AppConfig;
pub use error::{PredictorError, Result};
pub use feature_assembler::{FeatureAssembler, FeatureTable};
pub use form::FormState;
pub use models::{InferenceAdapter, ModelLoader, Regressor};
pub use presenter::CurrencyFormatter;
pub use schema::{FeatureField, FeatureSchema, FieldConstraints, ModelVariant};
pub use types::{FeatureRecord, Prediction, PredictionReport};
