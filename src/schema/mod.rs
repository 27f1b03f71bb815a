//! Ordered feature schemas for the income models.
//!
//! A schema is the single source of truth for both the input form (labels,
//! defaults, clamps) and the column order of the table handed to a model.
//! The order must be identical to the order the model was fitted with.

mod gradient_boosting;
mod linear;

use crate::error::{PredictorError, Result};
use crate::types::FeatureRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub use gradient_boosting::GRADIENT_BOOSTING_FIELDS;
pub use linear::LINEAR_REGRESSION_FIELDS;

/// Numeric domain of a single form field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldConstraints {
    pub min: f64,
    pub max: Option<f64>,
    pub step: f64,
    pub default: f64,
}

impl FieldConstraints {
    /// Limit `value` to `[min, max]`.
    pub fn clamp(&self, value: f64) -> f64 {
        let value = value.max(self.min);
        match self.max {
            Some(max) => value.min(max),
            None => value,
        }
    }
}

/// One named model input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureField {
    /// Exact column name the model was fitted with
    pub name: &'static str,
    /// Human-readable form label
    pub label: &'static str,
    /// Form section heading
    pub group: &'static str,
    pub constraints: FieldConstraints,
}

/// Which of the two income models is served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelVariant {
    #[default]
    GradientBoosting,
    LinearRegression,
}

impl ModelVariant {
    pub fn schema(&self) -> FeatureSchema {
        match self {
            ModelVariant::GradientBoosting => FeatureSchema::new(GRADIENT_BOOSTING_FIELDS),
            ModelVariant::LinearRegression => FeatureSchema::new(LINEAR_REGRESSION_FIELDS),
        }
    }

    /// Artifact path used when the configuration does not name one.
    pub fn default_model_path(&self) -> &'static str {
        match self {
            ModelVariant::GradientBoosting => "models/gradient_boosting_model.onnx",
            ModelVariant::LinearRegression => "models/linear_regression_model.onnx",
        }
    }

    /// What the model predicts.
    pub fn target_label(&self) -> &'static str {
        match self {
            ModelVariant::GradientBoosting => "Income from Salaries and Wages",
            ModelVariant::LinearRegression => "Total Household Income",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ModelVariant::GradientBoosting => "Household Income Prediction",
            ModelVariant::LinearRegression => "Household Income Prediction (Linear Model)",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelVariant::GradientBoosting => "gradient_boosting",
            ModelVariant::LinearRegression => "linear_regression",
        }
    }
}

impl std::str::FromStr for ModelVariant {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "gradient_boosting" | "gbr" => Ok(ModelVariant::GradientBoosting),
            "linear_regression" | "linear" => Ok(ModelVariant::LinearRegression),
            other => Err(format!("unknown model variant '{}'", other)),
        }
    }
}

/// Fixed, ordered list of feature fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureSchema {
    fields: &'static [FeatureField],
}

impl FeatureSchema {
    pub const fn new(fields: &'static [FeatureField]) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &'static [FeatureField] {
        self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Column names in model order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    pub fn field(&self, name: &str) -> Option<&'static FeatureField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// A record holding every field's default value.
    pub fn defaults(&self) -> FeatureRecord {
        self.fields
            .iter()
            .map(|f| (f.name.to_string(), f.constraints.default))
            .collect()
    }

    /// Verify the record carries exactly the schema's names.
    ///
    /// Both lists in the error are reported in a stable order: missing names
    /// in schema order, unexpected names sorted.
    pub fn check(&self, record: &FeatureRecord) -> Result<()> {
        let missing: Vec<String> = self
            .names()
            .filter(|name| record.get(name).is_none())
            .map(str::to_string)
            .collect();

        let known: HashSet<&str> = self.names().collect();
        let mut unexpected: Vec<String> = record
            .names()
            .filter(|name| !known.contains(name))
            .map(str::to_string)
            .collect();
        unexpected.sort();

        if missing.is_empty() && unexpected.is_empty() {
            Ok(())
        } else {
            Err(PredictorError::SchemaMismatch {
                missing,
                unexpected,
            })
        }
    }

    /// Verify an ordered list of fitted column names matches this schema
    /// name for name and position for position.
    pub fn check_columns<S: AsRef<str>>(&self, columns: &[S]) -> Result<()> {
        let matches = columns.len() == self.len()
            && self
                .names()
                .zip(columns.iter())
                .all(|(expected, actual)| expected == actual.as_ref());
        if matches {
            return Ok(());
        }

        let actual: HashSet<&str> = columns.iter().map(|c| c.as_ref()).collect();
        let known: HashSet<&str> = self.names().collect();
        let missing: Vec<String> = self
            .names()
            .filter(|name| !actual.contains(name))
            .map(str::to_string)
            .collect();
        let unexpected: Vec<String> = columns
            .iter()
            .map(|c| c.as_ref())
            .filter(|name| !known.contains(name))
            .map(str::to_string)
            .collect();
        if !missing.is_empty() || !unexpected.is_empty() {
            return Err(PredictorError::SchemaMismatch {
                missing,
                unexpected,
            });
        }

        // same names, so the difference is order or repetition
        let position = (0..self.len().max(columns.len()))
            .find(|&i| self.fields.get(i).map(|f| f.name) != columns.get(i).map(|c| c.as_ref()))
            .unwrap_or(0);
        let describe = |name: Option<&str>| name.unwrap_or("<end of columns>").to_string();
        Err(PredictorError::ColumnOrder {
            position,
            expected: describe(self.fields.get(position).map(|f| f.name)),
            found: describe(columns.get(position).map(|c| c.as_ref())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_schema_sizes() {
        assert_eq!(ModelVariant::GradientBoosting.schema().len(), 15);
        assert_eq!(ModelVariant::LinearRegression.schema().len(), 9);
    }

    #[test]
    fn test_names_are_unique() {
        for variant in [ModelVariant::GradientBoosting, ModelVariant::LinearRegression] {
            let schema = variant.schema();
            let unique: HashSet<&str> = schema.names().collect();
            assert_eq!(unique.len(), schema.len(), "{:?}", variant);
        }
    }

    #[test]
    fn test_defaults_lie_within_constraints() {
        for variant in [ModelVariant::GradientBoosting, ModelVariant::LinearRegression] {
            for field in variant.schema().fields() {
                let c = field.constraints;
                assert_eq!(c.clamp(c.default), c.default, "{}", field.name);
                assert!(c.step > 0.0, "{}", field.name);
            }
        }
    }

    #[test]
    fn test_clamp() {
        let c = FieldConstraints {
            min: 1.0,
            max: Some(17.0),
            step: 1.0,
            default: 1.0,
        };
        assert_eq!(c.clamp(0.0), 1.0);
        assert_eq!(c.clamp(20.0), 17.0);
        assert_eq!(c.clamp(5.0), 5.0);

        let open = FieldConstraints { max: None, ..c };
        assert_eq!(open.clamp(1e9), 1e9);
    }

    #[test]
    fn test_position_and_field_lookup() {
        let schema = ModelVariant::GradientBoosting.schema();
        assert_eq!(schema.position("Region"), Some(0));
        assert_eq!(schema.position("Province"), Some(1));
        assert_eq!(
            schema.position("Hhld, Income from Entrepreneurial Activities, Total"),
            Some(14)
        );
        assert_eq!(schema.position("Total Food Expenditure"), None);
        assert_eq!(
            schema.field("Family Size").map(|f| f.label),
            Some("Family Size (Total Individuals)")
        );
    }

    #[test]
    fn test_check_accepts_defaults() {
        let schema = ModelVariant::LinearRegression.schema();
        assert!(schema.check(&schema.defaults()).is_ok());
    }

    #[test]
    fn test_check_reports_missing_and_unexpected() {
        let schema = ModelVariant::LinearRegression.schema();
        let mut record = schema.defaults();
        record.remove("Education Expenditure");
        record.insert("Zeta", 1.0);
        record.insert("Alpha", 1.0);

        match schema.check(&record) {
            Err(PredictorError::SchemaMismatch {
                missing,
                unexpected,
            }) => {
                assert_eq!(missing, vec!["Education Expenditure".to_string()]);
                assert_eq!(unexpected, vec!["Alpha".to_string(), "Zeta".to_string()]);
            }
            other => panic!("expected schema mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_check_columns_rejects_reordering() {
        let schema = ModelVariant::GradientBoosting.schema();
        let mut columns: Vec<&str> = schema.names().collect();
        assert!(schema.check_columns(&columns).is_ok());

        columns.swap(1, 2);
        match schema.check_columns(&columns) {
            Err(PredictorError::ColumnOrder {
                position,
                expected,
                found,
            }) => {
                assert_eq!(position, 1);
                assert_eq!(expected, "Province");
                assert_eq!(found, "Family Size");
            }
            other => panic!("expected column order error, got {:?}", other),
        }
    }

    #[test]
    fn test_check_columns_reports_repeated_column() {
        let schema = ModelVariant::LinearRegression.schema();
        let mut columns: Vec<&str> = schema.names().collect();
        columns.push(columns[0]);

        let err = schema.check_columns(&columns).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Column order mismatch at position 9: expected '<end of columns>', found 'Total Food Expenditure'"
        );
    }

    #[test]
    fn test_check_columns_names_foreign_columns() {
        let schema = ModelVariant::LinearRegression.schema();
        let mut columns: Vec<&str> = schema.names().collect();
        columns[8] = "Number of Television";

        match schema.check_columns(&columns) {
            Err(PredictorError::SchemaMismatch {
                missing,
                unexpected,
            }) => {
                assert_eq!(missing, vec!["Number of Cellular phone".to_string()]);
                assert_eq!(unexpected, vec!["Number of Television".to_string()]);
            }
            other => panic!("expected schema mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_variant_from_str() {
        assert_eq!(
            "gradient-boosting".parse::<ModelVariant>(),
            Ok(ModelVariant::GradientBoosting)
        );
        assert_eq!(
            "linear".parse::<ModelVariant>(),
            Ok(ModelVariant::LinearRegression)
        );
        assert!("forest".parse::<ModelVariant>().is_err());
    }
}
