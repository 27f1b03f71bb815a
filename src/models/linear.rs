//! Ordinary least squares model evaluated from its fitted parameters

use super::Regressor;
use crate::feature_assembler::FeatureTable;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Fitted linear regression: `intercept + coefficients · x`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegressor {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
}

impl LinearRegressor {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
            feature_names: None,
        }
    }

    pub fn with_feature_names(mut self, names: Vec<String>) -> Self {
        self.feature_names = Some(names);
        self
    }

    /// Check internal consistency after deserialization.
    pub fn validate(&self) -> Result<()> {
        if self.coefficients.is_empty() {
            bail!("linear model has no coefficients");
        }
        if let Some(names) = &self.feature_names {
            if names.len() != self.coefficients.len() {
                bail!(
                    "linear model has {} coefficients but {} feature names",
                    self.coefficients.len(),
                    names.len()
                );
            }
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            bail!("linear model parameters must be finite");
        }
        Ok(())
    }
}

impl Regressor for LinearRegressor {
    fn name(&self) -> &str {
        "linear_regression"
    }

    fn predict(&self, table: &FeatureTable) -> Result<Vec<f64>> {
        if table.n_cols() != self.coefficients.len() {
            bail!(
                "expected {} features, got {}",
                self.coefficients.len(),
                table.n_cols()
            );
        }

        Ok(table
            .rows()
            .map(|row| {
                self.intercept
                    + row
                        .iter()
                        .zip(&self.coefficients)
                        .map(|(x, c)| x * c)
                        .sum::<f64>()
            })
            .collect())
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }
}
