//! Schema-ordered table assembly for model inference.
//!
//! Records are unordered maps; models consume positional columns. This
//! module is the only place that turns one into the other, and it always
//! takes column order from the [`FeatureSchema`], never from the record.

use crate::error::Result;
use crate::schema::FeatureSchema;
use crate::types::FeatureRecord;

/// Row-major numeric table with named columns.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    columns: Vec<&'static str>,
    values: Vec<f64>,
}

impl FeatureTable {
    /// Build a table from column names and row-major values.
    ///
    /// Returns `None` when `values` is not a whole number of rows.
    pub fn from_rows(columns: Vec<&'static str>, values: Vec<f64>) -> Option<Self> {
        if columns.is_empty() || values.len() % columns.len() != 0 {
            return None;
        }
        Some(Self { columns, values })
    }

    pub fn columns(&self) -> &[&'static str] {
        &self.columns
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn n_rows(&self) -> usize {
        self.values.len() / self.columns.len()
    }

    pub fn row(&self, index: usize) -> Option<&[f64]> {
        let width = self.n_cols();
        self.values.get(index * width..(index + 1) * width)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks(self.n_cols())
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Values narrowed to `f32`, the input type of exported ONNX regressors.
    pub fn to_f32(&self) -> Vec<f32> {
        self.values.iter().map(|&v| v as f32).collect()
    }
}

/// Turns feature records into single-row tables in schema order.
#[derive(Debug, Clone, Copy)]
pub struct FeatureAssembler {
    schema: FeatureSchema,
}

impl FeatureAssembler {
    pub fn new(schema: FeatureSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Number of columns produced.
    pub fn feature_count(&self) -> usize {
        self.schema.len()
    }

    /// Column names in model order.
    pub fn feature_names(&self) -> Vec<&'static str> {
        self.schema.names().collect()
    }

    /// Check the record against the schema and lay it out as one row.
    pub fn assemble(&self, record: &FeatureRecord) -> Result<FeatureTable> {
        self.schema.check(record)?;

        let mut values = Vec::with_capacity(self.schema.len());
        let mut columns = Vec::with_capacity(self.schema.len());
        for name in self.schema.names() {
            // present: check() passed
            values.push(record.get(name).unwrap_or_default());
            columns.push(name);
        }

        Ok(FeatureTable { columns, values })
    }
}
