//! Input form state for one model variant.
//!
//! Holds one value per schema field, starting at the field defaults and
//! clamped to each field's range on every update.

use crate::error::{PredictorError, Result};
use crate::schema::{FeatureField, FeatureSchema};
use crate::types::FeatureRecord;
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct FormState {
    schema: FeatureSchema,
    values: Vec<f64>,
}

impl FormState {
    pub fn new(schema: FeatureSchema) -> Self {
        let values = schema
            .fields()
            .iter()
            .map(|f| f.constraints.default)
            .collect();
        Self { schema, values }
    }

    /// Set a field, returning the value actually stored after clamping.
    pub fn set(&mut self, name: &str, value: f64) -> Result<f64> {
        let index = self
            .schema
            .position(name)
            .ok_or_else(|| PredictorError::SchemaMismatch {
                missing: Vec::new(),
                unexpected: vec![name.to_string()],
            })?;
        let stored = self.schema.fields()[index].constraints.clamp(value);
        self.values[index] = stored;
        Ok(stored)
    }

    /// Apply every entry of `overrides`.
    ///
    /// Unknown names are all reported together and leave the form untouched.
    pub fn apply(&mut self, overrides: &FeatureRecord) -> Result<()> {
        let mut unexpected: Vec<String> = overrides
            .names()
            .filter(|name| self.schema.position(name).is_none())
            .map(str::to_string)
            .collect();
        if !unexpected.is_empty() {
            unexpected.sort();
            return Err(PredictorError::SchemaMismatch {
                missing: Vec::new(),
                unexpected,
            });
        }

        for (name, value) in overrides.iter() {
            self.set(name, value)?;
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.schema.position(name).map(|i| self.values[i])
    }

    /// Return every field to its default.
    pub fn reset(&mut self) {
        *self = Self::new(self.schema);
    }

    /// Snapshot the form as a fresh record.
    pub fn submit(&self) -> FeatureRecord {
        self.schema
            .names()
            .zip(self.values.iter().copied())
            .collect()
    }

    /// Form layout grouped by section, in schema order.
    pub fn describe(&self) -> Vec<FormSection> {
        let mut sections: Vec<FormSection> = Vec::new();
        for field in self.schema.fields() {
            match sections.last_mut() {
                Some(section) if section.heading == field.group => section.fields.push(*field),
                _ => sections.push(FormSection {
                    heading: field.group,
                    fields: vec![*field],
                }),
            }
        }
        sections
    }
}

/// A run of consecutive fields under one heading.
#[derive(Debug, Clone, Serialize)]
pub struct FormSection {
    pub heading: &'static str,
    pub fields: Vec<FeatureField>,
}
