//! Gradient boosted regression trees evaluated from their fitted parameters.
//!
//! Trees use the flat array layout of CART implementations: node `i` is a
//! leaf when `children_left[i] == LEAF`, otherwise samples with
//! `x[feature[i]] <= threshold[i]` go left.

use super::Regressor;
use crate::feature_assembler::FeatureTable;
use anyhow::{bail, ensure, Result};
use serde::{Deserialize, Serialize};

/// Child index marking a leaf node.
pub const LEAF: i64 = -1;

/// One fitted regression tree in flat node layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<f64>,
}

impl RegressionTree {
    /// A tree with a single leaf.
    pub fn leaf(value: f64) -> Self {
        Self {
            children_left: vec![LEAF],
            children_right: vec![LEAF],
            feature: vec![LEAF],
            threshold: vec![0.0],
            value: vec![value],
        }
    }

    pub fn node_count(&self) -> usize {
        self.value.len()
    }

    fn validate(&self, n_features: usize) -> Result<()> {
        let n = self.node_count();
        ensure!(n > 0, "tree has no nodes");
        ensure!(
            self.children_left.len() == n
                && self.children_right.len() == n
                && self.feature.len() == n
                && self.threshold.len() == n,
            "tree node arrays differ in length"
        );

        for i in 0..n {
            let (left, right) = (self.children_left[i], self.children_right[i]);
            if left == LEAF {
                ensure!(right == LEAF, "node {} has only one child", i);
                continue;
            }
            // children always follow their parent, so traversal terminates
            for child in [left, right] {
                ensure!(
                    child > i as i64 && (child as usize) < n,
                    "node {} has invalid child index {}",
                    i,
                    child
                );
            }
            let feature = self.feature[i];
            ensure!(
                feature >= 0 && (feature as usize) < n_features,
                "node {} splits on feature {} outside 0..{}",
                i,
                feature,
                n_features
            );
        }
        Ok(())
    }

    /// Leaf value reached by `row`.
    pub fn evaluate(&self, row: &[f64]) -> f64 {
        let mut node = 0usize;
        while self.children_left[node] != LEAF {
            let x = row[self.feature[node] as usize];
            node = if x <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }
        self.value[node]
    }
}

/// Fitted gradient boosting regressor with squared-error loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientBoostingRegressor {
    /// Initial estimate (mean of the training target)
    pub init: f64,
    pub learning_rate: f64,
    pub n_features: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    pub trees: Vec<RegressionTree>,
}

impl GradientBoostingRegressor {
    /// Check tree structure and feature indices after deserialization.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.n_features > 0, "model declares no features");
        ensure!(self.learning_rate.is_finite(), "learning rate must be finite");
        if let Some(names) = &self.feature_names {
            ensure!(
                names.len() == self.n_features,
                "model declares {} features but {} feature names",
                self.n_features,
                names.len()
            );
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features)
                .map_err(|e| anyhow::anyhow!("tree {}: {}", i, e))?;
        }
        Ok(())
    }

    fn predict_row(&self, row: &[f64]) -> f64 {
        let boosted: f64 = self.trees.iter().map(|t| t.evaluate(row)).sum();
        self.init + self.learning_rate * boosted
    }
}

impl Regressor for GradientBoostingRegressor {
    fn name(&self) -> &str {
        "gradient_boosting"
    }

    fn predict(&self, table: &FeatureTable) -> Result<Vec<f64>> {
        if table.n_cols() != self.n_features {
            bail!(
                "expected {} features, got {}",
                self.n_features,
                table.n_cols()
            );
        }
        Ok(table.rows().map(|row| self.predict_row(row)).collect())
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Splits on feature 0 at 10.0, then feature 1 at 0.5 on the right.
    fn stump() -> RegressionTree {
        RegressionTree {
            children_left: vec![1, LEAF, 3, LEAF, LEAF],
            children_right: vec![2, LEAF, 4, LEAF, LEAF],
            feature: vec![0, LEAF, 1, LEAF, LEAF],
            threshold: vec![10.0, 0.0, 0.5, 0.0, 0.0],
            value: vec![0.0, -1.0, 0.0, 2.0, 4.0],
        }
    }

    fn model() -> GradientBoostingRegressor {
        GradientBoostingRegressor {
            init: 100.0,
            learning_rate: 0.5,
            n_features: 2,
            feature_names: None,
            trees: vec![stump(), RegressionTree::leaf(2.0)],
        }
    }

    #[test]
    fn test_tree_traversal() {
        let tree = stump();
        assert_eq!(tree.evaluate(&[5.0, 9.0]), -1.0);
        // threshold is inclusive on the left
        assert_eq!(tree.evaluate(&[10.0, 9.0]), -1.0);
        assert_eq!(tree.evaluate(&[11.0, 0.5]), 2.0);
        assert_eq!(tree.evaluate(&[11.0, 0.6]), 4.0);
    }

    #[test]
    fn test_boosted_prediction() {
        let model = model();
        assert!(model.validate().is_ok());

        let table =
            FeatureTable::from_rows(vec!["a", "b"], vec![5.0, 0.0, 20.0, 1.0]).unwrap();
        // 100 + 0.5 * (-1 + 2) and 100 + 0.5 * (4 + 2)
        assert_eq!(model.predict(&table).unwrap(), vec![100.5, 103.0]);
    }

    #[test]
    fn test_arity_mismatch_is_an_error() {
        let table = FeatureTable::from_rows(vec!["a"], vec![5.0]).unwrap();
        assert!(model().predict(&table).is_err());
    }

    #[test]
    fn test_validate_rejects_backward_child() {
        let mut model = model();
        model.trees[0].children_left[2] = 1;
        let err = model.validate().unwrap_err();
        assert!(err.to_string().contains("tree 0"));
    }

    #[test]
    fn test_validate_rejects_out_of_range_feature() {
        let mut model = model();
        model.trees[0].feature[2] = 7;
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_ragged_arrays() {
        let mut model = model();
        model.trees[1].threshold.push(1.0);
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_no_trees_predicts_init() {
        let model = GradientBoostingRegressor {
            trees: Vec::new(),
            ..model()
        };
        let table = FeatureTable::from_rows(vec!["a", "b"], vec![1.0, 1.0]).unwrap();
        assert_eq!(model.predict(&table).unwrap(), vec![100.0]);
    }
}
