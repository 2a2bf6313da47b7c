//! Multi-output regressors evaluated on aligned feature rows.
//!
//! Models are trained elsewhere and shipped as JSON artifacts tagged by
//! `kind`:
//!
//! ```json
//! { "kind": "linear", "intercepts": [..], "coefficients": [[..], ..] }
//! { "kind": "random_forest", "n_features": 4, "trees": [{ "nodes": [..] }] }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{ComputeError, Result};

/// A trained model mapping one feature row to a vector of outputs.
pub trait Regressor {
    /// Width of the input row.
    fn n_features(&self) -> usize;

    /// Length of the output vector.
    fn n_outputs(&self) -> usize;

    /// Predicts the outputs for one row, which must be `n_features` wide.
    fn predict(&self, row: &[f64]) -> Result<Vec<f64>>;
}

fn check_width(expected: usize, row: &[f64]) -> Result<()> {
    if row.len() != expected {
        return Err(ComputeError::SchemaMismatch(format!(
            "model expects {} features, row has {}",
            expected,
            row.len()
        )));
    }
    Ok(())
}

/// Ordinary multi-output linear model: `y[k] = intercepts[k] + coefficients[k] . x`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegressor {
    pub intercepts: Vec<f64>,
    /// One coefficient row per output
    pub coefficients: Vec<Vec<f64>>,
}

impl LinearRegressor {
    fn validate(&self) -> Result<()> {
        if self.coefficients.is_empty() {
            return Err(ComputeError::ModelMismatch(
                "linear model has no outputs".to_string(),
            ));
        }
        if self.intercepts.len() != self.coefficients.len() {
            return Err(ComputeError::ModelMismatch(format!(
                "linear model has {} intercepts for {} outputs",
                self.intercepts.len(),
                self.coefficients.len()
            )));
        }
        let width = self.coefficients[0].len();
        if self.coefficients.iter().any(|row| row.len() != width) {
            return Err(ComputeError::ModelMismatch(
                "linear model coefficient rows differ in length".to_string(),
            ));
        }
        Ok(())
    }
}

impl Regressor for LinearRegressor {
    fn n_features(&self) -> usize {
        self.coefficients.first().map(Vec::len).unwrap_or(0)
    }

    fn n_outputs(&self) -> usize {
        self.intercepts.len()
    }

    fn predict(&self, row: &[f64]) -> Result<Vec<f64>> {
        check_width(self.n_features(), row)?;
        Ok(self
            .coefficients
            .iter()
            .zip(&self.intercepts)
            .map(|(weights, intercept)| {
                intercept + weights.iter().zip(row).map(|(w, x)| w * x).sum::<f64>()
            })
            .collect())
    }
}

/// A node of a regression tree. Nodes without children are leaves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    #[serde(default)]
    pub feature: usize,
    #[serde(default)]
    pub threshold: f64,
    #[serde(default)]
    pub left: Option<usize>,
    #[serde(default)]
    pub right: Option<usize>,
    /// Leaf outputs; may be empty on split nodes
    #[serde(default)]
    pub value: Vec<f64>,
}

/// A binary regression tree stored as a flat node list, root first.
///
/// Children always come after their parent, so traversal terminates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

impl RegressionTree {
    fn validate(&self, n_features: usize, n_outputs: usize) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(ComputeError::ModelMismatch("tree has no nodes".to_string()));
        }

        for (index, node) in self.nodes.iter().enumerate() {
            match (node.left, node.right) {
                (Some(left), Some(right)) => {
                    for child in [left, right] {
                        if child <= index || child >= self.nodes.len() {
                            return Err(ComputeError::ModelMismatch(format!(
                                "node {} has invalid child {}",
                                index, child
                            )));
                        }
                    }
                    if node.feature >= n_features {
                        return Err(ComputeError::ModelMismatch(format!(
                            "node {} splits on feature {} of {}",
                            index, node.feature, n_features
                        )));
                    }
                }
                (None, None) => {
                    if node.value.len() != n_outputs {
                        return Err(ComputeError::ModelMismatch(format!(
                            "leaf {} has {} outputs, expected {}",
                            index,
                            node.value.len(),
                            n_outputs
                        )));
                    }
                }
                _ => {
                    return Err(ComputeError::ModelMismatch(format!(
                        "node {} has only one child",
                        index
                    )));
                }
            }
        }
        Ok(())
    }

    fn leaf(&self, row: &[f64]) -> &[f64] {
        let mut index = 0;
        loop {
            let node = &self.nodes[index];
            match (node.left, node.right) {
                (Some(left), Some(right)) => {
                    index = if row[node.feature] <= node.threshold {
                        left
                    } else {
                        right
                    };
                }
                _ => return &node.value,
            }
        }
    }
}

/// Averaging ensemble of regression trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestRegressor {
    pub n_features: usize,
    pub trees: Vec<RegressionTree>,
}

impl ForestRegressor {
    fn outputs(&self) -> usize {
        self.trees
            .first()
            .and_then(|tree| tree.nodes.iter().find(|n| n.left.is_none()))
            .map(|leaf| leaf.value.len())
            .unwrap_or(0)
    }

    fn validate(&self) -> Result<()> {
        if self.trees.is_empty() {
            return Err(ComputeError::ModelMismatch(
                "forest has no trees".to_string(),
            ));
        }
        let n_outputs = self.outputs();
        for tree in &self.trees {
            tree.validate(self.n_features, n_outputs)?;
        }
        Ok(())
    }
}

impl Regressor for ForestRegressor {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn n_outputs(&self) -> usize {
        self.outputs()
    }

    fn predict(&self, row: &[f64]) -> Result<Vec<f64>> {
        check_width(self.n_features, row)?;

        let mut sum = vec![0.0; self.n_outputs()];
        for tree in &self.trees {
            for (acc, value) in sum.iter_mut().zip(tree.leaf(row)) {
                *acc += value;
            }
        }

        let count = self.trees.len() as f64;
        Ok(sum.into_iter().map(|v| v / count).collect())
    }
}

/// Any supported model artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegressorModel {
    Linear(LinearRegressor),
    RandomForest(ForestRegressor),
}

impl RegressorModel {
    /// Parses and validates a JSON model artifact.
    pub fn from_json(json: &str) -> Result<Self> {
        let model: RegressorModel = serde_json::from_str(json)?;
        match &model {
            RegressorModel::Linear(linear) => linear.validate()?,
            RegressorModel::RandomForest(forest) => forest.validate()?,
        }
        Ok(model)
    }

    /// Reads a model artifact from disk.
    #[instrument]
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let model = Self::from_json(&json)?;
        debug!(
            n_features = model.n_features(),
            n_outputs = model.n_outputs(),
            "Loaded regressor"
        );
        Ok(model)
    }

    fn inner(&self) -> &dyn Regressor {
        match self {
            RegressorModel::Linear(linear) => linear,
            RegressorModel::RandomForest(forest) => forest,
        }
    }
}

impl Regressor for RegressorModel {
    fn n_features(&self) -> usize {
        self.inner().n_features()
    }

    fn n_outputs(&self) -> usize {
        self.inner().n_outputs()
    }

    fn predict(&self, row: &[f64]) -> Result<Vec<f64>> {
        self.inner().predict(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(value: Vec<f64>) -> TreeNode {
        TreeNode {
            feature: 0,
            threshold: 0.0,
            left: None,
            right: None,
            value,
        }
    }

    fn split(feature: usize, threshold: f64, left: usize, right: usize) -> TreeNode {
        TreeNode {
            feature,
            threshold,
            left: Some(left),
            right: Some(right),
            value: vec![],
        }
    }

    #[test]
    fn test_linear_prediction() {
        let model = RegressorModel::from_json(
            r#"{"kind": "linear", "intercepts": [1.0, -2.0],
                "coefficients": [[0.5, 10.0], [0.0, 1.0]]}"#,
        )
        .unwrap();

        assert_eq!(model.n_features(), 2);
        assert_eq!(model.n_outputs(), 2);
        assert_eq!(model.predict(&[2.0, 1.0]).unwrap(), vec![12.0, -1.0]);
    }

    #[test]
    fn test_width_mismatch_is_schema_mismatch() {
        let model = LinearRegressor {
            intercepts: vec![0.0],
            coefficients: vec![vec![1.0, 1.0]],
        };
        assert!(matches!(
            model.predict(&[1.0]),
            Err(ComputeError::SchemaMismatch(_))
        ));
    }

    #[test]
    fn test_forest_averages_tree_leaves() {
        let forest = ForestRegressor {
            n_features: 2,
            trees: vec![
                RegressionTree {
                    nodes: vec![split(0, 2010.0, 1, 2), leaf(vec![1.0, 2.0]), leaf(vec![3.0, 4.0])],
                },
                RegressionTree {
                    nodes: vec![split(1, 0.5, 1, 2), leaf(vec![5.0, 6.0]), leaf(vec![7.0, 8.0])],
                },
            ],
        };
        forest.validate().unwrap();

        // year <= 2010 -> first leaf; indicator 1.0 > 0.5 -> second leaf
        assert_eq!(forest.predict(&[2005.0, 1.0]).unwrap(), vec![4.0, 5.0]);
        assert_eq!(forest.predict(&[2020.0, 0.0]).unwrap(), vec![4.0, 5.0]);
        assert_eq!(forest.predict(&[2020.0, 1.0]).unwrap(), vec![5.0, 6.0]);
    }

    #[test]
    fn test_forest_artifact_round_trips_through_json() {
        let json = r#"{
            "kind": "random_forest",
            "n_features": 1,
            "trees": [{"nodes": [
                {"feature": 0, "threshold": 1.5, "left": 1, "right": 2},
                {"value": [10.0]},
                {"value": [20.0]}
            ]}]
        }"#;
        let model = RegressorModel::from_json(json).unwrap();
        assert_eq!(model.predict(&[1.0]).unwrap(), vec![10.0]);
        assert_eq!(model.predict(&[2.0]).unwrap(), vec![20.0]);
    }

    #[test]
    fn test_rejects_backward_child_links() {
        let forest = ForestRegressor {
            n_features: 1,
            trees: vec![RegressionTree {
                nodes: vec![split(0, 1.0, 1, 2), split(0, 1.0, 0, 2), leaf(vec![1.0])],
            }],
        };
        assert!(matches!(
            forest.validate(),
            Err(ComputeError::ModelMismatch(_))
        ));
    }

    #[test]
    fn test_rejects_unknown_kind_and_ragged_linear() {
        assert!(matches!(
            RegressorModel::from_json(r#"{"kind": "svm"}"#),
            Err(ComputeError::ModelMismatch(_))
        ));
        assert!(matches!(
            RegressorModel::from_json(
                r#"{"kind": "linear", "intercepts": [0.0, 0.0], "coefficients": [[1.0], [1.0, 2.0]]}"#
            ),
            Err(ComputeError::ModelMismatch(_))
        ));
    }
}
