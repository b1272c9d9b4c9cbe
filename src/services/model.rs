use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while evaluating a model on one row
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("Shape mismatch: model expects {expected} features, row has {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("Model produced a non-finite prediction")]
    NonFinite,

    #[error("Invalid model: {0}")]
    Invalid(String),
}

/// A trained regressor that maps one feature row to a price
///
/// `row` holds the values in feature order; `None` is a missing value.
pub trait Regressor: Send + Sync {
    /// Number of columns the model was trained on
    fn n_features(&self) -> usize;

    fn predict(&self, row: &[Option<f64>]) -> Result<f64, ModelError>;

    /// Per-member predictions of an ensemble; empty for single estimators
    fn member_predictions(&self, _row: &[Option<f64>]) -> Result<Vec<f64>, ModelError> {
        Ok(Vec::new())
    }

    /// Point prediction plus member predictions, evaluating the ensemble once
    fn predict_with_members(&self, row: &[Option<f64>]) -> Result<(f64, Vec<f64>), ModelError> {
        let members = self.member_predictions(row)?;
        if members.is_empty() {
            return Ok((self.predict(row)?, members));
        }
        Ok((ensemble_mean(&members)?, members))
    }

    fn check_shape(&self, row: &[Option<f64>]) -> Result<(), ModelError> {
        if row.len() != self.n_features() {
            return Err(ModelError::ShapeMismatch {
                expected: self.n_features(),
                actual: row.len(),
            });
        }
        Ok(())
    }
}

/// Mean of member predictions; an empty or non-finite ensemble is an error
pub fn ensemble_mean(members: &[f64]) -> Result<f64, ModelError> {
    let mean = members.iter().sum::<f64>() / members.len() as f64;
    if !mean.is_finite() {
        return Err(ModelError::NonFinite);
    }
    Ok(mean)
}

/// Node of a regression tree, stored in a flat array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
        #[serde(default = "default_missing_left")]
        missing_left: bool,
    },
    Leaf {
        value: f64,
    },
}

fn default_missing_left() -> bool {
    true
}

/// Regression tree; node 0 is the root and children always sit after their parent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

impl RegressionTree {
    fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }

        for (index, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split { feature, left, right, .. } = node {
                if *feature >= n_features {
                    return Err(format!("node {} splits on feature {} of {}", index, feature, n_features));
                }
                for child in [*left, *right] {
                    if child <= index || child >= self.nodes.len() {
                        return Err(format!("node {} has invalid child {}", index, child));
                    }
                }
            }
        }

        Ok(())
    }

    /// Walk from the root to a leaf; `value <= threshold` goes left
    fn evaluate(&self, row: &[Option<f64>]) -> f64 {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                TreeNode::Leaf { value } => return *value,
                TreeNode::Split { feature, threshold, left, right, missing_left } => {
                    let go_left = match row[*feature] {
                        Some(value) if !value.is_nan() => value <= *threshold,
                        _ => *missing_left,
                    };
                    index = if go_left { *left } else { *right };
                }
            }
        }
    }
}

/// Averaging ensemble of regression trees (random forest style)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestModel {
    pub n_features: usize,
    pub trees: Vec<RegressionTree>,
}

impl ForestModel {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.trees.is_empty() {
            return Err(ModelError::Invalid("forest has no trees".to_string()));
        }
        for (index, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features)
                .map_err(|e| ModelError::Invalid(format!("tree {}: {}", index, e)))?;
        }
        Ok(())
    }
}

impl Regressor for ForestModel {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, row: &[Option<f64>]) -> Result<f64, ModelError> {
        ensemble_mean(&self.member_predictions(row)?)
    }

    fn member_predictions(&self, row: &[Option<f64>]) -> Result<Vec<f64>, ModelError> {
        self.check_shape(row)?;
        Ok(self.trees.iter().map(|tree| tree.evaluate(row)).collect())
    }
}

/// Ordinary linear regression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl Regressor for LinearModel {
    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn predict(&self, row: &[Option<f64>]) -> Result<f64, ModelError> {
        self.check_shape(row)?;

        // Missing values become NaN and poison the sum
        let prediction = self.intercept
            + self
                .coefficients
                .iter()
                .zip(row)
                .map(|(coef, value)| coef * value.unwrap_or(f64::NAN))
                .sum::<f64>();

        if !prediction.is_finite() {
            return Err(ModelError::NonFinite);
        }
        Ok(prediction)
    }
}

/// Model artifact as shipped on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PriceModel {
    Forest(ForestModel),
    Linear(LinearModel),
}

impl PriceModel {
    pub fn validate(&self) -> Result<(), ModelError> {
        match self {
            PriceModel::Forest(forest) => forest.validate(),
            PriceModel::Linear(linear) if linear.coefficients.is_empty() => {
                Err(ModelError::Invalid("linear model has no coefficients".to_string()))
            }
            PriceModel::Linear(_) => Ok(()),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            PriceModel::Forest(_) => "forest",
            PriceModel::Linear(_) => "linear",
        }
    }
}

impl Regressor for PriceModel {
    fn n_features(&self) -> usize {
        match self {
            PriceModel::Forest(forest) => forest.n_features(),
            PriceModel::Linear(linear) => linear.n_features(),
        }
    }

    fn predict(&self, row: &[Option<f64>]) -> Result<f64, ModelError> {
        match self {
            PriceModel::Forest(forest) => forest.predict(row),
            PriceModel::Linear(linear) => linear.predict(row),
        }
    }

    fn member_predictions(&self, row: &[Option<f64>]) -> Result<Vec<f64>, ModelError> {
        match self {
            PriceModel::Forest(forest) => forest.member_predictions(row),
            PriceModel::Linear(linear) => linear.member_predictions(row),
        }
    }
}
