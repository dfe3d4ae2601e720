use serde::{Deserialize, Serialize};

use super::InferenceError;
use crate::workflows::approval::encoder::FEATURE_COUNT;

fn binary_classes() -> Vec<i64> {
    vec![0, 1]
}

/// Node of a flattened decision tree; index 0 is the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    /// Rows with `row[feature] <= threshold` descend into `left`.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Per-class weights (sample counts or fractions) in class order.
    Leaf { value: Vec<f64> },
}

/// A single tree without its own class list, as stored inside a forest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

fn validate_nodes(nodes: &[TreeNode], class_count: usize) -> Result<(), String> {
    if nodes.is_empty() {
        return Err("tree has no nodes".to_string());
    }

    let len = nodes.len();
    for (index, node) in nodes.iter().enumerate() {
        match node {
            TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if *feature >= FEATURE_COUNT {
                    return Err(format!(
                        "node {index} splits on feature {feature}, only {FEATURE_COUNT} exist"
                    ));
                }
                if !threshold.is_finite() {
                    return Err(format!("node {index} has a non-finite threshold"));
                }
                // Children always follow their parent, which also rules out cycles.
                for child in [*left, *right] {
                    if child <= index || child >= len {
                        return Err(format!(
                            "node {index} points at invalid child {child} (tree has {len} nodes)"
                        ));
                    }
                }
            }
            TreeNode::Leaf { value } => {
                if value.len() != class_count {
                    return Err(format!(
                        "leaf {index} has {} weights for {class_count} classes",
                        value.len()
                    ));
                }
                if value.iter().any(|weight| !weight.is_finite() || *weight < 0.0) {
                    return Err(format!("leaf {index} has a negative or non-finite weight"));
                }
                if value.iter().sum::<f64>() <= 0.0 {
                    return Err(format!("leaf {index} carries no weight"));
                }
            }
        }
    }
    Ok(())
}

fn leaf<'a>(nodes: &'a [TreeNode], row: &[f64]) -> Result<&'a [f64], InferenceError> {
    let mut index = 0;
    loop {
        match nodes.get(index) {
            Some(TreeNode::Leaf { value }) => return Ok(value),
            Some(TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            }) => {
                let value = row.get(*feature).ok_or(InferenceError::RowWidth {
                    expected: FEATURE_COUNT,
                    found: row.len(),
                })?;
                index = if *value <= *threshold { *left } else { *right };
            }
            None => return Err(InferenceError::MissingNode { node: index }),
        }
    }
}

/// Leaf weights normalized to probabilities.
fn leaf_probabilities(nodes: &[TreeNode], row: &[f64]) -> Result<Vec<f64>, InferenceError> {
    let weights = leaf(nodes, row)?;
    let total: f64 = weights.iter().sum();
    Ok(weights.iter().map(|weight| weight / total).collect())
}

/// Single decision tree classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    #[serde(default = "binary_classes")]
    pub classes: Vec<i64>,
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    pub(super) fn validate(&self) -> Result<(), String> {
        validate_classes(&self.classes)?;
        validate_nodes(&self.nodes, self.classes.len())
    }

    pub(super) fn probabilities(&self, row: &[f64]) -> Result<Vec<f64>, InferenceError> {
        leaf_probabilities(&self.nodes, row)
    }

    pub(super) fn classify(&self, row: &[f64]) -> Result<i64, InferenceError> {
        let probabilities = self.probabilities(row)?;
        pick_class(&self.classes, &probabilities)
    }
}

/// Averages the class probabilities of its trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    #[serde(default = "binary_classes")]
    pub classes: Vec<i64>,
    pub trees: Vec<Tree>,
}

impl RandomForest {
    pub(super) fn validate(&self) -> Result<(), String> {
        validate_classes(&self.classes)?;
        if self.trees.is_empty() {
            return Err("random forest has no trees".to_string());
        }
        for (position, tree) in self.trees.iter().enumerate() {
            validate_nodes(&tree.nodes, self.classes.len())
                .map_err(|detail| format!("tree {position}: {detail}"))?;
        }
        Ok(())
    }

    pub(super) fn probabilities(&self, row: &[f64]) -> Result<Vec<f64>, InferenceError> {
        let mut totals = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            let probabilities = leaf_probabilities(&tree.nodes, row)?;
            for (total, probability) in totals.iter_mut().zip(probabilities) {
                *total += probability;
            }
        }
        let count = self.trees.len() as f64;
        Ok(totals.into_iter().map(|total| total / count).collect())
    }

    pub(super) fn classify(&self, row: &[f64]) -> Result<i64, InferenceError> {
        let probabilities = self.probabilities(row)?;
        pick_class(&self.classes, &probabilities)
    }
}

/// Probabilities are reported in `classes` order, which must therefore be ascending by label.
fn validate_classes(classes: &[i64]) -> Result<(), String> {
    if classes.is_empty() {
        return Err("classifier declares no classes".to_string());
    }
    if classes.windows(2).any(|pair| pair[0] >= pair[1]) {
        return Err(format!(
            "classes {classes:?} must be strictly ascending so probabilities follow label order"
        ));
    }
    Ok(())
}

fn pick_class(classes: &[i64], probabilities: &[f64]) -> Result<i64, InferenceError> {
    classes
        .get(argmax(probabilities))
        .copied()
        .ok_or_else(|| InferenceError::Other("classifier declares no classes".to_string()))
}

/// First index holding the maximum value.
fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (index, value) in values.iter().enumerate() {
        if *value > values[best] {
            best = index;
        }
    }
    best
}
