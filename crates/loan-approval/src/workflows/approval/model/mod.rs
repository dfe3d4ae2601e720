//! Classifier artifacts and the capability trait the predictor relies on.

mod linear;
pub mod loader;
mod tree;

pub use linear::{LinearSvc, LogisticRegression};
pub use loader::{load_model, shared_model, CachedModel, ModelLoadError};
pub use tree::{DecisionTree, RandomForest, Tree, TreeNode};

use serde::{Deserialize, Serialize};

use super::encoder::{FEATURE_COUNT, FEATURE_NAMES};

/// Binary classifier over a single encoded applicant row.
///
/// Implementations must be read-only over `&self`: one instance is shared by every request for
/// the lifetime of the process.
pub trait ApprovalClassifier: Send + Sync {
    /// Returns the predicted class label; `1` means approved.
    fn classify(&self, row: &[f64]) -> Result<i64, InferenceError>;

    /// Per-class probabilities ordered by class label, when the model supports them.
    fn class_probabilities(&self, _row: &[f64]) -> Option<Result<Vec<f64>, InferenceError>> {
        None
    }

    /// Width of the row the classifier was trained on.
    fn feature_count(&self) -> usize {
        FEATURE_COUNT
    }

    fn name(&self) -> &str {
        "classifier"
    }

    /// Classifier family, reported by the model status endpoint.
    fn kind(&self) -> &str {
        "custom"
    }

    fn supports_probabilities(&self) -> bool {
        false
    }
}

/// Failure raised while running a classifier on a row.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InferenceError {
    #[error("row has {found} features, classifier expects {expected}")]
    RowWidth { expected: usize, found: usize },
    #[error("feature {column} is not a finite number")]
    NonFiniteFeature { column: usize },
    #[error("tree references missing node {node}")]
    MissingNode { node: usize },
    #[error("{0}")]
    Other(String),
}

/// On-disk artifact: a named classifier plus the column order it was trained with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    pub classifier: ClassifierSpec,
}

/// Supported classifier families, tagged by `kind` in the artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierSpec {
    LogisticRegression(LogisticRegression),
    LinearSvc(LinearSvc),
    DecisionTree(DecisionTree),
    RandomForest(RandomForest),
}

impl ClassifierSpec {
    pub const fn kind(&self) -> &'static str {
        match self {
            ClassifierSpec::LogisticRegression(_) => "logistic_regression",
            ClassifierSpec::LinearSvc(_) => "linear_svc",
            ClassifierSpec::DecisionTree(_) => "decision_tree",
            ClassifierSpec::RandomForest(_) => "random_forest",
        }
    }

    pub const fn supports_probabilities(&self) -> bool {
        !matches!(self, ClassifierSpec::LinearSvc(_))
    }

    fn validate(&self) -> Result<(), String> {
        match self {
            ClassifierSpec::LogisticRegression(model) => model.validate(),
            ClassifierSpec::LinearSvc(model) => model.validate(),
            ClassifierSpec::DecisionTree(model) => model.validate(),
            ClassifierSpec::RandomForest(model) => model.validate(),
        }
    }
}

impl ModelArtifact {
    /// Checks the artifact against the encoder's column contract and builds the model.
    pub fn into_model(self) -> Result<LoadedModel, String> {
        if let Some(names) = &self.feature_names {
            let expected: Vec<&str> = FEATURE_NAMES.to_vec();
            let found: Vec<&str> = names.iter().map(String::as_str).collect();
            if found != expected {
                return Err(format!(
                    "feature_names {found:?} do not match the encoder order {expected:?}"
                ));
            }
        }

        self.classifier.validate()?;

        let name = self
            .name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| self.classifier.kind().to_string());

        Ok(LoadedModel {
            name,
            classifier: self.classifier,
        })
    }
}

/// A validated classifier ready for inference.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedModel {
    name: String,
    classifier: ClassifierSpec,
}

impl LoadedModel {
    pub fn spec(&self) -> &ClassifierSpec {
        &self.classifier
    }
}

impl ApprovalClassifier for LoadedModel {
    fn classify(&self, row: &[f64]) -> Result<i64, InferenceError> {
        check_row(row)?;
        match &self.classifier {
            ClassifierSpec::LogisticRegression(model) => Ok(model.classify(row)),
            ClassifierSpec::LinearSvc(model) => Ok(model.classify(row)),
            ClassifierSpec::DecisionTree(model) => model.classify(row),
            ClassifierSpec::RandomForest(model) => model.classify(row),
        }
    }

    fn class_probabilities(&self, row: &[f64]) -> Option<Result<Vec<f64>, InferenceError>> {
        let probabilities = match &self.classifier {
            ClassifierSpec::LinearSvc(_) => return None,
            ClassifierSpec::LogisticRegression(model) => {
                check_row(row).map(|_| model.probabilities(row).to_vec())
            }
            ClassifierSpec::DecisionTree(model) => {
                check_row(row).and_then(|_| model.probabilities(row))
            }
            ClassifierSpec::RandomForest(model) => {
                check_row(row).and_then(|_| model.probabilities(row))
            }
        };
        Some(probabilities)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &str {
        self.classifier.kind()
    }

    fn supports_probabilities(&self) -> bool {
        self.classifier.supports_probabilities()
    }
}

fn check_row(row: &[f64]) -> Result<(), InferenceError> {
    if row.len() != FEATURE_COUNT {
        return Err(InferenceError::RowWidth {
            expected: FEATURE_COUNT,
            found: row.len(),
        });
    }
    match row.iter().position(|value| !value.is_finite()) {
        Some(column) => Err(InferenceError::NonFiniteFeature { column }),
        None => Ok(()),
    }
}

/// Dot product of a validated coefficient vector with a row of the same width.
pub(crate) fn linear_score(coefficients: &[f64], intercept: f64, row: &[f64]) -> f64 {
    coefficients
        .iter()
        .zip(row)
        .map(|(weight, value)| weight * value)
        .sum::<f64>()
        + intercept
}
