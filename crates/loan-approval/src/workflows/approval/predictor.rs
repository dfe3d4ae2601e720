use tracing::debug;

use super::domain::PredictionResult;
use super::encoder::FeatureVector;
use super::model::{ApprovalClassifier, InferenceError};

/// Label the classifier uses for an approved application.
pub const APPROVED_LABEL: i64 = 1;

/// Failure while running the classifier. Nothing is retried.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictionError {
    #[error("encoded row has {found} features but the classifier expects {expected}")]
    FeatureCount { expected: usize, found: usize },
    #[error("inference failed: {0}")]
    Inference(#[from] InferenceError),
    #[error("classifier returned no class probabilities")]
    EmptyProbabilities,
    #[error("classifier returned a non-numeric approval probability")]
    NotANumber,
}

/// Runs one classification (and, when supported, one probability estimate) on `features`.
pub fn predict<M>(model: &M, features: &FeatureVector) -> Result<PredictionResult, PredictionError>
where
    M: ApprovalClassifier + ?Sized,
{
    let row = features.to_row();
    let expected = model.feature_count();
    if row.len() != expected {
        return Err(PredictionError::FeatureCount {
            expected,
            found: row.len(),
        });
    }

    let label = model.classify(&row)?;
    let approval_probability = match model.class_probabilities(&row) {
        Some(probabilities) => Some(approval_probability(&probabilities?)?),
        None => None,
    };

    debug!(
        model = model.name(),
        label,
        probability = ?approval_probability,
        "prediction complete"
    );

    Ok(PredictionResult {
        approved: label == APPROVED_LABEL,
        label,
        approval_probability,
    })
}

/// Picks the approved-class probability and clamps it to `[0, 1]`.
///
/// With two or more values the second is the approved class. A single value is taken as the
/// approval probability itself; which class it belongs to cannot be told from the output alone.
pub fn approval_probability(probabilities: &[f64]) -> Result<f64, PredictionError> {
    let raw = match probabilities {
        [] => return Err(PredictionError::EmptyProbabilities),
        [only] => *only,
        [_, approved, ..] => *approved,
    };

    if raw.is_nan() {
        return Err(PredictionError::NotANumber);
    }
    Ok(raw.clamp(0.0, 1.0))
}
