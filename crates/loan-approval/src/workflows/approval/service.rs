use std::sync::Arc;

use serde::Serialize;
use tracing::{error, warn};

use super::domain::PredictionResult;
use super::encoder::encode;
use super::form::{ApplicantForm, EncodingError};
use super::model::{ApprovalClassifier, CachedModel, LoadedModel, ModelLoadError};
use super::predictor::{predict, PredictionError};

/// Composes the model gate, the encoder and the predictor into the single "predict" action.
pub struct LoanApprovalService<M = LoadedModel> {
    model: Result<Arc<M>, ModelLoadError>,
}

impl<M> Clone for LoanApprovalService<M> {
    fn clone(&self) -> Self {
        Self {
            model: self.model.clone(),
        }
    }
}

impl LoanApprovalService<LoadedModel> {
    /// Resolves the cached artifact, loading it on first use.
    pub fn from_cache(cache: &CachedModel) -> Self {
        Self::new(cache.get())
    }
}

impl<M> LoanApprovalService<M>
where
    M: ApprovalClassifier + 'static,
{
    pub fn new(model: Result<Arc<M>, ModelLoadError>) -> Self {
        Self { model }
    }

    pub fn with_model(model: Arc<M>) -> Self {
        Self::new(Ok(model))
    }

    pub fn unavailable(error: ModelLoadError) -> Self {
        Self::new(Err(error))
    }

    /// `false` once the artifact failed to load; stays that way until restart.
    pub fn is_ready(&self) -> bool {
        self.model.is_ok()
    }

    pub fn load_error(&self) -> Option<&ModelLoadError> {
        self.model.as_ref().err()
    }

    /// Encodes the form and classifies it. Neither step runs without a model.
    pub fn predict(&self, form: &ApplicantForm) -> Result<PredictionResult, ApprovalError> {
        let model = self.model.as_ref().map_err(Clone::clone)?;

        let features = encode(form).map_err(|err| {
            warn!(field = %err.field, reason = %err.reason, "applicant form rejected");
            err
        })?;

        predict(&**model, &features).map_err(|err| {
            error!(error = %err, model = model.name(), "prediction failed");
            ApprovalError::from(err)
        })
    }

    pub fn model_status(&self) -> ModelStatus {
        match &self.model {
            Ok(model) => ModelStatus {
                available: true,
                name: Some(model.name().to_string()),
                kind: Some(model.kind().to_string()),
                supports_probabilities: Some(model.supports_probabilities()),
                error: None,
            },
            Err(err) => ModelStatus {
                available: false,
                name: None,
                kind: None,
                supports_probabilities: None,
                error: Some(err.to_string()),
            },
        }
    }
}

/// Public description of the classifier backing the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelStatus {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supports_probabilities: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Every way a predict action can end without a result.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApprovalError {
    #[error("prediction unavailable: {0}")]
    ModelUnavailable(#[from] ModelLoadError),
    #[error(transparent)]
    Encoding(#[from] EncodingError),
    #[error("prediction failed: {0}")]
    Prediction(#[from] PredictionError),
}
