//! Loan approval prediction: form parsing, feature encoding, classifier loading and inference.
//!
//! The encoder and the classifier agree on column order by convention only, so the encoding
//! table in [`encoder`] is the contract every artifact must be trained against.

pub mod domain;
pub mod encoder;
pub mod form;
pub mod model;
pub mod predictor;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicantField, ApplicantInput, CreditHistory, Dependents, Education, Gender, Married,
    PredictionResult, PropertyArea, SelfEmployed,
};
pub use encoder::{encode, encoding_notes, EncodingNote, FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
pub use form::{ApplicantForm, EncodingError, EncodingReason};
pub use model::{
    load_model, shared_model, ApprovalClassifier, CachedModel, ClassifierSpec, InferenceError,
    LoadedModel, ModelArtifact, ModelLoadError,
};
pub use predictor::{approval_probability, predict, PredictionError, APPROVED_LABEL};
pub use router::{
    approval_error_response, approval_error_status, approval_router, PredictionResponse,
};
pub use service::{ApprovalError, LoanApprovalService, ModelStatus};
