use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use tracing::{error, info, warn};

use super::{ApprovalClassifier, LoadedModel, ModelArtifact};

/// Why the classifier artifact could not be made available.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelLoadError {
    #[error("model file `{}` not found; place it next to the application", .path.display())]
    NotFound { path: PathBuf },
    #[error("failed to load model from `{}`: {detail}", .path.display())]
    Invalid { path: PathBuf, detail: String },
}

impl ModelLoadError {
    pub fn path(&self) -> &Path {
        match self {
            ModelLoadError::NotFound { path } | ModelLoadError::Invalid { path, .. } => path,
        }
    }
}

/// Reads, parses and validates a JSON classifier artifact.
pub fn load_model<P: AsRef<Path>>(path: P) -> Result<LoadedModel, ModelLoadError> {
    let path = path.as_ref();
    let invalid = |detail: String| ModelLoadError::Invalid {
        path: path.to_path_buf(),
        detail,
    };

    let raw = std::fs::read_to_string(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => ModelLoadError::NotFound {
            path: path.to_path_buf(),
        },
        _ => invalid(err.to_string()),
    })?;

    let artifact: ModelArtifact =
        serde_json::from_str(&raw).map_err(|err| invalid(err.to_string()))?;
    let model = artifact.into_model().map_err(invalid)?;

    info!(
        model = model.name(),
        kind = model.kind(),
        probabilities = model.supports_probabilities(),
        path = %path.display(),
        "classifier artifact loaded"
    );

    Ok(model)
}

/// Load-once slot for the classifier artifact.
///
/// The first call to [`CachedModel::get`] reads the file; every later call returns the same
/// outcome, including a failure. A new artifact requires a new process.
#[derive(Debug)]
pub struct CachedModel {
    path: PathBuf,
    slot: OnceLock<Result<Arc<LoadedModel>, ModelLoadError>>,
}

impl CachedModel {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            slot: OnceLock::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self) -> Result<Arc<LoadedModel>, ModelLoadError> {
        self.slot
            .get_or_init(|| {
                load_model(&self.path).map(Arc::new).map_err(|err| {
                    error!(error = %err, "classifier unavailable; predictions disabled");
                    err
                })
            })
            .clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.slot.get().is_some()
    }
}

static SHARED_MODEL: OnceLock<CachedModel> = OnceLock::new();

/// Process-wide model slot. The path given by the first caller wins.
pub fn shared_model<P: Into<PathBuf>>(path: P) -> &'static CachedModel {
    let path = path.into();
    let cached = SHARED_MODEL.get_or_init(|| CachedModel::new(path.clone()));
    if cached.path() != path {
        warn!(
            requested = %path.display(),
            active = %cached.path().display(),
            "model already bound to another artifact; restart to switch"
        );
    }
    cached
}
