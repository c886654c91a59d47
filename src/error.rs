//! Error and warning kinds
//!
//! Caller contract violations (incomplete answers, unknown options) are
//! returned as errors to fail fast. Failures of external collaborators
//! (model files, classifier calls, the image service) are typed so the
//! caller can turn them into a non-fatal status.

use std::path::PathBuf;

use thiserror::Error;

use crate::questionnaire::ClusterKey;

/// An answer set was used where every cluster must have a selection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing answers for: {}", format_keys(.missing))]
pub struct MissingAnswerError {
    pub missing: Vec<ClusterKey>,
}

fn format_keys(keys: &[ClusterKey]) -> String {
    keys.iter()
        .map(|k| k.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A cluster or option name that the questionnaire does not define.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnknownOptionError {
    #[error("unknown question cluster '{0}'")]
    Cluster(String),
    #[error("'{option}' is not an option for {cluster}")]
    NotOffered { cluster: ClusterKey, option: String },
}

/// A supplied value lies outside its feature's declared range.
///
/// Advisory only: computation proceeds with the value as given.
#[derive(Debug, Clone, PartialEq)]
pub struct OutOfRangeWarning {
    pub label: String,
    pub value: f64,
    pub low: f64,
    pub high: f64,
}

impl std::fmt::Display for OutOfRangeWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} = {} is out of valid range: [{}, {}]",
            self.label, self.value, self.low, self.high
        )
    }
}

/// The selected classifier could not be loaded.
#[derive(Debug, Error)]
pub enum ModelUnavailableError {
    #[error("could not find model file {}", .0.display())]
    NotFound(PathBuf),
    #[error("could not read model file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("model file {} is malformed: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("model file {} is invalid: {source}", .path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: ModelError,
    },
}

/// Failure raised inside a classifier while predicting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("input is missing field '{0}'")]
    MissingField(String),
    #[error("expected {expected} probability columns, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },
    #[error("predicted class '{0}' is not among the declared classes")]
    UnknownClass(String),
    #[error("malformed model: {0}")]
    Malformed(String),
}

/// A prediction that failed; carries the classifier's message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Prediction failed: {message}")]
pub struct InferenceFailure {
    pub message: String,
}

impl From<ModelError> for InferenceFailure {
    fn from(err: ModelError) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

/// Non-success outcome of a text-to-image request.
#[derive(Debug, Error)]
pub enum ImageServiceError {
    /// The hosted model is still warming up (HTTP 503). Retrying later may succeed.
    #[error("model is loading, please try again in a few seconds")]
    ModelLoading,
    #[error("error {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("could not decode image: {0}")]
    Parse(String),
    #[error("could not save image: {0}")]
    Io(String),
    #[error("image service returned no image")]
    EmptyResponse,
}

impl ImageServiceError {
    /// Transient failures are worth retrying; everything else is a hard failure.
    pub fn is_transient(&self) -> bool {
        matches!(self, ImageServiceError::ModelLoading)
    }
}

/// An explorer session was asked to move in a way its current stage forbids.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("an explorer name is required to start")]
    NameRequired,
    #[error("cannot {action} while on the {stage} page")]
    WrongStage {
        action: &'static str,
        stage: &'static str,
    },
    #[error(transparent)]
    Incomplete(#[from] MissingAnswerError),
}

/// Configuration file could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_answer_lists_clusters() {
        let err = MissingAnswerError {
            missing: vec![ClusterKey::Orbit, ClusterKey::StarType],
        };
        assert_eq!(err.to_string(), "missing answers for: orbit, star_type");
    }

    #[test]
    fn test_only_loading_is_transient() {
        assert!(ImageServiceError::ModelLoading.is_transient());
        assert!(!ImageServiceError::Rejected { status: 500, body: String::new() }.is_transient());
        assert!(!ImageServiceError::Network("timeout".into()).is_transient());
    }

    #[test]
    fn test_inference_failure_keeps_message() {
        let failure = InferenceFailure::from(ModelError::MissingField("koi_prad".into()));
        assert_eq!(failure.to_string(), "Prediction failed: input is missing field 'koi_prad'");
    }
}
