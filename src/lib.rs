//! Exoplanet explorer library
//!
//! Re-exports modules for use by the binary and tools.

pub mod comparison;
pub mod config;
pub mod error;
pub mod features;
pub mod imaging;
pub mod inference;
pub mod mapper;
pub mod names;
pub mod questionnaire;
pub mod session;
pub mod synthesis;

pub use error::{
    ImageServiceError, InferenceFailure, MissingAnswerError, ModelUnavailableError,
    OutOfRangeWarning,
};
pub use features::{FeatureRange, FeatureVector};
pub use mapper::generate_feature_values;
pub use questionnaire::{AnswerSet, ClusterKey, CompleteAnswerSet};
pub use synthesis::generate_description;
