//! Preview and inference adapter
//!
//! Converts labeled feature values into the column vector a trained
//! classifier expects, aligns it to the model's declared fields, and turns
//! the model's answer into a prediction report. Failures raised by the model
//! come back as [`InferenceFailure`] rather than aborting the caller.

pub mod ensemble;
pub mod registry;

use std::fmt;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{InferenceFailure, ModelError};
use crate::features::FeatureVector;
use crate::names::NameMap;

pub use ensemble::{Node, Tree, TreeEnsemble};
pub use registry::{load_model, ModelChoice};

/// Capabilities of a trained classifier.
///
/// Only `predict` is required; the optional capabilities default to absent.
pub trait Classifier {
    /// Display name of the model
    fn name(&self) -> &str;

    /// Predict the class label for a single row.
    fn predict(&self, input: &ModelInput) -> Result<String, ModelError>;

    /// Per-class probabilities, if the model exposes them.
    fn predict_proba(&self, _input: &ModelInput) -> Option<Result<Vec<f64>, ModelError>> {
        None
    }

    /// Field names in the order the model consumes them.
    fn expected_fields(&self) -> Option<&[String]> {
        None
    }

    /// Class labels in the order of the probability columns.
    fn classes(&self) -> Option<&[String]> {
        None
    }
}

/// One row of model input: ordered (field, value) pairs.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ModelInput {
    columns: Vec<(String, f64)>,
}

impl ModelInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `field`, keeping its original position when it already exists.
    pub fn set(&mut self, field: impl Into<String>, value: f64) {
        let field = field.into();
        match self.columns.iter_mut().find(|(f, _)| *f == field) {
            Some(column) => column.1 = value,
            None => self.columns.push((field, value)),
        }
    }

    pub fn get(&self, field: &str) -> Option<f64> {
        self.columns.iter().find(|(f, _)| f == field).map(|(_, v)| *v)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(f, _)| f.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.columns.iter().map(|(f, v)| (f.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Reorder to `expected`, filling missing fields with 0 and dropping extras.
    pub fn reindex(&self, expected: &[String]) -> ModelInput {
        let columns = expected
            .iter()
            .map(|field| {
                let value = self.get(field).unwrap_or_else(|| {
                    debug!("Field {} not supplied, filling with 0", field);
                    0.0
                });
                (field.clone(), value)
            })
            .collect();
        ModelInput { columns }
    }

    /// Render as a two-column preview table.
    pub fn preview(&self) -> String {
        let width = self.fields().map(str::len).max().unwrap_or(5).max(5);
        let mut out = format!("{:<width$}  value\n", "field", width = width);
        for (field, value) in self.iter() {
            out.push_str(&format!("{:<width$}  {:.6}\n", field, value, width = width));
        }
        out
    }
}

/// Translate labeled values into model fields via `names`.
///
/// Unmapped labels pass through as their own field name.
pub fn build_model_input<I, L>(labeled: I, names: &NameMap) -> ModelInput
where
    I: IntoIterator<Item = (L, f64)>,
    L: AsRef<str>,
{
    let mut input = ModelInput::new();
    for (label, value) in labeled {
        input.set(names.field_for(label.as_ref()), value);
    }
    input
}

/// [`build_model_input`] over a feature vector, in feature table order.
pub fn input_from_features(values: &FeatureVector, names: &NameMap) -> ModelInput {
    build_model_input(values.iter_table_order(), names)
}

/// A successful prediction.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Prediction {
    pub label: String,
    /// Probability of the predicted class, when the model exposes one
    pub probability: Option<f64>,
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.probability {
            Some(p) => write!(f, "Prediction: {} ({:.2}%)", self.label, p * 100.0),
            None => write!(f, "Prediction: {} (probability unavailable)", self.label),
        }
    }
}

/// Run `model` on `input`, aligning the row to the model's declared fields first.
pub fn predict(model: &dyn Classifier, input: &ModelInput) -> Result<Prediction, InferenceFailure> {
    run_prediction(model, input).map_err(|err| {
        warn!("{} prediction failed: {}", model.name(), err);
        InferenceFailure::from(err)
    })
}

fn run_prediction(model: &dyn Classifier, input: &ModelInput) -> Result<Prediction, ModelError> {
    let aligned = match model.expected_fields() {
        Some(expected) => input.reindex(expected),
        None => input.clone(),
    };

    let label = model.predict(&aligned)?;

    let probability = match model.predict_proba(&aligned) {
        None => None,
        Some(probs) => Some(class_probability(model, &label, &probs?)?),
    };

    Ok(Prediction { label, probability })
}

/// Pick the probability column belonging to `label`.
///
/// Without declared classes a binary layout is assumed (second column),
/// falling back to the only column of a single-column output.
fn class_probability(model: &dyn Classifier, label: &str, probs: &[f64]) -> Result<f64, ModelError> {
    let index = match model.classes() {
        Some(classes) => classes
            .iter()
            .position(|c| c == label)
            .ok_or_else(|| ModelError::UnknownClass(label.to_string()))?,
        None if probs.len() > 1 => 1,
        None => 0,
    };

    probs.get(index).copied().ok_or(ModelError::ShapeMismatch {
        expected: index + 1,
        actual: probs.len(),
    })
}
