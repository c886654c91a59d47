//! Binary gradient-boosted tree ensemble
//!
//! Models are exported from the training notebooks as JSON: a list of
//! regression trees whose leaf values are summed with a base score in
//! log-odds space, then squashed with a sigmoid to give P(positive class).

use serde::{Deserialize, Serialize};

use super::{Classifier, ModelInput};
use crate::error::ModelError;

/// One node of a regression tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    /// Go `left` when `input[feature] <= threshold`, otherwise `right`
    Split {
        feature: String,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

/// A regression tree; node 0 is the root.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

impl Tree {
    /// Leaf value reached by `input`.
    pub fn evaluate(&self, input: &ModelInput) -> Result<f64, ModelError> {
        let mut index = 0;
        // A well-formed tree reaches a leaf in fewer hops than it has nodes
        for _ in 0..=self.nodes.len() {
            match self.nodes.get(index) {
                Some(Node::Leaf { value }) => return Ok(*value),
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let x = input
                        .get(feature)
                        .ok_or_else(|| ModelError::MissingField(feature.clone()))?;
                    index = if x <= *threshold { *left } else { *right };
                }
                None => {
                    return Err(ModelError::Malformed(format!(
                        "node {} does not exist",
                        index
                    )))
                }
            }
        }
        Err(ModelError::Malformed("tree contains a cycle".to_string()))
    }
}

fn default_classes() -> Vec<String> {
    vec!["0".to_string(), "1".to_string()]
}

/// Gradient-boosted binary classifier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TreeEnsemble {
    pub name: String,
    /// Input fields in model order
    pub feature_names: Vec<String>,
    /// [negative, positive] class labels
    #[serde(default = "default_classes")]
    pub classes: Vec<String>,
    /// Initial log-odds
    #[serde(default)]
    pub base_score: f64,
    pub trees: Vec<Tree>,
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

impl TreeEnsemble {
    /// Check structural invariants that serde cannot express.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.classes.len() != 2 {
            return Err(ModelError::Malformed(format!(
                "expected 2 classes, found {}",
                self.classes.len()
            )));
        }
        for (t, tree) in self.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(ModelError::Malformed(format!("tree {} is empty", t)));
            }
            for node in &tree.nodes {
                if let Node::Split { left, right, .. } = node {
                    if *left >= tree.nodes.len() || *right >= tree.nodes.len() {
                        return Err(ModelError::Malformed(format!(
                            "tree {} has a child index out of bounds",
                            t
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Summed log-odds for `input`.
    pub fn raw_score(&self, input: &ModelInput) -> Result<f64, ModelError> {
        self.trees
            .iter()
            .try_fold(self.base_score, |acc, tree| Ok(acc + tree.evaluate(input)?))
    }

    /// P(positive class)
    pub fn positive_probability(&self, input: &ModelInput) -> Result<f64, ModelError> {
        self.raw_score(input).map(sigmoid)
    }
}

impl Classifier for TreeEnsemble {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, input: &ModelInput) -> Result<String, ModelError> {
        let p = self.positive_probability(input)?;
        let index = usize::from(p >= 0.5);
        self.classes
            .get(index)
            .cloned()
            .ok_or(ModelError::ShapeMismatch {
                expected: 2,
                actual: self.classes.len(),
            })
    }

    fn predict_proba(&self, input: &ModelInput) -> Option<Result<Vec<f64>, ModelError>> {
        Some(self.positive_probability(input).map(|p| vec![1.0 - p, p]))
    }

    fn expected_fields(&self) -> Option<&[String]> {
        Some(&self.feature_names)
    }

    fn classes(&self) -> Option<&[String]> {
        Some(&self.classes)
    }
}
