//! Answer-to-feature mapping
//!
//! Turns a complete answer set into a full feature vector. Each option's
//! interval in answer space is remapped into every controlled feature's
//! declared range, and one value is drawn uniformly inside the result.
//!
//! Sampling consumes the injected RNG, so two calls with the same answers
//! give different vectors unless the generator is reseeded.

use rand::Rng;
use tracing::{debug, warn};

use crate::features::{feature_range, FeatureRange, FeatureVector};
use crate::questionnaire::CompleteAnswerSet;

/// Lower edge of answer space
pub const ANSWER_SPACE_ORIGIN: f64 = -2.0;
/// Width of answer space mapped onto a feature's full range
pub const ANSWER_SPACE_SPAN: f64 = 6.0;

/// Position of an answer-space value within [0, 1], clamped.
pub fn answer_space_position(x: f64) -> f64 {
    ((x - ANSWER_SPACE_ORIGIN) / ANSWER_SPACE_SPAN).clamp(0.0, 1.0)
}

/// Map an option interval into a feature range.
///
/// The result is ordered (`lo <= hi`); a reversed interval is swapped.
pub fn map_interval(option_range: (f64, f64), feature: FeatureRange) -> (f64, f64) {
    let norm_min = answer_space_position(option_range.0);
    let norm_max = answer_space_position(option_range.1);

    let feat_min = feature.low + norm_min * feature.span();
    let feat_max = feature.low + norm_max * feature.span();

    if feat_min <= feat_max {
        (feat_min, feat_max)
    } else {
        (feat_max, feat_min)
    }
}

/// Generate a value for every feature controlled by the answered clusters.
pub fn generate_feature_values<R: Rng + ?Sized>(
    answers: &CompleteAnswerSet,
    rng: &mut R,
) -> FeatureVector {
    let mut values = FeatureVector::new();

    for (cluster, option) in answers.iter() {
        for &label in cluster.features {
            let Some(range) = feature_range(label) else {
                warn!("Cluster {} references unknown feature {}", cluster.key, label);
                continue;
            };

            let (lo, hi) = map_interval(option.range, range);
            let value = rng.gen_range(lo..=hi);
            debug!(
                "{} = {:.6} from [{:.6}, {:.6}] ({} / {})",
                label, value, lo, hi, cluster.key, option.name
            );

            if values.insert(label, value).is_some() {
                warn!("Feature {} controlled by more than one cluster; {} wins", label, cluster.key);
            }
        }
    }

    values
}
