//! Feature range table for the KOI classifier inputs
//!
//! The 34 features the trained models consume, each with its human-readable
//! label, the column name the models expect, and the declared value envelope.
//! Values are in the models' scaled space, so most ranges sit around [-4, 4].

use std::collections::BTreeMap;

use rand::Rng;
use serde::Serialize;

use crate::error::OutOfRangeWarning;

/// Declared (low, high) envelope of a feature. Invariant: `low < high`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FeatureRange {
    pub low: f64,
    pub high: f64,
}

impl FeatureRange {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn span(&self) -> f64 {
        self.high - self.low
    }

    pub fn midpoint(&self) -> f64 {
        (self.low + self.high) / 2.0
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }

    /// Position of `value` inside the range, 0 at `low` and 1 at `high`.
    ///
    /// A degenerate range (`low == high`) yields exactly 0.5.
    pub fn normalize(&self, value: f64) -> f64 {
        normalize(value, self.low, self.high)
    }
}

/// Normalize `value` against `[low, high]`, guarding the degenerate range.
pub fn normalize(value: f64, low: f64, high: f64) -> f64 {
    if high != low {
        (value - low) / (high - low)
    } else {
        0.5
    }
}

/// One row of the feature table.
#[derive(Clone, Copy, Debug)]
pub struct FeatureDef {
    /// Human-readable label, also the key used by the questionnaire
    pub label: &'static str,
    /// Column name the trained models expect
    pub field: &'static str,
    pub range: FeatureRange,
}

const fn def(label: &'static str, field: &'static str, low: f64, high: f64) -> FeatureDef {
    FeatureDef {
        label,
        field,
        range: FeatureRange::new(low, high),
    }
}

// Labels
pub const ORBITAL_PERIOD: &str = "Orbital Period (days)";
pub const ORBITAL_PERIOD_ERR_POS: &str = "Orbital Period Error (+)";
pub const TRANSIT_TIME: &str = "Time of Transit (BJD)";
pub const TRANSIT_TIME_ERR_POS: &str = "Time of Transit Error (+)";
pub const IMPACT: &str = "Impact Parameter";
pub const IMPACT_ERR_POS: &str = "Impact Parameter Error (+)";
pub const IMPACT_ERR_NEG: &str = "Impact Parameter Error (-)";
pub const TRANSIT_DURATION: &str = "Transit Duration (hrs)";
pub const TRANSIT_DURATION_ERR_POS: &str = "Transit Duration Error (+)";
pub const TRANSIT_DEPTH: &str = "Transit Depth (ppm)";
pub const TRANSIT_DEPTH_ERR_POS: &str = "Transit Depth Error (+)";
pub const PLANET_RADIUS: &str = "Planet Radius (Earth radii)";
pub const PLANET_RADIUS_ERR_POS: &str = "Planet Radius Error (+)";
pub const PLANET_RADIUS_ERR_NEG: &str = "Planet Radius Error (-)";
pub const EQUILIBRIUM_TEMP: &str = "Equilibrium Temperature (K)";
pub const INSOLATION: &str = "Insolation Flux (Earth flux)";
pub const INSOLATION_ERR_POS: &str = "Insolation Flux Error (+)";
pub const TRANSIT_SNR: &str = "Transit Model SNR";
pub const STELLAR_TEMP: &str = "Stellar Effective Temp (K)";
pub const STELLAR_TEMP_ERR_POS: &str = "Stellar Effective Temp Error (+)";
pub const STELLAR_TEMP_ERR_NEG: &str = "Stellar Effective Temp Error (-)";
pub const SURFACE_GRAVITY: &str = "Surface Gravity (log g)";
pub const SURFACE_GRAVITY_ERR_POS: &str = "Surface Gravity Error (+)";
pub const SURFACE_GRAVITY_ERR_NEG: &str = "Surface Gravity Error (-)";
pub const STELLAR_RADIUS_ERR_POS: &str = "Stellar Radius Error (+)";
pub const STELLAR_RADIUS_ERR_NEG: &str = "Stellar Radius Error (-)";
pub const RIGHT_ASCENSION: &str = "RA (deg)";
pub const DECLINATION: &str = "Dec (deg)";
pub const KEPLER_MAGNITUDE: &str = "Kepler Magnitude";
pub const DEPTH_TO_STELLAR_RADIUS: &str = "Depth / Stellar Radius";
pub const PLANET_STAR_RADIUS_RATIO: &str = "Planet / Stellar Radius Ratio";
pub const PERIOD_TO_IMPACT: &str = "Period / Impact Parameter";
pub const LOG_INSOLATION: &str = "Log(1 + Insolation Flux)";
pub const LOG_SNR: &str = "Log(1 + Transit SNR)";

/// All features, in the order they are presented for direct entry.
pub const FEATURES: [FeatureDef; 34] = [
    def(ORBITAL_PERIOD, "koi_period", -0.389486, 3.884597),
    def(ORBITAL_PERIOD_ERR_POS, "koi_period_err1", -0.249980, 3.912221),
    def(TRANSIT_TIME, "koi_time0bk", -0.509194, 3.841147),
    def(TRANSIT_TIME_ERR_POS, "koi_time0bk_err1", -0.651946, 3.741984),
    def(IMPACT, "koi_impact", -0.630537, 3.631575),
    def(IMPACT_ERR_POS, "koi_impact_err1", -0.666667, 3.568627),
    def(IMPACT_ERR_NEG, "koi_impact_err2", -3.567234, 0.7243362),
    def(TRANSIT_DURATION, "koi_duration", -1.031911, 3.611988),
    def(TRANSIT_DURATION_ERR_POS, "koi_duration_err1", -0.692735, 3.733467),
    def(TRANSIT_DEPTH, "koi_depth", -0.572557, 3.788191),
    def(TRANSIT_DEPTH_ERR_POS, "koi_depth_err1", -0.723214, 3.843750),
    def(PLANET_RADIUS, "koi_prad", -1.142857, 3.691814),
    def(PLANET_RADIUS_ERR_POS, "koi_prad_err1", -0.723404, 3.553191),
    def(PLANET_RADIUS_ERR_NEG, "koi_prad_err2", -3.689655, 0.7241379),
    def(EQUILIBRIUM_TEMP, "koi_teq", -1.433444, 3.570820),
    def(INSOLATION, "koi_insol", -0.312844, 3.735998),
    def(INSOLATION_ERR_POS, "koi_insol_err1", -0.261479, 3.751848),
    def(TRANSIT_SNR, "koi_model_snr", -0.675000, 3.850000),
    def(STELLAR_TEMP, "koi_steff", -3.652231, 3.522310),
    def(STELLAR_TEMP_ERR_POS, "koi_steff_err1", -1.500000, 3.550000),
    def(STELLAR_TEMP_ERR_NEG, "koi_steff_err2", -3.494382, 1.483146),
    def(SURFACE_GRAVITY, "koi_slogg", -3.687500, 3.363971),
    def(SURFACE_GRAVITY_ERR_POS, "koi_slogg_err1", -0.693333, 3.658667),
    def(SURFACE_GRAVITY_ERR_NEG, "koi_slogg_err2", -3.685185, 1.037037),
    def(STELLAR_RADIUS_ERR_POS, "koi_srad_err1", -0.941748, 3.543689),
    def(STELLAR_RADIUS_ERR_NEG, "koi_srad_err2", -3.696721, 0.8032787),
    def(RIGHT_ASCENSION, "ra", -1.479197, 1.324565),
    def(DECLINATION, "dec", -1.327027, 1.416869),
    def(KEPLER_MAGNITUDE, "koi_kepmag", -3.649838, 1.684677),
    def(DEPTH_TO_STELLAR_RADIUS, "depth_to_srad", -0.479075, 30.32855),
    def(PLANET_STAR_RADIUS_RATIO, "prad_to_srad_ratio", -1.007994, 13.79850),
    def(PERIOD_TO_IMPACT, "period_to_impact", -0.239422, 8.018737e9),
    def(LOG_INSOLATION, "log_insol", -1.665119, 0.9453637),
    def(LOG_SNR, "log_snr", -1.799029, 1.569439),
];

/// Look up a feature by its label.
pub fn feature(label: &str) -> Option<&'static FeatureDef> {
    FEATURES.iter().find(|f| f.label == label)
}

/// Declared range of a feature by label.
pub fn feature_range(label: &str) -> Option<FeatureRange> {
    feature(label).map(|f| f.range)
}

/// Flag a value outside its feature's range. Unknown labels are not flagged.
pub fn check_value(label: &str, value: f64) -> Option<OutOfRangeWarning> {
    let range = feature_range(label)?;
    if range.contains(value) {
        return None;
    }
    Some(OutOfRangeWarning {
        label: label.to_string(),
        value,
        low: range.low,
        high: range.high,
    })
}

/// Map from feature label to a sampled or user-entered value.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FeatureVector {
    values: BTreeMap<String, f64>,
}

impl FeatureVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every feature set to the midpoint of its range.
    pub fn midpoints() -> Self {
        FEATURES
            .iter()
            .map(|f| (f.label.to_string(), f.range.midpoint()))
            .collect()
    }

    /// Insert a value, returning the previous one if the label was present.
    pub fn insert(&mut self, label: impl Into<String>, value: f64) -> Option<f64> {
        self.values.insert(label.into(), value)
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.values.get(label).copied()
    }

    /// Value for `label`, or 0 when absent.
    pub fn get_or_zero(&self, label: &str) -> f64 {
        self.get(label).unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Values in table order, followed by any labels the table does not define.
    pub fn iter_table_order(&self) -> impl Iterator<Item = (&str, f64)> {
        let known = FEATURES
            .iter()
            .filter_map(|f| self.values.get(f.label).map(|v| (f.label, *v)));
        let unknown = self
            .values
            .iter()
            .filter(|(k, _)| feature(k).is_none())
            .map(|(k, v)| (k.as_str(), *v));
        known.chain(unknown)
    }

    /// Redraw one feature uniformly within its declared range.
    ///
    /// Returns the new value, or `None` when the label is not a known feature.
    pub fn randomize<R: Rng + ?Sized>(&mut self, label: &str, rng: &mut R) -> Option<f64> {
        let def = feature(label)?;
        let value = rng.gen_range(def.range.low..=def.range.high);
        self.values.insert(def.label.to_string(), value);
        Some(value)
    }

    /// Redraw every known feature uniformly within its declared range.
    pub fn randomize_all<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for def in FEATURES.iter() {
            let value = rng.gen_range(def.range.low..=def.range.high);
            self.values.insert(def.label.to_string(), value);
        }
    }

    /// All values that fall outside their declared range.
    pub fn out_of_range(&self) -> Vec<OutOfRangeWarning> {
        self.iter_table_order()
            .filter_map(|(label, value)| check_value(label, value))
            .collect()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for FeatureVector {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    #[test]
    fn test_table_is_well_formed() {
        let labels: HashSet<_> = FEATURES.iter().map(|f| f.label).collect();
        let fields: HashSet<_> = FEATURES.iter().map(|f| f.field).collect();
        assert_eq!(labels.len(), 34);
        assert_eq!(fields.len(), 34);
        for f in FEATURES.iter() {
            assert!(f.range.low < f.range.high, "{} has an empty range", f.label);
        }
    }

    #[test]
    fn test_degenerate_range_normalizes_to_half() {
        assert_eq!(normalize(3.0, 1.5, 1.5), 0.5);
        assert_eq!(FeatureRange::new(-2.0, -2.0).normalize(100.0), 0.5);
    }

    #[test]
    fn test_normalize_endpoints() {
        let range = feature_range(PLANET_RADIUS).unwrap();
        assert_eq!(range.normalize(range.low), 0.0);
        assert_eq!(range.normalize(range.high), 1.0);
    }

    #[test]
    fn test_check_value_flags_but_accepts() {
        assert!(check_value(RIGHT_ASCENSION, 0.0).is_none());
        let warning = check_value(RIGHT_ASCENSION, 5.0).unwrap();
        assert_eq!(warning.label, RIGHT_ASCENSION);
        assert_eq!(warning.high, 1.324565);
        assert!(check_value("Not A Feature", 1e12).is_none());
    }

    #[test]
    fn test_midpoints_cover_table_and_are_in_range() {
        let values = FeatureVector::midpoints();
        assert_eq!(values.len(), FEATURES.len());
        assert!(values.out_of_range().is_empty());
        let ra = values.get(RIGHT_ASCENSION).unwrap();
        assert!((ra - (-1.479197 + 1.324565) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_randomize_stays_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut values = FeatureVector::new();
        values.randomize_all(&mut rng);
        assert_eq!(values.len(), 34);
        assert!(values.out_of_range().is_empty());

        let v = values.randomize(KEPLER_MAGNITUDE, &mut rng).unwrap();
        assert_eq!(values.get(KEPLER_MAGNITUDE), Some(v));
        assert!(values.randomize("unknown", &mut rng).is_none());
    }

    #[test]
    fn test_table_order_iteration() {
        let mut values = FeatureVector::new();
        values.insert("custom", 1.0);
        values.insert(DECLINATION, 0.2);
        values.insert(ORBITAL_PERIOD, 0.1);
        let order: Vec<_> = values.iter_table_order().map(|(k, _)| k).collect();
        assert_eq!(order, vec![ORBITAL_PERIOD, DECLINATION, "custom"]);
    }
}
