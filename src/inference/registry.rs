//! Model selection and loading

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::ensemble::TreeEnsemble;
use crate::error::ModelUnavailableError;

/// The two trained models offered for the demo.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelChoice {
    #[default]
    CatBoost,
    LightGBM,
}

impl ModelChoice {
    pub const ALL: [ModelChoice; 2] = [ModelChoice::CatBoost, ModelChoice::LightGBM];

    pub fn display_name(&self) -> &'static str {
        match self {
            ModelChoice::CatBoost => "CatBoost",
            ModelChoice::LightGBM => "LightGBM",
        }
    }
}

impl fmt::Display for ModelChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ModelChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelChoice::ALL
            .into_iter()
            .find(|m| m.display_name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown model '{}', expected CatBoost or LightGBM", s))
    }
}

/// Load a tree ensemble from its JSON export.
pub fn load_model(path: impl AsRef<Path>) -> Result<TreeEnsemble, ModelUnavailableError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ModelUnavailableError::NotFound(path.to_path_buf()));
    }

    let text = fs::read_to_string(path).map_err(|source| ModelUnavailableError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let model: TreeEnsemble =
        serde_json::from_str(&text).map_err(|source| ModelUnavailableError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;

    model.validate().map_err(|source| ModelUnavailableError::Invalid {
        path: path.to_path_buf(),
        source,
    })?;

    info!(
        "Loaded {} model from {} ({} trees, {} fields)",
        model.name,
        path.display(),
        model.trees.len(),
        model.feature_names.len()
    );
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("exoplanet_explorer_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_parse_choice() {
        assert_eq!("lightgbm".parse::<ModelChoice>().unwrap(), ModelChoice::LightGBM);
        assert_eq!("CatBoost".parse::<ModelChoice>().unwrap(), ModelChoice::CatBoost);
        assert!("xgboost".parse::<ModelChoice>().is_err());
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let err = load_model(temp_path("does_not_exist.json")).unwrap_err();
        assert!(matches!(err, ModelUnavailableError::NotFound(_)));
    }

    #[test]
    fn test_malformed_file_is_unavailable() {
        let path = temp_path("malformed.json");
        fs::File::create(&path).unwrap().write_all(b"{ not json").unwrap();
        let err = load_model(&path).unwrap_err();
        assert!(matches!(err, ModelUnavailableError::Malformed { .. }));
        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_loads_valid_model() {
        let path = temp_path("valid.json");
        let json = r#"{
            "name": "CatBoost",
            "feature_names": ["koi_period"],
            "trees": [ { "nodes": [ { "value": 0.25 } ] } ]
        }"#;
        fs::write(&path, json).unwrap();
        let model = load_model(&path).unwrap();
        assert_eq!(model.classes, vec!["0".to_string(), "1".to_string()]);
        assert_eq!(model.base_score, 0.0);
        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_invalid_class_count_rejected() {
        let path = temp_path("three_classes.json");
        let json = r#"{
            "name": "CatBoost",
            "feature_names": [],
            "classes": ["a", "b", "c"],
            "trees": []
        }"#;
        fs::write(&path, json).unwrap();
        let err = load_model(&path).unwrap_err();
        assert!(matches!(err, ModelUnavailableError::Invalid { .. }));
        fs::remove_file(&path).ok();
    }
}
