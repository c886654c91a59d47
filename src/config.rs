//! Application configuration
//!
//! Defaults cover everything; an optional JSON file overrides any subset.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::imaging::ImageGenConfig;
use crate::inference::ModelChoice;

/// Environment variable consulted for the image service token
pub const API_TOKEN_ENV: &str = "HF_API_TOKEN";

/// On-disk locations of the exported models
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelPaths {
    pub catboost: PathBuf,
    pub lightgbm: PathBuf,
}

impl Default for ModelPaths {
    fn default() -> Self {
        Self {
            catboost: PathBuf::from("catboost.json"),
            lightgbm: PathBuf::from("lightgbm.json"),
        }
    }
}

impl ModelPaths {
    pub fn path_for(&self, choice: ModelChoice) -> &Path {
        match choice {
            ModelChoice::CatBoost => &self.catboost,
            ModelChoice::LightGBM => &self.lightgbm,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    pub image: ImageGenConfig,
    pub models: ModelPaths,
}

impl ExplorerConfig {
    /// Load from a JSON file. Missing keys keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Fill the API token from `token` when the file did not set one.
    pub fn with_token_fallback(mut self, token: Option<String>) -> Self {
        if self.image.api_token.is_none() {
            self.image.api_token = token.filter(|t| !t.trim().is_empty());
        }
        self
    }
}
