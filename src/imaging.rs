//! Text-to-image integration for the planet configurator
//!
//! Sends the composed planet description to a hosted diffusion model and
//! saves the returned picture as PNG. A 503 from the service means the model
//! is still loading and is reported as a transient failure.

use std::path::{Path, PathBuf};
use std::time::Duration;

use base64::Engine;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ImageServiceError;

/// Configuration for the image generation service
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageGenConfig {
    /// Model inference endpoint
    pub endpoint: String,
    /// Bearer token; requests are sent unauthenticated when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Where the generated picture is written
    pub output_file: PathBuf,
}

impl Default for ImageGenConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api-inference.huggingface.co/models/stabilityai/stable-diffusion-xl-base-1.0"
                .to_string(),
            api_token: None,
            timeout_secs: 120,
            output_file: PathBuf::from("generated_planet.png"),
        }
    }
}

/// Inference request body
#[derive(Serialize, Debug)]
pub struct ImageGenRequest<'a> {
    pub inputs: &'a str,
}

/// JSON body returned by servers that wrap the image instead of streaming bytes
#[derive(Deserialize, Debug, Default)]
pub struct ImageGenResponse {
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    #[serde(default)]
    pub data: Option<Vec<ImageData>>,
}

#[derive(Deserialize, Debug)]
pub struct ImageData {
    #[serde(default)]
    pub b64_json: Option<String>,
}

impl ImageGenResponse {
    /// First base64 payload among the supported layouts.
    fn base64_payload(&self) -> Option<&str> {
        self.image
            .as_deref()
            .or_else(|| self.images.as_ref().and_then(|i| i.first()).map(String::as_str))
            .or_else(|| {
                self.data
                    .as_ref()
                    .and_then(|d| d.first())
                    .and_then(|d| d.b64_json.as_deref())
            })
    }
}

/// Map a non-success status to its error kind.
pub fn classify_status(status: StatusCode, body: String) -> ImageServiceError {
    if status == StatusCode::SERVICE_UNAVAILABLE {
        ImageServiceError::ModelLoading
    } else {
        ImageServiceError::Rejected {
            status: status.as_u16(),
            body,
        }
    }
}

/// Extract image bytes from a successful response body.
pub fn decode_body(content_type: &str, body: &[u8]) -> Result<Vec<u8>, ImageServiceError> {
    if !content_type.contains("application/json") {
        if body.is_empty() {
            return Err(ImageServiceError::EmptyResponse);
        }
        return Ok(body.to_vec());
    }

    let response: ImageGenResponse =
        serde_json::from_slice(body).map_err(|e| ImageServiceError::Parse(e.to_string()))?;
    let payload = response
        .base64_payload()
        .ok_or(ImageServiceError::EmptyResponse)?;
    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| ImageServiceError::Parse(format!("Base64 decode error: {}", e)))
}

/// Decode `bytes` as an image and write it to `path` as PNG.
pub fn save_png(bytes: &[u8], path: &Path) -> Result<(u32, u32), ImageServiceError> {
    let image = image::load_from_memory(bytes).map_err(|e| ImageServiceError::Parse(e.to_string()))?;
    image
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| ImageServiceError::Io(e.to_string()))?;
    Ok((image.width(), image.height()))
}

/// Image generation client
pub struct ImageGenClient {
    config: ImageGenConfig,
    client: reqwest::blocking::Client,
}

impl ImageGenClient {
    pub fn new(config: ImageGenConfig) -> Result<Self, ImageServiceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ImageServiceError::Network(e.to_string()))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ImageGenConfig {
        &self.config
    }

    /// Request an image for `prompt` and return its raw bytes.
    pub fn generate(&self, prompt: &str) -> Result<Vec<u8>, ImageServiceError> {
        let mut request = self
            .client
            .post(&self.config.endpoint)
            .json(&ImageGenRequest { inputs: prompt });
        if let Some(token) = &self.config.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .map_err(|e| ImageServiceError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let err = classify_status(status, body);
            if err.is_transient() {
                warn!("Image model is still loading");
            }
            return Err(err);
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        let body = response
            .bytes()
            .map_err(|e| ImageServiceError::Network(e.to_string()))?;

        decode_body(&content_type, &body)
    }

    /// Generate an image for `prompt` and save it to the configured output file.
    pub fn generate_and_save(&self, prompt: &str) -> Result<PathBuf, ImageServiceError> {
        let bytes = self.generate(prompt)?;
        let path = self.config.output_file.clone();
        let (width, height) = save_png(&bytes, &path)?;
        info!("Saved {}x{} image to {}", width, height, path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_png() -> Vec<u8> {
        let image = image::RgbImage::from_pixel(2, 3, image::Rgb([10, 20, 30]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgb8(image)
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_503_is_transient_loading() {
        let err = classify_status(StatusCode::SERVICE_UNAVAILABLE, "loading".into());
        assert!(matches!(err, ImageServiceError::ModelLoading));
        assert!(err.is_transient());
    }

    #[test]
    fn test_other_status_is_hard_failure() {
        let err = classify_status(StatusCode::UNAUTHORIZED, "bad token".into());
        assert!(!err.is_transient());
        assert_eq!(err.to_string(), "error 401: bad token");
    }

    #[test]
    fn test_raw_bytes_pass_through() {
        let bytes = decode_body("image/png", &[1, 2, 3]).unwrap();
        assert_eq!(bytes, vec![1, 2, 3]);
        assert!(matches!(decode_body("image/png", &[]), Err(ImageServiceError::EmptyResponse)));
    }

    #[test]
    fn test_json_base64_layouts() {
        let encoded = base64::engine::general_purpose::STANDARD.encode([7u8, 8, 9]);
        let bodies = [
            format!(r#"{{"image": "{}"}}"#, encoded),
            format!(r#"{{"images": ["{}"]}}"#, encoded),
            format!(r#"{{"data": [{{"b64_json": "{}"}}]}}"#, encoded),
        ];
        for body in bodies {
            let bytes = decode_body("application/json", body.as_bytes()).unwrap();
            assert_eq!(bytes, vec![7, 8, 9]);
        }
        assert!(matches!(
            decode_body("application/json", b"{}"),
            Err(ImageServiceError::EmptyResponse)
        ));
    }

    #[test]
    fn test_save_png_round_trip() {
        let path = std::env::temp_dir().join(format!("exoplanet_explorer_{}.png", std::process::id()));
        let (w, h) = save_png(&tiny_png(), &path).unwrap();
        assert_eq!((w, h), (2, 3));
        assert!(path.exists());
        std::fs::remove_file(&path).ok();

        assert!(matches!(save_png(b"not an image", &path), Err(ImageServiceError::Parse(_))));
    }

    #[test]
    fn test_default_config() {
        let config = ImageGenConfig::default();
        assert_eq!(config.timeout_secs, 120);
        assert!(config.endpoint.contains("stable-diffusion-xl-base-1.0"));
        assert!(config.api_token.is_none());
    }
}
