use async_trait::async_trait;
use rand::Rng;
use reqwest::{header::CONTENT_TYPE, Url};
use serde::{Deserialize, Serialize};

use crate::{
    config::GeneratorConfig,
    error::{AppError, AppResult},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub src: String,
    pub prompt: String,
}

/// Remote producer of sticker images.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Produces a durable image reference for `prompt`. Nothing is stored.
    async fn generate(&self, prompt: &str) -> AppResult<GeneratedImage>;
}

/// Generator backed by the Pollinations image endpoint. The image URL is
/// itself the durable reference, so generation is a verified GET.
pub struct PollinationsGenerator {
    client: reqwest::Client,
    config: GeneratorConfig,
}

impl PollinationsGenerator {
    pub fn new(config: GeneratorConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Builds the image URL for a trimmed, non-empty prompt.
    pub fn image_url(&self, prompt: &str, seed: u32) -> AppResult<Url> {
        let mut url = Url::parse(&self.config.base_url).map_err(|e| {
            AppError::Config(format!("invalid generator url {}: {e}", self.config.base_url))
        })?;

        let full_prompt = format!("{}, {}", self.config.style_prompt, prompt);
        url.path_segments_mut()
            .map_err(|_| AppError::Config("generator url cannot be a base".to_string()))?
            .pop_if_empty()
            .push("p")
            .push(&full_prompt);

        url.query_pairs_mut()
            .append_pair("width", &self.config.width.to_string())
            .append_pair("height", &self.config.height.to_string())
            .append_pair("seed", &seed.to_string())
            .append_pair("model", &self.config.model);

        Ok(url)
    }
}

#[async_trait]
impl ImageGenerator for PollinationsGenerator {
    async fn generate(&self, prompt: &str) -> AppResult<GeneratedImage> {
        let prompt = validate_prompt(prompt)?;
        let seed = rand::thread_rng().gen_range(0..10_000);
        let url = self.image_url(prompt, seed)?;

        tracing::debug!("Requesting sticker image: {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| AppError::Generation(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Generation(format!(
                "image endpoint returned {status}"
            )));
        }

        let is_image = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.starts_with("image/"))
            .unwrap_or(false);
        if !is_image {
            return Err(AppError::Generation(
                "image endpoint did not return an image".to_string(),
            ));
        }

        tracing::info!("Generated sticker for prompt {:?}", prompt);

        Ok(GeneratedImage {
            src: url.to_string(),
            prompt: prompt.to_string(),
        })
    }
}

/// Returns the trimmed prompt, rejecting blank input.
pub fn validate_prompt(prompt: &str) -> AppResult<&str> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(AppError::Validation(
            "Tell us what sticker to make".to_string(),
        ));
    }
    Ok(prompt)
}
