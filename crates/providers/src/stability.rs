//! Stability AI Stable Image adapter.
//!
//! Text-to-image goes to `generate/core` with an `aspect_ratio`; image-to-image
//! goes to `generate/sd3` in `image-to-image` mode, which derives the output
//! shape from the input image.

use adcraft_core::provider::ProviderKind;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::config::StabilityConfig;
use crate::error::ProviderError;
use crate::http::parse_json;
use crate::source::ImageInput;
use crate::{ImageProvider, SizeOptions};

/// How far image-to-image may move away from the reference.
pub const EDIT_STRENGTH: f32 = 0.6;

const CORE_PATH: &str = "/v2beta/stable-image/generate/core";
const SD3_PATH: &str = "/v2beta/stable-image/generate/sd3";
const MODEL_CORE: &str = "stable-image-core";
const MODEL_SD3: &str = "sd3.5-large";

pub struct StabilityProvider {
    client: reqwest::Client,
    config: StabilityConfig,
}

impl StabilityProvider {
    pub fn new(client: reqwest::Client, config: StabilityConfig) -> Self {
        Self { client, config }
    }

    async fn submit(&self, path: &str, form: Form) -> Result<Option<String>, ProviderError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(ProviderError::NotConfigured(ProviderKind::Stability))?;

        let response = self
            .client
            .post(format!("{}{path}", self.config.base_url))
            .bearer_auth(api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .multipart(form)
            .send()
            .await?;

        let parsed: StableImageResponse = parse_json(response).await?;
        if parsed
            .finish_reason
            .as_deref()
            .is_some_and(|r| r.eq_ignore_ascii_case("CONTENT_FILTERED"))
        {
            tracing::warn!("Stability output was content filtered");
            return Ok(None);
        }
        Ok(parsed.image.filter(|s| !s.is_empty()))
    }
}

#[async_trait]
impl ImageProvider for StabilityProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Stability
    }

    fn model(&self) -> &str {
        MODEL_CORE
    }

    fn edit_model(&self) -> &str {
        MODEL_SD3
    }

    fn is_available(&self) -> bool {
        self.config.api_key.is_some()
    }

    async fn generate_image(
        &self,
        prompt: &str,
        size: &SizeOptions,
    ) -> Result<Option<String>, ProviderError> {
        let form = Form::new()
            .text("prompt", prompt.to_string())
            .text("aspect_ratio", size.dimensions.as_str())
            .text("output_format", "png");
        self.submit(CORE_PATH, form).await
    }

    async fn edit_image(
        &self,
        prompt: &str,
        reference: &ImageInput,
        _size: &SizeOptions,
    ) -> Result<Option<String>, ProviderError> {
        let image = Part::bytes(reference.bytes.clone())
            .file_name(reference.file_name())
            .mime_str(&reference.mime_type)?;
        let form = Form::new()
            .text("prompt", prompt.to_string())
            .text("model", MODEL_SD3)
            .text("mode", "image-to-image")
            .text("strength", EDIT_STRENGTH.to_string())
            .text("output_format", "png")
            .part("image", image);
        self.submit(SD3_PATH, form).await
    }
}

#[derive(Debug, Deserialize)]
struct StableImageResponse {
    image: Option<String>,
    finish_reason: Option<String>,
}
