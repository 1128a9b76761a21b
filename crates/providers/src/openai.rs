//! OpenAI Images API adapter (`/images/generations`, `/images/edits`).

use adcraft_core::provider::ProviderKind;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::config::OpenAiConfig;
use crate::error::ProviderError;
use crate::http::{ensure_success, parse_json};
use crate::source::ImageInput;
use crate::{ImageProvider, SizeOptions};

pub struct OpenAiProvider {
    client: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiProvider {
    pub fn new(client: reqwest::Client, config: OpenAiConfig) -> Self {
        Self { client, config }
    }

    fn api_key(&self) -> Result<&str, ProviderError> {
        self.config
            .api_key
            .as_deref()
            .ok_or(ProviderError::NotConfigured(ProviderKind::OpenAi))
    }

    /// First image in the response, as base64. Falls back to downloading a
    /// hosted `url` when the model returned one instead of inline data.
    async fn first_image(&self, parsed: ImagesResponse) -> Result<Option<String>, ProviderError> {
        let Some(item) = parsed.data.into_iter().next() else {
            return Ok(None);
        };
        if let Some(b64) = item.b64_json.filter(|s| !s.is_empty()) {
            return Ok(Some(b64));
        }
        match item.url {
            Some(url) => {
                let response = ensure_success(self.client.get(&url).send().await?).await?;
                let bytes = response.bytes().await?;
                Ok(Some(BASE64.encode(bytes)))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl ImageProvider for OpenAiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    fn model(&self) -> &str {
        &self.config.image_model
    }

    fn is_available(&self) -> bool {
        self.config.api_key.is_some()
    }

    async fn generate_image(
        &self,
        prompt: &str,
        size: &SizeOptions,
    ) -> Result<Option<String>, ProviderError> {
        let api_key = self.api_key()?;
        let body = serde_json::json!({
            "model": self.config.image_model,
            "prompt": prompt,
            "n": 1,
            "size": size.dimensions.as_str(),
        });

        let response = self
            .client
            .post(format!("{}/images/generations", self.config.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let parsed: ImagesResponse = parse_json(response).await?;
        self.first_image(parsed).await
    }

    async fn edit_image(
        &self,
        prompt: &str,
        reference: &ImageInput,
        size: &SizeOptions,
    ) -> Result<Option<String>, ProviderError> {
        let api_key = self.api_key()?;
        let image = Part::bytes(reference.bytes.clone())
            .file_name(reference.file_name())
            .mime_str(&reference.mime_type)?;
        let form = Form::new()
            .text("model", self.config.image_model.clone())
            .text("prompt", prompt.to_string())
            .text("n", "1")
            .text("size", size.dimensions.as_str())
            .part("image", image);

        let response = self
            .client
            .post(format!("{}/images/edits", self.config.base_url))
            .bearer_auth(api_key)
            .multipart(form)
            .send()
            .await?;

        let parsed: ImagesResponse = parse_json(response).await?;
        self.first_image(parsed).await
    }
}

#[derive(Debug, Deserialize)]
struct ImagesResponse {
    #[serde(default)]
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    b64_json: Option<String>,
    url: Option<String>,
}
