//! Gemini native image generation (`models/{model}:generateContent`).

use adcraft_core::provider::ProviderKind;
use async_trait::async_trait;
use serde::Deserialize;

use crate::config::GeminiConfig;
use crate::error::ProviderError;
use crate::http::parse_json;
use crate::source::ImageInput;
use crate::{ImageProvider, SizeOptions};

pub struct GeminiProvider {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiProvider {
    pub fn new(client: reqwest::Client, config: GeminiConfig) -> Self {
        Self { client, config }
    }

    async fn generate_content(
        &self,
        parts: Vec<serde_json::Value>,
        size: &SizeOptions,
    ) -> Result<Option<String>, ProviderError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(ProviderError::NotConfigured(ProviderKind::Gemini))?;

        let body = serde_json::json!({
            "contents": [{ "parts": parts }],
            "generationConfig": {
                "responseModalities": ["IMAGE"],
                "imageConfig": { "aspectRatio": size.dimensions.as_str() }
            }
        });

        let response = self
            .client
            .post(format!(
                "{}/models/{}:generateContent",
                self.config.base_url, self.config.image_model
            ))
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let parsed: GenerateContentResponse = parse_json(response).await?;
        Ok(parsed.first_inline_image())
    }
}

#[async_trait]
impl ImageProvider for GeminiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
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
        self.generate_content(vec![serde_json::json!({ "text": prompt })], size)
            .await
    }

    async fn edit_image(
        &self,
        prompt: &str,
        reference: &ImageInput,
        size: &SizeOptions,
    ) -> Result<Option<String>, ProviderError> {
        let parts = vec![
            serde_json::json!({
                "inlineData": {
                    "mimeType": reference.mime_type,
                    "data": reference.to_base64(),
                }
            }),
            serde_json::json!({ "text": prompt }),
        ];
        self.generate_content(parts, size).await
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    fn first_inline_image(self) -> Option<String> {
        self.candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|content| content.parts)
            .filter_map(|part| part.inline_data)
            .map(|inline| inline.data)
            .find(|data| !data.is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
struct InlineData {
    data: String,
}

#[cfg(test)]
mod tests {
    use adcraft_core::canvas::CanvasSize;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn provider(server: &MockServer) -> GeminiProvider {
        GeminiProvider::new(
            reqwest::Client::new(),
            GeminiConfig {
                api_key: Some("g-key".into()),
                base_url: server.uri(),
                image_model: "gemini-2.5-flash-image".into(),
            },
        )
    }

    fn portrait() -> SizeOptions {
        SizeOptions::for_provider(ProviderKind::Gemini, CanvasSize::new(1080, 1350))
    }

    #[tokio::test]
    async fn generate_requests_image_modality_and_aspect_ratio() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.5-flash-image:generateContent"))
            .and(header("x-goog-api-key", "g-key"))
            .and(body_partial_json(serde_json::json!({
                "generationConfig": {
                    "responseModalities": ["IMAGE"],
                    "imageConfig": { "aspectRatio": "4:5" }
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": { "parts": [
                        { "text": "Here you go" },
                        { "inlineData": { "mimeType": "image/png", "data": "aW1n" } }
                    ]}
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let out = provider(&server).generate_image("poster", &portrait()).await.unwrap();
        assert_eq!(out.as_deref(), Some("aW1n"));
    }

    #[tokio::test]
    async fn text_only_reply_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{ "content": { "parts": [{ "text": "I can't draw that" }] } }]
            })))
            .mount(&server)
            .await;

        let out = provider(&server).generate_image("x", &portrait()).await.unwrap();
        assert!(out.is_none());
    }

    #[tokio::test]
    async fn blocked_prompt_without_candidates_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "promptFeedback": { "blockReason": "SAFETY" }
            })))
            .mount(&server)
            .await;

        let out = provider(&server).generate_image("x", &portrait()).await.unwrap();
        assert!(out.is_none());
    }

    #[tokio::test]
    async fn edit_sends_reference_before_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({
                "contents": [{ "parts": [
                    { "inlineData": { "mimeType": "image/jpeg", "data": "AQID" } },
                    { "text": "swap the background" }
                ]}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{ "content": { "parts": [
                    { "inlineData": { "mimeType": "image/png", "data": "b3V0" } }
                ]}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let reference = ImageInput {
            bytes: vec![1, 2, 3],
            mime_type: "image/jpeg".into(),
        };
        let out = provider(&server)
            .edit_image("swap the background", &reference, &portrait())
            .await
            .unwrap();
        assert_eq!(out.as_deref(), Some("b3V0"));
    }
}
