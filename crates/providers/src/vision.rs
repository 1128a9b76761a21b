//! Vision check: does the uploaded logo already show the brand name?
//!
//! The answer decides whether the prompt asks the image model to render the
//! name as text. The check fails open: on any error the logo is assumed to
//! contain the name, so the model is never asked to write a name that may
//! end up duplicated next to the logo.

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::OpenAiConfig;
use crate::error::ProviderError;
use crate::http::parse_json;
use crate::source::ImageInput;

/// Result of one vision check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameCheck {
    /// The model answered; `true` when the name is in the logo.
    Answered(bool),
    /// No model answered. The name is assumed present.
    FailedOpen,
}

impl NameCheck {
    pub fn name_present(self) -> bool {
        match self {
            Self::Answered(present) => present,
            Self::FailedOpen => true,
        }
    }
}

#[async_trait]
pub trait BrandNameDetector: Send + Sync {
    /// Model identifier recorded in usage metadata.
    fn model(&self) -> &str;

    /// Ask whether `logo` visibly contains `brand_name` as text.
    async fn logo_contains_name(&self, logo: &ImageInput, brand_name: &str) -> NameCheck;
}

/// OpenAI chat-completions vision model asked a strict yes/no question.
pub struct OpenAiVisionCheck {
    client: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiVisionCheck {
    pub fn new(client: reqwest::Client, config: OpenAiConfig) -> Self {
        Self { client, config }
    }

    async fn ask(&self, logo: &ImageInput, brand_name: &str) -> Result<String, ProviderError> {
        let api_key = self.config.api_key.as_deref().ok_or(ProviderError::NotConfigured(
            adcraft_core::provider::ProviderKind::OpenAi,
        ))?;

        let question = format!(
            "Does this logo image visibly contain the text \"{brand_name}\" (or a clearly \
             recognisable rendering of that brand name)? Answer with exactly one word: YES or NO."
        );
        let body = serde_json::json!({
            "model": self.config.vision_model,
            "max_tokens": 3,
            "temperature": 0,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": question },
                    { "type": "image_url", "image_url": { "url": logo.to_data_uri() } }
                ]
            }]
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let parsed: ChatResponse = parse_json(response).await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ProviderError::Decode("vision reply has no content".into()))
    }
}

#[async_trait]
impl BrandNameDetector for OpenAiVisionCheck {
    fn model(&self) -> &str {
        &self.config.vision_model
    }

    async fn logo_contains_name(&self, logo: &ImageInput, brand_name: &str) -> NameCheck {
        match self.ask(logo, brand_name).await {
            Ok(answer) => {
                let verdict = interpret_answer(&answer);
                tracing::debug!(brand_name, answer = %answer.trim(), verdict, "Logo vision check");
                NameCheck::Answered(verdict)
            }
            Err(e) => {
                tracing::warn!(brand_name, error = %e, "Logo vision check failed, assuming name is present");
                NameCheck::FailedOpen
            }
        }
    }
}

/// First word, case-insensitive: `no` means absent, anything else present.
pub fn interpret_answer(answer: &str) -> bool {
    let first = answer
        .split_whitespace()
        .next()
        .unwrap_or("")
        .trim_matches(|c: char| !c.is_ascii_alphabetic())
        .to_ascii_lowercase();
    first != "no"
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: Option<String>,
}
