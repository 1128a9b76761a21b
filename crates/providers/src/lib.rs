//! Adapters for the external image-generation and vision backends.
//!
//! Every backend implements [`ImageProvider`]. Adapters return the produced
//! image as base64 PNG/JPEG data, or `Ok(None)` when the backend answered
//! without an image (content filter, text-only reply).

pub mod config;
pub mod error;
pub mod gemini;
mod http;
pub mod openai;
pub mod source;
pub mod stability;
pub mod vision;

use std::sync::Arc;

use adcraft_core::canvas::CanvasSize;
use adcraft_core::dimensions::{resolve_dimensions, ProviderDimensions};
use adcraft_core::provider::ProviderKind;
use async_trait::async_trait;

pub use config::ProviderConfig;
pub use error::ProviderError;
pub use source::{ImageInput, SourceResolver};
pub use vision::{BrandNameDetector, NameCheck, OpenAiVisionCheck};

/// Requested canvas plus its provider-native size hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeOptions {
    pub canvas: CanvasSize,
    pub dimensions: ProviderDimensions,
}

impl SizeOptions {
    pub fn for_provider(kind: ProviderKind, canvas: CanvasSize) -> Self {
        Self {
            canvas,
            dimensions: resolve_dimensions(kind, canvas.width, canvas.height),
        }
    }
}

/// One image-generation backend.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Model identifier recorded in usage metadata.
    fn model(&self) -> &str;

    /// Model behind [`edit_image`](Self::edit_image), when it differs.
    fn edit_model(&self) -> &str {
        self.model()
    }

    /// Whether credentials are configured.
    fn is_available(&self) -> bool;

    /// Text-to-image. Returns base64 image data.
    async fn generate_image(
        &self,
        prompt: &str,
        size: &SizeOptions,
    ) -> Result<Option<String>, ProviderError>;

    /// Image-to-image guided by `reference`. Returns base64 image data.
    async fn edit_image(
        &self,
        prompt: &str,
        reference: &ImageInput,
        size: &SizeOptions,
    ) -> Result<Option<String>, ProviderError>;
}

/// One adapter per [`ProviderKind`].
#[derive(Clone)]
pub struct ProviderSet {
    openai: Arc<dyn ImageProvider>,
    gemini: Arc<dyn ImageProvider>,
    stability: Arc<dyn ImageProvider>,
}

impl ProviderSet {
    pub fn new(
        openai: Arc<dyn ImageProvider>,
        gemini: Arc<dyn ImageProvider>,
        stability: Arc<dyn ImageProvider>,
    ) -> Self {
        Self {
            openai,
            gemini,
            stability,
        }
    }

    /// Build the real HTTP adapters, sharing one connection pool.
    pub fn from_config(config: &ProviderConfig, client: reqwest::Client) -> Self {
        Self::new(
            Arc::new(openai::OpenAiProvider::new(client.clone(), config.openai.clone())),
            Arc::new(gemini::GeminiProvider::new(client.clone(), config.gemini.clone())),
            Arc::new(stability::StabilityProvider::new(client, config.stability.clone())),
        )
    }

    pub fn select(&self, kind: ProviderKind) -> &Arc<dyn ImageProvider> {
        match kind {
            ProviderKind::OpenAi => &self.openai,
            ProviderKind::Gemini => &self.gemini,
            ProviderKind::Stability => &self.stability,
        }
    }

    /// Kinds with credentials configured, default first.
    pub fn available(&self) -> Vec<ProviderKind> {
        ProviderKind::ALL
            .into_iter()
            .filter(|kind| self.select(*kind).is_available())
            .collect()
    }
}

impl std::fmt::Debug for ProviderSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSet")
            .field("available", &self.available())
            .finish()
    }
}

/// Build the shared outbound HTTP client.
pub fn build_http_client(config: &ProviderConfig) -> Result<reqwest::Client, ProviderError> {
    Ok(reqwest::Client::builder()
        .connect_timeout(std::time::Duration::from_secs(config.connect_timeout_secs))
        .user_agent(concat!("adcraft/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_options_use_provider_vocabulary() {
        let canvas = CanvasSize::new(1920, 1080);
        assert_eq!(
            SizeOptions::for_provider(ProviderKind::OpenAi, canvas).dimensions.as_str(),
            "1536x1024"
        );
        assert_eq!(
            SizeOptions::for_provider(ProviderKind::Gemini, canvas).dimensions.as_str(),
            "16:9"
        );
        assert_eq!(
            SizeOptions::for_provider(ProviderKind::Stability, canvas).dimensions.as_str(),
            "16:9"
        );
    }

    #[test]
    fn from_config_without_keys_has_nothing_available() {
        let config = ProviderConfig::default();
        let set = ProviderSet::from_config(&config, reqwest::Client::new());
        assert!(set.available().is_empty());
        assert_eq!(set.select(ProviderKind::Gemini).kind(), ProviderKind::Gemini);
    }
}
