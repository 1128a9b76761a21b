//! Image-generation backend identifiers.
//!
//! The set of backends is closed: every request is dispatched on a
//! [`ProviderKind`] tag, never on a free-form name.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// One of the interchangeable external image-generation backends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// OpenAI Images API. The default provider.
    #[default]
    OpenAi,
    /// Google Gemini native image generation.
    Gemini,
    /// Stability AI Stable Image API.
    Stability,
}

impl ProviderKind {
    /// All providers, default first.
    pub const ALL: [ProviderKind; 3] = [Self::OpenAi, Self::Gemini, Self::Stability];

    /// Parse a caller-supplied provider identifier.
    ///
    /// Accepts the canonical names plus the aliases clients historically sent.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "openai" | "a" | "dalle" | "gpt-image" => Ok(Self::OpenAi),
            "gemini" | "b" | "google" | "nano-banana" => Ok(Self::Gemini),
            "stability" | "c" | "stable-diffusion" | "sd" => Ok(Self::Stability),
            other => Err(CoreError::Validation(format!(
                "Unknown provider '{other}'. Must be one of: openai, gemini, stability"
            ))),
        }
    }

    /// Database / metadata name.
    pub fn name(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Gemini => "gemini",
            Self::Stability => "stability",
        }
    }

    /// Human-readable label used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::OpenAi => "OpenAI",
            Self::Gemini => "Gemini",
            Self::Stability => "Stability AI",
        }
    }

    /// Whether this is the provider used when the caller names none.
    pub fn is_default(self) -> bool {
        self == Self::default()
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
