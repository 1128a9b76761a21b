/// Credentials and endpoints for every backend, loaded from the environment.
///
/// A missing API key is not an error: the adapter reports
/// `is_available() == false` and the orchestrator refuses to route to it.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub openai: OpenAiConfig,
    pub gemini: GeminiConfig,
    pub stability: StabilityConfig,
    /// TCP connect timeout for outbound calls (default: `10`).
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub image_model: String,
    pub vision_model: String,
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub image_model: String,
}

#[derive(Debug, Clone)]
pub struct StabilityConfig {
    pub api_key: Option<String>,
    pub base_url: String,
}

pub const DEFAULT_OPENAI_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_IMAGE_MODEL: &str = "gpt-image-1";
pub const DEFAULT_OPENAI_VISION_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_GEMINI_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_STABILITY_BASE: &str = "https://api.stability.ai";

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            openai: OpenAiConfig {
                api_key: None,
                base_url: DEFAULT_OPENAI_BASE.into(),
                image_model: DEFAULT_OPENAI_IMAGE_MODEL.into(),
                vision_model: DEFAULT_OPENAI_VISION_MODEL.into(),
            },
            gemini: GeminiConfig {
                api_key: None,
                base_url: DEFAULT_GEMINI_BASE.into(),
                image_model: DEFAULT_GEMINI_IMAGE_MODEL.into(),
            },
            stability: StabilityConfig {
                api_key: None,
                base_url: DEFAULT_STABILITY_BASE.into(),
            },
            connect_timeout_secs: 10,
        }
    }
}

impl ProviderConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                                            |
    /// |----------------------------|----------------------------------------------------|
    /// | `OPENAI_API_KEY`           | unset                                              |
    /// | `OPENAI_API_BASE`          | `https://api.openai.com/v1`                        |
    /// | `OPENAI_IMAGE_MODEL`       | `gpt-image-1`                                      |
    /// | `OPENAI_VISION_MODEL`      | `gpt-4o-mini`                                      |
    /// | `GEMINI_API_KEY`           | unset                                              |
    /// | `GEMINI_API_BASE`          | `https://generativelanguage.googleapis.com/v1beta` |
    /// | `GEMINI_IMAGE_MODEL`       | `gemini-2.5-flash-image`                           |
    /// | `STABILITY_API_KEY`        | unset                                              |
    /// | `STABILITY_API_BASE`       | `https://api.stability.ai`                         |
    /// | `PROVIDER_CONNECT_TIMEOUT_SECS` | `10`                                          |
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let connect_timeout_secs: u64 = std::env::var("PROVIDER_CONNECT_TIMEOUT_SECS")
            .unwrap_or_else(|_| defaults.connect_timeout_secs.to_string())
            .parse()
            .expect("PROVIDER_CONNECT_TIMEOUT_SECS must be a valid u64");

        Self {
            openai: OpenAiConfig {
                api_key: secret("OPENAI_API_KEY"),
                base_url: base_url("OPENAI_API_BASE", DEFAULT_OPENAI_BASE),
                image_model: var_or("OPENAI_IMAGE_MODEL", DEFAULT_OPENAI_IMAGE_MODEL),
                vision_model: var_or("OPENAI_VISION_MODEL", DEFAULT_OPENAI_VISION_MODEL),
            },
            gemini: GeminiConfig {
                api_key: secret("GEMINI_API_KEY"),
                base_url: base_url("GEMINI_API_BASE", DEFAULT_GEMINI_BASE),
                image_model: var_or("GEMINI_IMAGE_MODEL", DEFAULT_GEMINI_IMAGE_MODEL),
            },
            stability: StabilityConfig {
                api_key: secret("STABILITY_API_KEY"),
                base_url: base_url("STABILITY_API_BASE", DEFAULT_STABILITY_BASE),
            },
            connect_timeout_secs,
        }
    }
}

fn secret(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn var_or(name: &str, default: &str) -> String {
    secret(name).unwrap_or_else(|| default.to_string())
}

fn base_url(name: &str, default: &str) -> String {
    var_or(name, default).trim_end_matches('/').to_string()
}
