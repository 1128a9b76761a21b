use adcraft_core::provider::ProviderKind;

/// Errors from the external image and vision backends.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("Provider API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// No API key is configured for the backend.
    #[error("{} is not configured", .0.label())]
    NotConfigured(ProviderKind),

    /// The backend answered 2xx but the payload could not be interpreted.
    #[error("Failed to decode provider response: {0}")]
    Decode(String),

    /// An input image (logo, reference, prior design) could not be loaded.
    #[error("Failed to load image source: {0}")]
    Source(String),
}
