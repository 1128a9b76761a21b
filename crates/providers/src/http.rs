//! Response helpers shared by the adapters.

use serde::de::DeserializeOwned;

use crate::error::ProviderError;

/// Longest error body kept in a [`ProviderError::Api`].
const MAX_ERROR_BODY: usize = 500;

/// Pass a 2xx response through, turn anything else into
/// [`ProviderError::Api`] carrying the (truncated) body.
pub(crate) async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        return Err(ProviderError::Api {
            status: status.as_u16(),
            body: truncate(&body, MAX_ERROR_BODY),
        });
    }
    Ok(response)
}

/// Parse a successful JSON response body.
pub(crate) async fn parse_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ProviderError> {
    let response = ensure_success(response).await?;
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| ProviderError::Decode(e.to_string()))
}

pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}
