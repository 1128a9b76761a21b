//! Loading of caller-referenced images (logos, reference photos, templates,
//! previously generated designs).
//!
//! A source string is one of:
//! - `data:<mime>;base64,<payload>`
//! - an `http://` / `https://` URL
//! - a path under the public asset directory (`/uploads/logo.png`)

use std::path::{Component, Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::error::ProviderError;

/// Fallback MIME type when nothing better is known.
const DEFAULT_MIME: &str = "image/png";

/// Raw image bytes plus their MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInput {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl ImageInput {
    /// Wrap bytes, sniffing the MIME type from the content.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let mime_type = sniff_mime(&bytes).unwrap_or(DEFAULT_MIME).to_string();
        Self { bytes, mime_type }
    }

    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.bytes)
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.to_base64())
    }

    /// File extension matching the MIME type, for multipart uploads.
    pub fn file_name(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/jpeg" => "image.jpg",
            "image/webp" => "image.webp",
            _ => "image.png",
        }
    }
}

/// Parsed form of a source string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    DataUri { mime_type: String, payload: String },
    Remote(String),
    Local(PathBuf),
}

impl ImageSource {
    pub fn parse(raw: &str) -> Result<Self, ProviderError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ProviderError::Source("empty image source".into()));
        }

        if let Some(rest) = raw.strip_prefix("data:") {
            let (header, payload) = rest
                .split_once(',')
                .ok_or_else(|| ProviderError::Source("malformed data URI".into()))?;
            let mime_type = header
                .strip_suffix(";base64")
                .ok_or_else(|| ProviderError::Source("data URI is not base64 encoded".into()))?;
            return Ok(Self::DataUri {
                mime_type: if mime_type.is_empty() {
                    DEFAULT_MIME.to_string()
                } else {
                    mime_type.to_string()
                },
                payload: payload.to_string(),
            });
        }

        if raw.starts_with("http://") || raw.starts_with("https://") {
            return Ok(Self::Remote(raw.to_string()));
        }

        let relative = Path::new(raw.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(ProviderError::Source(format!(
                "path '{raw}' escapes the asset directory"
            )));
        }
        Ok(Self::Local(relative.to_path_buf()))
    }
}

/// Resolves source strings to bytes.
#[derive(Debug, Clone)]
pub struct SourceResolver {
    client: reqwest::Client,
    asset_root: PathBuf,
    mounts: Vec<(PathBuf, PathBuf)>,
}

impl SourceResolver {
    pub fn new(client: reqwest::Client, asset_root: impl Into<PathBuf>) -> Self {
        Self {
            client,
            asset_root: asset_root.into(),
            mounts: Vec::new(),
        }
    }

    /// Resolve local paths starting with `prefix` under `dir` instead of the
    /// asset root. Used for URLs of previously stored designs.
    pub fn with_mount(mut self, prefix: &str, dir: impl Into<PathBuf>) -> Self {
        let prefix = PathBuf::from(prefix.trim_matches('/'));
        self.mounts.push((prefix, dir.into()));
        self
    }

    fn local_path(&self, relative: &Path) -> PathBuf {
        self.mounts
            .iter()
            .find_map(|(prefix, dir)| relative.strip_prefix(prefix).ok().map(|rest| dir.join(rest)))
            .unwrap_or_else(|| self.asset_root.join(relative))
    }

    pub async fn fetch(&self, raw: &str) -> Result<ImageInput, ProviderError> {
        match ImageSource::parse(raw)? {
            ImageSource::DataUri { mime_type, payload } => {
                let bytes = BASE64
                    .decode(payload.trim())
                    .map_err(|e| ProviderError::Source(format!("invalid base64 payload: {e}")))?;
                Ok(ImageInput { bytes, mime_type })
            }
            ImageSource::Remote(url) => self.fetch_remote(&url).await,
            ImageSource::Local(relative) => {
                let path = self.local_path(&relative);
                let bytes = tokio::fs::read(&path).await.map_err(|e| {
                    ProviderError::Source(format!("cannot read {}: {e}", path.display()))
                })?;
                Ok(ImageInput::from_bytes(bytes))
            }
        }
    }

    async fn fetch_remote(&self, url: &str) -> Result<ImageInput, ProviderError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::Source(format!("GET {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Source(format!(
                "GET {url} returned {}",
                status.as_u16()
            )));
        }

        let header_mime = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_ascii_lowercase())
            .filter(|v| v.starts_with("image/"));

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ProviderError::Source(format!("reading {url} failed: {e}")))?
            .to_vec();

        Ok(match header_mime {
            Some(mime_type) => ImageInput { bytes, mime_type },
            None => ImageInput::from_bytes(bytes),
        })
    }
}

fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    image::guess_format(bytes).ok().map(|f| f.to_mime_type())
}
