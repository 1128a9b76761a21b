use std::path::PathBuf;

use adcraft_core::credits::DEFAULT_VISUAL_CREDIT_COST;
use adcraft_core::types::Credits;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `180`). Also the only
    /// upper bound on how long a provider call may take.
    pub request_timeout_secs: u64,
    /// Largest accepted request body (default: 16 MiB; briefs may inline
    /// logos and reference photos as data URIs).
    pub max_body_bytes: usize,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Root directory for generated PNGs (default: `./storage`).
    pub storage_dir: PathBuf,
    /// URL prefix under which `storage_dir` is served (default: `/storage`).
    pub public_base_url: String,
    /// Root for brief image sources given as local paths (default: `./public`).
    pub public_asset_dir: PathBuf,
    /// Credits charged per generated visual (default: `1`).
    pub visual_credit_cost: Credits,
    /// Crop light borders some models paint around designs (default: `false`).
    pub trim_ai_borders: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `180`                      |
    /// | `MAX_BODY_BYTES`       | `16777216`                 |
    /// | `STORAGE_DIR`          | `./storage`                |
    /// | `PUBLIC_BASE_URL`      | `/storage`                 |
    /// | `PUBLIC_ASSET_DIR`     | `./public`                 |
    /// | `VISUAL_CREDIT_COST`   | `1`                        |
    /// | `TRIM_AI_BORDERS`      | `false`                    |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "180".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let max_body_bytes: usize = std::env::var("MAX_BODY_BYTES")
            .unwrap_or_else(|_| (16 * 1024 * 1024).to_string())
            .parse()
            .expect("MAX_BODY_BYTES must be a valid usize");

        let storage_dir = PathBuf::from(
            std::env::var("STORAGE_DIR").unwrap_or_else(|_| "./storage".into()),
        );

        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "/storage".into())
            .trim_end_matches('/')
            .to_string();

        let public_asset_dir = PathBuf::from(
            std::env::var("PUBLIC_ASSET_DIR").unwrap_or_else(|_| "./public".into()),
        );

        let visual_credit_cost: Credits = std::env::var("VISUAL_CREDIT_COST")
            .unwrap_or_else(|_| DEFAULT_VISUAL_CREDIT_COST.to_string())
            .parse()
            .expect("VISUAL_CREDIT_COST must be a valid i32");
        assert!(visual_credit_cost >= 0, "VISUAL_CREDIT_COST must not be negative");

        let trim_ai_borders = std::env::var("TRIM_AI_BORDERS")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            max_body_bytes,
            jwt,
            storage_dir,
            public_base_url,
            public_asset_dir,
            visual_credit_cost,
            trim_ai_borders,
        }
    }
}
