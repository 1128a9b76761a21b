#![allow(dead_code)]

use std::io::Cursor;
use std::path::Path;
use std::sync::{Arc, Mutex};

use adcraft_api::auth::jwt::{generate_access_token, JwtConfig};
use adcraft_api::config::ServerConfig;
use adcraft_api::pipeline::{GenerationStore, PgGenerationStore, PipelineSettings, VisualPipeline};
use adcraft_api::router::build_app_router;
use adcraft_api::state::AppState;
use adcraft_api::storage::LocalFileStorage;
use adcraft_core::provider::ProviderKind;
use adcraft_core::types::{Credits, DbId};
use adcraft_db::models::user::{CreateUser, User};
use adcraft_db::repositories::UserRepo;
use adcraft_providers::{
    BrandNameDetector, ImageInput, ImageProvider, NameCheck, ProviderError, ProviderSet,
    SizeOptions, SourceResolver,
};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use http_body_util::BodyExt;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use sqlx::PgPool;
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

/// Build a test `ServerConfig` with safe defaults, storing files in `storage_dir`.
pub fn test_config(storage_dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        max_body_bytes: 16 * 1024 * 1024,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 60,
        },
        storage_dir: storage_dir.to_path_buf(),
        public_base_url: "/storage".to_string(),
        public_asset_dir: storage_dir.to_path_buf(),
        visual_credit_cost: 1,
        trim_ai_borders: false,
    }
}

/// Build the full application router with the production middleware stack,
/// a PostgreSQL-backed store, and the given providers.
pub fn build_test_app(pool: PgPool, providers: ProviderSet, storage_dir: &Path) -> Router {
    build_test_app_with_config(pool, providers, test_config(storage_dir))
}

pub fn build_test_app_with_config(
    pool: PgPool,
    providers: ProviderSet,
    config: ServerConfig,
) -> Router {
    let store: Arc<dyn GenerationStore> = Arc::new(PgGenerationStore::new(pool.clone()));
    let pipeline = test_pipeline(store, providers, &config.storage_dir, &config);

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        pipeline: Arc::new(pipeline),
    };
    build_app_router(state, &config)
}

pub fn test_pipeline(
    store: Arc<dyn GenerationStore>,
    providers: ProviderSet,
    storage_dir: &Path,
    config: &ServerConfig,
) -> VisualPipeline {
    test_pipeline_with_detector(
        store,
        providers,
        storage_dir,
        config,
        Arc::new(FixedDetector(false)),
    )
}

pub fn test_pipeline_with_detector(
    store: Arc<dyn GenerationStore>,
    providers: ProviderSet,
    storage_dir: &Path,
    config: &ServerConfig,
    vision: Arc<dyn BrandNameDetector>,
) -> VisualPipeline {
    let sources = SourceResolver::new(reqwest::Client::new(), storage_dir)
        .with_mount(&config.public_base_url, storage_dir);
    VisualPipeline::new(
        store,
        Arc::new(LocalFileStorage::new(storage_dir, &config.public_base_url)),
        providers,
        sources,
        vision,
        PipelineSettings {
            credit_cost: config.visual_credit_cost,
            trim_borders: config.trim_ai_borders,
        },
    )
}

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

/// Which adapter method a [`FakeProvider`] saw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    Generate { prompt: String, size: String },
    Edit { prompt: String, reference: Vec<u8> },
}

/// Scripted provider that records every call.
pub struct FakeProvider {
    kind: ProviderKind,
    available: bool,
    output: Option<String>,
    pub calls: Mutex<Vec<ProviderCall>>,
}

impl FakeProvider {
    /// Available provider answering with `output` (base64).
    pub fn returning(kind: ProviderKind, output: Option<String>) -> Arc<Self> {
        Arc::new(Self {
            kind,
            available: true,
            output,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn unavailable(kind: ProviderKind) -> Arc<Self> {
        Arc::new(Self {
            kind,
            available: false,
            output: None,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<ProviderCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageProvider for FakeProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn model(&self) -> &str {
        "fake-model"
    }

    fn edit_model(&self) -> &str {
        "fake-edit-model"
    }

    fn is_available(&self) -> bool {
        self.available
    }

    async fn generate_image(
        &self,
        prompt: &str,
        size: &SizeOptions,
    ) -> Result<Option<String>, ProviderError> {
        self.calls.lock().unwrap().push(ProviderCall::Generate {
            prompt: prompt.to_string(),
            size: size.dimensions.as_str().to_string(),
        });
        Ok(self.output.clone())
    }

    async fn edit_image(
        &self,
        prompt: &str,
        reference: &ImageInput,
        _size: &SizeOptions,
    ) -> Result<Option<String>, ProviderError> {
        self.calls.lock().unwrap().push(ProviderCall::Edit {
            prompt: prompt.to_string(),
            reference: reference.bytes.clone(),
        });
        Ok(self.output.clone())
    }
}

/// One OpenAI fake plus unavailable Gemini and Stability adapters.
pub fn openai_only(openai: Arc<FakeProvider>) -> ProviderSet {
    ProviderSet::new(
        openai,
        FakeProvider::unavailable(ProviderKind::Gemini),
        FakeProvider::unavailable(ProviderKind::Stability),
    )
}

/// Vision check with a fixed answer.
pub struct FixedDetector(pub bool);

#[async_trait]
impl BrandNameDetector for FixedDetector {
    fn model(&self) -> &str {
        "fake-vision"
    }

    async fn logo_contains_name(&self, _logo: &ImageInput, _brand_name: &str) -> NameCheck {
        NameCheck::Answered(self.0)
    }
}

/// Vision check whose backend never answers.
pub struct OfflineDetector;

#[async_trait]
impl BrandNameDetector for OfflineDetector {
    fn model(&self) -> &str {
        "fake-vision"
    }

    async fn logo_contains_name(&self, _logo: &ImageInput, _brand_name: &str) -> NameCheck {
        NameCheck::FailedOpen
    }
}

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

/// Solid-colour PNG bytes.
pub fn png_bytes(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba(color));
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img)
        .write_to(&mut buf, ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

/// Solid-colour PNG as base64, the way providers return it.
pub fn png_base64(width: u32, height: u32) -> String {
    BASE64.encode(png_bytes(width, height, [30, 90, 200, 255]))
}

pub fn png_data_uri(width: u32, height: u32, color: [u8; 4]) -> String {
    format!("data:image/png;base64,{}", BASE64.encode(png_bytes(width, height, color)))
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

pub async fn create_user(pool: &PgPool, email: &str, plan: &str, credits: Credits) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            plan: plan.to_string(),
            credit_balance: credits,
        },
    )
    .await
    .expect("user creation should succeed")
}

/// Bearer token for `user_id`, signed with the test secret.
pub fn token_for(user_id: DbId) -> String {
    generate_access_token(
        user_id,
        &JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 60,
        },
    )
    .unwrap()
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .header("authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .header("authorization", format!("Bearer {token}"))
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}
