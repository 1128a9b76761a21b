use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use adcraft_api::config::ServerConfig;
use adcraft_api::pipeline::{PgGenerationStore, PipelineSettings, VisualPipeline};
use adcraft_api::router::build_app_router;
use adcraft_api::state::AppState;
use adcraft_api::storage::LocalFileStorage;
use adcraft_providers::{OpenAiVisionCheck, ProviderConfig, ProviderSet, SourceResolver};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "adcraft_api=debug,adcraft_providers=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = adcraft_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    adcraft_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    adcraft_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    // --- Providers ---
    let provider_config = ProviderConfig::from_env();
    let http = adcraft_providers::build_http_client(&provider_config)
        .expect("Failed to build HTTP client");
    let providers = ProviderSet::from_config(&provider_config, http.clone());
    tracing::info!(available = ?providers.available(), "Image providers configured");

    let mut sources = SourceResolver::new(http.clone(), &config.public_asset_dir);
    if config.public_base_url.starts_with('/') {
        sources = sources.with_mount(&config.public_base_url, &config.storage_dir);
    }
    let vision = OpenAiVisionCheck::new(http, provider_config.openai.clone());

    // --- Storage ---
    tokio::fs::create_dir_all(&config.storage_dir)
        .await
        .expect("Failed to create STORAGE_DIR");
    let storage = LocalFileStorage::new(&config.storage_dir, &config.public_base_url);
    tracing::info!(dir = %config.storage_dir.display(), "Local file storage ready");

    // --- Pipeline ---
    let pipeline = VisualPipeline::new(
        Arc::new(PgGenerationStore::new(pool.clone())),
        Arc::new(storage),
        providers,
        sources,
        Arc::new(vision),
        PipelineSettings {
            credit_cost: config.visual_credit_cost,
            trim_borders: config.trim_ai_borders,
        },
    );

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        pipeline: Arc::new(pipeline),
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
