pub mod response;

use crate::config::Config;
use crate::db;
use crate::features;
use crate::features::assistant::Assistant;
use crate::middleware::auth::AuthKeys;
use crate::middleware::{cors_layer, tracing_layer};
use crate::storage::Storage;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;
use sqlx::PgPool;
use std::net::SocketAddr;
use tower_http::services::ServeDir;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub storage: Storage,
    pub auth: AuthKeys,
    pub assistant: Assistant,
}

pub async fn serve(config: Config) -> anyhow::Result<()> {
    let db_config = db::DbConfig::from_env()?;
    let db = db::create_pool(&db_config).await?;

    sqlx::migrate!("../../migrations").run(&db).await?;

    let storage_config = crate::storage::config::StorageConfig::from_env()?;
    let storage = Storage::new(storage_config).await?;

    let auth = AuthKeys::new(&config.auth.jwt_secret, config.auth.token_ttl_secs);
    let assistant = Assistant::new(&config.assistant).await;

    let uploads_root = storage.root().to_path_buf();
    let state = AppState {
        db,
        storage,
        auth,
        assistant,
    };
    let app = create_router(state, &config).nest_service("/uploads", ServeDir::new(uploads_root));

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal, starting graceful shutdown");
        },
    }
}

fn create_router(state: AppState, config: &Config) -> Router {
    let feature_state = features::FeatureState {
        db: state.db.clone(),
        storage: state.storage.clone(),
        auth: state.auth.clone(),
        assistant: state.assistant.clone(),
    };

    let api_v1 = features::router(feature_state);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .with_state(state.db.clone())
        .nest("/api/v1", api_v1)
        .layer(tracing_layer())
        .layer(cors_layer(&config.cors))
}

async fn root() -> impl IntoResponse {
    Json(json!({
        "name": "Campus Server",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}

async fn health(State(db): State<PgPool>) -> impl IntoResponse {
    match db::health_check(&db).await {
        Ok(()) => (StatusCode::OK, "OK"),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "UNAVAILABLE")
        }
    }
}
