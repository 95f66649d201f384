//! HTTP route handlers and server setup.

use std::sync::Arc;

use axum::{
    http::{HeaderValue, Method, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::llm::{GeminiClient, SharedLlmClient};
use crate::services::Services;
use crate::store::ProjectStore;

use super::generate;
use super::projects;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: ProjectStore,
    pub services: Services,
}

/// Start the HTTP server.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let store = ProjectStore::open(&config.database_path)?;
    tracing::info!("Project store at {}", config.database_path.display());

    // One client per model tier, constructed once and shared read-only.
    let pro: SharedLlmClient = Arc::new(GeminiClient::new(
        config.gemini_api_key.clone(),
        config.model_pro.clone(),
        config.request_timeout,
    )?);
    let flash: SharedLlmClient = Arc::new(GeminiClient::new(
        config.gemini_api_key.clone(),
        config.model_flash.clone(),
        config.request_timeout,
    )?);
    let services = Services::new(pro, flash, &config);

    let cors = cors_layer(&config);
    let state = Arc::new(AppState {
        config: config.clone(),
        store,
        services,
    });

    let app = router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Listening on {}", config.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        // Generation endpoints
        .route("/api/question", post(generate::question))
        .route("/api/summary", post(generate::summary))
        .route("/api/framework", post(generate::framework))
        .route("/api/directory", post(generate::directory))
        .route("/api/tasks", post(generate::tasks))
        .route("/api/taskDetail", post(generate::task_detail))
        .route("/api/graphTask", post(generate::graph_task))
        .route("/api/durationTask", post(generate::duration_task))
        .route("/api/environment", post(generate::environment))
        .route("/api/deploy", post(generate::deploy))
        .route("/api/taskChat", post(generate::task_chat))
        .route("/api/handson", post(generate::handson))
        // Project CRUD
        .route(
            "/api/projects",
            post(projects::create).get(projects::list),
        )
        .route(
            "/api/projects/:id",
            get(projects::get)
                .put(projects::update)
                .delete(projects::delete),
        )
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
}

/// GET /api/health - liveness probe.
async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::OK, Json(serde_json::json!({"status": "ok"})))
}
