//! JSON HTTP API for web frontends.
//!
//! Exposes the dashboard data over three routes:
//!
//! - `GET /api/health` - liveness probe
//! - `GET /api/dashboard?batches=1,2` - batches, tweets, KPIs, charts
//! - `POST /api/ask` - forward a prompt to the completion provider
//!
//! Storage is opened per request inside `spawn_blocking`; the `SQLite`
//! connection is not shared across tasks.

use crate::ask::CompletionClient;
use crate::batches::batches_for;
use crate::config::Config;
use crate::error::{LensError, Result};
use crate::fetcher::{fetch_and_map, parse_batches_param};
use crate::insights::{compute_kpis, selected_charts, ChartSeries, Kpis, AVAILABLE_SERIES};
use crate::model::{Batch, MappedTweet};
use crate::sentiment::Lexicon;
use crate::storage::Storage;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_path: PathBuf,
    pub config: Config,
    pub completion: Arc<CompletionClient>,
}

impl AppState {
    /// Build state from a loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the completion client cannot be built.
    pub fn from_config(config: Config) -> Result<Self> {
        let completion = CompletionClient::new(
            config.completion.endpoint.clone(),
            config.completion.model.clone(),
            config.api_key(),
        )?;
        Ok(Self {
            db_path: config.db_path(),
            config,
            completion: Arc::new(completion),
        })
    }
}

#[derive(Deserialize)]
pub struct DashboardQuery {
    batches: Option<String>,
}

#[derive(Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    prompt: String,
}

#[derive(Serialize)]
pub struct DashboardResponse {
    pub batches: Vec<Batch>,
    pub selected_batches: Vec<u32>,
    pub tweets: Vec<MappedTweet>,
    pub kpis: Kpis,
    pub charts: Vec<ChartSeries>,
}

/// Build the application router.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .route("/dashboard", get(dashboard))
        .route("/ask", post(ask))
        .with_state(state);

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

/// Health check handler
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Dashboard data for the selected batches.
///
/// A store failure degrades to an empty dashboard rather than a 500;
/// the view renders empty, matching the CLI behavior.
pub async fn dashboard(
    State(state): State<AppState>,
    Query(params): Query<DashboardQuery>,
) -> std::result::Result<Json<DashboardResponse>, StatusCode> {
    let selected = parse_batches_param(params.batches.as_deref());
    info!("GET /api/dashboard?batches={:?}", selected);

    let db_path = state.db_path.clone();
    let batch_size = state.config.batching.batch_size;
    let numbers = selected.clone();

    let (batches, tweets) = tokio::task::spawn_blocking(move || {
        match Storage::open_existing(&db_path) {
            Ok(storage) => {
                let batches = batches_for(&storage, batch_size).unwrap_or_default();
                let tweets = fetch_and_map(
                    &numbers,
                    batch_size,
                    |offset, limit| storage.window(offset, limit),
                    &Lexicon,
                );
                (batches, tweets)
            }
            Err(e) => {
                error!(error = %e, "Error opening tweet store");
                (Vec::new(), Vec::new())
            }
        }
    })
    .await
    .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let kpis = compute_kpis(&tweets);
    let charts = selected_charts(
        &tweets,
        &AVAILABLE_SERIES
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>(),
    );

    Ok(Json(DashboardResponse {
        batches,
        selected_batches: selected,
        tweets,
        kpis,
        charts,
    }))
}

/// Forward a prompt to the completion provider.
pub async fn ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> std::result::Result<Json<Value>, (StatusCode, Json<Value>)> {
    if request.prompt.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": LensError::PromptRequired.to_string() })),
        ));
    }

    match state.completion.complete(&request.prompt).await {
        Ok(text) => Ok(Json(json!({ "text": text }))),
        Err(e) => {
            error!(error = %e, "Completion request failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            ))
        }
    }
}

/// Bind and serve the API until interrupted.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(state: AppState, host: &str, port: u16) -> Result<()> {
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("API server listening on http://{}", addr);
    info!("  GET  /api/health    - Health check");
    info!("  GET  /api/dashboard - Dashboard data (batches= query)");
    info!("  POST /api/ask       - Ask about the data");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutting down");
    }
}
