use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use lectern_adapters::{DocumentError, DocumentStore};
use lectern_runtime::{
    filter_results, Category, DocumentContent, EngineError, ResilientClient, SearchEngine,
    SearchResult, SummaryResult, ALL_CATEGORIES,
};

use crate::types::{AnswerParams, ErrorResponse, HealthResponse, SearchParams};

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Shared application state: immutable components, one Arc each,
/// read concurrently by all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<dyn SearchEngine>,
    pub store: Arc<DocumentStore>,
    pub generative: Arc<ResilientClient>,
    pub index_page: PathBuf,
}

/// Create the Axum router with all routes.
/// CORS is permissive: the front-end page is served from elsewhere.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health_check))
        .route("/api/search", get(search))
        .route("/api/document/content/{*path}", get(document_content))
        .route("/api/document/summary/{*path}", get(document_summary))
        .route("/api/ai-answer", get(ai_answer))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the gateway server
pub async fn start_server(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    let router = create_router(state);
    let addr = format!("{}:{}", host, port);

    info!(addr = %addr, "Starting retrieval gateway");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to listen for Ctrl+C");
    info!("Shutdown signal received");
}

// --- Handlers ---

async fn index_page(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    match tokio::fs::read_to_string(&state.index_page).await {
        Ok(html) => Ok(Html(html)),
        Err(e) => {
            error!(path = %state.index_page.display(), error = %e, "Front-end asset missing");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Front-end asset is not available.")),
            ))
        }
    }
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Search-vs-browse mode choice: an empty query with a specific category
/// lists the catalog; anything else goes to the engine. Both outputs pass
/// through the same category filter.
async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<SearchResult>>, ApiError> {
    let browse_mode = params.query.trim().is_empty() && params.category != ALL_CATEGORIES;

    let results = if browse_mode {
        state
            .store
            .browse(Category::from_name(&params.category))
            .await
            .map_err(document_error_response)?
    } else {
        state
            .engine
            .search(&params.query)
            .await
            .map_err(engine_error_response)?
    };

    Ok(Json(filter_results(results, &params.category)))
}

async fn document_content(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Json<DocumentContent>, ApiError> {
    let content = state
        .store
        .read_content(&path)
        .await
        .map_err(document_error_response)?;
    Ok(Json(DocumentContent { content }))
}

/// Summary failures degrade to error text inside a 200; document reads
/// stay available while the generative endpoint is down.
async fn document_summary(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Json<SummaryResult>, ApiError> {
    let content = state
        .store
        .read_content(&path)
        .await
        .map_err(document_error_response)?;

    let summary = state.generative.summarize(&content).await;
    Ok(Json(SummaryResult { summary }))
}

async fn ai_answer(
    State(state): State<AppState>,
    Query(params): Query<AnswerParams>,
) -> Result<Json<lectern_runtime::AiAnswer>, ApiError> {
    match state.generative.answer(&params.query).await {
        Ok(answer) => Ok(Json(answer)),
        Err(e) => {
            error!(error = %e, "Grounded answer request failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(
                    "Failed to get an answer from the AI service.",
                )),
            ))
        }
    }
}

// --- Error mapping ---

fn engine_error_response(err: EngineError) -> ApiError {
    match err {
        EngineError::Unavailable(detail) => {
            // Full detail stays server-side; the client gets a generic message
            error!(detail = %detail, "Search engine unavailable");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to execute the search engine.")),
            )
        }
        EngineError::Crashed { status, stderr } => {
            error!(status, stderr = %stderr, "Search engine crashed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::with_detail(
                    "Search engine execution failed.",
                    stderr,
                )),
            )
        }
        EngineError::Protocol { reason, raw } => {
            error!(reason = %reason, raw = %raw, "Search engine protocol violation");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::with_detail(
                    "Search engine output was invalid.",
                    raw,
                )),
            )
        }
        EngineError::Reported(message) => {
            error!(message = %message, "Search engine reported an error");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse::new(message)))
        }
    }
}

fn document_error_response(err: DocumentError) -> ApiError {
    match err {
        DocumentError::OutsideRoot(path) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(format!("Invalid document path: {}", path))),
        ),
        DocumentError::NotFound(path) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(format!("Document not found: {}", path))),
        ),
        DocumentError::NotText(path) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(format!(
                "Document could not be decoded as text: {}",
                path
            ))),
        ),
        DocumentError::Io { path, source } => {
            error!(path = %path, error = %source, "Document i/o failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to read documents.")),
            )
        }
    }
}
