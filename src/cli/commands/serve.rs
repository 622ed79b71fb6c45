//! HTTP API server for integration with other systems.
//!
//! Provides REST endpoints for question answering and index administration.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::error::SvarError;
use crate::orchestrator::Orchestrator;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Shared application state.
struct AppState {
    orchestrator: Orchestrator,
}

/// Run the HTTP API server.
pub async fn run_serve(host: &str, port: u16, settings: Settings) -> anyhow::Result<()> {
    if let Err(e) = preflight::check(Operation::Serve, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'svar doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let orchestrator = Orchestrator::new(settings)?;
    orchestrator.ensure_index().await?;

    let state = Arc::new(AppState { orchestrator });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .route("/ask", post(ask))
        .route("/stats", get(stats))
        .route("/index", delete(delete_index))
        .route("/index/{video_id}", delete(delete_video))
        .layer(cors)
        .with_state(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Svar API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET    /health");
    Output::kv("Ask", "POST   /ask");
    Output::kv("Stats", "GET    /stats");
    Output::kv("Clear Index", "DELETE /index");
    Output::kv("Clear Video", "DELETE /index/:video_id");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct AskRequest {
    video_url: String,
    question: String,
}

#[derive(Serialize)]
struct AskResponse {
    answer: String,
    video_url: String,
    question: String,
    processing_time: f64,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    vector_backend_status: String,
    total_vectors: usize,
    timestamp: String,
}

#[derive(Serialize)]
struct StatsResponse {
    total_vectors: usize,
    namespaces: std::collections::HashMap<String, usize>,
    dimension: usize,
    metric: String,
}

#[derive(Serialize)]
struct DeleteResponse {
    deleted: bool,
    message: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Map error kinds to HTTP status codes.
fn error_status(e: &SvarError) -> StatusCode {
    match e {
        SvarError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        SvarError::TranscriptUnavailable(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(e: SvarError) -> axum::response::Response {
    (
        error_status(&e),
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
        .into_response()
}

// === Handlers ===

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (backend_status, total_vectors) = match state.orchestrator.stats().await {
        Ok(stats) => ("ok".to_string(), stats.total_vectors),
        Err(e) => (format!("error: {}", e), 0),
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        vector_backend_status: backend_status,
        total_vectors,
        timestamp: Utc::now().to_rfc3339(),
    })
}

async fn ask(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AskRequest>,
) -> impl IntoResponse {
    match state.orchestrator.ask(&req.video_url, &req.question).await {
        Ok(answer) => Json(AskResponse {
            answer: answer.answer,
            video_url: req.video_url,
            question: req.question,
            processing_time: answer.processing_time,
        })
        .into_response(),
        Err(e) => error_response(e),
    }
}

async fn stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.orchestrator.stats().await {
        Ok(stats) => Json(StatsResponse {
            total_vectors: stats.total_vectors,
            namespaces: stats.namespaces,
            dimension: stats.dimension,
            metric: stats.metric,
        })
        .into_response(),
        Err(e) => error_response(e),
    }
}

async fn delete_index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.orchestrator.delete_index().await {
        Ok(()) => Json(DeleteResponse {
            deleted: true,
            message: "All vectors deleted".to_string(),
        })
        .into_response(),
        Err(e) => error_response(e),
    }
}

async fn delete_video(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
) -> impl IntoResponse {
    match state.orchestrator.delete_video(&video_id).await {
        Ok(removed) => Json(DeleteResponse {
            deleted: true,
            message: format!("Deleted {} vectors for {}", removed, video_id),
        })
        .into_response(),
        Err(e) => error_response(e),
    }
}
