//! HTTP server setup and configuration.
//!
//! This module provides the router and application state used by both
//! the production server and integration tests.

use anyhow::Context;
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    response::{Json, Response},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::error::ApiError;
use crate::models::{load_palette_file, AppConfig, Swatch};
use crate::services::{WorkerHandle, WorkerOptions};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub worker: WorkerHandle,
    pub palettes: Arc<Vec<Swatch>>,
    pub config: Arc<AppConfig>,
}

/// Create application state and start the worker.
///
/// Must be called from within a tokio runtime.
pub fn create_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let palettes = match &config.palette_file {
        Some(path) => {
            let swatches = load_palette_file(path)
                .with_context(|| format!("Failed to load palette file {}", path.display()))?;
            tracing::info!(path = %path.display(), swatches = swatches.len(), "Palette file loaded");
            swatches
        }
        None => Vec::new(),
    };
    let worker = WorkerHandle::spawn(WorkerOptions::from(&config));

    Ok(AppState {
        worker,
        palettes: Arc::new(palettes),
        config: Arc::new(config),
    })
}

/// Build the API router with all endpoints and middleware.
///
/// This is the core router used by both production and tests.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.limits.max_body_bytes;
    Router::new()
        .route("/api/worker", post(handle_worker))
        .route("/api/palettes", get(handle_palettes))
        // Health check
        .route("/health", get(|| async { "OK" }))
        .with_state(state)
        // Source images travel base64-encoded inside the JSON body
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
}

// Wrapper handlers to extract state components for the underlying API handlers

async fn handle_worker(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
    api::handle_worker(State(state.worker), body).await
}

async fn handle_palettes(State(state): State<AppState>) -> Json<api::PaletteListResponse> {
    api::handle_palettes(State(state.palettes)).await
}
