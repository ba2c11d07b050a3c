//! Thin HTTP transport: trigger endpoint, audio asset serving, nothing else

use crate::notification::coordinator::NotificationCoordinator;
use crate::notification::dispatcher::NotificationRequest;
use anyhow::{Context, Result};
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Shared state for the HTTP handlers
pub struct AppState {
    pub coordinator: Arc<NotificationCoordinator>,
    pub default_message: String,
    pub asset_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct NotifyParams {
    msg: Option<String>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/notify", get(handle_notify))
        .route("/audio/:file", get(serve_audio))
        .fallback(teapot)
        .with_state(state)
}

/// Bind and serve until ctrl-c.
pub async fn serve(state: Arc<AppState>, hostname: &str, port: u16) -> Result<()> {
    let addr = format!("{}:{}", hostname, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("HTTP Server starting - {}", addr);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down...");
        })
        .await
        .context("HTTP server error")
}

/// Acknowledge immediately with a redirect, then notify in the background.
/// The caller gets fire-and-forget semantics; the outcome lands in the log.
async fn handle_notify(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NotifyParams>,
) -> impl IntoResponse {
    let message = params
        .msg
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| state.default_message.clone());

    info!("Sending notifications and redirecting...");
    let body = format!("Sent notification: {}", message);
    let coordinator = state.coordinator.clone();
    tokio::spawn(async move {
        let outcome = coordinator.notify(NotificationRequest::new(message)).await;
        debug!(?outcome, "Network trigger handled");
    });

    (StatusCode::FOUND, [(header::LOCATION, "/")], body)
}

/// Stream a rendered mp3 so the speaker can fetch it.
async fn serve_audio(State(state): State<Arc<AppState>>, Path(file): Path<String>) -> Response {
    // Asset names are flat; anything path-like is not ours
    if file.contains("..") || file.contains('/') || !file.ends_with(".mp3") {
        return StatusCode::NOT_FOUND.into_response();
    }
    match tokio::fs::read(state.asset_dir.join(&file)).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, "audio/mpeg")], bytes).into_response(),
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn teapot() -> impl IntoResponse {
    (StatusCode::IM_A_TEAPOT, "I'M A DOORBELL, NOT A TEAPOT")
}
