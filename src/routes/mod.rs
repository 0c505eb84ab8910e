// SPDX-License-Identifier: MIT

//! Liveness HTTP endpoint for the hosting platform's health checks.

use std::sync::Arc;

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub bot_ready: bool,
    pub user: String,
    pub timestamp: String,
}

/// Health check response
async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let bot_user = state
        .bot_user
        .read()
        .ok()
        .and_then(|user| user.clone());

    Json(HealthResponse {
        status: "Discord bot is running!".to_string(),
        bot_ready: bot_user.is_some(),
        user: bot_user.unwrap_or_else(|| "Not logged in".to_string()),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Build the liveness router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
