//! Liveness and configuration endpoints.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::sync::Arc;

use super::{ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
}

#[derive(Debug, Serialize)]
pub struct LocalesResponse {
    pub locales: Vec<String>,
    pub default_locale: String,
}

/// `GET /health`
///
/// Reports `degraded` with 503 when the database does not answer.
pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    match state.store().ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok",
                database: "connected",
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Health check database ping failed: {e:#}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "degraded",
                    database: "disconnected",
                }),
            )
                .into_response()
        }
    }
}

/// `GET /api/public/locales`
pub async fn list_locales(State(state): State<Arc<AppState>>) -> Json<ApiResponse<LocalesResponse>> {
    Json(ApiResponse::success(LocalesResponse {
        locales: state.locales().iter().map(String::from).collect(),
        default_locale: state.default_locale().to_string(),
    }))
}
