//! Health check endpoint handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::api::{
    models::HealthResponse,
    response::{self, SuccessResponse},
    routes::AppState,
};

/// Liveness without touching storage
///
/// GET /health
pub async fn health(State(app_state): State<AppState>) -> impl IntoResponse {
    response::ok(HealthResponse::new("ok", "unknown", app_state.server_name.as_ref()))
}

/// Health including whether both collection files are reachable. Uses the
/// usual envelope, with `success: false` and 503 when storage is gone.
///
/// GET /api/v1/system/health
pub async fn health_detailed(State(app_state): State<AppState>) -> impl IntoResponse {
    let server = app_state.server_name.as_ref();

    match app_state.db.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(SuccessResponse::new(HealthResponse::new("ok", "available", server))),
        ),
        Err(e) => {
            tracing::error!("Storage health check failed: {}", e);
            let mut body = SuccessResponse::new(HealthResponse::new("error", "unavailable", server));
            body.success = false;
            (StatusCode::SERVICE_UNAVAILABLE, Json(body))
        }
    }
}
