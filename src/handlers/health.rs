use axum::{extract::State, http::StatusCode, response::Json};
use tracing::instrument;
use crate::schemas::{AppState, ErrorResponse, HealthResponse};

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 500, description = "Service is unhealthy", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, StatusCode> {
    let response = HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        observations: state.ctx.dataset().len(),
        sites: state.ctx.sites().len(),
        undated_rows: state.ctx.dataset().undated_rows(),
    };

    Ok(Json(response))
}
