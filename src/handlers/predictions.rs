use crate::helpers::converters::prediction_to_dto;
use crate::helpers::errors::{error_response, prediction_error_response};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{extract::State, http::StatusCode, response::Json};
use common::{PredictionDto, MAX_PREDICTION_YEAR, MIN_PREDICTION_YEAR};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for a prediction; same shape as `common::PredictionRequest`
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreatePredictionRequest {
    /// Site display name, as returned by the site search
    #[validate(length(min = 1))]
    pub site_name: String,
    /// Year to predict for
    #[validate(range(min = 2000, max = 2100))]
    pub year: i32,
}

/// Predict pollutant levels for a site and year
#[utoipa::path(
    post,
    path = "/api/v1/predictions",
    tag = "predictions",
    request_body = CreatePredictionRequest,
    responses(
        (status = 200, description = "Prediction computed successfully", body = ApiResponse<PredictionDto>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Station ID missing for the site", body = ErrorResponse),
        (status = 500, description = "Model failure", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn create_prediction(
    State(state): State<AppState>,
    Json(request): Json<CreatePredictionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PredictionDto>>), (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering create_prediction function");

    if let Err(e) = request.validate() {
        warn!("Invalid prediction request: {}", e);
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            format!(
                "Year must be between {} and {} and a site must be selected",
                MIN_PREDICTION_YEAR, MAX_PREDICTION_YEAR
            ),
        ));
    }

    debug!("Predicting {} for {}", request.year, request.site_name);
    let prediction = state
        .ctx
        .predict(&request.site_name, request.year)
        .map_err(prediction_error_response)?;

    for warning in &prediction.warnings {
        warn!("{}", warning);
    }
    info!(
        "Predicted pollutant levels for {} in {}",
        prediction.site_name, prediction.year
    );

    Ok((
        StatusCode::OK,
        Json(ApiResponse {
            data: prediction_to_dto(prediction),
            message: "Prediction computed successfully".to_string(),
            success: true,
        }),
    ))
}
