use crate::helpers::converters::statistics_to_dto;
use crate::helpers::errors::compute_error_response;
use crate::schemas::{ApiResponse, AppState, ErrorResponse, StatisticsQuery};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use common::{ParameterStatistics, Pollutant};
use tracing::{debug, instrument, trace};

/// Descriptive statistics of one pollutant at one site
#[utoipa::path(
    get,
    path = "/api/v1/statistics",
    tag = "statistics",
    params(StatisticsQuery),
    responses(
        (status = 200, description = "Statistics retrieved successfully", body = ApiResponse<ParameterStatistics>),
        (status = 404, description = "Site not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_statistics(
    Valid(Query(query)): Valid<Query<StatisticsQuery>>,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ApiResponse<ParameterStatistics>>), (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering get_statistics function");

    let parameter = query.parameter.unwrap_or(Pollutant::O2);
    let stats = state
        .ctx
        .statistics(&query.site_name, parameter)
        .map_err(compute_error_response)?;
    debug!("{} readings of {} at {}", stats.count, parameter, query.site_name);

    let message = if stats.count == 0 {
        format!("No {} readings recorded for {}", parameter, query.site_name)
    } else {
        "Statistics retrieved successfully".to_string()
    };

    Ok((
        StatusCode::OK,
        Json(ApiResponse {
            data: statistics_to_dto(&query.site_name, parameter, stats),
            message,
            success: true,
        }),
    ))
}
