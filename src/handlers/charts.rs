use crate::helpers::errors::compute_error_response;
use crate::schemas::{ApiResponse, AppState, ChartQuery, ErrorResponse};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use common::{ChartDto, ChartKind, Pollutant};
use tracing::{debug, instrument, trace};

/// Chart data for one pollutant at one site
#[utoipa::path(
    get,
    path = "/api/v1/charts",
    tag = "charts",
    params(ChartQuery),
    responses(
        (status = 200, description = "Chart data retrieved successfully", body = ApiResponse<ChartDto>),
        (status = 400, description = "Invalid chart request", body = ErrorResponse),
        (status = 404, description = "Site not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_chart(
    Valid(Query(query)): Valid<Query<ChartQuery>>,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ApiResponse<ChartDto>>), (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering get_chart function");

    let parameter = query.parameter.unwrap_or(Pollutant::O2);
    let kind = query.chart.unwrap_or(ChartKind::Histogram);

    let chart = state
        .ctx
        .chart(&query.site_name, parameter, kind, query.compare_with)
        .map_err(compute_error_response)?;
    debug!("Built chart '{}'", chart.title);

    let message = if chart.series.is_empty() {
        "No data to plot".to_string()
    } else {
        "Chart data retrieved successfully".to_string()
    };

    Ok((
        StatusCode::OK,
        Json(ApiResponse {
            data: chart,
            message,
            success: true,
        }),
    ))
}
