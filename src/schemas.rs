use std::sync::Arc;

use common::{
    BoxplotSummary, ChartDto, ChartKind, ChartSeries, HistogramBin, ParameterStatistics, PieSlice,
    Pollutant, PollutantValue, PredictionDto, ScatterPoint, SiteDto, YearValue,
};
use compute::AppContext;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, OpenApi, ToSchema};
use validator::Validate;

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Dataset, model and schema, loaded once at startup
    pub ctx: Arc<AppContext>,
}

/// Query parameters for the site search endpoint
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
pub struct SiteSearchQuery {
    /// Case-insensitive part of a site name; empty lists every site
    #[validate(length(max = 200))]
    pub search: Option<String>,
}

/// Query parameters for the site lookup endpoint
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
pub struct SiteLookupQuery {
    /// Exact site display name
    #[validate(length(min = 1))]
    pub name: String,
}

/// Query parameters for the statistics endpoint
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
pub struct StatisticsQuery {
    /// Exact site display name
    #[validate(length(min = 1))]
    pub site_name: String,
    /// Pollutant to describe (default: O2)
    pub parameter: Option<Pollutant>,
}

/// Query parameters for the charts endpoint
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
pub struct ChartQuery {
    /// Exact site display name
    #[validate(length(min = 1))]
    pub site_name: String,
    /// Pollutant to plot (default: O2)
    pub parameter: Option<Pollutant>,
    /// Chart type (default: histogram)
    pub chart: Option<ChartKind>,
    /// Second pollutant of the scatter plot
    pub compare_with: Option<Pollutant>,
}

/// API response wrapper
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Number of loaded observations
    pub observations: usize,
    /// Number of known sites
    pub sites: usize,
    /// Observations kept without a year because their date did not parse
    pub undated_rows: usize,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::sites::search_sites,
        crate::handlers::sites::lookup_site,
        crate::handlers::predictions::create_prediction,
        crate::handlers::statistics::get_statistics,
        crate::handlers::charts::get_chart,
    ),
    components(
        schemas(
            ApiResponse<Vec<String>>,
            ApiResponse<SiteDto>,
            ApiResponse<PredictionDto>,
            ApiResponse<ParameterStatistics>,
            ApiResponse<ChartDto>,
            ErrorResponse,
            HealthResponse,
            SiteSearchQuery,
            SiteLookupQuery,
            StatisticsQuery,
            ChartQuery,
            SiteDto,
            crate::handlers::predictions::CreatePredictionRequest,
            PredictionDto,
            PollutantValue,
            Pollutant,
            ParameterStatistics,
            ChartKind,
            ChartDto,
            ChartSeries,
            HistogramBin,
            BoxplotSummary,
            YearValue,
            ScatterPoint,
            PieSlice,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "sites", description = "Monitoring site search and lookup"),
        (name = "predictions", description = "Pollutant level predictions"),
        (name = "statistics", description = "Descriptive statistics of observed readings"),
        (name = "charts", description = "Chart data for observed readings"),
    ),
    info(
        title = "Lakewatch API",
        description = "Water quality dashboard API - pollutant predictions and observation analytics for lakes and rivers",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
