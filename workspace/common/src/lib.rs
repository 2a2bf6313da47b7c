//! Common transport-layer types shared between backend and frontend.
//! These structs mirror the backend handlers' request/response payloads
//! so the frontend can deserialize API responses without duplicating shapes.

mod charts;
mod pollutant;
mod statistics;

pub use charts::{
    BoxplotSummary, ChartDto, ChartKind, ChartSeries, HistogramBin, PieSlice, ScatterPoint,
    YearValue,
};
pub use pollutant::{Pollutant, POLLUTANTS};
pub use statistics::ParameterStatistics;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Lowest year accepted by the prediction form.
pub const MIN_PREDICTION_YEAR: i32 = 2000;
/// Highest year accepted by the prediction form.
pub const MAX_PREDICTION_YEAR: i32 = 2100;
/// Year pre-filled in the prediction form.
pub const DEFAULT_PREDICTION_YEAR: i32 = 2025;

/// Generic API response wrapper used by the backend.
/// Note: The backend has its own definition in lakewatch/src/schemas.rs with the
/// same field names. We mirror it here for the frontend to reuse.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success flag
    pub success: bool,
}

// ===================== Sites =====================

/// A monitoring site as listed by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct SiteDto {
    /// Site identifier exactly as written in the dataset
    pub id: String,
    /// Display name of the lake or river
    pub name: String,
    /// Number of observations recorded for the site
    pub observations: usize,
}

// ===================== Predictions =====================

/// Request body for a pollutant prediction (mirrors backend).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct PredictionRequest {
    pub site_name: String,
    pub year: i32,
}

/// One predicted concentration.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct PollutantValue {
    pub pollutant: Pollutant,
    pub value: f64,
}

/// Predicted pollutant levels for a site and year.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct PredictionDto {
    pub site_name: String,
    pub site_id: String,
    pub year: i32,
    /// One entry per pollutant, in the fixed pollutant order
    pub values: Vec<PollutantValue>,
    /// Non-fatal issues noticed while building the model input
    #[serde(default)]
    pub warnings: Vec<String>,
}
