use crate::Pollutant;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Descriptive statistics of one pollutant at one site.
///
/// Every figure is `None` when the site has no reading for the pollutant.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ParameterStatistics {
    pub site_name: String,
    pub parameter: Pollutant,
    /// Number of non-missing readings
    pub count: usize,
    /// Mean, rounded to two decimals
    pub mean: Option<f64>,
    /// Median, rounded to two decimals
    pub median: Option<f64>,
    /// Sample standard deviation, rounded to two decimals
    pub std_dev: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}
