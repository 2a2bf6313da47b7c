use common::{ParameterStatistics, Pollutant, PollutantValue, PredictionDto, SiteDto};
use compute::{Prediction, Site, SummaryStatistics};

/// Rounds a presented figure to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn site_to_dto(site: Site) -> SiteDto {
    SiteDto {
        id: site.id.to_string(),
        name: site.name,
        observations: site.observations,
    }
}

pub fn prediction_to_dto(prediction: Prediction) -> PredictionDto {
    PredictionDto {
        site_name: prediction.site_name,
        site_id: prediction.site_id.to_string(),
        year: prediction.year,
        values: prediction
            .values
            .into_iter()
            .map(|(pollutant, value)| PollutantValue { pollutant, value })
            .collect(),
        warnings: prediction.warnings,
    }
}

/// Mean, median and standard deviation are rounded; extremes are kept as read.
pub fn statistics_to_dto(
    site_name: &str,
    parameter: Pollutant,
    stats: SummaryStatistics,
) -> ParameterStatistics {
    ParameterStatistics {
        site_name: site_name.to_string(),
        parameter,
        count: stats.count,
        mean: stats.mean.map(round2),
        median: stats.median.map(round2),
        std_dev: stats.std_dev.map(round2),
        min: stats.min,
        max: stats.max,
    }
}
