//! Summary statistics and per-year aggregates of one pollutant at one site.

use common::{Pollutant, YearValue};
use polars::prelude::*;
use tracing::{debug, instrument};

use crate::dataset::{Dataset, SITE_NAME_COLUMN, YEAR_COLUMN};
use crate::error::Result;

/// Descriptive statistics over the non-missing readings.
///
/// Every value except `count` is `None` when there are no readings. The
/// standard deviation uses the sample estimator and needs two readings.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SummaryStatistics {
    pub count: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub std_dev: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Computes count, mean, median, sample std, min and max for a site.
#[instrument(skip(dataset))]
pub fn describe(dataset: &Dataset, site_name: &str, pollutant: Pollutant) -> Result<SummaryStatistics> {
    let p = pollutant.column();
    let df = dataset
        .frame()
        .clone()
        .lazy()
        .filter(col(SITE_NAME_COLUMN).eq(lit(site_name)))
        .select([
            col(p).count().cast(DataType::Float64).alias("count"),
            col(p).mean().alias("mean"),
            col(p).median().alias("median"),
            col(p).std(1).alias("std"),
            col(p).min().alias("min"),
            col(p).max().alias("max"),
        ])
        .collect()?;

    let count = scalar(&df, "count")?.map(|c| c as usize).unwrap_or(0);
    let stats = SummaryStatistics {
        count,
        mean: scalar(&df, "mean")?,
        median: scalar(&df, "median")?,
        std_dev: if count > 1 { scalar(&df, "std")? } else { None },
        min: scalar(&df, "min")?,
        max: scalar(&df, "max")?,
    };

    debug!(?stats, "Described {} at {}", pollutant, site_name);
    Ok(stats)
}

/// Mean reading per calendar year, ascending by year.
///
/// Rows without a year are ignored, as are years with no readings.
#[instrument(skip(dataset))]
pub fn yearly_means(dataset: &Dataset, site_name: &str, pollutant: Pollutant) -> Result<Vec<YearValue>> {
    let p = pollutant.column();
    let df = dataset
        .frame()
        .clone()
        .lazy()
        .filter(
            col(SITE_NAME_COLUMN)
                .eq(lit(site_name))
                .and(col(YEAR_COLUMN).is_not_null()),
        )
        .group_by([col(YEAR_COLUMN)])
        .agg([col(p).mean().alias("value")])
        .sort([YEAR_COLUMN], SortMultipleOptions::default())
        .collect()?;

    let years = df
        .column(YEAR_COLUMN)?
        .as_materialized_series()
        .cast(&DataType::Int32)?;
    let values = df
        .column("value")?
        .as_materialized_series()
        .cast(&DataType::Float64)?;

    let points = years
        .i32()?
        .into_iter()
        .zip(values.f64()?.into_iter())
        .filter_map(|pair| match pair {
            (Some(year), Some(value)) if value.is_finite() => Some(YearValue { year, value }),
            _ => None,
        })
        .collect();

    Ok(points)
}

/// First row of a single-row aggregate, as a finite float.
fn scalar(df: &DataFrame, name: &str) -> Result<Option<f64>> {
    let series = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    Ok(series.f64()?.get(0).filter(|v| v.is_finite()))
}
