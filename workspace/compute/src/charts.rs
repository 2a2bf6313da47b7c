//! Chart data for the dashboard's visualisation panel.
//!
//! Charts are returned as plain series; drawing is left to the client.

use common::{
    BoxplotSummary, ChartDto, ChartKind, ChartSeries, HistogramBin, PieSlice, Pollutant,
    ScatterPoint, YearValue,
};
use tracing::{debug, instrument};

use crate::dataset::Dataset;
use crate::error::{ComputeError, Result};
use crate::stats::yearly_means;

/// Number of histogram bars.
pub const HISTOGRAM_BINS: usize = 30;
/// Number of leading years shown in the pie chart.
pub const PIE_YEARS: usize = 5;
/// Whisker reach in interquartile ranges.
const WHISKER_IQR: f64 = 1.5;

/// Equal-width histogram over the value range.
///
/// A constant sample gets a unit-wide range centred on its value.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let (mut lo, mut hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        });
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    let width = (hi - lo) / bins as f64;
    let mut counts = vec![0usize; bins];
    for value in values {
        let index = ((value - lo) / width) as usize;
        counts[index.min(bins - 1)] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: lo + width * i as f64,
            upper: if i + 1 == bins {
                hi
            } else {
                lo + width * (i + 1) as f64
            },
            count,
        })
        .collect()
}

/// Linearly interpolated quantile of sorted values.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let below = position.floor() as usize;
    let above = position.ceil() as usize;
    sorted[below] + (sorted[above] - sorted[below]) * (position - below as f64)
}

/// Quartiles, whiskers at the furthest readings within 1.5 IQR, and outliers.
pub fn boxplot(values: &[f64]) -> Option<BoxplotSummary> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let q1 = quantile(&sorted, 0.25);
    let median = quantile(&sorted, 0.5);
    let q3 = quantile(&sorted, 0.75);
    let reach = WHISKER_IQR * (q3 - q1);
    let (low_fence, high_fence) = (q1 - reach, q3 + reach);

    let inside: Vec<f64> = sorted
        .iter()
        .copied()
        .filter(|v| *v >= low_fence && *v <= high_fence)
        .collect();
    let lower_whisker = inside.first().copied().unwrap_or(q1);
    let upper_whisker = inside.last().copied().unwrap_or(q3);
    let outliers = sorted
        .iter()
        .copied()
        .filter(|v| *v < low_fence || *v > high_fence)
        .collect();

    Some(BoxplotSummary {
        lower_whisker,
        q1,
        median,
        q3,
        upper_whisker,
        outliers,
    })
}

/// Shares of the first `PIE_YEARS` yearly means.
pub fn pie_slices(means: &[YearValue]) -> Result<Vec<PieSlice>> {
    let leading = &means[..means.len().min(PIE_YEARS)];

    if let Some(negative) = leading.iter().find(|m| m.value < 0.0) {
        return Err(ComputeError::InvalidRequest(format!(
            "pie chart cannot show the negative mean of {}",
            negative.year
        )));
    }

    let total: f64 = leading.iter().map(|m| m.value).sum();
    if total <= 0.0 {
        return Ok(Vec::new());
    }

    Ok(leading
        .iter()
        .map(|m| PieSlice {
            year: m.year,
            value: m.value,
            percent: m.value / total * 100.0,
        })
        .collect())
}

fn title(kind: ChartKind, site_name: &str, pollutant: Pollutant, other: Pollutant) -> String {
    match kind {
        ChartKind::Histogram => format!("Histogram of {} — {}", pollutant, site_name),
        ChartKind::Boxplot => format!("Boxplot of {} — {}", pollutant, site_name),
        ChartKind::LineChart => format!("{} Trend Over Years — {}", pollutant, site_name),
        ChartKind::ScatterPlot => format!("{} vs {} — {}", pollutant, other, site_name),
        ChartKind::PieChart => {
            format!("{} Share (First {} Years) — {}", pollutant, PIE_YEARS, site_name)
        }
    }
}

/// Builds one chart for a site and pollutant.
///
/// `compare_with` is the second axis of the scatter plot and defaults to the
/// first other pollutant; it is ignored by the other chart kinds.
#[instrument(skip(dataset))]
pub fn build_chart(
    dataset: &Dataset,
    site_name: &str,
    pollutant: Pollutant,
    kind: ChartKind,
    compare_with: Option<Pollutant>,
) -> Result<ChartDto> {
    let other = compare_with.unwrap_or_else(|| pollutant.first_other());

    let series = match kind {
        ChartKind::Histogram => ChartSeries::Histogram {
            bins: histogram(&dataset.readings(site_name, pollutant)?, HISTOGRAM_BINS),
        },
        ChartKind::Boxplot => ChartSeries::Boxplot {
            summary: boxplot(&dataset.readings(site_name, pollutant)?),
        },
        ChartKind::LineChart => ChartSeries::LineChart {
            points: yearly_means(dataset, site_name, pollutant)?,
        },
        ChartKind::ScatterPlot => {
            if other == pollutant {
                return Err(ComputeError::InvalidRequest(format!(
                    "cannot plot {} against itself",
                    pollutant
                )));
            }
            let points = dataset
                .paired_readings(site_name, pollutant, other)?
                .into_iter()
                .map(|(x, y)| ScatterPoint { x, y })
                .collect();
            ChartSeries::ScatterPlot {
                x: pollutant,
                y: other,
                points,
            }
        }
        ChartKind::PieChart => ChartSeries::PieChart {
            slices: pie_slices(&yearly_means(dataset, site_name, pollutant)?)?,
        },
    };

    if series.is_empty() {
        debug!("No data to draw for {} {} at {}", kind, pollutant, site_name);
    }

    Ok(ChartDto {
        title: title(kind, site_name, pollutant, other),
        site_name: site_name.to_string(),
        parameter: pollutant,
        series,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DatasetOptions;

    const CSV: &str = "\
id;date;O2;NO3;NO2;SO4;PO4;CL;site_name
1;01.01.2000;1;10;0;0;0;0;Lake A
1;01.01.2001;2;;0;0;0;0;Lake A
1;01.01.2002;3;30;0;0;0;0;Lake A
1;01.01.2003;4;40;0;0;0;0;Lake A
1;01.01.2004;5;50;0;0;0;0;Lake A
1;01.01.2005;5;60;0;0;0;0;Lake A
";

    fn dataset() -> Dataset {
        Dataset::from_csv_bytes(CSV.as_bytes().to_vec(), &DatasetOptions::default()).unwrap()
    }

    #[test]
    fn test_histogram_counts_every_value_once() {
        let bins = histogram(&[0.0, 1.0, 2.0, 3.0, 4.0], 4);
        assert_eq!(bins.len(), 4);
        assert_eq!(
            bins.iter().map(|b| b.count).collect::<Vec<_>>(),
            vec![1, 1, 1, 2]
        );
        assert_eq!(bins[0].lower, 0.0);
        assert_eq!(bins[3].upper, 4.0);
    }

    #[test]
    fn test_histogram_of_constant_sample() {
        let bins = histogram(&[7.0, 7.0], HISTOGRAM_BINS);
        assert_eq!(bins.len(), HISTOGRAM_BINS);
        assert_eq!(bins[0].lower, 6.5);
        assert_eq!(bins[HISTOGRAM_BINS - 1].upper, 7.5);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 2);
        assert!(histogram(&[], HISTOGRAM_BINS).is_empty());
    }

    #[test]
    fn test_boxplot_flags_outliers() {
        let summary = boxplot(&[1.0, 2.0, 3.0, 4.0, 100.0]).unwrap();
        assert_eq!(summary.q1, 2.0);
        assert_eq!(summary.median, 3.0);
        assert_eq!(summary.q3, 4.0);
        assert_eq!(summary.lower_whisker, 1.0);
        assert_eq!(summary.upper_whisker, 4.0);
        assert_eq!(summary.outliers, vec![100.0]);
        assert!(boxplot(&[]).is_none());
    }

    #[test]
    fn test_pie_uses_first_five_years() {
        let means: Vec<YearValue> = (2000..2007)
            .map(|year| YearValue { year, value: 1.0 })
            .collect();
        let slices = pie_slices(&means).unwrap();
        assert_eq!(slices.len(), PIE_YEARS);
        assert_eq!(slices[0].year, 2000);
        assert_eq!(slices[4].year, 2004);
        assert!(slices.iter().all(|s| (s.percent - 20.0).abs() < 1e-9));
    }

    #[test]
    fn test_pie_rejects_negative_means() {
        let means = vec![YearValue { year: 2000, value: -1.0 }];
        assert!(matches!(
            pie_slices(&means),
            Err(ComputeError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_build_line_chart() {
        let chart = build_chart(&dataset(), "Lake A", Pollutant::O2, ChartKind::LineChart, None)
            .unwrap();
        assert_eq!(chart.title, "O2 Trend Over Years — Lake A");
        match chart.series {
            ChartSeries::LineChart { points } => {
                assert_eq!(points.len(), 6);
                assert_eq!(points[0], YearValue { year: 2000, value: 1.0 });
            }
            other => panic!("unexpected series {:?}", other),
        }
    }

    #[test]
    fn test_scatter_defaults_to_first_other_pollutant() {
        let chart = build_chart(&dataset(), "Lake A", Pollutant::O2, ChartKind::ScatterPlot, None)
            .unwrap();
        assert_eq!(chart.title, "O2 vs NO3 — Lake A");
        match chart.series {
            ChartSeries::ScatterPlot { x, y, points } => {
                assert_eq!(x, Pollutant::O2);
                assert_eq!(y, Pollutant::NO3);
                // the 2001 row has no NO3 reading
                assert_eq!(points.len(), 5);
            }
            other => panic!("unexpected series {:?}", other),
        }
    }

    #[test]
    fn test_scatter_against_itself_is_rejected() {
        let err = build_chart(
            &dataset(),
            "Lake A",
            Pollutant::NO3,
            ChartKind::ScatterPlot,
            Some(Pollutant::NO3),
        )
        .unwrap_err();
        assert!(matches!(err, ComputeError::InvalidRequest(_)));
    }

    #[test]
    fn test_pie_chart_title_and_slices() {
        let chart =
            build_chart(&dataset(), "Lake A", Pollutant::NO3, ChartKind::PieChart, None).unwrap();
        assert_eq!(chart.title, "NO3 Share (First 5 Years) — Lake A");
        match chart.series {
            ChartSeries::PieChart { slices } => {
                // 2001 has no NO3 mean, so the first five are 2000, 2002..=2005
                assert_eq!(
                    slices.iter().map(|s| s.year).collect::<Vec<_>>(),
                    vec![2000, 2002, 2003, 2004, 2005]
                );
            }
            other => panic!("unexpected series {:?}", other),
        }
    }
}
