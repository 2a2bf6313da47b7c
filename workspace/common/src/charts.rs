use crate::Pollutant;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Chart types offered by the dashboard sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Histogram,
    Boxplot,
    LineChart,
    ScatterPlot,
    PieChart,
}

impl ChartKind {
    pub const ALL: [ChartKind; 5] = [
        ChartKind::Histogram,
        ChartKind::Boxplot,
        ChartKind::LineChart,
        ChartKind::ScatterPlot,
        ChartKind::PieChart,
    ];

    /// Human readable label, as shown in the chart selector.
    pub fn label(&self) -> &'static str {
        match self {
            ChartKind::Histogram => "Histogram",
            ChartKind::Boxplot => "Boxplot",
            ChartKind::LineChart => "Line Chart",
            ChartKind::ScatterPlot => "Scatter Plot",
            ChartKind::PieChart => "Pie Chart",
        }
    }

    /// Wire name used in query strings.
    pub fn slug(&self) -> &'static str {
        match self {
            ChartKind::Histogram => "histogram",
            ChartKind::Boxplot => "boxplot",
            ChartKind::LineChart => "line_chart",
            ChartKind::ScatterPlot => "scatter_plot",
            ChartKind::PieChart => "pie_chart",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ChartKind {
    type Err = String;

    /// Accepts either the wire name (`line_chart`) or the label (`Line Chart`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        ChartKind::ALL
            .iter()
            .copied()
            .find(|k| k.slug() == needle || k.label().eq_ignore_ascii_case(needle))
            .ok_or_else(|| format!("Unknown chart type: {}", s))
    }
}

/// One histogram bar. `upper` is exclusive except for the last bin.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Five-number summary plus outliers, as drawn by a box plot.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct BoxplotSummary {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

/// Mean reading of one year.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct YearValue {
    pub year: i32,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
}

/// Share of one year in a pie chart.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct PieSlice {
    pub year: i32,
    pub value: f64,
    /// Share of the total in percent
    pub percent: f64,
}

/// Data behind a chart, tagged by chart kind.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartSeries {
    Histogram {
        bins: Vec<HistogramBin>,
    },
    Boxplot {
        summary: Option<BoxplotSummary>,
    },
    LineChart {
        points: Vec<YearValue>,
    },
    ScatterPlot {
        x: Pollutant,
        y: Pollutant,
        points: Vec<ScatterPoint>,
    },
    PieChart {
        slices: Vec<PieSlice>,
    },
}

impl ChartSeries {
    pub fn kind(&self) -> ChartKind {
        match self {
            ChartSeries::Histogram { .. } => ChartKind::Histogram,
            ChartSeries::Boxplot { .. } => ChartKind::Boxplot,
            ChartSeries::LineChart { .. } => ChartKind::LineChart,
            ChartSeries::ScatterPlot { .. } => ChartKind::ScatterPlot,
            ChartSeries::PieChart { .. } => ChartKind::PieChart,
        }
    }

    /// True when there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        match self {
            ChartSeries::Histogram { bins } => bins.is_empty(),
            ChartSeries::Boxplot { summary } => summary.is_none(),
            ChartSeries::LineChart { points } => points.is_empty(),
            ChartSeries::ScatterPlot { points, .. } => points.is_empty(),
            ChartSeries::PieChart { slices } => slices.is_empty(),
        }
    }
}

/// A titled chart for one site and pollutant.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ChartDto {
    pub title: String,
    pub site_name: String,
    pub parameter: Pollutant,
    pub series: ChartSeries,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_kind_parses_slug_and_label() {
        assert_eq!("line_chart".parse::<ChartKind>().unwrap(), ChartKind::LineChart);
        assert_eq!("Scatter Plot".parse::<ChartKind>().unwrap(), ChartKind::ScatterPlot);
        assert_eq!("pie chart".parse::<ChartKind>().unwrap(), ChartKind::PieChart);
        assert!("Heatmap".parse::<ChartKind>().is_err());
    }

    #[test]
    fn test_series_is_tagged_by_kind() {
        let series = ChartSeries::LineChart {
            points: vec![YearValue { year: 2001, value: 4.5 }],
        };
        let json = serde_json::to_value(&series).unwrap();
        assert_eq!(json["kind"], "line_chart");
        assert_eq!(json["points"][0]["year"], 2001);
        assert_eq!(series.kind(), ChartKind::LineChart);
        assert!(!series.is_empty());
    }
}
