use common::{ChartDto, ChartKind, ChartSeries, Pollutant, POLLUTANTS};
use plotly::common::{Marker, Mode};
use plotly::{Bar, Scatter};
use serde_json::{json, Value};
use web_sys::HtmlSelectElement;
use yew::prelude::*;

use super::plot::{base_layout, trace_json, Plot};
use crate::api_client::charts::get_chart;
use crate::common::fetch_hook::use_fetch_with_deps;
use crate::common::fetch_render::FetchRender;

const BAR_COLOR: &str = "rgb(14, 165, 233)";
const OUTLIER_COLOR: &str = "rgb(239, 68, 68)";

/// Plotly traces and layout for a chart returned by the backend.
fn figure(chart: &ChartDto) -> (Value, Value) {
    let parameter = chart.parameter.to_string();

    match &chart.series {
        ChartSeries::Histogram { bins } => {
            let centres: Vec<f64> = bins.iter().map(|b| (b.lower + b.upper) / 2.0).collect();
            let counts: Vec<usize> = bins.iter().map(|b| b.count).collect();
            let trace = Bar::new(centres, counts)
                .name(&parameter)
                .marker(Marker::new().color(BAR_COLOR));
            let mut layout = base_layout(&chart.title, &parameter, "Count");
            layout["bargap"] = json!(0.0);
            (json!([trace_json(&trace)]), layout)
        }
        ChartSeries::Boxplot { summary } => {
            let mut traces = Vec::new();
            if let Some(s) = summary {
                traces.push(json!({
                    "type": "box",
                    "name": parameter,
                    "x": [parameter],
                    "q1": [s.q1],
                    "median": [s.median],
                    "q3": [s.q3],
                    "lowerfence": [s.lower_whisker],
                    "upperfence": [s.upper_whisker],
                    "marker": {"color": BAR_COLOR},
                }));
                if !s.outliers.is_empty() {
                    let trace = Scatter::new(vec![parameter.clone(); s.outliers.len()], s.outliers.clone())
                        .mode(Mode::Markers)
                        .name("Outliers")
                        .marker(Marker::new().color(OUTLIER_COLOR));
                    traces.push(trace_json(&trace));
                }
            }
            (Value::Array(traces), base_layout(&chart.title, "", &parameter))
        }
        ChartSeries::LineChart { points } => {
            let years: Vec<i32> = points.iter().map(|p| p.year).collect();
            let means: Vec<f64> = points.iter().map(|p| p.value).collect();
            let trace = Scatter::new(years, means)
                .mode(Mode::LinesMarkers)
                .name(&format!("Mean {}", parameter));
            (
                json!([trace_json(&trace)]),
                base_layout(&chart.title, "Year", &format!("Mean {}", parameter)),
            )
        }
        ChartSeries::ScatterPlot { x, y, points } => {
            let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
            let ys: Vec<f64> = points.iter().map(|p| p.y).collect();
            let trace = Scatter::new(xs, ys)
                .mode(Mode::Markers)
                .name(&format!("{} vs {}", x, y));
            (
                json!([trace_json(&trace)]),
                base_layout(&chart.title, &x.to_string(), &y.to_string()),
            )
        }
        ChartSeries::PieChart { slices } => {
            let labels: Vec<String> = slices.iter().map(|s| s.year.to_string()).collect();
            let values: Vec<f64> = slices.iter().map(|s| s.value).collect();
            let trace = json!({
                "type": "pie",
                "labels": labels,
                "values": values,
                "textinfo": "label+percent",
            });
            (json!([trace]), base_layout(&chart.title, "", ""))
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct ChartPanelProps {
    pub site_name: String,
    pub parameter: Pollutant,
    pub kind: ChartKind,
}

#[function_component(ChartPanel)]
pub fn chart_panel(props: &ChartPanelProps) -> Html {
    let compare_with = use_state(|| None::<Pollutant>);
    // A stale choice equal to the plotted pollutant falls back to the default.
    let compare = (*compare_with).filter(|other| *other != props.parameter);
    let compare = (props.kind == ChartKind::ScatterPlot).then_some(compare).flatten();

    let (chart_state, refetch) = use_fetch_with_deps(
        (props.site_name.clone(), props.parameter, props.kind, compare),
        |(site_name, parameter, kind, compare): (String, Pollutant, ChartKind, Option<Pollutant>)| async move {
            get_chart(&site_name, parameter, kind, compare).await
        },
    );

    let on_compare_change = {
        let compare_with = compare_with.clone();
        Callback::from(move |e: Event| {
            let value = e.target_unchecked_into::<HtmlSelectElement>().value();
            compare_with.set(value.parse::<Pollutant>().ok());
        })
    };

    let compare_selector = if props.kind == ChartKind::ScatterPlot {
        let shown = compare.unwrap_or_else(|| props.parameter.first_other());
        html! {
            <label class="form-control w-full max-w-xs">
                <div class="label"><span class="label-text">{"Compare with"}</span></div>
                <select class="select select-bordered select-sm" onchange={on_compare_change}>
                    { for POLLUTANTS.iter().filter(|p| **p != props.parameter).map(|p| html! {
                        <option value={p.to_string()} selected={*p == shown}>{p.to_string()}</option>
                    }) }
                </select>
            </label>
        }
    } else {
        html! {}
    };

    let render = Callback::from(|chart: ChartDto| {
        if chart.series.is_empty() {
            return html! {
                <div class="alert alert-info">
                    <i class="fas fa-info-circle"></i>
                    <span>{format!("No data to plot for {} at {}", chart.parameter, chart.site_name)}</span>
                </div>
            };
        }
        let (data, layout) = figure(&chart);
        html! { <Plot id="lakewatch-chart" {data} {layout} /> }
    });

    html! {
        <div class="card bg-base-100 shadow">
            <div class="card-body">
                <h2 class="card-title">{format!("{} of {}", props.kind, props.parameter)}</h2>
                { compare_selector }
                <FetchRender<ChartDto>
                    state={(*chart_state).clone()}
                    {render}
                    error_title="Could not draw chart"
                    on_retry={Some(refetch)}
                />
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{HistogramBin, PieSlice};

    fn chart(series: ChartSeries) -> ChartDto {
        ChartDto {
            title: "Test".to_string(),
            site_name: "Lake A".to_string(),
            parameter: Pollutant::O2,
            series,
        }
    }

    #[test]
    fn test_histogram_bars_sit_on_bin_centres() {
        let (data, layout) = figure(&chart(ChartSeries::Histogram {
            bins: vec![
                HistogramBin { lower: 0.0, upper: 2.0, count: 3 },
                HistogramBin { lower: 2.0, upper: 4.0, count: 1 },
            ],
        }));
        assert_eq!(data[0]["type"], "bar");
        assert_eq!(data[0]["x"], json!([1.0, 3.0]));
        assert_eq!(data[0]["y"], json!([3, 1]));
        assert_eq!(layout["bargap"], json!(0.0));
    }

    #[test]
    fn test_pie_labels_are_years() {
        let (data, _) = figure(&chart(ChartSeries::PieChart {
            slices: vec![PieSlice { year: 2001, value: 2.0, percent: 100.0 }],
        }));
        assert_eq!(data[0]["labels"], json!(["2001"]));
        assert_eq!(data[0]["values"], json!([2.0]));
    }

    #[test]
    fn test_empty_boxplot_has_no_traces() {
        let (data, _) = figure(&chart(ChartSeries::Boxplot { summary: None }));
        assert_eq!(data, json!([]));
    }
}
