use common::PredictionDto;
use plotly::common::Marker;
use plotly::Bar;
use serde_json::json;
use yew::prelude::*;

use super::plot::{base_layout, trace_json, Plot};

#[derive(Properties, PartialEq)]
pub struct PredictionResultProps {
    pub prediction: PredictionDto,
}

/// Predicted levels as a table next to a bar chart, with any model input warnings.
#[function_component(PredictionResult)]
pub fn prediction_result(props: &PredictionResultProps) -> Html {
    let prediction = &props.prediction;

    let names: Vec<String> = prediction.values.iter().map(|v| v.pollutant.to_string()).collect();
    let levels: Vec<f64> = prediction.values.iter().map(|v| v.value).collect();
    let trace = Bar::new(names, levels)
        .name("Predicted level")
        .marker(Marker::new().color("rgb(34, 197, 94)"));
    let data = json!([trace_json(&trace)]);
    let layout = base_layout(
        &format!("Predicted Levels for {} in {}", prediction.site_name, prediction.year),
        "Pollutant",
        "Level",
    );

    html! {
        <div class="card bg-base-100 shadow">
            <div class="card-body">
                <h2 class="card-title">
                    {format!("Prediction for {} ({})", prediction.site_name, prediction.year)}
                    <span class="badge badge-ghost">{format!("Station {}", prediction.site_id)}</span>
                </h2>
                { for prediction.warnings.iter().map(|warning| html! {
                    <div class="alert alert-warning">
                        <i class="fas fa-exclamation-triangle"></i>
                        <span>{warning.clone()}</span>
                    </div>
                }) }
                <div class="grid grid-cols-1 lg:grid-cols-3 gap-6">
                    <table class="table table-zebra">
                        <thead>
                            <tr><th>{"Pollutant"}</th><th class="text-right">{"Predicted level"}</th></tr>
                        </thead>
                        <tbody>
                            { for prediction.values.iter().map(|v| html! {
                                <tr>
                                    <td>{v.pollutant.to_string()}</td>
                                    <td class="text-right font-mono">{format!("{:.2}", v.value)}</td>
                                </tr>
                            }) }
                        </tbody>
                    </table>
                    <div class="lg:col-span-2">
                        <Plot id="prediction-chart" {data} {layout} />
                    </div>
                </div>
            </div>
        </div>
    }
}
