use common::{
    ChartKind, Pollutant, PredictionDto, PredictionRequest, DEFAULT_PREDICTION_YEAR,
    MAX_PREDICTION_YEAR, MIN_PREDICTION_YEAR, POLLUTANTS,
};
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use super::chart::ChartPanel;
use super::prediction::PredictionResult;
use super::site_picker::SitePicker;
use super::stats::Statistics;
use crate::api_client::predictions::create_prediction;
use crate::common::error::ErrorAlert;
use crate::common::loading::Loading;
use crate::common::toast::ToastContext;
use crate::components::layout::layout::Layout;
use crate::hooks::FetchState;

/// Parses the year field, rejecting anything outside the accepted range.
fn parse_year(raw: &str) -> Result<i32, String> {
    let out_of_range = || {
        format!(
            "Year must be between {} and {}",
            MIN_PREDICTION_YEAR, MAX_PREDICTION_YEAR
        )
    };
    let year: i32 = raw.trim().parse().map_err(|_| out_of_range())?;
    if (MIN_PREDICTION_YEAR..=MAX_PREDICTION_YEAR).contains(&year) {
        Ok(year)
    } else {
        Err(out_of_range())
    }
}

#[function_component(Dashboard)]
pub fn dashboard() -> Html {
    let selected_site = use_state(|| None::<String>);
    let year_input = use_state(|| DEFAULT_PREDICTION_YEAR.to_string());
    let prediction = use_state(FetchState::<PredictionDto>::default);
    let parameter = use_state(|| Pollutant::O2);
    let chart_kind = use_state(|| ChartKind::Histogram);
    let toast_ctx = use_context::<ToastContext>();

    let on_site_select = {
        let selected_site = selected_site.clone();
        let prediction = prediction.clone();
        Callback::from(move |site: Option<String>| {
            log::debug!("Selected site: {:?}", site);
            if *selected_site != site {
                prediction.set(FetchState::NotStarted);
                selected_site.set(site);
            }
        })
    };

    let on_year_input = {
        let year_input = year_input.clone();
        Callback::from(move |e: InputEvent| {
            year_input.set(e.target_unchecked_into::<HtmlInputElement>().value());
        })
    };

    let on_predict = {
        let selected_site = selected_site.clone();
        let year_input = year_input.clone();
        let prediction = prediction.clone();
        Callback::from(move |_: MouseEvent| {
            if prediction.is_loading() {
                return;
            }
            let Some(site_name) = (*selected_site).clone() else {
                prediction.set(FetchState::Error("Select a site first".to_string()));
                return;
            };
            let year = match parse_year(&year_input) {
                Ok(year) => year,
                Err(e) => {
                    prediction.set(FetchState::Error(e));
                    return;
                }
            };

            let prediction = prediction.clone();
            let toast_ctx = toast_ctx.clone();
            prediction.set(FetchState::Loading);

            wasm_bindgen_futures::spawn_local(async move {
                log::info!("Predicting pollutant levels for {} in {}", site_name, year);
                let result = create_prediction(PredictionRequest { site_name, year }).await;
                if let (Ok(dto), Some(toast_ctx)) = (&result, &toast_ctx) {
                    if dto.warnings.is_empty() {
                        toast_ctx.success(format!("Predicted levels for {}", dto.site_name));
                    } else {
                        toast_ctx.warning(format!(
                            "Prediction for {} made with {} warning(s)",
                            dto.site_name,
                            dto.warnings.len()
                        ));
                    }
                }
                prediction.set(result.into());
            });
        })
    };

    let on_parameter_change = {
        let parameter = parameter.clone();
        Callback::from(move |e: Event| {
            let value = e.target_unchecked_into::<HtmlSelectElement>().value();
            match value.parse::<Pollutant>() {
                Ok(p) => parameter.set(p),
                Err(e) => log::warn!("{}", e),
            }
        })
    };

    let on_chart_change = {
        let chart_kind = chart_kind.clone();
        Callback::from(move |e: Event| {
            let value = e.target_unchecked_into::<HtmlSelectElement>().value();
            match value.parse::<ChartKind>() {
                Ok(kind) => chart_kind.set(kind),
                Err(e) => log::warn!("{}", e),
            }
        })
    };

    let sidebar = html! {
        <>
            <SitePicker selected={(*selected_site).clone()} on_select={on_site_select} />
            <label class="form-control w-full">
                <div class="label"><span class="label-text">{"Year"}</span></div>
                <input
                    type="number"
                    class="input input-bordered input-sm w-full"
                    min={MIN_PREDICTION_YEAR.to_string()}
                    max={MAX_PREDICTION_YEAR.to_string()}
                    step="1"
                    value={(*year_input).clone()}
                    oninput={on_year_input}
                />
            </label>
            <button
                class="btn btn-primary btn-sm"
                onclick={on_predict}
                disabled={selected_site.is_none() || prediction.is_loading()}
            >
                <i class="fas fa-flask"></i>{" Predict"}
            </button>
            <div class="divider">{"Analysis"}</div>
            <label class="form-control w-full">
                <div class="label"><span class="label-text">{"Parameter"}</span></div>
                <select class="select select-bordered select-sm w-full" onchange={on_parameter_change}>
                    { for POLLUTANTS.iter().map(|p| html! {
                        <option value={p.to_string()} selected={*p == *parameter}>{p.to_string()}</option>
                    }) }
                </select>
            </label>
            <label class="form-control w-full">
                <div class="label"><span class="label-text">{"Chart type"}</span></div>
                <select class="select select-bordered select-sm w-full" onchange={on_chart_change}>
                    { for ChartKind::ALL.iter().map(|k| html! {
                        <option value={k.slug()} selected={*k == *chart_kind}>{k.label()}</option>
                    }) }
                </select>
            </label>
        </>
    };

    let prediction_view = match &*prediction {
        FetchState::NotStarted => html! {},
        FetchState::Loading => html! { <Loading text={Some("Predicting...".to_string())} /> },
        FetchState::Success(dto) => html! { <PredictionResult prediction={dto.clone()} /> },
        FetchState::Error(message) => html! {
            <ErrorAlert title="Prediction failed" message={message.clone()} />
        },
    };

    let analysis = match &*selected_site {
        Some(site_name) => html! {
            <>
                <Statistics site_name={site_name.clone()} parameter={*parameter} />
                <ChartPanel site_name={site_name.clone()} parameter={*parameter} kind={*chart_kind} />
            </>
        },
        None => html! {
            <div class="alert alert-info">
                <i class="fas fa-info-circle"></i>
                <span>{"Search for a lake or river and pick a site to begin."}</span>
            </div>
        },
    };

    html! {
        <Layout title="Water Quality Dashboard" {sidebar}>
            <div class="flex flex-col gap-6">
                { prediction_view }
                { analysis }
            </div>
        </Layout>
    }
}
