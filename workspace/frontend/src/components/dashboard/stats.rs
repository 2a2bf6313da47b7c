use common::{ParameterStatistics, Pollutant};
use yew::prelude::*;

use crate::api_client::statistics::get_statistics;
use crate::common::fetch_hook::use_fetch_with_deps;
use crate::common::fetch_render::FetchRender;

fn figure(value: Option<f64>) -> String {
    value.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "n/a".to_string())
}

#[derive(Properties, PartialEq)]
pub struct StatisticsProps {
    pub site_name: String,
    pub parameter: Pollutant,
}

/// Count, mean, median, standard deviation and range of one pollutant.
#[function_component(Statistics)]
pub fn statistics(props: &StatisticsProps) -> Html {
    let (stats_state, refetch) = use_fetch_with_deps(
        (props.site_name.clone(), props.parameter),
        |(site_name, parameter): (String, Pollutant)| async move {
            get_statistics(&site_name, parameter).await
        },
    );

    let render = Callback::from(|stats: ParameterStatistics| {
        if stats.count == 0 {
            return html! {
                <div class="alert alert-info">
                    <i class="fas fa-info-circle"></i>
                    <span>{format!("No {} readings recorded for {}", stats.parameter, stats.site_name)}</span>
                </div>
            };
        }

        let tiles = [
            ("Readings", stats.count.to_string()),
            ("Mean", figure(stats.mean)),
            ("Median", figure(stats.median)),
            ("Std Dev", figure(stats.std_dev)),
            ("Min", figure(stats.min)),
            ("Max", figure(stats.max)),
        ];

        html! {
            <div class="stats stats-vertical lg:stats-horizontal shadow bg-base-100 w-full">
                { for tiles.into_iter().map(|(title, value)| html! {
                    <div class="stat">
                        <div class="stat-title">{title}</div>
                        <div class="stat-value text-2xl">{value}</div>
                    </div>
                }) }
            </div>
        }
    });

    html! {
        <div class="flex flex-col gap-2">
            <h2 class="text-lg font-semibold">{format!("{} statistics", props.parameter)}</h2>
            <FetchRender<ParameterStatistics>
                state={(*stats_state).clone()}
                {render}
                error_title="Could not load statistics"
                on_retry={Some(refetch)}
            />
        </div>
    }
}
