use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;
use yew::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = Plotly)]
    fn newPlot(div_id: &str, data: JsValue, layout: JsValue, config: JsValue);
}

/// Serializes a plotly trace, logging instead of failing the render.
pub fn trace_json<T: Serialize + ?Sized>(trace: &T) -> Value {
    serde_json::to_value(trace).unwrap_or_else(|e| {
        log::error!("Failed to serialize plot trace: {}", e);
        Value::Null
    })
}

/// Layout shared by every dashboard plot.
pub fn base_layout(title: &str, x_title: &str, y_title: &str) -> Value {
    serde_json::json!({
        "title": {"text": title},
        "margin": {"t": 50, "r": 20, "l": 60, "b": 50},
        "paper_bgcolor": "rgba(0,0,0,0)",
        "plot_bgcolor": "rgba(0,0,0,0)",
        "xaxis": {"title": {"text": x_title}, "showgrid": false},
        "yaxis": {"title": {"text": y_title}, "showgrid": true, "gridcolor": "#eee"},
        "height": 400,
    })
}

fn to_js(value: &Value) -> Option<JsValue> {
    let json = serde_json::to_string(value).ok()?;
    js_sys::JSON::parse(&json).ok()
}

#[derive(Properties, PartialEq)]
pub struct PlotProps {
    pub id: AttrValue,
    /// Array of plotly traces
    pub data: Value,
    pub layout: Value,
}

/// Draws `data` into its own div with `Plotly.newPlot` whenever the props change.
#[function_component(Plot)]
pub fn plot(props: &PlotProps) -> Html {
    let container_ref = use_node_ref();

    use_effect_with(
        (container_ref.clone(), props.id.clone(), props.data.clone(), props.layout.clone()),
        move |(container_ref, id, data, layout)| {
            if let Some(element) = container_ref.cast::<HtmlElement>() {
                element.set_id(id);
                let config = serde_json::json!({"responsive": true, "displayModeBar": false});
                match (to_js(data), to_js(layout), to_js(&config)) {
                    (Some(data), Some(layout), Some(config)) => newPlot(id, data, layout, config),
                    _ => log::error!("Could not convert plot {} to JS values", id),
                }
            }
            || ()
        },
    );

    html! {
        <div ref={container_ref} class="w-full" style="min-height: 400px;"></div>
    }
}
