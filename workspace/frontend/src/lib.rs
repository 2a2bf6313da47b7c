use yew::prelude::*;
use yew_router::prelude::*;

mod components;
pub mod api_client;
pub mod common;
pub mod hooks;
pub mod router;
pub mod settings;

use crate::common::toast::ToastProvider;
use router::{switch, Route};

#[function_component(App)]
pub fn app() -> Html {
    html! {
        <ToastProvider>
            <BrowserRouter>
                <Switch<Route> render={switch} />
            </BrowserRouter>
        </ToastProvider>
    }
}

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn run_app() {
    settings::init_settings();

    let settings = settings::get_settings();
    wasm_logger::init(wasm_logger::Config::new(settings.log_level));

    log::info!("=== Lakewatch Dashboard Starting ===");
    log::debug!("Application settings: {:?}", settings);
    log::debug!("API base URL: {}", settings.api_base_url());

    yew::Renderer::<App>::new().render();
    log::info!("Dashboard mounted");
}
