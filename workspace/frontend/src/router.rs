use yew::prelude::*;
use yew_router::prelude::*;

use crate::components::dashboard::Dashboard;
use crate::components::layout::layout::Layout;

#[derive(Debug, Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[not_found]
    #[at("/404")]
    NotFound,
}

pub fn switch(route: Route) -> Html {
    log::debug!("Routing to: {:?}", route);
    match route {
        Route::Home => html! { <Dashboard /> },
        Route::NotFound => {
            log::warn!("404 - Route not found");
            html! {
                <Layout title="404">
                    <h1 class="text-2xl">{"404 Not Found"}</h1>
                    <Link<Route> to={Route::Home} classes="link link-primary">{"Back to the dashboard"}</Link<Route>>
                </Layout>
            }
        }
    }
}
