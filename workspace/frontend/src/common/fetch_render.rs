use yew::prelude::*;
use crate::hooks::FetchState;
use super::loading::LoadingSpinner;
use super::error::ErrorAlert;

#[derive(Properties)]
pub struct FetchRenderProps<T: Clone + PartialEq + 'static> {
    pub state: FetchState<T>,
    pub render: Callback<T, Html>,
    /// Heading of the error alert.
    #[prop_or(AttrValue::Static("Could not load data"))]
    pub error_title: AttrValue,
    #[prop_or_default]
    pub on_retry: Option<Callback<()>>,
}

impl<T: Clone + PartialEq + 'static> PartialEq for FetchRenderProps<T> {
    fn eq(&self, other: &Self) -> bool {
        self.state == other.state && self.error_title == other.error_title
    }
}

/// Spinner while loading, an error alert on failure, `render` on success.
#[function_component(FetchRender)]
pub fn fetch_render<T>(props: &FetchRenderProps<T>) -> Html
where
    T: Clone + PartialEq + 'static,
{
    match &props.state {
        FetchState::NotStarted => html! {},
        FetchState::Loading => html! { <LoadingSpinner /> },
        FetchState::Error(err) => html! {
            <ErrorAlert
                title={props.error_title.clone()}
                message={err.clone()}
                on_retry={props.on_retry.clone()}
            />
        },
        FetchState::Success(data) => props.render.emit(data.clone()),
    }
}
