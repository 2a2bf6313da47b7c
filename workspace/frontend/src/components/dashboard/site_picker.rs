use common::SiteDto;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::api_client::sites::{lookup_site, search_sites};
use crate::common::fetch_hook::use_fetch_with_deps;
use crate::hooks::FetchState;

#[derive(Properties, PartialEq)]
pub struct SitePickerProps {
    pub selected: Option<String>,
    pub on_select: Callback<Option<String>>,
}

/// Search box narrowing the site selector.
///
/// When a search no longer matches the selected site, the first match is
/// selected instead (or nothing, when there is no match).
#[function_component(SitePicker)]
pub fn site_picker(props: &SitePickerProps) -> Html {
    let search = use_state(String::new);
    let (names_state, _) = use_fetch_with_deps((*search).clone(), |search: String| async move {
        search_sites(&search).await
    });

    {
        let selected = props.selected.clone();
        let on_select = props.on_select.clone();
        use_effect_with((*names_state).clone(), move |names_state| {
            if let Some(names) = names_state.data() {
                let still_listed = selected.as_ref().is_some_and(|s| names.contains(s));
                if !still_listed {
                    on_select.emit(names.first().cloned());
                }
            }
            || ()
        });
    }

    let on_search = {
        let search = search.clone();
        Callback::from(move |e: InputEvent| {
            search.set(e.target_unchecked_into::<HtmlInputElement>().value());
        })
    };

    let on_change = {
        let on_select = props.on_select.clone();
        Callback::from(move |e: Event| {
            let value = e.target_unchecked_into::<HtmlSelectElement>().value();
            on_select.emit((!value.is_empty()).then_some(value));
        })
    };

    let options = match &*names_state {
        FetchState::Success(names) if names.is_empty() => html! {
            <option value="" selected={true}>{"No sites match the search"}</option>
        },
        FetchState::Success(names) => html! {
            { for names.iter().map(|name| html! {
                <option value={name.clone()} selected={props.selected.as_ref() == Some(name)}>{name.clone()}</option>
            }) }
        },
        _ => html! { <option value="" selected={true}>{"Loading sites..."}</option> },
    };

    html! {
        <div class="flex flex-col gap-2">
            <label class="form-control w-full">
                <div class="label"><span class="label-text">{"Search lake or river"}</span></div>
                <input
                    type="search"
                    class="input input-bordered input-sm w-full"
                    placeholder="e.g. Bistrica"
                    value={(*search).clone()}
                    oninput={on_search}
                />
            </label>
            <label class="form-control w-full">
                <div class="label"><span class="label-text">{"Site"}</span></div>
                <select
                    class="select select-bordered select-sm w-full"
                    onchange={on_change}
                    disabled={names_state.is_loading()}
                >
                    { options }
                </select>
            </label>
            if let Some(error) = names_state.error() {
                <div class="text-error text-sm">{error.clone()}</div>
            }
            if let Some(name) = props.selected.clone() {
                <SiteDetails {name} />
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct SiteDetailsProps {
    name: String,
}

/// Station id and observation count of the selected site.
#[function_component(SiteDetails)]
fn site_details(props: &SiteDetailsProps) -> Html {
    let (site_state, _) = use_fetch_with_deps(props.name.clone(), |name: String| async move {
        lookup_site(&name).await
    });

    match site_state.data() {
        Some(SiteDto { id, observations, .. }) => html! {
            <div class="text-sm opacity-70">
                {format!("Station ID {} · {} observations", id, observations)}
            </div>
        },
        None => html! {},
    }
}
