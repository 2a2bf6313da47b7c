use std::future::Future;
use std::rc::Rc;

use yew::prelude::*;

use crate::common::toast::ToastContext;
use crate::hooks::FetchState;

/// Runs `fetch_fn(deps)` on mount and again whenever `deps` changes.
///
/// Errors are shown as toasts as well as stored in the returned state. The
/// callback refetches with the current `deps`.
#[hook]
pub fn use_fetch_with_deps<D, T, F, Fut>(deps: D, fetch_fn: F) -> (UseStateHandle<FetchState<T>>, Callback<()>)
where
    D: Clone + PartialEq + 'static,
    T: 'static,
    F: Fn(D) -> Fut + 'static,
    Fut: Future<Output = Result<T, String>> + 'static,
{
    let fetch_state = use_state(|| FetchState::Loading);
    let toast_ctx = use_context::<ToastContext>();
    let fetch_fn = use_state(|| Rc::new(fetch_fn));

    let refetch = {
        let fetch_state = fetch_state.clone();
        let fetch_fn = fetch_fn.clone();

        use_callback(deps.clone(), move |_, deps: &D| {
            let fetch_state = fetch_state.clone();
            let toast_ctx = toast_ctx.clone();
            let fut = (*fetch_fn)(deps.clone());

            fetch_state.set(FetchState::Loading);

            wasm_bindgen_futures::spawn_local(async move {
                match fut.await {
                    Ok(data) => fetch_state.set(FetchState::Success(data)),
                    Err(err) => {
                        if let Some(toast_ctx) = &toast_ctx {
                            toast_ctx.error(err.clone());
                        }
                        fetch_state.set(FetchState::Error(err));
                    }
                }
            });
        })
    };

    {
        let refetch = refetch.clone();
        use_effect_with(deps, move |_| {
            refetch.emit(());
            || ()
        });
    }

    (fetch_state, refetch)
}
