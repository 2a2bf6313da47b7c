use yew::prelude::*;

/// True for failures a second attempt can fix: the request never reached the
/// backend, or the backend answered with a 5xx and no error body.
pub fn is_transient(message: &str) -> bool {
    message.starts_with("Request failed") || message.starts_with("HTTP error: 5")
}

#[derive(Properties, PartialEq)]
pub struct ErrorAlertProps {
    /// What the panel was trying to do, e.g. "Could not load statistics".
    pub title: AttrValue,
    pub message: String,
    #[prop_or_default]
    pub on_retry: Option<Callback<()>>,
}

/// Inline error for a dashboard panel. The retry button only appears for
/// transient failures.
#[function_component(ErrorAlert)]
pub fn error_alert(props: &ErrorAlertProps) -> Html {
    log::warn!("{}: {}", props.title, props.message);

    let retry = props
        .on_retry
        .clone()
        .filter(|_| is_transient(&props.message))
        .map(|on_retry| {
            html! {
                <button class="btn btn-sm btn-ghost" onclick={Callback::from(move |_| on_retry.emit(()))}>
                    <i class="fas fa-redo"></i>{" Retry"}
                </button>
            }
        });

    html! {
        <div role="alert" class="alert alert-error">
            <i class="fas fa-exclamation-circle"></i>
            <div>
                <h3 class="font-semibold">{props.title.clone()}</h3>
                <div class="text-sm">{props.message.clone()}</div>
            </div>
            { for retry }
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_and_server_failures_are_transient() {
        assert!(is_transient("Request failed: TypeError: Failed to fetch"));
        assert!(is_transient("HTTP error: 503"));
    }

    #[test]
    fn test_backend_rejections_are_not_transient() {
        assert!(!is_transient("Unknown site 'Nowhere'"));
        assert!(!is_transient("HTTP error: 404"));
        assert!(!is_transient("Year must be between 2000 and 2100"));
    }
}
