//! Short-lived notices stacked in the top corner of the dashboard.

use std::rc::Rc;

use yew::prelude::*;

use crate::settings;

/// Oldest notices are dropped beyond this many.
const MAX_TOASTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Warning,
    Error,
}

impl Severity {
    fn alert_class(self) -> &'static str {
        match self {
            Severity::Success => "alert-success",
            Severity::Warning => "alert-warning",
            Severity::Error => "alert-error",
        }
    }

    fn icon(self) -> &'static str {
        match self {
            Severity::Success => "fas fa-check-circle",
            Severity::Warning => "fas fa-exclamation-triangle",
            Severity::Error => "fas fa-exclamation-circle",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: usize,
    pub severity: Severity,
    pub message: String,
}

pub enum ToastAction {
    Push(Toast),
    Dismiss(usize),
}

/// Toasts on screen, newest last.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ToastQueue {
    pub toasts: Vec<Toast>,
}

impl Reducible for ToastQueue {
    type Action = ToastAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut toasts = self.toasts.clone();
        match action {
            ToastAction::Push(toast) => {
                // An exact repeat of the newest toast is dropped.
                if toasts
                    .last()
                    .is_some_and(|last| last.severity == toast.severity && last.message == toast.message)
                {
                    return self;
                }
                toasts.push(toast);
                if toasts.len() > MAX_TOASTS {
                    toasts.drain(..toasts.len() - MAX_TOASTS);
                }
            }
            ToastAction::Dismiss(id) => toasts.retain(|t| t.id != id),
        }
        Rc::new(Self { toasts })
    }
}

/// Handle for raising notices from any component under `ToastProvider`.
#[derive(Clone, PartialEq)]
pub struct ToastContext {
    notify: Callback<(Severity, String)>,
}

impl ToastContext {
    pub fn notify(&self, severity: Severity, message: impl Into<String>) {
        self.notify.emit((severity, message.into()));
    }

    pub fn success(&self, message: impl Into<String>) {
        self.notify(Severity::Success, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.notify(Severity::Warning, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.notify(Severity::Error, message);
    }
}

#[derive(Properties, PartialEq)]
pub struct ToastProviderProps {
    pub children: Children,
}

#[function_component(ToastProvider)]
pub fn toast_provider(props: &ToastProviderProps) -> Html {
    let queue = use_reducer(ToastQueue::default);
    let next_id = use_mut_ref(|| 0usize);

    let context = {
        let dispatcher = queue.dispatcher();
        use_memo((), move |_| {
            let notify = Callback::from(move |(severity, message): (Severity, String)| {
                let id = {
                    let mut next = next_id.borrow_mut();
                    *next += 1;
                    *next - 1
                };
                log::debug!("Toast {} ({:?}): {}", id, severity, message);
                dispatcher.dispatch(ToastAction::Push(Toast { id, severity, message }));

                let dispatcher = dispatcher.clone();
                let duration = settings::get_settings().toast_duration_ms;
                gloo_timers::callback::Timeout::new(duration, move || {
                    dispatcher.dispatch(ToastAction::Dismiss(id));
                })
                .forget();
            });
            ToastContext { notify }
        })
    };

    html! {
        <ContextProvider<ToastContext> context={(*context).clone()}>
            { props.children.clone() }
            <div class="toast toast-top toast-end z-50">
                { for queue.toasts.iter().map(|toast| {
                    let dismiss = {
                        let dispatcher = queue.dispatcher();
                        let id = toast.id;
                        Callback::from(move |_: MouseEvent| dispatcher.dispatch(ToastAction::Dismiss(id)))
                    };
                    html! {
                        <div key={toast.id} class={classes!("alert", "shadow-lg", toast.severity.alert_class())}>
                            <i class={toast.severity.icon()}></i>
                            <span>{ toast.message.clone() }</span>
                            <button class="btn btn-xs btn-ghost btn-circle" aria-label="Dismiss" onclick={dismiss}>
                                <i class="fas fa-times"></i>
                            </button>
                        </div>
                    }
                }) }
            </div>
        </ContextProvider<ToastContext>>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toast(id: usize, severity: Severity, message: &str) -> Toast {
        Toast {
            id,
            severity,
            message: message.to_string(),
        }
    }

    fn push(queue: Rc<ToastQueue>, toast: Toast) -> Rc<ToastQueue> {
        queue.reduce(ToastAction::Push(toast))
    }

    #[test]
    fn test_queue_keeps_only_the_newest_toasts() {
        let mut queue = Rc::new(ToastQueue::default());
        for id in 0..6 {
            queue = push(queue, toast(id, Severity::Success, &format!("toast {}", id)));
        }
        let ids: Vec<usize> = queue.toasts.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 3, 4, 5]);
    }

    #[test]
    fn test_repeated_toast_is_not_stacked() {
        let queue = push(Rc::new(ToastQueue::default()), toast(0, Severity::Error, "Request failed"));
        let queue = push(queue, toast(1, Severity::Error, "Request failed"));
        assert_eq!(queue.toasts.len(), 1);

        let queue = push(queue, toast(2, Severity::Warning, "Request failed"));
        assert_eq!(queue.toasts.len(), 2);
    }

    #[test]
    fn test_dismiss_removes_by_id() {
        let queue = push(Rc::new(ToastQueue::default()), toast(0, Severity::Success, "a"));
        let queue = push(queue, toast(1, Severity::Warning, "b"));
        let queue = queue.reduce(ToastAction::Dismiss(0));
        assert_eq!(queue.toasts, vec![toast(1, Severity::Warning, "b")]);
    }
}
