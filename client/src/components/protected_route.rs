//! Route guard component wrapping authenticated content.
//!
//! SYSTEM CONTEXT
//! ==============
//! Renders whatever `RouteGuard::view` decides for the current auth snapshot
//! and, in the browser, re-runs `RouteGuard::sync` on every snapshot so a
//! settled signed-out session is sent to the provider exactly once.

#[cfg(test)]
#[path = "protected_route_test.rs"]
mod protected_route_test;

use auth::guard::{ERROR_HEADING, LOADING_MESSAGE, REDIRECTING_MESSAGE, RETRY_LABEL};
use auth::{GuardView, RouteGuard};
use leptos::prelude::*;
use leptos_meta::Link;

use crate::state::auth::AuthContext;

/// Status line for the non-content guard views.
fn gate_message(view: &GuardView) -> Option<&'static str> {
    match view {
        GuardView::Loading => Some(LOADING_MESSAGE),
        GuardView::Redirecting => Some(REDIRECTING_MESSAGE),
        GuardView::Failed(_) | GuardView::Content => None,
    }
}

/// Render `children` only for a signed-in user.
#[component]
pub fn ProtectedRoute(children: ChildrenFn) -> impl IntoView {
    let auth = expect_context::<AuthContext>();
    let state = auth.state;
    let guard_view = Memo::new(move |_| RouteGuard::view(&state.get()));
    let prefetch = Memo::new(move |_| RouteGuard::should_prefetch_home(&state.get()));

    #[cfg(feature = "hydrate")]
    Effect::new(move || {
        state.track();
        if let Some(guard) = auth.guard() {
            leptos::task::spawn_local(async move { guard.sync().await });
        }
    });

    let on_retry = move |_| match auth.guard() {
        #[cfg(feature = "hydrate")]
        Some(guard) => leptos::task::spawn_local(async move { guard.retry().await }),
        #[cfg(not(feature = "hydrate"))]
        Some(_) => {}
        None => auth.restart(),
    };

    view! {
        <Show when=move || prefetch.get()>
            <Link rel="prefetch" href="/"/>
        </Show>
        {move || {
            let current = guard_view.get();
            match current {
                GuardView::Content => children().into_any(),
                GuardView::Failed(message) => {
                    view! {
                        <div class="auth-gate auth-gate--error" role="alert">
                            <p class="auth-gate__heading">{ERROR_HEADING}</p>
                            <p class="auth-gate__detail">{message}</p>
                            <button class="btn auth-gate__retry" on:click=on_retry>
                                {RETRY_LABEL}
                            </button>
                        </div>
                    }
                        .into_any()
                }
                other => {
                    let message = gate_message(&other).unwrap_or_default();
                    view! {
                        <div class="auth-gate">
                            <span class="auth-gate__spinner" aria-hidden="true"></span>
                            <p class="auth-gate__message">{message}</p>
                        </div>
                    }
                        .into_any()
                }
            }
        }}
    }
}
