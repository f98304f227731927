//! Dashboard page: tile grid with an in-place report viewer.
//!
//! SYSTEM CONTEXT
//! ==============
//! Mounted behind `ProtectedRoute`, so a signed-in identity is present. The
//! page keeps its own tile navigator; selecting a tile swaps the grid for the
//! report viewer until the user goes back.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use auth::AuthState;
use leptos::prelude::*;

use crate::components::report_viewer::ReportViewer;
use crate::components::tile_grid::TileGrid;
use crate::state::auth::AuthContext;
use crate::state::tiles::{NavigatorView, TileNavigator};
use crate::tiles::TILE_CONFIG;

pub const APP_TITLE: &str = "Analytics Dashboard";
pub const APP_SUBTITLE: &str = "One-click access to strategic Power BI insights";
pub const LIVE_BADGE: &str = "Live Connected to Power BI Service";

/// Header name for the signed-in user, if any.
fn header_user(state: &AuthState) -> Option<String> {
    state.display_name().map(str::to_owned)
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = expect_context::<AuthContext>();
    let navigator = RwSignal::new(TileNavigator::default());

    let user = move || header_user(&auth.state.get());
    let active = Signal::derive(move || navigator.get().selected_id().map(str::to_owned));
    let on_select = Callback::new(move |id: String| navigator.update(|n| n.select(id)));
    let on_back = Callback::new(move |()| navigator.update(TileNavigator::back));

    let on_sign_out = move |_| {
        #[cfg(feature = "hydrate")]
        if let Some(coordinator) = auth.coordinator() {
            leptos::task::spawn_local(async move { coordinator.logout_redirect().await });
        }
    };

    view! {
        <div class="dashboard-page">
            <header class="dashboard-page__header">
                <div class="dashboard-page__titles">
                    <h1 class="dashboard-page__title">{APP_TITLE}</h1>
                    <p class="dashboard-page__subtitle">{APP_SUBTITLE}</p>
                </div>
                <div class="dashboard-page__session">
                    <span class="dashboard-page__live">{LIVE_BADGE}</span>
                    {move || {
                        user()
                            .map(|name| {
                                view! {
                                    <span class="dashboard-page__user">
                                        <span class="dashboard-page__user-name">{name}</span>
                                        <button class="btn dashboard-page__sign-out" on:click=on_sign_out>
                                            "Sign out"
                                        </button>
                                    </span>
                                }
                            })
                    }}
                </div>
            </header>

            <main class="dashboard-page__body">
                {move || match navigator.get().view(TILE_CONFIG) {
                    NavigatorView::Grid => view! {
                        <section class="dashboard-page__grid">
                            <TileGrid tiles=TILE_CONFIG active=active on_select=on_select/>
                        </section>
                    }
                    .into_any(),
                    NavigatorView::Report(tile) => view! {
                        <section class="dashboard-page__report">
                            <ReportViewer tile=*tile on_back=on_back/>
                        </section>
                    }
                    .into_any(),
                }}
            </main>
        </div>
    }
}
