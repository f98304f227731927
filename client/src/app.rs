//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::components::protected_route::ProtectedRoute;
use crate::pages::dashboard::DashboardPage;
use crate::state::auth::AuthContext;

/// Path of the provider SDK bundle served next to the WASM package.
pub const MSAL_SCRIPT_PATH: &str = "/vendor/msal-browser.min.js";

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <script src=MSAL_SCRIPT_PATH></script>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Starts the auth session once, provides it as context, and mounts the
/// dashboard behind the route guard.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let auth = AuthContext::install();
    provide_context(auth);
    on_cleanup(move || auth.teardown());

    view! {
        <Stylesheet id="leptos" href="/pkg/tiledash.css"/>
        <Title text="Analytics Dashboard"/>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("") view=HomePage/>
            </Routes>
        </Router>
    }
}

/// Home route: the tile dashboard, shown only to signed-in users.
#[component]
fn HomePage() -> impl IntoView {
    view! {
        <ProtectedRoute>
            <DashboardPage/>
        </ProtectedRoute>
    }
}
