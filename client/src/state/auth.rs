//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! `App` installs one [`AuthContext`] and provides it as context. In the
//! browser it owns the session coordinator and mirrors every coordinator
//! snapshot into a signal; during SSR no session exists and the signal stays
//! at its initial "still checking" value, so the server never renders
//! protected content.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::rc::Rc;

use auth::{AuthCoordinator, AuthState, RouteGuard};
use leptos::prelude::*;

/// Reactive handle on the browser auth session.
#[derive(Clone, Copy)]
pub struct AuthContext {
    pub state: RwSignal<AuthState>,
    guard: StoredValue<Option<Rc<RouteGuard>>, LocalStorage>,
}

impl AuthContext {
    /// Create the context and, in the browser, start the session.
    pub fn install() -> Self {
        let ctx = Self { state: RwSignal::new(AuthState::default()), guard: StoredValue::new_local(None) };
        #[cfg(feature = "hydrate")]
        ctx.start_session();
        ctx
    }

    /// Route guard over the live session; `None` during SSR or after a failed start.
    pub fn guard(&self) -> Option<Rc<RouteGuard>> {
        self.guard.try_get_value().flatten()
    }

    pub fn coordinator(&self) -> Option<Rc<AuthCoordinator>> {
        self.guard().map(|guard| Rc::clone(guard.coordinator()))
    }

    /// Start the session again after it failed to start.
    ///
    /// Clears the startup error back to the "still checking" snapshot and
    /// re-runs session start. No-op while a session exists; its own retry
    /// path goes through the route guard.
    pub fn restart(&self) {
        if self.guard().is_some() {
            return;
        }
        self.state.set(AuthState::default());
        #[cfg(feature = "hydrate")]
        self.start_session();
    }

    /// Stop the session from publishing further state.
    pub fn teardown(&self) {
        if let Some(coordinator) = self.coordinator() {
            coordinator.teardown();
        }
    }

    #[cfg(feature = "hydrate")]
    fn start_session(self) {
        use auth::AuthConfig;

        use crate::net::msal::MsalClient;
        use crate::util::browser;

        let config = match AuthConfig::from_build_env() {
            Ok(config) => config.with_origin(browser::origin()).with_user_agent(browser::user_agent()),
            Err(e) => {
                log::error!("auth config invalid: {e}");
                self.state.set(startup_failure(e.to_string()));
                return;
            }
        };
        let client = match MsalClient::new(&config) {
            Ok(client) => client,
            Err(e) => {
                log::error!("identity client unavailable: {e}");
                self.state.set(startup_failure(e.message().to_owned()));
                return;
            }
        };

        let coordinator = AuthCoordinator::new(Rc::new(client), config);
        let state = self.state;
        coordinator.subscribe(move |snapshot| {
            state.try_set(snapshot.clone());
        });
        self.guard.set_value(Some(Rc::new(RouteGuard::new(Rc::clone(&coordinator)))));

        leptos::task::spawn_local(async move {
            coordinator.bootstrap().await;
        });
    }
}

/// Settled snapshot for a session that could not start at all.
#[cfg(any(test, feature = "hydrate"))]
fn startup_failure(message: String) -> AuthState {
    let mut state = AuthState { initializing: false, loading: false, auth_error: Some(message), ..AuthState::default() };
    state.settle();
    state
}
