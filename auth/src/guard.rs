//! Route guard for protected content.
//!
//! SYSTEM CONTEXT
//! ==============
//! The UI re-runs [`RouteGuard::sync`] whenever the auth snapshot changes and
//! renders whatever [`RouteGuard::view`] returns. The guard owns the one-shot
//! redirect flag: it is armed when a login redirect is issued and re-armed only
//! once sign-in succeeds or an error is surfaced. Unmounting never clears it,
//! since the redirect itself navigates the page away.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use std::cell::Cell;
use std::rc::Rc;

use crate::coordinator::AuthCoordinator;
use crate::state::AuthState;

pub const LOADING_MESSAGE: &str = "Checking your Microsoft sign-in…";
pub const ERROR_HEADING: &str = "Unable to sign you in.";
pub const RETRY_LABEL: &str = "Try Microsoft sign-in again";
pub const REDIRECTING_MESSAGE: &str = "Redirecting to Microsoft sign-in…";

/// What the guarded route should render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardView {
    Loading,
    /// Error panel with a retry action.
    Failed(String),
    /// Momentary notice while the page navigates to the provider.
    Redirecting,
    Content,
}

pub struct RouteGuard {
    coordinator: Rc<AuthCoordinator>,
    redirecting: Cell<bool>,
}

impl RouteGuard {
    pub fn new(coordinator: Rc<AuthCoordinator>) -> Self {
        Self { coordinator, redirecting: Cell::new(false) }
    }

    #[must_use]
    pub fn coordinator(&self) -> &Rc<AuthCoordinator> {
        &self.coordinator
    }

    /// Definitely signed out: no session, no identity, nothing cached.
    #[must_use]
    pub fn needs_auth(state: &AuthState) -> bool {
        !state.is_authenticated && state.identity.is_none() && !state.has_cached_identity
    }

    /// Redirect only once the state has settled; never while bootstrapping,
    /// loading, mid-interaction, or showing an error.
    #[must_use]
    pub fn should_redirect(state: &AuthState, interaction_in_progress: bool) -> bool {
        if state.initializing || state.loading || interaction_in_progress || state.auth_error.is_some() {
            return false;
        }
        Self::needs_auth(state)
    }

    #[must_use]
    pub fn view(state: &AuthState) -> GuardView {
        let show_loading = state.auth_error.is_none()
            && (state.initializing || state.loading || (state.has_cached_identity && !state.is_signed_in()));
        if show_loading {
            return GuardView::Loading;
        }
        if state.is_signed_in() {
            return GuardView::Content;
        }
        match &state.auth_error {
            Some(error) => GuardView::Failed(error.clone()),
            None => GuardView::Redirecting,
        }
    }

    /// Warm client navigation to the home route once signed in.
    #[must_use]
    pub fn should_prefetch_home(state: &AuthState) -> bool {
        !state.loading && state.is_authenticated
    }

    /// Whether a redirect has been issued and not yet resolved.
    #[must_use]
    pub fn is_redirecting(&self) -> bool {
        self.redirecting.get()
    }

    /// React to the latest snapshot: re-arm the redirect flag on success or
    /// error, then redirect if the user is definitely signed out.
    ///
    /// Interaction status is read here, not carried in [`AuthState`], so this
    /// only re-runs on a new snapshot. The provider must settle its status
    /// before the call that produces the next snapshot resolves (MSAL ends
    /// `handleRedirect` before its promise settles).
    pub async fn sync(&self) {
        let state = self.coordinator.state();
        if state.auth_error.is_some() || state.is_signed_in() {
            self.redirecting.set(false);
        }
        if Self::should_redirect(&state, self.coordinator.interaction_in_progress()) {
            self.start_redirect().await;
        }
    }

    /// Issue the login redirect unless one is already outstanding.
    pub async fn start_redirect(&self) {
        if self.redirecting.replace(true) {
            tracing::debug!("login redirect already outstanding");
            return;
        }
        tracing::info!("redirecting to identity provider");
        self.coordinator.login_redirect().await;
    }

    /// Clear the error, re-arm the flag, and redirect again.
    pub async fn retry(&self) {
        self.coordinator.clear_auth_error();
        self.redirecting.set(false);
        self.start_redirect().await;
    }
}
