//! Externally visible auth snapshot.
//!
//! SYSTEM CONTEXT
//! ==============
//! Written only by [`crate::AuthCoordinator`]; read by the route guard and by
//! UI components through a reactive signal fed from coordinator listeners.

#[cfg(test)]
#[path = "state_test.rs"]
mod state_test;

use crate::account::Identity;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthState {
    pub identity: Option<Identity>,
    /// `provider_authenticated && identity.is_some()`; kept in sync by [`AuthState::settle`].
    pub is_authenticated: bool,
    /// True only until the one-time bootstrap has finished.
    pub initializing: bool,
    pub loading: bool,
    pub auth_error: Option<String>,
    /// Provider has an active account or any cached account.
    pub has_cached_identity: bool,
    /// Provider reports a signed-in session (non-empty account cache).
    pub provider_authenticated: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            identity: None,
            is_authenticated: false,
            initializing: true,
            loading: true,
            auth_error: None,
            has_cached_identity: false,
            provider_authenticated: false,
        }
    }
}

impl AuthState {
    /// Recompute derived fields after a mutation.
    pub fn settle(&mut self) {
        self.is_authenticated = self.provider_authenticated && self.identity.is_some();
    }

    /// Authenticated with an identity bound; the condition for rendering protected content.
    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.is_authenticated && self.identity.is_some()
    }

    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.identity.as_ref().map(|identity| identity.name.as_str())
    }
}
