//! Auth session coordinator.
//!
//! SYSTEM CONTEXT
//! ==============
//! One coordinator is built at startup and handed to the route guard and to
//! anything that calls protected APIs. It reconciles the identity provider's
//! redirect responses, its account cache, and the UI-facing flags into a
//! single [`AuthState`], and notifies listeners after every change.
//!
//! LIFECYCLE
//! =========
//! `bootstrap` runs the provider startup sequence once; every caller awaits
//! the same shared future. After it completes, `reconcile` is re-run on each
//! account-change notification and after login/logout.
//!
//! ERROR HANDLING
//! ==============
//! Provider failures become `AuthState::auth_error` and never propagate, so a
//! failed bootstrap still ends `initializing`. `call_api` is the exception and
//! returns its error to the caller.

#[cfg(test)]
#[path = "coordinator_test.rs"]
mod coordinator_test;

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use futures::future::{FutureExt, LocalBoxFuture, Shared};
use serde_json::Value;

use crate::account::{Account, Identity};
use crate::api::{self, ApiRequest};
use crate::config::AuthConfig;
use crate::error::{AuthError, ProviderError};
use crate::provider::{IdentityClient, LogoutRequest, TokenRequest};
use crate::state::AuthState;

type Listener = Rc<dyn Fn(&AuthState)>;
type BootstrapFuture = Shared<LocalBoxFuture<'static, BootstrapOutcome>>;

/// What the provider startup sequence produced.
#[derive(Clone, Debug, Default)]
struct BootstrapOutcome {
    /// Account made active during initialization from the cache.
    hydrated: Option<Account>,
    /// Redirect-response account, else active account, else first cached.
    resolved: Option<Account>,
    error: Option<String>,
}

pub struct AuthCoordinator {
    client: Rc<dyn IdentityClient>,
    config: AuthConfig,
    http: reqwest::Client,
    state: RefCell<AuthState>,
    hydrated: RefCell<Option<Account>>,
    bootstrap: RefCell<Option<BootstrapFuture>>,
    torn_down: Cell<bool>,
    reconciling: Cell<bool>,
    reconcile_pending: Cell<bool>,
    listeners: RefCell<Vec<Listener>>,
}

impl AuthCoordinator {
    /// Build the coordinator and subscribe it to provider account changes.
    pub fn new(client: Rc<dyn IdentityClient>, config: AuthConfig) -> Rc<Self> {
        Rc::new_cyclic(|weak: &Weak<Self>| {
            let weak = weak.clone();
            client.on_accounts_changed(Box::new(move || {
                if let Some(coordinator) = weak.upgrade() {
                    coordinator.reconcile();
                }
            }));
            Self {
                client,
                config,
                http: reqwest::Client::new(),
                state: RefCell::new(AuthState::default()),
                hydrated: RefCell::new(None),
                bootstrap: RefCell::new(None),
                torn_down: Cell::new(false),
                reconciling: Cell::new(false),
                reconcile_pending: Cell::new(false),
                listeners: RefCell::new(Vec::new()),
            }
        })
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Current snapshot.
    #[must_use]
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Call `listener` with every new snapshot.
    pub fn subscribe(&self, listener: impl Fn(&AuthState) + 'static) {
        self.listeners.borrow_mut().push(Rc::new(listener));
    }

    /// Whether the provider is running a popup or redirect interaction.
    #[must_use]
    pub fn interaction_in_progress(&self) -> bool {
        self.client.interaction_status().in_progress()
    }

    /// Stop writing state; a bootstrap finishing afterwards is discarded.
    pub fn teardown(&self) {
        self.torn_down.set(true);
    }

    // =========================================================================
    // BOOTSTRAP
    // =========================================================================

    /// Run the one-time provider startup and publish its result.
    ///
    /// Concurrent and repeated callers share the first call's future; only
    /// the first completion is applied.
    pub async fn bootstrap(&self) {
        let outcome = self.bootstrap_future().await;
        if self.torn_down.get() {
            tracing::debug!("bootstrap finished after teardown; discarding");
            return;
        }
        if !self.state.borrow().initializing {
            return;
        }
        self.apply_bootstrap(outcome);
    }

    fn bootstrap_future(&self) -> BootstrapFuture {
        let mut slot = self.bootstrap.borrow_mut();
        slot.get_or_insert_with(|| run_bootstrap(Rc::clone(&self.client)).boxed_local().shared())
            .clone()
    }

    fn apply_bootstrap(&self, outcome: BootstrapOutcome) {
        let (provider_authenticated, has_cached_identity) = self.provider_flags();
        self.hydrated.replace(outcome.hydrated);
        self.update(|s| {
            s.initializing = false;
            if let Some(error) = outcome.error {
                s.auth_error = Some(error);
            }
            // Bind the redirect account now so the UI never renders a signed-out frame.
            if let Some(account) = outcome.resolved {
                s.identity = Some(Identity::from(account));
            }
            s.provider_authenticated = provider_authenticated;
            s.has_cached_identity = has_cached_identity;
        });
        tracing::debug!(signed_in = self.state.borrow().is_authenticated, "bootstrap complete");
        self.reconcile();
    }

    // =========================================================================
    // RECONCILE
    // =========================================================================

    /// Recompute the public identity from the provider's current accounts.
    ///
    /// Priority: provider active account, then the account hydrated at
    /// startup (if still cached), then the first cached account. No-op until
    /// bootstrap completes. A call made while a pass is running schedules one
    /// more pass instead of overlapping.
    pub fn reconcile(&self) {
        if self.torn_down.get() || self.state.borrow().initializing {
            return;
        }
        if self.reconciling.replace(true) {
            self.reconcile_pending.set(true);
            return;
        }
        loop {
            self.reconcile_pass();
            if !self.reconcile_pending.replace(false) {
                break;
            }
        }
        self.reconciling.set(false);
    }

    fn reconcile_pass(&self) {
        self.update(|s| s.loading = true);

        let accounts = self.client.get_all_accounts();
        let active = self.client.get_active_account();
        let hydrated = self
            .hydrated
            .borrow()
            .clone()
            .filter(|h| accounts.iter().any(|a| a.same_account(h)));
        let provider_had_active = active.is_some();
        let resolved = active.or(hydrated).or_else(|| accounts.first().cloned());

        if let Some(account) = &resolved {
            if !provider_had_active {
                self.client.set_active_account(account);
            }
        }
        let (provider_authenticated, has_cached_identity) = self.provider_flags();

        let changed = self.update(|s| {
            let before = s.identity.as_ref().map(|i| i.account.home_account_id.clone());
            match resolved {
                Some(account) => {
                    s.identity = Some(Identity::from(account));
                    s.auth_error = None;
                }
                None => s.identity = None,
            }
            s.provider_authenticated = provider_authenticated;
            s.has_cached_identity = has_cached_identity;
            s.loading = false;
            before != s.identity.as_ref().map(|i| i.account.home_account_id.clone())
        });
        if changed {
            tracing::info!(signed_in = self.state.borrow().identity.is_some(), "identity changed");
        }
    }

    // =========================================================================
    // LOGIN / LOGOUT
    // =========================================================================

    /// Interactive popup login. The identity is bound immediately on success.
    pub async fn login(&self) {
        self.begin_interaction();
        let account = self
            .client
            .login_popup(&self.config.login_request())
            .await
            .and_then(|r| r.account.ok_or_else(|| ProviderError::new("Login response did not include an account")));
        match account {
            Ok(account) => {
                self.client.set_active_account(&account);
                self.bind_identity(account);
            }
            Err(err) => {
                tracing::error!(error = %err, "login failed");
                self.fail_interaction(&err);
            }
        }
    }

    /// Full-page redirect login. On success the page navigates away, so
    /// `loading` is left set.
    pub async fn login_redirect(&self) {
        self.begin_interaction();
        if let Err(err) = self.client.login_redirect(&self.config.login_request()).await {
            tracing::error!(error = %err, "login redirect failed");
            self.fail_interaction(&err);
        }
    }

    pub async fn logout(&self) {
        self.begin_interaction();
        match self.client.logout_popup().await {
            Ok(()) => {
                let (provider_authenticated, has_cached_identity) = self.provider_flags();
                self.update(|s| {
                    s.identity = None;
                    s.provider_authenticated = provider_authenticated;
                    s.has_cached_identity = has_cached_identity;
                    s.loading = false;
                });
            }
            Err(err) => {
                tracing::error!(error = %err, "logout failed");
                self.fail_interaction(&err);
            }
        }
    }

    /// Redirect logout returning to the current origin (or configured fallback).
    pub async fn logout_redirect(&self) {
        self.begin_interaction();
        let request = LogoutRequest { post_logout_redirect_uri: Some(self.config.post_logout_redirect_uri()) };
        match self.client.logout_redirect(&request).await {
            Ok(()) => self.update(|s| s.identity = None),
            Err(err) => {
                tracing::error!(error = %err, "logout redirect failed");
                self.fail_interaction(&err);
            }
        }
    }

    pub fn clear_auth_error(&self) {
        self.update(|s| s.auth_error = None);
    }

    // =========================================================================
    // TOKENS
    // =========================================================================

    /// Access token for the active account.
    ///
    /// Tries silent acquisition first; a silent failure is recorded as
    /// `auth_error` and followed by exactly one popup attempt. Returns `None`
    /// without any provider call when no account is active.
    pub async fn acquire_token(&self, request: TokenRequest) -> Option<String> {
        let account = self.client.get_active_account()?;
        let request = request.for_account(account);

        match self.client.acquire_token_silent(&request).await {
            Ok(result) => Some(result.access_token),
            Err(silent_err) => {
                tracing::warn!(error = %silent_err, "silent token acquisition failed");
                self.record_error(&silent_err);
                match self.client.acquire_token_popup(&request).await {
                    Ok(result) => Some(result.access_token),
                    Err(popup_err) => {
                        tracing::error!(error = %popup_err, "popup token acquisition failed");
                        self.record_error(&popup_err);
                        None
                    }
                }
            }
        }
    }

    /// Token for `scopes`, defaulting to the login scopes.
    pub async fn get_access_token(&self, scopes: Option<Vec<String>>) -> Option<String> {
        let scopes = scopes.unwrap_or_else(|| self.config.login_request().scopes);
        let request = TokenRequest::new(scopes);
        self.acquire_token(request).await
    }

    /// Token for this application's own API scope.
    pub async fn get_api_token(&self) -> Option<String> {
        self.acquire_token(self.config.api_request()).await
    }

    /// Authorized JSON request against `url`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::TokenUnavailable`] if no API token can be
    /// obtained, [`AuthError::Api`] for a non-success status, and transport
    /// or decode errors otherwise.
    pub async fn call_api(&self, url: &str, request: ApiRequest) -> Result<Value, AuthError> {
        let token = self.get_api_token().await.ok_or(AuthError::TokenUnavailable)?;
        api::send_authorized(&self.http, url, &token, request).await
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    fn begin_interaction(&self) {
        self.update(|s| {
            s.loading = true;
            s.auth_error = None;
        });
    }

    fn fail_interaction(&self, err: &ProviderError) {
        self.update(|s| {
            s.auth_error = Some(err.message().to_owned());
            s.loading = false;
        });
    }

    fn record_error(&self, err: &ProviderError) {
        self.update(|s| s.auth_error = Some(err.message().to_owned()));
    }

    fn bind_identity(&self, account: Account) {
        let (provider_authenticated, has_cached_identity) = self.provider_flags();
        self.update(|s| {
            s.identity = Some(Identity::from(account));
            s.provider_authenticated = provider_authenticated;
            s.has_cached_identity = has_cached_identity;
            s.auth_error = None;
            s.loading = false;
        });
    }

    /// `(provider_authenticated, has_cached_identity)` from the provider cache.
    fn provider_flags(&self) -> (bool, bool) {
        let has_accounts = !self.client.get_all_accounts().is_empty();
        (has_accounts, has_accounts || self.client.get_active_account().is_some())
    }

    /// Mutate state, settle derived fields, then notify listeners.
    fn update<R>(&self, f: impl FnOnce(&mut AuthState) -> R) -> R {
        let (result, snapshot) = {
            let mut state = self.state.borrow_mut();
            let result = f(&mut state);
            state.settle();
            (result, state.clone())
        };
        let listeners: Vec<Listener> = self.listeners.borrow().clone();
        for listener in listeners {
            listener(&snapshot);
        }
        result
    }
}

/// Provider startup: initialize, hydrate the cache binding, consume any
/// redirect response, then pick and activate the best account.
async fn run_bootstrap(client: Rc<dyn IdentityClient>) -> BootstrapOutcome {
    let mut outcome = BootstrapOutcome::default();

    if let Err(err) = client.initialize().await {
        tracing::error!(error = %err, "identity client initialization failed");
        outcome.error = Some(err.message().to_owned());
        return outcome;
    }
    if client.get_active_account().is_none() {
        if let Some(first) = client.get_all_accounts().into_iter().next() {
            client.set_active_account(&first);
            outcome.hydrated = Some(first);
        }
    } else {
        outcome.hydrated = client.get_active_account();
    }

    match client.handle_redirect_promise().await {
        Ok(response) => {
            let resolved = response
                .and_then(|r| r.account)
                .or_else(|| client.get_active_account())
                .or_else(|| client.get_all_accounts().into_iter().next());
            if let Some(account) = &resolved {
                client.set_active_account(account);
            }
            outcome.resolved = resolved;
        }
        Err(err) => {
            tracing::error!(error = %err, "redirect handling failed");
            outcome.error = Some(err.message().to_owned());
        }
    }
    outcome
}
