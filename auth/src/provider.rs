//! Identity provider boundary.
//!
//! SYSTEM CONTEXT
//! ==============
//! [`IdentityClient`] is the seam between orchestration and the provider SDK.
//! It covers both the redirect/popup protocol calls and the provider's
//! session-storage account cache (`get_all_accounts`, `get_active_account`,
//! `set_active_account`). The browser implementation wraps MSAL; all futures
//! are `?Send` because the browser is single-threaded.

#[cfg(test)]
#[path = "provider_test.rs"]
mod provider_test;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::account::Account;
use crate::error::ProviderError;

/// Account-selection behavior for interactive requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Prompt {
    SelectAccount,
}

/// Scopes and options for login and token calls.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequest {
    pub scopes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<Prompt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<Account>,
}

impl TokenRequest {
    pub fn new<I, S>(scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { scopes: scopes.into_iter().map(Into::into).collect(), prompt: None, account: None }
    }

    #[must_use]
    pub fn with_prompt(mut self, prompt: Prompt) -> Self {
        self.prompt = Some(prompt);
        self
    }

    #[must_use]
    pub fn for_account(mut self, account: Account) -> Self {
        self.account = Some(account);
        self
    }
}

/// Options for the redirect logout flow.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_logout_redirect_uri: Option<String>,
}

/// Result of a completed login, redirect, or token call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResult {
    #[serde(default)]
    pub account: Option<Account>,
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub scopes: Vec<String>,
}

/// Interaction the provider is currently running, if any.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InteractionStatus {
    #[default]
    None,
    Startup,
    Login,
    Logout,
    AcquireToken,
    SsoSilent,
    HandleRedirect,
    /// A status this crate does not know by name.
    Other,
}

impl InteractionStatus {
    /// Parse the provider's wire value; unknown values count as in progress.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "none" | "" => Self::None,
            "startup" => Self::Startup,
            "login" => Self::Login,
            "logout" => Self::Logout,
            "acquireToken" => Self::AcquireToken,
            "ssoSilent" => Self::SsoSilent,
            "handleRedirect" => Self::HandleRedirect,
            _ => Self::Other,
        }
    }

    #[must_use]
    pub fn in_progress(self) -> bool {
        self != Self::None
    }
}

/// Provider SDK operations the coordinator relies on.
#[async_trait(?Send)]
pub trait IdentityClient {
    /// Complete the SDK's own startup. Must finish before any other call.
    async fn initialize(&self) -> Result<(), ProviderError>;

    /// Consume the response of a redirect the page is returning from.
    async fn handle_redirect_promise(&self) -> Result<Option<AuthResult>, ProviderError>;

    fn get_all_accounts(&self) -> Vec<Account>;

    fn get_active_account(&self) -> Option<Account>;

    fn set_active_account(&self, account: &Account);

    async fn login_popup(&self, request: &TokenRequest) -> Result<AuthResult, ProviderError>;

    /// Start a full-page login redirect. Success means navigation has begun.
    async fn login_redirect(&self, request: &TokenRequest) -> Result<(), ProviderError>;

    async fn logout_popup(&self) -> Result<(), ProviderError>;

    async fn logout_redirect(&self, request: &LogoutRequest) -> Result<(), ProviderError>;

    async fn acquire_token_silent(&self, request: &TokenRequest) -> Result<AuthResult, ProviderError>;

    async fn acquire_token_popup(&self, request: &TokenRequest) -> Result<AuthResult, ProviderError>;

    fn interaction_status(&self) -> InteractionStatus {
        InteractionStatus::None
    }

    /// Register a callback fired whenever the cached account list changes.
    fn on_accounts_changed(&self, callback: Box<dyn Fn()>) {
        let _ = callback;
    }
}
