//! Identity provider configuration.
//!
//! Values come from `TILEDASH_*` keys. Browser bundles have no process
//! environment, so they read the values baked in at compile time
//! ([`AuthConfig::from_build_env`]); [`AuthConfig::from_lookup`] takes any
//! other key source. Runtime browser facts (origin, user agent) are attached
//! afterwards with [`AuthConfig::with_origin`] and
//! [`AuthConfig::with_user_agent`].

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde_json::{Value, json};

use crate::error::ConfigError;
use crate::provider::{Prompt, TokenRequest};

pub const CLIENT_ID_KEY: &str = "TILEDASH_AZURE_CLIENT_ID";
pub const TENANT_ID_KEY: &str = "TILEDASH_AZURE_TENANT_ID";
pub const REDIRECT_URI_KEY: &str = "TILEDASH_REDIRECT_URI";

pub const DEFAULT_CLIENT_ID: &str = "00000000-0000-0000-0000-000000000000";
pub const DEFAULT_TENANT_ID: &str = "common";
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:3000";
pub const AUTHORITY_HOST: &str = "https://login.microsoftonline.com";

pub const LOGIN_SCOPES: [&str; 3] = ["User.Read", "openid", "profile"];

/// Provider cache store; the session survives reloads but not the tab.
pub const CACHE_LOCATION: &str = "sessionStorage";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthConfig {
    pub client_id: String,
    pub tenant_id: String,
    /// Redirect target used when the page origin is unknown.
    pub fallback_redirect_uri: String,
    /// `location.origin` of the running page; absent outside a browser.
    pub origin: Option<String>,
    /// `navigator.userAgent` of the running page; absent outside a browser.
    pub user_agent: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            client_id: DEFAULT_CLIENT_ID.to_owned(),
            tenant_id: DEFAULT_TENANT_ID.to_owned(),
            fallback_redirect_uri: DEFAULT_REDIRECT_URI.to_owned(),
            origin: None,
            user_agent: None,
        }
    }
}

impl AuthConfig {
    /// Build config from a key lookup. Empty values count as unset.
    ///
    /// Optional:
    /// - `TILEDASH_AZURE_CLIENT_ID`: app registration id (all-zero placeholder)
    /// - `TILEDASH_AZURE_TENANT_ID`: default `common`
    /// - `TILEDASH_REDIRECT_URI`: default `http://localhost:3000`
    ///
    /// # Errors
    ///
    /// Returns an error if the tenant or client id contains whitespace or `/`,
    /// or the redirect URI is not an absolute `http(s)` URL.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        let client_id = read(CLIENT_ID_KEY).unwrap_or_else(|| DEFAULT_CLIENT_ID.to_owned());
        validate_identifier(CLIENT_ID_KEY, &client_id)?;
        let tenant_id = read(TENANT_ID_KEY).unwrap_or_else(|| DEFAULT_TENANT_ID.to_owned());
        validate_identifier(TENANT_ID_KEY, &tenant_id)?;

        let fallback_redirect_uri = match read(REDIRECT_URI_KEY) {
            Some(uri) if is_http_url(&uri) => uri.trim_end_matches('/').to_owned(),
            Some(uri) => {
                return Err(ConfigError::InvalidRedirectUri { key: REDIRECT_URI_KEY.to_owned(), value: uri });
            }
            None => DEFAULT_REDIRECT_URI.to_owned(),
        };

        Ok(Self { client_id, tenant_id, fallback_redirect_uri, origin: None, user_agent: None })
    }

    /// Build config from values captured when the crate was compiled.
    ///
    /// # Errors
    ///
    /// See [`AuthConfig::from_lookup`].
    pub fn from_build_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| {
            let value = match key {
                CLIENT_ID_KEY => option_env!("TILEDASH_AZURE_CLIENT_ID"),
                TENANT_ID_KEY => option_env!("TILEDASH_AZURE_TENANT_ID"),
                REDIRECT_URI_KEY => option_env!("TILEDASH_REDIRECT_URI"),
                _ => None,
            };
            value.map(str::to_owned)
        })
    }

    #[must_use]
    pub fn with_origin(mut self, origin: Option<String>) -> Self {
        self.origin = origin.filter(|o| !o.is_empty());
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: Option<String>) -> Self {
        self.user_agent = user_agent;
        self
    }

    #[must_use]
    pub fn authority(&self) -> String {
        format!("{AUTHORITY_HOST}/{}", self.tenant_id)
    }

    /// Current page origin, else the configured fallback.
    #[must_use]
    pub fn redirect_uri(&self) -> String {
        self.origin.clone().unwrap_or_else(|| self.fallback_redirect_uri.clone())
    }

    #[must_use]
    pub fn post_logout_redirect_uri(&self) -> String {
        self.redirect_uri()
    }

    #[must_use]
    pub fn cache_location(&self) -> &'static str {
        CACHE_LOCATION
    }

    /// Cookie-backed auth state, needed only by legacy Internet Explorer.
    #[must_use]
    pub fn store_auth_state_in_cookie(&self) -> bool {
        self.user_agent.as_deref().is_some_and(|ua| ua.contains("MSIE"))
    }

    /// Interactive login request: fixed user scopes, always offer account picker.
    #[must_use]
    pub fn login_request(&self) -> TokenRequest {
        TokenRequest::new(LOGIN_SCOPES).with_prompt(Prompt::SelectAccount)
    }

    #[must_use]
    pub fn api_scope(&self) -> String {
        format!("{}/.default", self.client_id)
    }

    #[must_use]
    pub fn api_request(&self) -> TokenRequest {
        TokenRequest::new([self.api_scope()])
    }

    /// Provider SDK configuration object handed to the browser client.
    #[must_use]
    pub fn provider_settings(&self) -> Value {
        json!({
            "auth": {
                "clientId": self.client_id,
                "authority": self.authority(),
                "redirectUri": self.redirect_uri(),
                "postLogoutRedirectUri": self.post_logout_redirect_uri(),
                "navigateToLoginRequestUrl": false,
            },
            "cache": {
                "cacheLocation": self.cache_location(),
                "storeAuthStateInCookie": self.store_auth_state_in_cookie(),
            },
        })
    }
}

fn validate_identifier(key: &str, value: &str) -> Result<(), ConfigError> {
    if value.contains('/') || value.chars().any(char::is_whitespace) {
        return Err(ConfigError::InvalidIdentifier { key: key.to_owned() });
    }
    Ok(())
}

fn is_http_url(value: &str) -> bool {
    ["http://", "https://"]
        .iter()
        .any(|scheme| value.strip_prefix(*scheme).is_some_and(|rest| !rest.is_empty()))
}
