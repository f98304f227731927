//! Error types for the auth crate.
//!
//! ERROR HANDLING
//! ==============
//! Provider failures are folded into `AuthState::auth_error` by the
//! coordinator and never escape it. Only `call_api` returns [`AuthError`] to
//! its caller, since a failed request is a one-off action rather than session
//! state.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use serde_json::Value;

const UNKNOWN_ERROR: &str = "Unknown authentication error";
const GENERIC_ERROR: &str = "Authentication error";

/// A failure reported by the identity provider.
///
/// Carries only the human-readable message; the provider's own error object
/// is reduced by [`ProviderError::from_value`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ProviderError {
    message: String,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }

    /// Reduce a provider error payload to a display message.
    ///
    /// Prefers `errorMessage`, then `message`, then the JSON text of the
    /// payload. A missing payload yields a fixed "unknown" message.
    #[must_use]
    pub fn from_value(value: Option<&Value>) -> Self {
        Self::new(describe_error_value(value))
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

fn describe_error_value(value: Option<&Value>) -> String {
    let Some(value) = value else {
        return UNKNOWN_ERROR.to_owned();
    };
    match value {
        Value::Null => UNKNOWN_ERROR.to_owned(),
        Value::String(s) if s.is_empty() => UNKNOWN_ERROR.to_owned(),
        Value::String(s) => s.clone(),
        Value::Object(map) => ["errorMessage", "message"]
            .iter()
            .filter_map(|key| map.get(*key).and_then(Value::as_str))
            .find(|s| !s.is_empty())
            .map_or_else(|| json_text(value), str::to_owned),
        other => json_text(other),
    }
}

fn json_text(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| GENERIC_ERROR.to_owned())
}

/// Errors returned by [`crate::AuthCoordinator::call_api`].
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No access token could be obtained (no active account, or both silent
    /// and interactive acquisition failed).
    #[error("Unable to acquire API token")]
    TokenUnavailable,

    /// The API answered with a non-success status.
    #[error("API call failed: {status}")]
    Api { status: u16 },

    /// The request never produced a response.
    #[error("API request failed: {0}")]
    Request(String),

    /// The success body was not valid JSON.
    #[error("API response decode failed: {0}")]
    Decode(String),

    /// A caller-supplied header name or value is not valid HTTP.
    #[error("invalid request header: {0}")]
    InvalidHeader(String),
}

impl AuthError {
    /// HTTP status for [`AuthError::Api`] failures.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status } => Some(*status),
            _ => None,
        }
    }
}

/// Errors produced while building [`crate::AuthConfig`].
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid redirect uri in {key}: {value}")]
    InvalidRedirectUri { key: String, value: String },

    #[error("invalid {key}: must not contain whitespace or '/'")]
    InvalidIdentifier { key: String },
}
