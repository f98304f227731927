//! # auth
//!
//! Sign-in orchestration for the dashboard. This crate decides when the app
//! redirects to the identity provider, when it shows a spinner, when the
//! session counts as established, and how it recovers from provider failures.
//!
//! The provider SDK itself sits behind [`IdentityClient`]; the browser build
//! binds it to MSAL in the `client` crate, tests bind it to scripted mocks.
//!
//! ARCHITECTURE
//! ============
//! - [`AuthCoordinator`] owns the [`AuthState`] snapshot and every action that
//!   mutates it (bootstrap, reconcile, login, logout, token acquisition).
//! - [`RouteGuard`] reads that snapshot to pick a [`GuardView`] and fires the
//!   login redirect at most once per signed-out episode.
//! - [`api`] performs bearer-authorized JSON requests for `call_api`.

pub mod account;
pub mod api;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod guard;
pub mod provider;
pub mod state;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use account::{Account, Identity};
pub use api::ApiRequest;
pub use config::AuthConfig;
pub use coordinator::AuthCoordinator;
pub use error::{AuthError, ConfigError, ProviderError};
pub use guard::{GuardView, RouteGuard};
pub use provider::{AuthResult, IdentityClient, InteractionStatus, LogoutRequest, Prompt, TokenRequest};
pub use state::AuthState;
