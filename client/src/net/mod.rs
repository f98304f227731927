//! Browser-side bindings to external services.
//!
//! SYSTEM CONTEXT
//! ==============
//! `msal` adapts the MSAL browser SDK to the `auth::IdentityClient` boundary.
//! Everything else in the client talks to the coordinator, never to MSAL.

pub mod msal;
