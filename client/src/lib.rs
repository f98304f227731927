//! # client
//!
//! Leptos + WASM frontend for the analytics dashboard.
//!
//! This crate contains the route guard component, the tile dashboard, the
//! embedded report viewer, and the browser binding of the identity provider
//! (`net::msal`). Sign-in orchestration itself lives in the `auth` crate;
//! this crate only wires it to signals and DOM.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;
pub mod tiles;
pub mod util;

/// WASM entry point: hydrate the server-rendered shell.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount::hydrate_body(app::App);
}
