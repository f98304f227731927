//! Runtime facts about the hosting browser.
//!
//! Feeds `AuthConfig::with_origin` / `with_user_agent`. Outside a browser
//! (SSR, native tests) every helper returns `None`, so config falls back to
//! its configured redirect URI.

#[cfg(test)]
#[path = "browser_test.rs"]
mod browser_test;

/// `window.location.origin`, if running in a browser.
pub fn origin() -> Option<String> {
    #[cfg(feature = "hydrate")]
    {
        web_sys::window()
            .and_then(|w| w.location().origin().ok())
            .filter(|o| !o.is_empty() && o != "null")
    }
    #[cfg(not(feature = "hydrate"))]
    {
        None
    }
}

/// `navigator.userAgent`, if running in a browser.
pub fn user_agent() -> Option<String> {
    #[cfg(feature = "hydrate")]
    {
        web_sys::window().and_then(|w| w.navigator().user_agent().ok())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        None
    }
}
