//! MSAL browser SDK binding.
//!
//! SYSTEM CONTEXT
//! ==============
//! The SDK is loaded as a plain script (`window.msal`) by the SSR shell. This
//! module binds `msal.PublicClientApplication` through `wasm_bindgen`, moves
//! request and result objects across the boundary as JSON, and tracks the
//! SDK's interaction status from its event stream.
//!
//! Event-type handling is pure and compiled for native tests; the binding
//! itself exists only under `hydrate`.

#[cfg(test)]
#[path = "msal_test.rs"]
mod msal_test;

#[cfg(any(test, feature = "hydrate"))]
use auth::InteractionStatus;

#[cfg(any(test, feature = "hydrate"))]
const INTERACTIVE_TYPES: [&str; 2] = ["redirect", "popup"];

/// Interaction status after an SDK event, given the status before it.
///
/// Start events enter their interaction. End events only clear the status
/// when it belongs to the same interaction. Token events count only for
/// popup and redirect interactions; silent renewals never block the UI.
#[cfg(any(test, feature = "hydrate"))]
pub(crate) fn next_interaction_status(
    event_type: &str,
    interaction_type: Option<&str>,
    current: InteractionStatus,
) -> InteractionStatus {
    let interactive = interaction_type.is_some_and(|t| INTERACTIVE_TYPES.contains(&t));
    let event = event_type.strip_prefix("msal:").unwrap_or(event_type);
    match event {
        "initializeStart" => InteractionStatus::Startup,
        "initializeEnd" if current == InteractionStatus::Startup => InteractionStatus::None,
        "loginStart" => InteractionStatus::Login,
        "ssoSilentStart" => InteractionStatus::SsoSilent,
        "handleRedirectStart" => InteractionStatus::HandleRedirect,
        "logoutStart" => InteractionStatus::Logout,
        "acquireTokenStart" if interactive => InteractionStatus::AcquireToken,
        "ssoSilentSuccess" | "ssoSilentFailure" if current == InteractionStatus::SsoSilent => {
            InteractionStatus::None
        }
        "handleRedirectEnd" if current == InteractionStatus::HandleRedirect => InteractionStatus::None,
        "logoutEnd" if current == InteractionStatus::Logout => InteractionStatus::None,
        "loginSuccess" | "loginFailure" | "acquireTokenSuccess" | "acquireTokenFailure" | "restoreFromBFCache"
            if interactive =>
        {
            InteractionStatus::None
        }
        _ => current,
    }
}

/// Whether an SDK event can change the cached account list.
#[cfg(any(test, feature = "hydrate"))]
pub(crate) fn is_account_event(event_type: &str) -> bool {
    matches!(
        event_type.strip_prefix("msal:").unwrap_or(event_type),
        "accountAdded" | "accountRemoved" | "loginSuccess" | "logoutSuccess"
    )
}

#[cfg(feature = "hydrate")]
pub use browser::MsalClient;

#[cfg(feature = "hydrate")]
mod browser {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use async_trait::async_trait;
    use auth::{Account, AuthConfig, AuthResult, IdentityClient, InteractionStatus, LogoutRequest, ProviderError, TokenRequest};
    use js_sys::{JSON, Promise, Reflect};
    use serde::Serialize;
    use serde::de::DeserializeOwned;
    use serde_json::Value;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;

    use super::{is_account_event, next_interaction_status};

    #[wasm_bindgen]
    extern "C" {
        #[wasm_bindgen(js_namespace = msal)]
        type PublicClientApplication;

        #[wasm_bindgen(constructor, js_namespace = msal, catch)]
        fn new(config: &JsValue) -> Result<PublicClientApplication, JsValue>;

        #[wasm_bindgen(method)]
        fn initialize(this: &PublicClientApplication) -> Promise;

        #[wasm_bindgen(method, js_name = handleRedirectPromise)]
        fn handle_redirect_promise(this: &PublicClientApplication) -> Promise;

        #[wasm_bindgen(method, js_name = getAllAccounts)]
        fn get_all_accounts(this: &PublicClientApplication) -> JsValue;

        #[wasm_bindgen(method, js_name = getActiveAccount)]
        fn get_active_account(this: &PublicClientApplication) -> JsValue;

        #[wasm_bindgen(method, js_name = setActiveAccount)]
        fn set_active_account(this: &PublicClientApplication, account: &JsValue);

        #[wasm_bindgen(method, js_name = getAccountByHomeId)]
        fn get_account_by_home_id(this: &PublicClientApplication, home_account_id: &str) -> JsValue;

        #[wasm_bindgen(method, js_name = loginPopup)]
        fn login_popup(this: &PublicClientApplication, request: &JsValue) -> Promise;

        #[wasm_bindgen(method, js_name = loginRedirect)]
        fn login_redirect(this: &PublicClientApplication, request: &JsValue) -> Promise;

        #[wasm_bindgen(method, js_name = logoutPopup)]
        fn logout_popup(this: &PublicClientApplication) -> Promise;

        #[wasm_bindgen(method, js_name = logoutRedirect)]
        fn logout_redirect(this: &PublicClientApplication, request: &JsValue) -> Promise;

        #[wasm_bindgen(method, js_name = acquireTokenSilent)]
        fn acquire_token_silent(this: &PublicClientApplication, request: &JsValue) -> Promise;

        #[wasm_bindgen(method, js_name = acquireTokenPopup)]
        fn acquire_token_popup(this: &PublicClientApplication, request: &JsValue) -> Promise;

        #[wasm_bindgen(method, js_name = addEventCallback)]
        fn add_event_callback(this: &PublicClientApplication, callback: &Closure<dyn FnMut(JsValue)>) -> JsValue;
    }

    type AccountListener = Rc<RefCell<Option<Rc<dyn Fn()>>>>;

    /// [`IdentityClient`] over a live `PublicClientApplication`.
    pub struct MsalClient {
        app: PublicClientApplication,
        status: Rc<Cell<InteractionStatus>>,
        account_listener: AccountListener,
        _events: Closure<dyn FnMut(JsValue)>,
    }

    impl MsalClient {
        /// Construct the SDK client; fails when the SDK script is missing or rejects the config.
        pub fn new(config: &AuthConfig) -> Result<Self, ProviderError> {
            let settings = to_js(&config.provider_settings())?;
            let app = PublicClientApplication::new(&settings).map_err(provider_error)?;

            let status = Rc::new(Cell::new(InteractionStatus::Startup));
            let account_listener: AccountListener = Rc::new(RefCell::new(None));
            let events = {
                let status = Rc::clone(&status);
                let account_listener = Rc::clone(&account_listener);
                Closure::<dyn FnMut(JsValue)>::new(move |message: JsValue| {
                    let Some(event_type) = string_field(&message, "eventType") else {
                        return;
                    };
                    let interaction_type = string_field(&message, "interactionType");
                    status.set(next_interaction_status(&event_type, interaction_type.as_deref(), status.get()));
                    if is_account_event(&event_type) {
                        notify_later(&account_listener);
                    }
                })
            };
            app.add_event_callback(&events);

            Ok(Self { app, status, account_listener, _events: events })
        }

        /// The SDK's own account object for `account`, so it keeps its non-JSON fields.
        fn native_account(&self, account: &Account) -> Result<JsValue, ProviderError> {
            let native = self.app.get_account_by_home_id(&account.home_account_id);
            if native.is_null() || native.is_undefined() { to_js(account) } else { Ok(native) }
        }

        fn token_request(&self, request: &TokenRequest) -> Result<JsValue, ProviderError> {
            let value = to_js(request)?;
            if let Some(account) = &request.account {
                Reflect::set(&value, &JsValue::from_str("account"), &self.native_account(account)?)
                    .map_err(provider_error)?;
            }
            Ok(value)
        }
    }

    #[async_trait(?Send)]
    impl IdentityClient for MsalClient {
        async fn initialize(&self) -> Result<(), ProviderError> {
            settle(self.app.initialize()).await.map(|_| ())
        }

        async fn handle_redirect_promise(&self) -> Result<Option<AuthResult>, ProviderError> {
            let value = settle(self.app.handle_redirect_promise()).await?;
            if value.is_null() || value.is_undefined() {
                return Ok(None);
            }
            from_js(&value).map(Some)
        }

        fn get_all_accounts(&self) -> Vec<Account> {
            from_js(&self.app.get_all_accounts()).unwrap_or_else(|e| {
                log::warn!("unreadable account cache: {e}");
                Vec::new()
            })
        }

        fn get_active_account(&self) -> Option<Account> {
            let value = self.app.get_active_account();
            if value.is_null() || value.is_undefined() {
                return None;
            }
            from_js(&value).ok()
        }

        fn set_active_account(&self, account: &Account) {
            match self.native_account(account) {
                Ok(native) => self.app.set_active_account(&native),
                Err(e) => log::warn!("set active account failed: {e}"),
            }
        }

        async fn login_popup(&self, request: &TokenRequest) -> Result<AuthResult, ProviderError> {
            let value = settle(self.app.login_popup(&self.token_request(request)?)).await?;
            from_js(&value)
        }

        async fn login_redirect(&self, request: &TokenRequest) -> Result<(), ProviderError> {
            settle(self.app.login_redirect(&self.token_request(request)?)).await.map(|_| ())
        }

        async fn logout_popup(&self) -> Result<(), ProviderError> {
            settle(self.app.logout_popup()).await.map(|_| ())
        }

        async fn logout_redirect(&self, request: &LogoutRequest) -> Result<(), ProviderError> {
            settle(self.app.logout_redirect(&to_js(request)?)).await.map(|_| ())
        }

        async fn acquire_token_silent(&self, request: &TokenRequest) -> Result<AuthResult, ProviderError> {
            let value = settle(self.app.acquire_token_silent(&self.token_request(request)?)).await?;
            from_js(&value)
        }

        async fn acquire_token_popup(&self, request: &TokenRequest) -> Result<AuthResult, ProviderError> {
            let value = settle(self.app.acquire_token_popup(&self.token_request(request)?)).await?;
            from_js(&value)
        }

        fn interaction_status(&self) -> InteractionStatus {
            self.status.get()
        }

        fn on_accounts_changed(&self, callback: Box<dyn Fn()>) {
            self.account_listener.replace(Some(Rc::from(callback)));
        }
    }

    /// Run the account listener on a later tick, outside the SDK call that fired the event.
    fn notify_later(listener: &AccountListener) {
        let Some(callback) = listener.borrow().clone() else {
            return;
        };
        wasm_bindgen_futures::spawn_local(async move { callback() });
    }

    async fn settle(promise: Promise) -> Result<JsValue, ProviderError> {
        JsFuture::from(promise).await.map_err(provider_error)
    }

    fn string_field(value: &JsValue, key: &str) -> Option<String> {
        Reflect::get(value, &JsValue::from_str(key)).ok().and_then(|v| v.as_string())
    }

    fn to_js<T: Serialize>(value: &T) -> Result<JsValue, ProviderError> {
        let text = serde_json::to_string(value).map_err(|e| ProviderError::new(e.to_string()))?;
        JSON::parse(&text).map_err(provider_error)
    }

    fn from_js<T: DeserializeOwned>(value: &JsValue) -> Result<T, ProviderError> {
        let text: String = JSON::stringify(value).map_err(provider_error)?.into();
        serde_json::from_str(&text).map_err(|e| ProviderError::new(e.to_string()))
    }

    /// Reduce a thrown JS value to a [`ProviderError`].
    ///
    /// SDK errors keep their text in non-enumerable `Error` properties, so the
    /// known fields are read directly before falling back to the JSON form.
    fn provider_error(error: JsValue) -> ProviderError {
        if error.is_null() || error.is_undefined() {
            return ProviderError::from_value(None);
        }
        if let Some(text) = error.as_string() {
            return ProviderError::from_value(Some(&Value::String(text)));
        }
        let mut fields = serde_json::Map::new();
        for key in ["errorMessage", "message"] {
            if let Some(text) = string_field(&error, key) {
                fields.insert(key.to_owned(), Value::String(text));
            }
        }
        if fields.is_empty() {
            let json = JSON::stringify(&error)
                .ok()
                .and_then(|s| s.as_string())
                .and_then(|s| serde_json::from_str::<Value>(&s).ok());
            return ProviderError::from_value(json.as_ref());
        }
        ProviderError::from_value(Some(&Value::Object(fields)))
    }
}
