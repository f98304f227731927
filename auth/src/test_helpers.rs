//! Scripted identity client shared by coordinator and guard tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use async_trait::async_trait;

use crate::account::Account;
use crate::config::AuthConfig;
use crate::coordinator::AuthCoordinator;
use crate::error::ProviderError;
use crate::provider::{AuthResult, IdentityClient, InteractionStatus, LogoutRequest, TokenRequest};

pub fn account(id: &str) -> Account {
    Account {
        home_account_id: format!("{id}.tenant"),
        local_account_id: id.to_owned(),
        username: format!("{id}@example.com"),
        name: Some(format!("User {id}")),
        tenant_id: "tenant".to_owned(),
        environment: "login.microsoftonline.com".to_owned(),
    }
}

pub fn token(value: &str) -> AuthResult {
    AuthResult { account: None, access_token: value.to_owned(), scopes: Vec::new() }
}

/// Identity client whose answers are set up front and whose calls are logged.
#[derive(Default)]
pub struct MockIdentityClient {
    pub accounts: RefCell<Vec<Account>>,
    pub active: RefCell<Option<Account>>,
    pub init_error: RefCell<Option<ProviderError>>,
    pub redirect_response: RefCell<Option<Result<Option<AuthResult>, ProviderError>>>,
    pub login_popup_result: RefCell<Option<Result<AuthResult, ProviderError>>>,
    pub login_redirect_error: RefCell<Option<ProviderError>>,
    pub logout_error: RefCell<Option<ProviderError>>,
    pub silent_result: RefCell<Option<Result<AuthResult, ProviderError>>>,
    pub popup_result: RefCell<Option<Result<AuthResult, ProviderError>>>,
    pub status: Cell<InteractionStatus>,
    pub calls: RefCell<Vec<String>>,
    pub token_requests: RefCell<Vec<TokenRequest>>,
    pub logout_requests: RefCell<Vec<LogoutRequest>>,
    pub account_listener: RefCell<Option<Box<dyn Fn()>>>,
}

impl MockIdentityClient {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn with_cached(accounts: Vec<Account>) -> Rc<Self> {
        let mock = Self::new();
        mock.accounts.replace(accounts);
        mock
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls.borrow().iter().filter(|c| c.as_str() == call).count()
    }

    /// Simulate the provider adding an account to its cache and firing its event.
    pub fn push_account(&self, account: Account) {
        self.accounts.borrow_mut().push(account);
        if let Some(listener) = self.account_listener.borrow().as_ref() {
            listener();
        }
    }

    fn log(&self, call: &str) {
        self.calls.borrow_mut().push(call.to_owned());
    }
}

/// Coordinator over `mock` with default config.
pub fn coordinator(mock: &Rc<MockIdentityClient>) -> Rc<AuthCoordinator> {
    let client: Rc<dyn IdentityClient> = Rc::clone(mock) as Rc<dyn IdentityClient>;
    AuthCoordinator::new(client, AuthConfig::default())
}

#[async_trait(?Send)]
impl IdentityClient for MockIdentityClient {
    async fn initialize(&self) -> Result<(), ProviderError> {
        self.log("initialize");
        match self.init_error.borrow().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn handle_redirect_promise(&self) -> Result<Option<AuthResult>, ProviderError> {
        self.log("handle_redirect_promise");
        let response = self.redirect_response.borrow_mut().take().unwrap_or(Ok(None));
        if let Ok(Some(result)) = &response {
            if let Some(account) = &result.account {
                self.accounts.borrow_mut().push(account.clone());
            }
        }
        response
    }

    fn get_all_accounts(&self) -> Vec<Account> {
        self.accounts.borrow().clone()
    }

    fn get_active_account(&self) -> Option<Account> {
        self.active.borrow().clone()
    }

    fn set_active_account(&self, account: &Account) {
        self.log("set_active_account");
        self.active.replace(Some(account.clone()));
    }

    async fn login_popup(&self, request: &TokenRequest) -> Result<AuthResult, ProviderError> {
        self.log("login_popup");
        self.token_requests.borrow_mut().push(request.clone());
        let result = self
            .login_popup_result
            .borrow_mut()
            .take()
            .unwrap_or_else(|| Err(ProviderError::new("no login scripted")));
        if let Ok(AuthResult { account: Some(account), .. }) = &result {
            self.accounts.borrow_mut().push(account.clone());
        }
        result
    }

    async fn login_redirect(&self, request: &TokenRequest) -> Result<(), ProviderError> {
        self.log("login_redirect");
        self.token_requests.borrow_mut().push(request.clone());
        match self.login_redirect_error.borrow_mut().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn logout_popup(&self) -> Result<(), ProviderError> {
        self.log("logout_popup");
        if let Some(err) = self.logout_error.borrow_mut().take() {
            return Err(err);
        }
        self.accounts.borrow_mut().clear();
        self.active.replace(None);
        Ok(())
    }

    async fn logout_redirect(&self, request: &LogoutRequest) -> Result<(), ProviderError> {
        self.log("logout_redirect");
        self.logout_requests.borrow_mut().push(request.clone());
        match self.logout_error.borrow_mut().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn acquire_token_silent(&self, request: &TokenRequest) -> Result<AuthResult, ProviderError> {
        self.log("acquire_token_silent");
        self.token_requests.borrow_mut().push(request.clone());
        self.silent_result.borrow_mut().take().unwrap_or_else(|| Ok(token("silent-token")))
    }

    async fn acquire_token_popup(&self, request: &TokenRequest) -> Result<AuthResult, ProviderError> {
        self.log("acquire_token_popup");
        self.token_requests.borrow_mut().push(request.clone());
        self.popup_result.borrow_mut().take().unwrap_or_else(|| Ok(token("popup-token")))
    }

    fn interaction_status(&self) -> InteractionStatus {
        self.status.get()
    }

    fn on_accounts_changed(&self, callback: Box<dyn Fn()>) {
        self.account_listener.replace(Some(callback));
    }
}
