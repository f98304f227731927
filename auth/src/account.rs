//! Signed-in principal types.
//!
//! DESIGN
//! ======
//! [`Account`] mirrors the provider's cached account record so it can cross
//! the JS boundary through JSON unchanged. [`Identity`] is the trimmed view the
//! UI renders; it keeps the full account for later token requests.

#[cfg(test)]
#[path = "account_test.rs"]
mod account_test;

use serde::{Deserialize, Serialize};

/// Provider account record as cached in session storage.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Provider-wide handle; used to look the account up again for token calls.
    pub home_account_id: String,
    /// Object id of the user within the tenant.
    #[serde(default)]
    pub local_account_id: String,
    /// Login identifier (email or UPN).
    #[serde(default)]
    pub username: String,
    /// Display name, when the provider returned one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub tenant_id: String,
    /// Authority host that issued the account (e.g. `login.microsoftonline.com`).
    #[serde(default)]
    pub environment: String,
}

impl Account {
    /// Whether two records refer to the same provider account.
    #[must_use]
    pub fn same_account(&self, other: &Account) -> bool {
        self.home_account_id == other.home_account_id
    }
}

/// The active signed-in user as exposed to the UI.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub name: String,
    pub email: String,
    pub account: Account,
}

impl From<Account> for Identity {
    fn from(account: Account) -> Self {
        let name = account
            .name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| account.username.clone());
        Self { id: account.local_account_id.clone(), name, email: account.username.clone(), account }
    }
}
