//! Resource sub-clients bound to a shared transport.
//!
//! The set of accessors differs by runtime mode, so it is a tagged variant
//! selected once at init time rather than a duck-typed bag: server mode gets
//! user-scoped accessors, embedded-host mode gets session-scoped accessors
//! plus trading (custodial only).

pub mod accounts;
pub mod currencies;
pub mod providers;
pub mod teams;
pub mod trading;
pub mod transactions;
pub mod users;

use std::sync::Arc;

use async_lock::RwLock;

use crate::error::SdkError;
use crate::http::ZaboHttp;

pub use accounts::{Account, Accounts, Balance};
pub use currencies::{Currencies, Currency};
pub use providers::{Provider, Providers};
pub use teams::{Team, Teams};
pub use trading::{Order, OrderSide, Trading, TradingSymbol};
pub use transactions::{Transaction, Transactions};
pub use users::{User, Users};

/// The connected account, shared by reference between the facade, the connect
/// controller, and the accessors that need account context.
pub type AccountSlot = Arc<RwLock<Option<Account>>>;

/// Resource accessors for server (API key) mode.
pub struct ServerResources {
    pub accounts: Accounts,
    pub users: Users,
    pub transactions: Transactions,
    pub currencies: Currencies,
    pub providers: Providers,
    pub teams: Teams,
}

/// Resource accessors for embedded-host (client id) mode.
pub struct BrowserResources {
    pub accounts: Accounts,
    pub transactions: Transactions,
    pub currencies: Currencies,
    pub providers: Providers,
    /// Absent in decentralized mode.
    pub trading: Option<Trading>,
    pub teams: Teams,
}

/// The full accessor set for one SDK instance.
pub enum ResourceSet {
    Server(ServerResources),
    Browser(BrowserResources),
}

impl ResourceSet {
    pub(crate) fn for_server(http: &ZaboHttp, account: &AccountSlot) -> Self {
        Self::Server(ServerResources {
            accounts: Accounts::new(http.clone(), Arc::clone(account)),
            users: Users::new(http.clone()),
            transactions: Transactions::new(http.clone(), Arc::clone(account)),
            currencies: Currencies::new(http.clone()),
            providers: Providers::new(http.clone()),
            teams: Teams::new(http.clone(), None),
        })
    }

    pub(crate) fn for_browser(
        http: &ZaboHttp,
        account: &AccountSlot,
        client_id: &str,
        decentralized: bool,
    ) -> Self {
        Self::Browser(BrowserResources {
            accounts: Accounts::new(http.clone(), Arc::clone(account)),
            transactions: Transactions::new(http.clone(), Arc::clone(account)),
            currencies: Currencies::new(http.clone()),
            providers: Providers::new(http.clone()),
            trading: (!decentralized)
                .then(|| Trading::new(http.clone(), Arc::clone(account))),
            teams: Teams::new(http.clone(), Some(client_id.to_string())),
        })
    }

    // ── Accessors shared by both modes ───────────────────────────────────

    pub fn accounts(&self) -> &Accounts {
        match self {
            Self::Server(r) => &r.accounts,
            Self::Browser(r) => &r.accounts,
        }
    }

    pub fn transactions(&self) -> &Transactions {
        match self {
            Self::Server(r) => &r.transactions,
            Self::Browser(r) => &r.transactions,
        }
    }

    pub fn currencies(&self) -> &Currencies {
        match self {
            Self::Server(r) => &r.currencies,
            Self::Browser(r) => &r.currencies,
        }
    }

    pub fn providers(&self) -> &Providers {
        match self {
            Self::Server(r) => &r.providers,
            Self::Browser(r) => &r.providers,
        }
    }

    pub fn teams(&self) -> &Teams {
        match self {
            Self::Server(r) => &r.teams,
            Self::Browser(r) => &r.teams,
        }
    }

    // ── Mode-specific accessors ──────────────────────────────────────────

    pub fn users(&self) -> Result<&Users, SdkError> {
        match self {
            Self::Server(r) => Ok(&r.users),
            Self::Browser(_) => Err(SdkError::Permission(
                "the users resource is only available in server mode".into(),
            )),
        }
    }

    pub fn trading(&self) -> Result<&Trading, SdkError> {
        match self {
            Self::Browser(r) => r.trading.as_ref().ok_or_else(|| {
                SdkError::Permission("trading is not available in decentralized mode".into())
            }),
            Self::Server(_) => Err(SdkError::Permission(
                "trading is only available in embedded-host mode".into(),
            )),
        }
    }
}

/// Reject empty path parameters before they turn into malformed URLs.
pub(crate) fn require_param(value: &str, name: &str) -> Result<(), SdkError> {
    if value.trim().is_empty() {
        return Err(SdkError::Config(format!("missing required `{name}`")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::signer::RequestSigner;
    use crate::config::{Config, Env};

    fn http() -> ZaboHttp {
        let cfg = Config {
            env: Some(Env::Sandbox),
            client_id: Some("client-1".into()),
            ..Config::default()
        }
        .validate()
        .unwrap();
        let (signer, _) = RequestSigner::bearer();
        ZaboHttp::new(&cfg, signer)
    }

    fn slot() -> AccountSlot {
        Arc::new(RwLock::new(None))
    }

    #[test]
    fn test_require_param() {
        assert!(require_param("a1", "account_id").is_ok());
        let err = require_param(" ", "account_id").unwrap_err();
        assert!(err.to_string().contains("account_id"));
    }

    #[test]
    fn test_server_set_has_users_but_no_trading() {
        let set = ResourceSet::for_server(&http(), &slot());
        assert!(set.users().is_ok());
        assert!(matches!(set.trading(), Err(SdkError::Permission(_))));
    }

    #[test]
    fn test_browser_set_has_trading_but_no_users() {
        let set = ResourceSet::for_browser(&http(), &slot(), "client-1", false);
        assert!(set.trading().is_ok());
        assert!(matches!(set.users(), Err(SdkError::Permission(_))));
    }

    #[test]
    fn test_decentralized_browser_set_disables_trading() {
        let set = ResourceSet::for_browser(&http(), &slot(), "client-1", true);
        assert!(matches!(set.trading(), Err(SdkError::Permission(_))));
    }
}
