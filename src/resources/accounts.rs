//! Accounts sub-client: the connected account and its balances.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SdkError;
use crate::http::ZaboHttp;
use crate::resources::providers::Provider;
use crate::resources::{require_param, AccountSlot};

/// A single currency balance. Amounts are decimal strings as sent on the
/// wire; the SDK does not do arithmetic on them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Balance {
    pub currency: String,
    pub balance: String,
}

/// A connected wallet/exchange account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    /// Session token delivered with a connect-success event. Persisted to the
    /// session cookie, never logged.
    #[serde(default)]
    pub token: Option<String>,
    /// Expiry of `token`.
    #[serde(default)]
    pub exp_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub provider: Option<Provider>,
    #[serde(default)]
    pub balances: Vec<Balance>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Sub-client for account operations.
#[derive(Clone)]
pub struct Accounts {
    http: ZaboHttp,
    current: AccountSlot,
}

impl Accounts {
    pub(crate) fn new(http: ZaboHttp, current: AccountSlot) -> Self {
        Self { http, current }
    }

    /// Fetch the currently connected account.
    pub async fn get(&self) -> Result<Account, SdkError> {
        let id = self.require_connected().await?;
        self.http.get(&format!("/accounts/{id}")).await
    }

    /// Balances of the connected account, optionally filtered by currency
    /// codes.
    pub async fn balances(&self, currencies: Option<&[&str]>) -> Result<Vec<Balance>, SdkError> {
        let id = self.require_connected().await?;
        let path = match currencies {
            Some(codes) if !codes.is_empty() => format!(
                "/accounts/{id}/balances?currencies={}",
                urlencoding::encode(&codes.join(","))
            ),
            _ => format!("/accounts/{id}/balances"),
        };
        let page: crate::http::ListEnvelope<Balance> = self.http.get(&path).await?;
        Ok(page.data)
    }

    /// Server mode: fetch an account in a user's context.
    pub async fn get_for_user(
        &self,
        user_id: &str,
        account_id: &str,
    ) -> Result<Account, SdkError> {
        require_param(user_id, "user_id")?;
        require_param(account_id, "account_id")?;
        self.http
            .get(&format!("/users/{user_id}/accounts/{account_id}"))
            .await
    }

    /// The connected account, if any.
    pub async fn current(&self) -> Option<Account> {
        self.current.read().await.clone()
    }

    async fn require_connected(&self) -> Result<String, SdkError> {
        self.current
            .read()
            .await
            .as_ref()
            .map(|a| a.id.clone())
            .ok_or_else(|| SdkError::Authorization("no account connected".into()))
    }
}
