//! Transactions sub-client: account transaction history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SdkError;
use crate::http::{Paginator, ZaboHttp};
use crate::resources::{require_param, AccountSlot};

/// A single account transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    /// Decimal string as sent on the wire.
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub initiated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub confirmed_at: Option<DateTime<Utc>>,
}

/// Sub-client for transaction history. Bound to the connected account in
/// embedded-host mode; server mode addresses an explicit user + account.
#[derive(Clone)]
pub struct Transactions {
    http: ZaboHttp,
    current: AccountSlot,
}

impl Transactions {
    pub(crate) fn new(http: ZaboHttp, current: AccountSlot) -> Self {
        Self { http, current }
    }

    pub async fn get(&self, txn_id: &str) -> Result<Transaction, SdkError> {
        require_param(txn_id, "txn_id")?;
        let account_id = self.require_connected().await?;
        self.http
            .get(&format!("/accounts/{account_id}/transactions/{txn_id}"))
            .await
    }

    pub async fn list(
        &self,
        currency: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Paginator<Transaction>, SdkError> {
        let account_id = self.require_connected().await?;
        let path = list_path(&format!("/accounts/{account_id}/transactions"), currency, limit);
        self.http.get_list(&path).await
    }

    /// Server mode: one transaction in a user's context.
    pub async fn get_for_user(
        &self,
        user_id: &str,
        account_id: &str,
        txn_id: &str,
    ) -> Result<Transaction, SdkError> {
        require_param(user_id, "user_id")?;
        require_param(account_id, "account_id")?;
        require_param(txn_id, "txn_id")?;
        self.http
            .get(&format!(
                "/users/{user_id}/accounts/{account_id}/transactions/{txn_id}"
            ))
            .await
    }

    /// Server mode: transaction history in a user's context.
    pub async fn list_for_user(
        &self,
        user_id: &str,
        account_id: &str,
        currency: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Paginator<Transaction>, SdkError> {
        require_param(user_id, "user_id")?;
        require_param(account_id, "account_id")?;
        let path = list_path(
            &format!("/users/{user_id}/accounts/{account_id}/transactions"),
            currency,
            limit,
        );
        self.http.get_list(&path).await
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

fn list_path(base: &str, currency: Option<&str>, limit: Option<u32>) -> String {
    let mut params = Vec::new();
    if let Some(currency) = currency {
        params.push(format!("currency={}", urlencoding::encode(currency)));
    }
    if let Some(limit) = limit {
        params.push(format!("limit={limit}"));
    }
    if params.is_empty() {
        base.to_string()
    } else {
        format!("{base}?{}", params.join("&"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_path_building() {
        assert_eq!(list_path("/x", None, None), "/x");
        assert_eq!(list_path("/x", Some("BTC"), None), "/x?currency=BTC");
        assert_eq!(
            list_path("/x", Some("BTC"), Some(10)),
            "/x?currency=BTC&limit=10"
        );
        assert_eq!(list_path("/x", None, Some(10)), "/x?limit=10");
    }

    #[test]
    fn test_transaction_wire_shape() {
        let raw = r#"{
            "id": "txn-1",
            "status": "confirmed",
            "currency": "ETH",
            "amount": "1.25",
            "initiated_at": "2026-05-01T10:00:00Z"
        }"#;
        let txn: Transaction = serde_json::from_str(raw).unwrap();
        assert_eq!(txn.amount.as_deref(), Some("1.25"));
        assert!(txn.confirmed_at.is_none());
    }
}
