//! Users sub-client, server mode only.
//!
//! A user is the application's own customer entity; accounts connected
//! through the widget are attached to users with the one-time account token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::SdkError;
use crate::http::{Paginator, ZaboHttp};
use crate::resources::accounts::Account;
use crate::resources::require_param;

/// An application user with its attached accounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Sub-client for user management.
#[derive(Clone)]
pub struct Users {
    http: ZaboHttp,
}

impl Users {
    pub(crate) fn new(http: ZaboHttp) -> Self {
        Self { http }
    }

    /// Create a user from a freshly connected account.
    pub async fn create(&self, account_id: &str, account_token: &str) -> Result<User, SdkError> {
        require_param(account_id, "account_id")?;
        require_param(account_token, "account_token")?;
        self.http
            .post(
                "/users",
                &json!({ "id": account_id, "token": account_token }),
            )
            .await
    }

    pub async fn get(&self, user_id: &str) -> Result<User, SdkError> {
        require_param(user_id, "user_id")?;
        self.http.get(&format!("/users/{user_id}")).await
    }

    pub async fn list(&self, limit: Option<u32>) -> Result<Paginator<User>, SdkError> {
        let path = match limit {
            Some(limit) => format!("/users?limit={limit}"),
            None => "/users".to_string(),
        };
        self.http.get_list(&path).await
    }

    /// Attach another connected account to an existing user.
    pub async fn add_account(
        &self,
        user_id: &str,
        account_id: &str,
        account_token: &str,
    ) -> Result<User, SdkError> {
        require_param(user_id, "user_id")?;
        require_param(account_id, "account_id")?;
        require_param(account_token, "account_token")?;
        self.http
            .post(
                &format!("/users/{user_id}/accounts"),
                &json!({ "id": account_id, "token": account_token }),
            )
            .await
    }

    pub async fn remove_account(
        &self,
        user_id: &str,
        account_id: &str,
    ) -> Result<serde_json::Value, SdkError> {
        require_param(user_id, "user_id")?;
        require_param(account_id, "account_id")?;
        self.http
            .delete(&format!("/users/{user_id}/accounts/{account_id}"))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::signer::{HmacSigner, RequestSigner};
    use crate::config::{Config, Env};

    fn users() -> Users {
        let cfg = Config {
            env: Some(Env::Sandbox),
            api_key: Some("key".into()),
            secret_key: Some("secret".into()),
            auto_connect: false,
            ..Config::default()
        }
        .validate()
        .unwrap();
        let signer = RequestSigner::Hmac(HmacSigner::new("key", "secret"));
        Users::new(ZaboHttp::new(&cfg, signer))
    }

    #[tokio::test]
    async fn test_create_rejects_empty_token() {
        let err = users().create("acc-1", "").await.unwrap_err();
        assert!(matches!(err, SdkError::Config(_)));
    }

    #[tokio::test]
    async fn test_get_rejects_empty_user_id() {
        let err = users().get("").await.unwrap_err();
        assert!(err.to_string().contains("user_id"));
    }

    #[test]
    fn test_user_wire_shape() {
        let raw = r#"{"id":"u1","accounts":[{"id":"a1"}]}"#;
        let user: User = serde_json::from_str(raw).unwrap();
        assert_eq!(user.accounts.len(), 1);
    }
}
