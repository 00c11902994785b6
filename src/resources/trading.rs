//! Trading sub-client, embedded-host custodial mode only.
//!
//! Requires a connected account; every path is scoped to it.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::SdkError;
use crate::http::{ListEnvelope, ZaboHttp};
use crate::resources::{require_param, AccountSlot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingSymbol {
    pub base_currency: String,
    pub quote_currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub base_currency: Option<String>,
    #[serde(default)]
    pub quote_currency: Option<String>,
    #[serde(default)]
    pub side: Option<OrderSide>,
    /// Decimal strings as sent on the wire.
    #[serde(default)]
    pub base_amount: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
}

/// Sub-client for trading on the connected account.
#[derive(Clone)]
pub struct Trading {
    http: ZaboHttp,
    current: AccountSlot,
}

impl Trading {
    pub(crate) fn new(http: ZaboHttp, current: AccountSlot) -> Self {
        Self { http, current }
    }

    pub async fn symbols(&self) -> Result<Vec<TradingSymbol>, SdkError> {
        let id = self.require_connected().await?;
        let page: ListEnvelope<TradingSymbol> = self
            .http
            .get(&format!("/accounts/{id}/trading/symbols"))
            .await?;
        Ok(page.data)
    }

    pub async fn orders(&self) -> Result<Vec<Order>, SdkError> {
        let id = self.require_connected().await?;
        let page: ListEnvelope<Order> = self
            .http
            .get(&format!("/accounts/{id}/trading/orders"))
            .await?;
        Ok(page.data)
    }

    /// Place an order. `price` of `None` means a market order.
    pub async fn create_order(
        &self,
        base_currency: &str,
        quote_currency: &str,
        side: OrderSide,
        base_amount: &str,
        price: Option<&str>,
    ) -> Result<Order, SdkError> {
        require_param(base_currency, "base_currency")?;
        require_param(quote_currency, "quote_currency")?;
        require_param(base_amount, "base_amount")?;
        let id = self.require_connected().await?;
        self.http
            .post(
                &format!("/accounts/{id}/trading/orders"),
                &json!({
                    "base_currency": base_currency,
                    "quote_currency": quote_currency,
                    "side": side,
                    "base_amount": base_amount,
                    "price": price,
                }),
            )
            .await
    }

    pub async fn cancel_order(&self, order_id: &str) -> Result<Order, SdkError> {
        require_param(order_id, "order_id")?;
        let id = self.require_connected().await?;
        self.http
            .delete(&format!("/accounts/{id}/trading/orders/{order_id}"))
            .await
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::signer::RequestSigner;
    use crate::config::{Config, Env};
    use async_lock::RwLock;
    use std::sync::Arc;

    fn trading() -> Trading {
        let cfg = Config {
            env: Some(Env::Sandbox),
            client_id: Some("client-1".into()),
            ..Config::default()
        }
        .validate()
        .unwrap();
        let (signer, _) = RequestSigner::bearer();
        Trading::new(ZaboHttp::new(&cfg, signer), Arc::new(RwLock::new(None)))
    }

    #[tokio::test]
    async fn test_orders_without_connection_is_authorization_error() {
        let err = trading().orders().await.unwrap_err();
        assert!(matches!(err, SdkError::Authorization(_)));
    }

    #[tokio::test]
    async fn test_create_order_validates_params_first() {
        let err = trading()
            .create_order("", "USD", OrderSide::Buy, "1.0", None)
            .await
            .unwrap_err();
        assert!(matches!(err, SdkError::Config(_)));
    }

    #[test]
    fn test_order_side_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&OrderSide::Buy).unwrap(), r#""buy""#);
    }
}
