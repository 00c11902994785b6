//! Low-level HTTP transport: `ZaboHttp`.
//!
//! One choke point for auth injection, the decentralized-mode guard, and
//! status-to-error mapping. Resource sub-clients build paths and call the
//! typed helpers; they never see a raw `reqwest` error.

use std::time::Duration;

use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;

use crate::auth::signer::RequestSigner;
use crate::config::{ApiVersion, ValidatedConfig};
use crate::error::{ConnectError, SdkError};
use crate::http::pagination::{ListEnvelope, Paginator};

/// Error body returned by the Zabo API.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
    #[serde(default)]
    request_id: Option<String>,
}

/// Low-level HTTP client for the Zabo REST API.
#[derive(Clone)]
pub struct ZaboHttp {
    base_url: String,
    api_version: ApiVersion,
    client: Client,
    signer: RequestSigner,
    decentralized: bool,
    send_app_crypto_data: bool,
}

impl ZaboHttp {
    pub(crate) fn new(cfg: &ValidatedConfig, signer: RequestSigner) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(10)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            base_url: cfg.api_host.clone(),
            api_version: cfg.api_version,
            client,
            signer,
            decentralized: cfg.decentralized,
            send_app_crypto_data: cfg.send_app_crypto_data,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Version-prefixed URL for a resource path (`/accounts/a1` and so on).
    fn url(&self, path: &str) -> String {
        format!("{}/{}{}", self.base_url, self.api_version.as_str(), path)
    }

    // ── Typed helpers ────────────────────────────────────────────────────

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, SdkError> {
        self.request(Method::GET, &self.url(path), None::<&()>, true)
            .await
    }

    /// GET without an auth header in bearer mode. Server mode still signs.
    pub async fn get_public<T: DeserializeOwned>(&self, path: &str) -> Result<T, SdkError> {
        self.request(Method::GET, &self.url(path), None::<&()>, false)
            .await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, SdkError> {
        self.request(Method::POST, &self.url(path), Some(body), true)
            .await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, SdkError> {
        self.request(Method::DELETE, &self.url(path), None::<&()>, true)
            .await
    }

    /// GET a cursor-paginated list and wrap it in a [`Paginator`].
    pub async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Paginator<T>, SdkError> {
        let envelope = self.get_envelope(path, true).await?;
        Ok(Paginator::new(self.clone(), envelope))
    }

    /// Fetch one page. `versioned` is false for `next_uri` continuations,
    /// which are already rooted at the API host.
    pub(crate) async fn get_envelope<T: DeserializeOwned>(
        &self,
        path: &str,
        versioned: bool,
    ) -> Result<ListEnvelope<T>, SdkError> {
        let url = if versioned {
            self.url(path)
        } else {
            format!("{}{}", self.base_url, path)
        };
        self.request(Method::GET, &url, None::<&()>, true).await
    }

    // ── Core request path ────────────────────────────────────────────────

    async fn request<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
        authenticate: bool,
    ) -> Result<T, SdkError> {
        if self.decentralized && !self.send_app_crypto_data {
            return Err(SdkError::Permission(
                "decentralized mode requires `send_app_crypto_data` to call the API".into(),
            ));
        }

        // The body is serialized once so the signed bytes are exactly the
        // bytes sent.
        let body_str = match body {
            Some(b) => serde_json::to_string(b)?,
            None => String::new(),
        };

        tracing::debug!(%method, %url, "api request");

        let mut req = self.client.request(method, url);
        req = self.signer.apply(req, url, &body_str, authenticate).await?;
        if body.is_some() {
            req = req
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body_str);
        }

        let resp = req.send().await.map_err(|e| {
            if e.is_timeout() {
                SdkError::Connection(ConnectError::Timeout)
            } else {
                SdkError::Connection(ConnectError::Transport(e.to_string()))
            }
        })?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| SdkError::Connection(ConnectError::Transport(e.to_string())))?;

        if status.is_success() {
            return serde_json::from_str(&text).map_err(|e| {
                SdkError::Internal(format!("unexpected response shape: {e} (body: {text})"))
            });
        }

        // Upstream errors keep their status, message, and request id.
        let (message, request_id) = match serde_json::from_str::<ApiErrorBody>(&text) {
            Ok(body) => (body.message, body.request_id),
            Err(_) => (text, None),
        };
        tracing::warn!(status = status.as_u16(), %message, "api error");
        Err(SdkError::Api {
            status: status.as_u16(),
            message,
            request_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Env};

    fn http(decentralized: bool, opt_in: bool) -> ZaboHttp {
        let cfg = Config {
            env: Some(Env::Sandbox),
            client_id: Some("client-1".into()),
            decentralized,
            send_app_crypto_data: opt_in,
            ..Config::default()
        }
        .validate()
        .unwrap();
        let (signer, _) = RequestSigner::bearer();
        ZaboHttp::new(&cfg, signer)
    }

    #[test]
    fn test_url_is_version_prefixed() {
        let http = http(false, false);
        assert_eq!(
            http.url("/accounts/a1"),
            "https://api.zabo-sandbox.com/v1/accounts/a1"
        );
    }

    #[tokio::test]
    async fn test_decentralized_without_opt_in_is_permission_error() {
        let http = http(true, false);
        let err = http.get::<serde_json::Value>("/currencies").await.unwrap_err();
        assert!(matches!(err, SdkError::Permission(_)));
        assert_eq!(err.code(), 403);
    }

    #[test]
    fn test_api_error_body_parses_request_id() {
        let body: ApiErrorBody =
            serde_json::from_str(r#"{"message":"nope","request_id":"req-9"}"#).unwrap();
        assert_eq!(body.request_id.as_deref(), Some("req-9"));
    }
}
