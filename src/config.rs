//! SDK configuration: environment, credentials, mode selection.
//!
//! The public [`Config`] is a plain struct with named fields and defaults.
//! `Zabo::init` runs it through [`Config::validate`], which either rejects it
//! with a configuration error or produces the internal [`ValidatedConfig`]
//! with the mode and hosts fully resolved. Validation never partially
//! succeeds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SdkError;
use crate::network;

/// Target environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Env {
    Sandbox,
    Live,
}

impl Env {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sandbox => "sandbox",
            Self::Live => "live",
        }
    }

    /// Default REST API host for this environment.
    pub fn api_url(&self) -> &'static str {
        match self {
            Self::Sandbox => network::SANDBOX_API_URL,
            Self::Live => network::LIVE_API_URL,
        }
    }

    /// Default WebSocket host for this environment.
    pub fn ws_url(&self) -> &'static str {
        match self {
            Self::Sandbox => network::SANDBOX_WS_URL,
            Self::Live => network::LIVE_WS_URL,
        }
    }
}

impl FromStr for Env {
    type Err = SdkError;

    // Case-insensitive: "Sandbox" and "LIVE" are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sandbox" => Ok(Self::Sandbox),
            "live" => Ok(Self::Live),
            other => Err(SdkError::Config(format!(
                "invalid env `{other}`, expected `sandbox` or `live`"
            ))),
        }
    }
}

impl fmt::Display for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Recognized API versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApiVersion {
    #[serde(rename = "v0")]
    V0,
    #[serde(rename = "v1")]
    V1,
}

impl ApiVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V0 => "v0",
            Self::V1 => "v1",
        }
    }
}

impl FromStr for ApiVersion {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "v0" => Ok(Self::V0),
            "v1" => Ok(Self::V1),
            other => Err(SdkError::Config(format!(
                "invalid api_version `{other}`, expected `v0` or `v1`"
            ))),
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Initialization options for [`crate::client::Zabo`].
///
/// Credentials select the mode: `api_key` + `secret_key` for server mode,
/// `client_id` for embedded-host mode. The struct is consumed by `init`;
/// re-initialization replaces the configuration wholesale.
#[derive(Debug, Clone)]
pub struct Config {
    /// Required. `Env::Sandbox` or `Env::Live`.
    pub env: Option<Env>,
    /// Embedded-host mode credential.
    pub client_id: Option<String>,
    /// Server mode credential (paired with `secret_key`).
    pub api_key: Option<String>,
    /// Server mode credential (paired with `api_key`).
    pub secret_key: Option<String>,
    /// Server mode: connect immediately during init. Default true.
    pub auto_connect: bool,
    /// Defaults to the latest recognized version.
    pub api_version: Option<ApiVersion>,
    /// Talk directly to a blockchain node rather than the custodial API.
    pub decentralized: bool,
    /// Opt-in to sending application data while in decentralized mode.
    pub send_app_crypto_data: bool,
    /// Override the REST API host (self-hosted or test deployments).
    pub api_host: Option<String>,
    /// Override the connect widget host.
    pub connect_host: Option<String>,
    /// Override the WebSocket host.
    pub ws_host: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            env: None,
            client_id: None,
            api_key: None,
            secret_key: None,
            auto_connect: true,
            api_version: None,
            decentralized: false,
            send_app_crypto_data: false,
            api_host: None,
            connect_host: None,
            ws_host: None,
        }
    }
}

/// Credential mode, fixed at init time.
#[derive(Debug, Clone)]
pub enum AuthMode {
    /// HMAC-signed requests with an API key pair.
    Server { api_key: String, secret_key: String },
    /// Bearer-token requests on behalf of an embedded host application.
    Browser { client_id: String },
}

/// The result of successful validation: every field resolved, no options left
/// to second-guess downstream.
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    pub env: Env,
    pub mode: AuthMode,
    pub api_version: ApiVersion,
    pub auto_connect: bool,
    pub decentralized: bool,
    pub send_app_crypto_data: bool,
    pub api_host: String,
    pub connect_host: String,
    pub ws_host: String,
}

impl Config {
    pub(crate) fn validate(self) -> Result<ValidatedConfig, SdkError> {
        let env = self.env.ok_or_else(|| {
            SdkError::Config("missing required field `env` (`sandbox` or `live`)".into())
        })?;

        let mode = match (self.api_key, self.secret_key, self.client_id) {
            (Some(api_key), Some(secret_key), _) => {
                if api_key.trim().is_empty() || secret_key.trim().is_empty() {
                    return Err(SdkError::Config(
                        "server mode requires non-empty `api_key` and `secret_key`".into(),
                    ));
                }
                AuthMode::Server {
                    api_key,
                    secret_key,
                }
            }
            (Some(_), None, _) | (None, Some(_), _) => {
                return Err(SdkError::Config(
                    "server mode requires both `api_key` and `secret_key`".into(),
                ));
            }
            (None, None, Some(client_id)) => {
                if client_id.trim().is_empty() {
                    return Err(SdkError::Config(
                        "embedded-host mode requires a non-empty `client_id`".into(),
                    ));
                }
                AuthMode::Browser { client_id }
            }
            (None, None, None) => {
                return Err(SdkError::Config(
                    "either `api_key` + `secret_key` or `client_id` is required".into(),
                ));
            }
        };

        Ok(ValidatedConfig {
            env,
            mode,
            api_version: self.api_version.unwrap_or(ApiVersion::V1),
            auto_connect: self.auto_connect,
            decentralized: self.decentralized,
            send_app_crypto_data: self.send_app_crypto_data,
            api_host: trim_host(self.api_host.unwrap_or_else(|| env.api_url().to_string())),
            connect_host: trim_host(
                self.connect_host
                    .unwrap_or_else(|| network::CONNECT_URL.to_string()),
            ),
            ws_host: trim_host(self.ws_host.unwrap_or_else(|| env.ws_url().to_string())),
        })
    }
}

fn trim_host(host: String) -> String {
    host.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server_config() -> Config {
        Config {
            env: Some(Env::Sandbox),
            api_key: Some("key".into()),
            secret_key: Some("secret".into()),
            ..Config::default()
        }
    }

    #[test]
    fn test_missing_env_rejected() {
        let err = Config {
            api_key: Some("key".into()),
            secret_key: Some("secret".into()),
            ..Config::default()
        }
        .validate()
        .unwrap_err();
        assert!(matches!(err, SdkError::Config(_)));
        assert_eq!(err.code(), 400);
    }

    #[test]
    fn test_missing_credentials_rejected() {
        let err = Config {
            env: Some(Env::Live),
            ..Config::default()
        }
        .validate()
        .unwrap_err();
        assert!(matches!(err, SdkError::Config(_)));
    }

    #[test]
    fn test_partial_server_credentials_rejected() {
        let err = Config {
            env: Some(Env::Sandbox),
            api_key: Some("key".into()),
            ..Config::default()
        }
        .validate()
        .unwrap_err();
        assert!(err.to_string().contains("both"));
    }

    #[test]
    fn test_empty_client_id_rejected() {
        let err = Config {
            env: Some(Env::Sandbox),
            client_id: Some("  ".into()),
            ..Config::default()
        }
        .validate()
        .unwrap_err();
        assert!(matches!(err, SdkError::Config(_)));
    }

    #[test]
    fn test_server_mode_selected() {
        let cfg = server_config().validate().unwrap();
        assert!(matches!(cfg.mode, AuthMode::Server { .. }));
        assert_eq!(cfg.api_version, ApiVersion::V1);
        assert!(cfg.auto_connect);
        assert_eq!(cfg.api_host, "https://api.zabo-sandbox.com");
    }

    #[test]
    fn test_browser_mode_selected() {
        let cfg = Config {
            env: Some(Env::Live),
            client_id: Some("client-1".into()),
            ..Config::default()
        }
        .validate()
        .unwrap();
        assert!(matches!(cfg.mode, AuthMode::Browser { ref client_id } if client_id == "client-1"));
        assert_eq!(cfg.api_host, "https://api.zabo.com");
        assert_eq!(cfg.connect_host, "https://connect.zabo.com");
    }

    #[test]
    fn test_host_overrides_trim_trailing_slash() {
        let cfg = Config {
            api_host: Some("http://127.0.0.1:9000/".into()),
            ..server_config()
        }
        .validate()
        .unwrap();
        assert_eq!(cfg.api_host, "http://127.0.0.1:9000");
    }

    #[test]
    fn test_env_parse_case_insensitive() {
        assert_eq!("SANDBOX".parse::<Env>().unwrap(), Env::Sandbox);
        assert_eq!("Live".parse::<Env>().unwrap(), Env::Live);
        assert!("prod".parse::<Env>().is_err());
    }

    #[test]
    fn test_api_version_parse() {
        assert_eq!("v0".parse::<ApiVersion>().unwrap(), ApiVersion::V0);
        assert_eq!("v1".parse::<ApiVersion>().unwrap(), ApiVersion::V1);
        assert!("v2".parse::<ApiVersion>().is_err());
    }
}
