//! Inbound connect-widget events: parsing and origin validation.
//!
//! Window messages and WebSocket frames share one wire shape: a JSON object
//! carrying the `zabo` marker field and an `eventName`. Anything that fails
//! to parse, or parses without the marker, is treated as not addressed to
//! the SDK and swallowed; the hosted widget shares its channel with
//! arbitrary other senders.

use serde::Deserialize;
use url::Url;

use crate::network::TRUSTED_ORIGIN_SUFFIX;
use crate::resources::accounts::Account;

/// Wire shape of a widget event.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectEvent {
    /// Marker field distinguishing SDK events from unrelated messages.
    #[serde(default)]
    pub zabo: bool,
    #[serde(rename = "eventName")]
    pub event_name: String,
    #[serde(default)]
    pub account: Option<Account>,
    #[serde(default)]
    pub error: Option<WidgetError>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

/// Error payload embedded in a `connectError` event.
#[derive(Debug, Clone, Deserialize)]
pub struct WidgetError {
    pub error_type: u16,
    pub message: String,
    #[serde(default)]
    pub request_id: Option<String>,
}

/// A classified widget event.
#[derive(Debug)]
pub enum EventKind {
    Success(Option<Account>),
    Error(Option<WidgetError>),
    Close,
    /// Forwarded to the generic event callback without touching state.
    Other {
        name: String,
        metadata: Option<serde_json::Value>,
    },
}

impl ConnectEvent {
    pub fn kind(self) -> EventKind {
        match self.event_name.as_str() {
            "connectSuccess" => EventKind::Success(self.account),
            "connectError" => EventKind::Error(self.error),
            "connectClose" => EventKind::Close,
            _ => EventKind::Other {
                name: self.event_name,
                metadata: self.metadata,
            },
        }
    }
}

/// Parse a raw message. `None` means "not for us": malformed JSON or a
/// missing marker, both swallowed deliberately.
pub fn parse_event(raw: &str) -> Option<ConnectEvent> {
    match serde_json::from_str::<ConnectEvent>(raw) {
        Ok(event) if event.zabo => Some(event),
        Ok(_) => {
            tracing::debug!("ignoring message without marker field");
            None
        }
        Err(e) => {
            tracing::debug!("ignoring unparseable message: {e}");
            None
        }
    }
}

/// Whether `origin` may deliver events: exact match against the connect host,
/// or a host under the trusted domain suffix.
pub fn origin_allowed(origin: &str, connect_host: &str) -> bool {
    if origin.trim_end_matches('/') == connect_host.trim_end_matches('/') {
        return true;
    }
    let Ok(url) = Url::parse(origin) else {
        return false;
    };
    let Some(host) = url.host_str() else {
        return false;
    };
    host.ends_with(TRUSTED_ORIGIN_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONNECT_HOST: &str = "https://connect.zabo.com";

    #[test]
    fn test_parse_success_event() {
        let raw = r#"{
            "zabo": true,
            "eventName": "connectSuccess",
            "account": {"id": "a1", "token": "tok"}
        }"#;
        let event = parse_event(raw).unwrap();
        match event.kind() {
            EventKind::Success(Some(account)) => assert_eq!(account.id, "a1"),
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn test_parse_error_event() {
        let raw = r#"{
            "zabo": true,
            "eventName": "connectError",
            "error": {"error_type": 403, "message": "denied"}
        }"#;
        let event = parse_event(raw).unwrap();
        match event.kind() {
            EventKind::Error(Some(error)) => {
                assert_eq!(error.error_type, 403);
                assert_eq!(error.message, "denied");
            }
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_event_is_other() {
        let raw = r#"{"zabo": true, "eventName": "widgetResize", "metadata": {"h": 640}}"#;
        match parse_event(raw).unwrap().kind() {
            EventKind::Other { name, metadata } => {
                assert_eq!(name, "widgetResize");
                assert!(metadata.is_some());
            }
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn test_missing_marker_is_swallowed() {
        assert!(parse_event(r#"{"eventName": "connectSuccess"}"#).is_none());
    }

    #[test]
    fn test_malformed_json_is_swallowed() {
        assert!(parse_event("not json at all {").is_none());
        assert!(parse_event(r#"{"zabo": true}"#).is_none());
    }

    #[test]
    fn test_origin_exact_match_allowed() {
        assert!(origin_allowed(CONNECT_HOST, CONNECT_HOST));
        assert!(origin_allowed("https://connect.zabo.com/", CONNECT_HOST));
    }

    #[test]
    fn test_origin_trusted_suffix_allowed() {
        assert!(origin_allowed("https://app.zabo.com", CONNECT_HOST));
        assert!(origin_allowed("https://widget.zabo.com", CONNECT_HOST));
    }

    #[test]
    fn test_origin_lookalike_rejected() {
        assert!(!origin_allowed("https://evil.example.com", CONNECT_HOST));
        assert!(!origin_allowed("https://notzabo.com", CONNECT_HOST));
        assert!(!origin_allowed("https://zabo.com.evil.net", CONNECT_HOST));
        assert!(!origin_allowed("garbage", CONNECT_HOST));
    }
}
