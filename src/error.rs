//! Unified SDK error types.
//!
//! Every variant maps to a numeric code via [`SdkError::code`], mirroring the
//! codes the Zabo API itself uses, so callers can branch without string
//! matching.

use thiserror::Error;

/// Top-level SDK error.
#[derive(Error, Debug)]
pub enum SdkError {
    /// Missing or invalid initialization config (env, credentials, client id).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unauthorized cross-origin message or missing account connection.
    #[error("Authorization error: {0}")]
    Authorization(String),

    /// Operation not permitted in the current mode (decentralized restriction).
    #[error("Permission error: {0}")]
    Permission(String),

    /// The remote API rejected the request. Preserves the upstream status,
    /// message, and request id for support correlation.
    #[error("API error {status}: {message}")]
    Api {
        status: u16,
        message: String,
        request_id: Option<String>,
    },

    /// Connector-lifecycle or transport failure.
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectError),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Unexpected server response shape or broken internal invariant.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SdkError {
    /// Numeric error code carried by every error.
    pub fn code(&self) -> u16 {
        match self {
            SdkError::Config(_) => 400,
            SdkError::Authorization(_) => 401,
            SdkError::Permission(_) => 403,
            SdkError::Api { status, .. } => *status,
            SdkError::Connection(_) => 408,
            SdkError::Serde(_) => 500,
            SdkError::Internal(_) => 500,
        }
    }
}

/// Connector-lifecycle errors: widget timeout, closed window, refused host,
/// plain transport failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectError {
    #[error("Connection timed out")]
    Timeout,

    #[error("Connection closed")]
    Closed,

    #[error("Connection refused")]
    Refused,

    #[error("Transport failure: {0}")]
    Transport(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SdkError::Config("x".into()).code(), 400);
        assert_eq!(SdkError::Authorization("x".into()).code(), 401);
        assert_eq!(SdkError::Permission("x".into()).code(), 403);
        assert_eq!(
            SdkError::Api {
                status: 404,
                message: "missing".into(),
                request_id: None
            }
            .code(),
            404
        );
        assert_eq!(SdkError::Connection(ConnectError::Timeout).code(), 408);
        assert_eq!(SdkError::Internal("x".into()).code(), 500);
    }

    #[test]
    fn test_connect_error_messages() {
        assert_eq!(ConnectError::Refused.to_string(), "Connection refused");
        assert_eq!(ConnectError::Closed.to_string(), "Connection closed");
        assert_eq!(ConnectError::Timeout.to_string(), "Connection timed out");
    }

    #[test]
    fn test_connect_error_wraps_into_sdk_error() {
        let err: SdkError = ConnectError::Refused.into();
        assert!(matches!(
            err,
            SdkError::Connection(ConnectError::Refused)
        ));
    }
}
