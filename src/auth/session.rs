//! Session material: the OTP-bearing team session and the session cookie.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Name of the session cookie written on a successful connect and read back
/// to authorize subsequent embedded-host requests.
pub const SESSION_COOKIE: &str = "zabosession";

/// One-time-password-bearing session authorizing the WebSocket channel and
/// binding the connect widget to this SDK instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamSession {
    pub team_id: String,
    pub one_time_password: String,
    pub expires_at: DateTime<Utc>,
}

impl TeamSession {
    /// Whether the OTP is still usable.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session(expires_at: DateTime<Utc>) -> TeamSession {
        TeamSession {
            team_id: "team-1".into(),
            one_time_password: "otp-1".into(),
            expires_at,
        }
    }

    #[test]
    fn test_future_expiry_is_valid() {
        assert!(!session(Utc::now() + Duration::minutes(5)).is_expired());
    }

    #[test]
    fn test_past_expiry_is_expired() {
        assert!(session(Utc::now() - Duration::seconds(1)).is_expired());
    }

    #[test]
    fn test_deserializes_wire_shape() {
        let raw = r#"{
            "team_id": "team-1",
            "one_time_password": "otp-abc",
            "expires_at": "2027-01-01T00:00:00Z"
        }"#;
        let session: TeamSession = serde_json::from_str(raw).unwrap();
        assert_eq!(session.one_time_password, "otp-abc");
    }
}
