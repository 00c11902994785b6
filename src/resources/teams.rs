//! Teams sub-client: the registered API consumer entity and its session.

use async_lock::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::auth::session::TeamSession;
use crate::error::SdkError;
use crate::http::ZaboHttp;

/// The registered API consumer, resolved via credentials at init time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Sub-client for team info and the OTP-bearing team session.
#[derive(Clone)]
pub struct Teams {
    http: ZaboHttp,
    /// Present in embedded-host mode; appended to public team endpoints.
    client_id: Option<String>,
    session: Arc<RwLock<Option<TeamSession>>>,
}

impl Teams {
    pub(crate) fn new(http: ZaboHttp, client_id: Option<String>) -> Self {
        Self {
            http,
            client_id,
            session: Arc::new(RwLock::new(None)),
        }
    }

    /// Resolve the team behind the configured credentials.
    pub async fn info(&self) -> Result<Team, SdkError> {
        self.http.get_public(&self.path("/teams/info")).await
    }

    /// The current team session. Fetched lazily, cached, refreshed once
    /// `expires_at` has passed.
    pub async fn session(&self) -> Result<TeamSession, SdkError> {
        {
            let cached = self.session.read().await;
            if let Some(session) = cached.as_ref() {
                if !session.is_expired() {
                    return Ok(session.clone());
                }
            }
        }

        let fresh: TeamSession = self.http.get_public(&self.path("/teams/session")).await?;
        tracing::debug!(team_id = %fresh.team_id, "refreshed team session");
        *self.session.write().await = Some(fresh.clone());
        Ok(fresh)
    }

    fn path(&self, base: &str) -> String {
        match &self.client_id {
            Some(client_id) => {
                format!("{base}?client_id={}", urlencoding::encode(client_id))
            }
            None => base.to_string(),
        }
    }
}
