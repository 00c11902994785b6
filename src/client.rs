//! High-level facade: `Zabo`.
//!
//! `init` validates the configuration, selects the server or embedded-host
//! code path, builds the signed transport and the resource set, and exposes
//! status plus the callback-registration surface. Embedded-host `connect()`
//! is fire-and-forget through the connect controller; server `connect()`
//! resolves the team id.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use async_lock::RwLock;

use crate::auth::session::SESSION_COOKIE;
use crate::auth::signer::{HmacSigner, RequestSigner};
use crate::config::{AuthMode, Config, Env, ValidatedConfig};
use crate::connect::controller::{ConnectConfig, ConnectSessionController};
use crate::connect::host::HostEnvironment;
use crate::error::SdkError;
use crate::http::ZaboHttp;
use crate::resources::accounts::Account;
use crate::resources::teams::Team;
use crate::resources::{
    AccountSlot, Accounts, Currencies, Providers, ResourceSet, Teams, Trading, Transactions,
    Users,
};

/// SDK-wide connection status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ConnectionStatus {
    Offline = 0,
    Connecting = 1,
    Online = 2,
}

impl From<u8> for ConnectionStatus {
    fn from(value: u8) -> Self {
        match value {
            1 => Self::Connecting,
            2 => Self::Online,
            _ => Self::Offline,
        }
    }
}

/// Registered user callbacks. One slot each; last registration wins.
pub(crate) struct Callbacks {
    on_connection: RwLock<Option<Box<dyn Fn(Account) + Send + Sync>>>,
    on_error: RwLock<Option<Box<dyn Fn(SdkError) + Send + Sync>>>,
    on_event: RwLock<Option<Box<dyn Fn(&str, Option<serde_json::Value>) + Send + Sync>>>,
}

impl Callbacks {
    fn new() -> Self {
        Self {
            on_connection: RwLock::new(None),
            on_error: RwLock::new(None),
            on_event: RwLock::new(None),
        }
    }

    pub(crate) async fn connection(&self, account: Account) {
        match self.on_connection.read().await.as_ref() {
            Some(callback) => callback(account),
            None => tracing::debug!("connect succeeded with no connection callback registered"),
        }
    }

    pub(crate) async fn error(&self, error: SdkError) {
        match self.on_error.read().await.as_ref() {
            Some(callback) => callback(error),
            None => tracing::warn!("unhandled SDK error: {error}"),
        }
    }

    pub(crate) async fn event(&self, name: &str, metadata: Option<serde_json::Value>) {
        if let Some(callback) = self.on_event.read().await.as_ref() {
            callback(name, metadata);
        }
    }
}

/// The primary entry point for the Zabo SDK.
pub struct Zabo {
    cfg: ValidatedConfig,
    http: ZaboHttp,
    resources: ResourceSet,
    status: Arc<AtomicU8>,
    callbacks: Arc<Callbacks>,
    controller: Option<ConnectSessionController>,
    team: Arc<RwLock<Option<Team>>>,
    account: AccountSlot,
}

impl std::fmt::Debug for Zabo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Zabo").finish_non_exhaustive()
    }
}

impl Zabo {
    /// Initialize in server (API key) mode.
    ///
    /// With `auto_connect` (the default) the team id is resolved before this
    /// returns and the instance comes back online. Any validation failure
    /// rejects the whole call; there is no partially initialized SDK.
    pub async fn init(config: Config) -> Result<Self, SdkError> {
        let cfg = config.validate()?;
        match cfg.mode {
            AuthMode::Server { .. } => Self::init_server(cfg).await,
            AuthMode::Browser { .. } => Err(SdkError::Config(
                "client-id mode needs a host environment; use Zabo::init_with_host".into(),
            )),
        }
    }

    /// Initialize in embedded-host (client id) mode against the given host
    /// environment.
    pub async fn init_with_host(
        config: Config,
        host: Arc<dyn HostEnvironment>,
    ) -> Result<Self, SdkError> {
        let cfg = config.validate()?;
        match cfg.mode {
            AuthMode::Browser { .. } => Self::init_browser(cfg, host).await,
            AuthMode::Server { .. } => Err(SdkError::Config(
                "api-key mode does not take a host environment; use Zabo::init".into(),
            )),
        }
    }

    async fn init_server(cfg: ValidatedConfig) -> Result<Self, SdkError> {
        let AuthMode::Server {
            api_key,
            secret_key,
        } = &cfg.mode
        else {
            return Err(SdkError::Internal("server init without server mode".into()));
        };
        let signer = RequestSigner::Hmac(HmacSigner::new(api_key.clone(), secret_key.clone()));
        let http = ZaboHttp::new(&cfg, signer);
        let account: AccountSlot = Arc::new(RwLock::new(None));
        let resources = ResourceSet::for_server(&http, &account);

        let zabo = Self {
            cfg,
            http,
            resources,
            status: Arc::new(AtomicU8::new(ConnectionStatus::Offline as u8)),
            callbacks: Arc::new(Callbacks::new()),
            controller: None,
            team: Arc::new(RwLock::new(None)),
            account,
        };

        if zabo.cfg.auto_connect {
            zabo.connect().await?;
        }
        Ok(zabo)
    }

    async fn init_browser(
        cfg: ValidatedConfig,
        host: Arc<dyn HostEnvironment>,
    ) -> Result<Self, SdkError> {
        let AuthMode::Browser { client_id } = &cfg.mode else {
            return Err(SdkError::Internal(
                "embedded-host init without client-id mode".into(),
            ));
        };
        let client_id = client_id.clone();

        let (signer, token) = RequestSigner::bearer();
        if let Some(cookie) = host.read_cookie(SESSION_COOKIE) {
            *token.write().await = Some(cookie);
        }
        let http = ZaboHttp::new(&cfg, signer);
        let account: AccountSlot = Arc::new(RwLock::new(None));
        let resources = ResourceSet::for_browser(&http, &account, &client_id, cfg.decentralized);
        let status = Arc::new(AtomicU8::new(ConnectionStatus::Offline as u8));
        let callbacks = Arc::new(Callbacks::new());

        // The team always resolves; bad credentials fail init outright.
        let team = resources.teams().info().await?;
        tracing::debug!(team_id = %team.id, "team resolved");
        let team = Arc::new(RwLock::new(Some(team)));

        // Silent resume of an already-connected account. Best-effort: a stale
        // cookie just means connecting from scratch.
        let has_session = token.read().await.is_some();
        if has_session {
            match http.get::<Account>("/sessions/account").await {
                Ok(resumed) => {
                    tracing::info!(account_id = %resumed.id, "resumed connected account");
                    *account.write().await = Some(resumed);
                    status.store(ConnectionStatus::Online as u8, Ordering::SeqCst);
                }
                Err(e) => tracing::debug!("silent account resume failed: {e}"),
            }
        }

        let controller = ConnectSessionController::new(
            ConnectConfig {
                client_id,
                env: cfg.env,
                connect_host: cfg.connect_host.clone(),
                ws_host: cfg.ws_host.clone(),
            },
            host,
            resources.teams().clone(),
            Arc::clone(&callbacks),
            Arc::clone(&status),
            Arc::clone(&account),
            token,
        );

        Ok(Self {
            cfg,
            http,
            resources,
            status,
            callbacks,
            controller: Some(controller),
            team,
            account,
        })
    }

    // ── Connect ──────────────────────────────────────────────────────────

    /// Connect. Server mode resolves and returns the team id, moving status
    /// `Offline -> Connecting -> Online`. Embedded-host mode starts the
    /// widget flow and returns `None` immediately; results arrive through
    /// the registered callbacks.
    pub async fn connect(&self) -> Result<Option<String>, SdkError> {
        self.connect_with_provider(None).await
    }

    /// Connect with a preselected provider (embedded-host mode).
    pub async fn connect_with_provider(
        &self,
        provider: Option<&str>,
    ) -> Result<Option<String>, SdkError> {
        match &self.cfg.mode {
            AuthMode::Server { .. } => {
                self.set_status(ConnectionStatus::Connecting);
                let team = match self.resources.teams().info().await {
                    Ok(team) => team,
                    Err(e) => {
                        self.set_status(ConnectionStatus::Offline);
                        return Err(e);
                    }
                };
                if team.id.trim().is_empty() {
                    self.set_status(ConnectionStatus::Offline);
                    return Err(SdkError::Internal(
                        "no team id resolved for the configured credentials".into(),
                    ));
                }
                *self.team.write().await = Some(team.clone());
                self.set_status(ConnectionStatus::Online);
                tracing::info!(team_id = %team.id, "connected");
                Ok(Some(team.id))
            }
            AuthMode::Browser { .. } => match &self.controller {
                Some(controller) => {
                    controller.connect(provider).await;
                    Ok(None)
                }
                None => Err(SdkError::Internal(
                    "connect controller missing in embedded-host mode".into(),
                )),
            },
        }
    }

    // ── Callback registration (last wins) ────────────────────────────────

    pub async fn on_connection<F>(&self, callback: F) -> &Self
    where
        F: Fn(Account) + Send + Sync + 'static,
    {
        *self.callbacks.on_connection.write().await = Some(Box::new(callback));
        self
    }

    pub async fn on_error<F>(&self, callback: F) -> &Self
    where
        F: Fn(SdkError) + Send + Sync + 'static,
    {
        *self.callbacks.on_error.write().await = Some(Box::new(callback));
        self
    }

    pub async fn on_event<F>(&self, callback: F) -> &Self
    where
        F: Fn(&str, Option<serde_json::Value>) + Send + Sync + 'static,
    {
        *self.callbacks.on_event.write().await = Some(Box::new(callback));
        self
    }

    // ── State ────────────────────────────────────────────────────────────

    pub fn status(&self) -> ConnectionStatus {
        ConnectionStatus::from(self.status.load(Ordering::SeqCst))
    }

    fn set_status(&self, status: ConnectionStatus) {
        self.status.store(status as u8, Ordering::SeqCst);
    }

    pub fn env(&self) -> Env {
        self.cfg.env
    }

    /// The team resolved at init/connect time.
    pub async fn team(&self) -> Option<Team> {
        self.team.read().await.clone()
    }

    /// The currently connected account, if any.
    pub async fn current_account(&self) -> Option<Account> {
        self.account.read().await.clone()
    }

    // ── Resource accessors ───────────────────────────────────────────────

    pub fn accounts(&self) -> &Accounts {
        self.resources.accounts()
    }

    pub fn transactions(&self) -> &Transactions {
        self.resources.transactions()
    }

    pub fn currencies(&self) -> &Currencies {
        self.resources.currencies()
    }

    pub fn providers(&self) -> &Providers {
        self.resources.providers()
    }

    pub fn teams(&self) -> &Teams {
        self.resources.teams()
    }

    /// Server mode only.
    pub fn users(&self) -> Result<&Users, SdkError> {
        self.resources.users()
    }

    /// Embedded-host custodial mode only.
    pub fn trading(&self) -> Result<&Trading, SdkError> {
        self.resources.trading()
    }

    #[doc(hidden)]
    pub fn http(&self) -> &ZaboHttp {
        &self.http
    }
}
