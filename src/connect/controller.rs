//! Connect-session controller: the widget lifecycle state machine.
//!
//! Each `connect()` call spawns one attempt task. The task arms the 1-second
//! poll watcher and the 10-minute hard timeout together inside one select
//! loop, so the timer pair can only live and die as a unit. Every exit path
//! funnels through the same cleanup, and the state machine's first-wins
//! resolution keeps the callbacks to exactly one firing per attempt.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_lock::RwLock;
use chrono::Utc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::auth::session::SESSION_COOKIE;
use crate::client::{Callbacks, ConnectionStatus};
use crate::config::Env;
use crate::connect::events::{origin_allowed, parse_event, EventKind, WidgetError};
use crate::connect::host::{ConnectorWindow, HostEnvironment, HostMessage, OVERLAY_NAME};
use crate::connect::state::{ConnectStateMachine, Outcome};
use crate::error::{ConnectError, SdkError};
use crate::network;
use crate::resources::accounts::Account;
use crate::resources::teams::Teams;
use crate::resources::AccountSlot;
use crate::ws::{ws_url, ChannelEvent, ConnectChannel};

/// Hard ceiling on one attempt.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(600);

/// Window-watcher cadence.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

const HEALTH_CHECK_PATH: &str = "/health-check";

/// Static inputs to the connect flow.
#[derive(Debug, Clone)]
pub(crate) struct ConnectConfig {
    pub client_id: String,
    pub env: Env,
    pub connect_host: String,
    pub ws_host: String,
}

/// Drives connect attempts. At most one attempt is live at a time; a second
/// `connect()` while one is active is a logged no-op.
pub struct ConnectSessionController {
    cfg: ConnectConfig,
    host: Arc<dyn HostEnvironment>,
    teams: Teams,
    callbacks: Arc<Callbacks>,
    status: Arc<AtomicU8>,
    account: AccountSlot,
    token: Arc<RwLock<Option<String>>>,
    is_connecting: Arc<AtomicBool>,
    attempt: Mutex<Option<JoinHandle<()>>>,
}

impl ConnectSessionController {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        cfg: ConnectConfig,
        host: Arc<dyn HostEnvironment>,
        teams: Teams,
        callbacks: Arc<Callbacks>,
        status: Arc<AtomicU8>,
        account: AccountSlot,
        token: Arc<RwLock<Option<String>>>,
    ) -> Self {
        Self {
            cfg,
            host,
            teams,
            callbacks,
            status,
            account,
            token,
            is_connecting: Arc::new(AtomicBool::new(false)),
            attempt: Mutex::new(None),
        }
    }

    /// Whether an attempt is currently live.
    pub fn is_connecting(&self) -> bool {
        self.is_connecting.load(Ordering::SeqCst)
    }

    /// Start a connect attempt, optionally preselecting a provider.
    pub async fn connect(&self, provider: Option<&str>) {
        if self.is_connecting.swap(true, Ordering::SeqCst) {
            tracing::warn!("connect already in progress; ignoring");
            return;
        }

        // The OTP is best-effort: without it the widget still works, there is
        // just no WebSocket channel.
        let otp = match self.teams.session().await {
            Ok(session) if !session.is_expired() => Some(session.one_time_password),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!("no team session available: {e}");
                None
            }
        };

        let url = connector_url(
            &self.cfg,
            &self.host.origin(),
            provider,
            otp.as_deref(),
        );
        let channel_url = otp
            .as_deref()
            .map(|otp| ws_url(&self.cfg.ws_host, &self.cfg.client_id, otp));

        let attempt = Attempt {
            connect_host: self.cfg.connect_host.clone(),
            host: Arc::clone(&self.host),
            callbacks: Arc::clone(&self.callbacks),
            status: Arc::clone(&self.status),
            account: Arc::clone(&self.account),
            token: Arc::clone(&self.token),
            is_connecting: Arc::clone(&self.is_connecting),
            machine: ConnectStateMachine::new(),
            window: None,
            channel: None,
        };

        let handle = tokio::spawn(run_attempt(attempt, url, channel_url));
        if let Ok(mut guard) = self.attempt.lock() {
            *guard = Some(handle);
        }
    }
}

impl Drop for ConnectSessionController {
    fn drop(&mut self) {
        if let Ok(mut guard) = self.attempt.lock() {
            if let Some(handle) = guard.take() {
                handle.abort();
            }
        }
    }
}

/// Build the connector URL for a provider and optional OTP.
fn connector_url(
    cfg: &ConnectConfig,
    origin: &str,
    provider: Option<&str>,
    otp: Option<&str>,
) -> String {
    let mut url = match provider {
        Some(provider) => format!("{}/connect/{}", cfg.connect_host, provider),
        None => format!("{}/connect", cfg.connect_host),
    };
    url.push_str(&format!(
        "?client_id={}&origin={}&zabo_env={}&zabo_version={}",
        urlencoding::encode(&cfg.client_id),
        urlencoding::encode(origin),
        cfg.env.as_str(),
        network::SDK_VERSION,
    ));
    if let Some(otp) = otp {
        url.push_str(&format!("&otp={}", urlencoding::encode(otp)));
    }
    url
}

// ─── Attempt task ────────────────────────────────────────────────────────────

/// How an attempt ended, with whatever payload the ending carried.
enum Resolution {
    Success(Option<Account>),
    Error(Option<WidgetError>),
    /// The widget asked to close; not an error.
    Close,
    /// The user closed the window before an outcome was signaled.
    ClosedByUser,
    TimedOut,
    /// Health-check probe failed.
    Refused,
    /// The host could not open the overlay or window.
    HostFailure(SdkError),
}

/// Per-attempt state, owned by the attempt task.
struct Attempt {
    connect_host: String,
    host: Arc<dyn HostEnvironment>,
    callbacks: Arc<Callbacks>,
    status: Arc<AtomicU8>,
    account: AccountSlot,
    token: Arc<RwLock<Option<String>>>,
    is_connecting: Arc<AtomicBool>,
    machine: ConnectStateMachine,
    window: Option<Box<dyn ConnectorWindow>>,
    channel: Option<ConnectChannel>,
}

async fn run_attempt(mut attempt: Attempt, url: String, channel_url: Option<String>) {
    attempt.machine.begin_opening();

    // Reachability probe. Failure resolves the attempt immediately, no retry.
    let probe = format!("{}{}", attempt.connect_host, HEALTH_CHECK_PATH);
    if let Err(e) = attempt.host.health_check(&probe).await {
        tracing::warn!("connect host unreachable: {e}");
        attempt.resolve(Resolution::Refused).await;
        attempt.finish();
        return;
    }

    // Listeners first, so nothing signaled during window setup is missed.
    let mut messages = attempt.host.subscribe();
    let (channel_tx, mut channel_rx) = mpsc::channel(32);
    if let Some(channel_url) = &channel_url {
        match ConnectChannel::open(channel_url, channel_tx).await {
            Ok(channel) => attempt.channel = Some(channel),
            Err(e) => tracing::warn!("signaling channel unavailable: {e}"),
        }
    }
    let mut channel_open = attempt.channel.is_some();

    if let Err(e) = attempt.host.show_overlay(OVERLAY_NAME) {
        attempt.resolve(Resolution::HostFailure(e)).await;
        attempt.finish();
        return;
    }
    let window = match attempt.host.open_window(&url) {
        Ok(window) => window,
        Err(e) => {
            attempt.resolve(Resolution::HostFailure(e)).await;
            attempt.finish();
            return;
        }
    };
    window.focus();
    attempt.window = Some(window);
    attempt.machine.connector_opened();
    tracing::info!("connector opened, waiting for completion");

    // The timer pair: armed together here, dropped together when the loop
    // exits.
    let mut poll = tokio::time::interval(POLL_INTERVAL);
    poll.reset(); // skip the immediate first tick
    let timeout = tokio::time::sleep(CONNECT_TIMEOUT);
    tokio::pin!(timeout);

    let resolution = loop {
        tokio::select! {
            msg = messages.recv() => match msg {
                Some(msg) => {
                    if let Some(resolution) = attempt.handle_host_message(&msg).await {
                        break resolution;
                    }
                }
                // Host torn down; treat as an internal close.
                None => break Resolution::Close,
            },

            event = channel_rx.recv(), if channel_open => match event {
                Some(ChannelEvent::Frame(frame)) => {
                    if let Some(resolution) = attempt.dispatch(&frame).await {
                        break resolution;
                    }
                }
                Some(ChannelEvent::Closed { reason }) => {
                    tracing::warn!(%reason, "signaling channel closed");
                    attempt.channel = None;
                    channel_open = false;
                }
                None => channel_open = false,
            },

            _ = poll.tick() => {
                let closed = attempt
                    .window
                    .as_ref()
                    .map(|w| w.is_closed())
                    .unwrap_or(true);
                if closed {
                    break Resolution::ClosedByUser;
                }
            }

            () = &mut timeout => break Resolution::TimedOut,
        }
    };

    attempt.resolve(resolution).await;
    attempt.finish();
}

impl Attempt {
    /// Validate the sender, then dispatch. Unauthorized origins surface an
    /// authorization error without disturbing the attempt.
    async fn handle_host_message(&mut self, msg: &HostMessage) -> Option<Resolution> {
        if !origin_allowed(&msg.origin, &self.connect_host) {
            tracing::warn!(origin = %msg.origin, "rejected message from unauthorized origin");
            self.callbacks
                .error(SdkError::Authorization(format!(
                    "unauthorized message origin: {}",
                    msg.origin
                )))
                .await;
            return None;
        }
        self.dispatch(&msg.data).await
    }

    /// Classify one validated payload. `None` keeps the attempt waiting.
    async fn dispatch(&mut self, raw: &str) -> Option<Resolution> {
        let event = parse_event(raw)?;
        match event.kind() {
            EventKind::Success(account) => Some(Resolution::Success(account)),
            EventKind::Error(error) => Some(Resolution::Error(error)),
            EventKind::Close => Some(Resolution::Close),
            EventKind::Other { name, metadata } => {
                tracing::debug!(event = %name, "forwarding widget event");
                self.callbacks.event(&name, metadata).await;
                None
            }
        }
    }

    /// First-wins terminal transition plus the matching callback. A late
    /// resolution after the machine already settled is dropped silently.
    async fn resolve(&mut self, resolution: Resolution) {
        let outcome = match &resolution {
            Resolution::Success(_) => Outcome::Succeeded,
            Resolution::TimedOut => Outcome::TimedOut,
            Resolution::Close => Outcome::Closed,
            Resolution::Error(_)
            | Resolution::ClosedByUser
            | Resolution::Refused
            | Resolution::HostFailure(_) => Outcome::Failed,
        };
        if !self.machine.resolve(outcome) {
            return;
        }

        match resolution {
            Resolution::Success(Some(account)) => self.succeed(account).await,
            Resolution::Success(None) => {
                self.callbacks
                    .error(SdkError::Internal(
                        "connect succeeded without an account payload".into(),
                    ))
                    .await;
            }
            Resolution::Error(Some(error)) => {
                self.callbacks
                    .error(SdkError::Api {
                        status: error.error_type,
                        message: error.message,
                        request_id: error.request_id,
                    })
                    .await;
            }
            Resolution::Error(None) => {
                self.callbacks
                    .error(SdkError::Internal(
                        "connect error event without an error payload".into(),
                    ))
                    .await;
            }
            Resolution::Close => {
                tracing::debug!("connector requested close");
            }
            Resolution::ClosedByUser => {
                tracing::info!("connector closed before completion");
                self.callbacks.error(ConnectError::Closed.into()).await;
            }
            Resolution::TimedOut => {
                tracing::info!("connect attempt timed out");
                self.callbacks.error(ConnectError::Timeout.into()).await;
            }
            Resolution::Refused => {
                self.callbacks.error(ConnectError::Refused.into()).await;
            }
            Resolution::HostFailure(e) => {
                self.callbacks.error(e).await;
            }
        }
    }

    /// Persist the session token, propagate the account, go online, fire the
    /// success callback.
    async fn succeed(&mut self, account: Account) {
        if let Some(token) = &account.token {
            let expires_at = account
                .exp_time
                .unwrap_or_else(|| Utc::now() + chrono::Duration::hours(1));
            self.host.write_cookie(SESSION_COOKIE, token, expires_at);
            *self.token.write().await = Some(token.clone());
        }
        *self.account.write().await = Some(account.clone());
        self.status
            .store(ConnectionStatus::Online as u8, Ordering::SeqCst);
        tracing::info!(account_id = %account.id, "account connected");
        self.callbacks.connection(account).await;
    }

    /// Idempotent teardown plus release of the attempt singleton.
    fn finish(&mut self) {
        if let Some(window) = self.window.take() {
            if !window.is_closed() {
                window.close();
            }
        }
        self.host.hide_overlay(OVERLAY_NAME);
        // Dropping the channel aborts its task; dropping the message receiver
        // when the task returns removes the listener.
        self.channel = None;
        self.is_connecting.store(false, Ordering::SeqCst);
    }
}
