//! # Zabo SDK
//!
//! A Rust client for the Zabo financial-data API supporting both server and
//! embedded-host deployments.
//!
//! ## Architecture
//!
//! The SDK is organized in layers:
//!
//! 1. **Core** — config, error taxonomy, network constants
//! 2. **Auth** — HMAC request signing (server) / cookie-backed bearer tokens
//!    (embedded host), plus the OTP-bearing team session
//! 3. **HTTP API** — `ZaboHttp` transport with cursor pagination
//! 4. **Resources** — typed accessors selected by mode at init time
//! 5. **Connect** — the interactive widget lifecycle, driven through a host
//!    environment capability trait, with optional WebSocket signaling
//! 6. **High-Level Client** — `Zabo`, the primary entry point
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use zabo_sdk::prelude::*;
//!
//! let zabo = Zabo::init(Config {
//!     env: Some(Env::Sandbox),
//!     api_key: Some("key".into()),
//!     secret_key: Some("secret".into()),
//!     ..Config::default()
//! })
//! .await?;
//!
//! let currencies = zabo.currencies().list(Some(25)).await?;
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Configuration: environment, credentials, mode selection.
pub mod config;

/// Unified SDK error types.
pub mod error;

/// Network host constants.
pub mod network;

// ── Layer 2: Auth ────────────────────────────────────────────────────────────

/// Request signing and session material.
pub mod auth;

// ── Layer 3: HTTP API ────────────────────────────────────────────────────────

/// HTTP transport with cursor pagination.
pub mod http;

// ── Layer 4: Resources ───────────────────────────────────────────────────────

/// Resource sub-clients, selected by mode.
pub mod resources;

// ── Layer 5: Connect ─────────────────────────────────────────────────────────

/// The connect-widget lifecycle.
pub mod connect;

/// WebSocket signaling channel.
pub mod ws;

/// External signer bridges.
pub mod signers;

// ── Layer 6: High-Level Client ───────────────────────────────────────────────

/// `Zabo` — the primary entry point.
pub mod client;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    pub use crate::auth::{TeamSession, SESSION_COOKIE};
    pub use crate::client::{ConnectionStatus, Zabo};
    pub use crate::config::{ApiVersion, Config, Env};
    pub use crate::connect::{
        ConnectState, ConnectorWindow, HostEnvironment, HostMessage, OVERLAY_NAME,
    };
    pub use crate::error::{ConnectError, SdkError};
    pub use crate::http::Paginator;
    pub use crate::resources::{
        Account, Balance, Currency, Order, OrderSide, Provider, Team, TradingSymbol, Transaction,
        User,
    };
    pub use crate::signers::SignerBridge;
}
