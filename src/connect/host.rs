//! Host environment capabilities.
//!
//! The controller never touches platform globals directly. Everything it
//! needs from the surrounding runtime (windows, overlay, cookies, inbound
//! messages, the reachability probe) comes through [`HostEnvironment`], so
//! the connect flow runs identically in a browser shim, an embedded webview,
//! or a test double.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use crate::error::SdkError;

/// Name of the full-viewport overlay surface, created or reused per attempt.
pub const OVERLAY_NAME: &str = "zabo-connect-overlay";

/// An inbound cross-origin message (the `postMessage` analogue).
#[derive(Debug, Clone)]
pub struct HostMessage {
    pub origin: String,
    pub data: String,
}

/// A live connector window handle.
pub trait ConnectorWindow: Send + Sync {
    /// Whether the window has been closed (by the user or by [`close`]).
    ///
    /// [`close`]: ConnectorWindow::close
    fn is_closed(&self) -> bool;

    /// Close the window. Closing an already-closed window is a no-op.
    fn close(&self);

    /// Bring the window to the foreground.
    fn focus(&self);
}

/// Platform capabilities required by the connect flow.
#[async_trait]
pub trait HostEnvironment: Send + Sync {
    /// Origin of the embedding application, passed to the connector URL.
    fn origin(&self) -> String;

    /// Open the connector window at `url` and return a live handle.
    fn open_window(&self, url: &str) -> Result<Box<dyn ConnectorWindow>, SdkError>;

    /// Create or reuse the named overlay surface and make it visible.
    fn show_overlay(&self, name: &str) -> Result<(), SdkError>;

    /// Hide and clear the named overlay. Idempotent.
    fn hide_overlay(&self, name: &str);

    fn read_cookie(&self, name: &str) -> Option<String>;

    fn write_cookie(&self, name: &str, value: &str, expires_at: DateTime<Utc>);

    /// Reachability probe against the connect host.
    async fn health_check(&self, url: &str) -> Result<(), SdkError>;

    /// Subscribe to inbound cross-origin messages. Dropping the receiver
    /// unsubscribes.
    fn subscribe(&self) -> mpsc::Receiver<HostMessage>;
}
