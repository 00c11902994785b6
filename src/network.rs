//! Network host constants for the Zabo SDK.

/// Live REST API base URL.
pub const LIVE_API_URL: &str = "https://api.zabo.com";

/// Sandbox REST API base URL.
pub const SANDBOX_API_URL: &str = "https://api.zabo-sandbox.com";

/// Connect widget host. Shared by both environments.
pub const CONNECT_URL: &str = "https://connect.zabo.com";

/// Live WebSocket base URL. Mirrors the API host.
pub const LIVE_WS_URL: &str = "wss://api.zabo.com";

/// Sandbox WebSocket base URL. Mirrors the API host.
pub const SANDBOX_WS_URL: &str = "wss://api.zabo-sandbox.com";

/// Messages are accepted from any origin whose host ends with this suffix,
/// in addition to the configured connect host itself.
pub const TRUSTED_ORIGIN_SUFFIX: &str = ".zabo.com";

/// SDK version reported to the connect widget.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");
