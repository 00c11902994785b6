//! Connect flow: the interactive widget lifecycle.
//!
//! [`controller::ConnectSessionController`] owns the whole attempt: it probes
//! the connect host, opens the connector through the [`host::HostEnvironment`]
//! capabilities, watches the window, the message channel, and the optional
//! WebSocket channel, and resolves the attempt exactly once.

pub mod controller;
pub mod events;
pub mod host;
pub mod state;

pub use controller::ConnectSessionController;
pub use events::{ConnectEvent, EventKind, WidgetError};
pub use host::{ConnectorWindow, HostEnvironment, HostMessage, OVERLAY_NAME};
pub use state::{ConnectState, ConnectStateMachine, Outcome};
