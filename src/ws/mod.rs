//! WebSocket signaling channel for the connect flow.
//!
//! The channel is an optional second signal source: connect events may arrive
//! over it instead of (or in addition to) the window message path. It is
//! opened only when a team session with a valid one-time password exists, and
//! it lives exactly as long as the attempt that opened it. There is no
//! reconnection; losing the channel degrades to the window path.

pub mod native;

pub use native::ConnectChannel;

/// Events forwarded from the channel task to the attempt.
#[derive(Debug, Clone)]
pub enum ChannelEvent {
    /// A raw text frame, parsed downstream like any other widget message.
    Frame(String),
    /// The socket closed or errored; the channel will not produce more frames.
    Closed { reason: String },
}

/// Build the signaling URL for a client and one-time password.
pub fn ws_url(ws_host: &str, client_id: &str, otp: &str) -> String {
    format!(
        "{}/ws?client_id={}&otp={}",
        ws_host.trim_end_matches('/'),
        urlencoding::encode(client_id),
        urlencoding::encode(otp)
    )
}
