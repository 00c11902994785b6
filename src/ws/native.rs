//! Native WebSocket channel: `tokio-tungstenite`.
//!
//! A background tokio task owns the socket and forwards text frames into the
//! attempt's event queue. Dropping the [`ConnectChannel`] aborts the task,
//! which is how the controller's cleanup path removes the listener.

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use crate::error::{ConnectError, SdkError};
use crate::ws::ChannelEvent;

use std::time::Duration;

const CONNECT_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Handle to the signaling channel task.
pub struct ConnectChannel {
    task: JoinHandle<()>,
}

impl ConnectChannel {
    /// Open the socket and start forwarding frames into `events`. Returns
    /// once the handshake completes.
    pub async fn open(
        url: &str,
        events: mpsc::Sender<ChannelEvent>,
    ) -> Result<Self, SdkError> {
        let (stream, _) = tokio::time::timeout(CONNECT_HANDSHAKE_TIMEOUT, connect_async(url))
            .await
            .map_err(|_| SdkError::Connection(ConnectError::Timeout))?
            .map_err(|e| SdkError::Connection(ConnectError::Transport(e.to_string())))?;

        tracing::debug!(%url, "signaling channel open");

        let (mut sink, mut source) = stream.split();
        let task = tokio::spawn(async move {
            while let Some(msg) = source.next().await {
                match msg {
                    Ok(Message::Text(text)) => {
                        if events
                            .send(ChannelEvent::Frame(text.to_string()))
                            .await
                            .is_err()
                        {
                            // Attempt is gone; stop reading.
                            return;
                        }
                    }
                    Ok(Message::Ping(data)) => {
                        let _ = sink.send(Message::Pong(data)).await;
                    }
                    Ok(Message::Close(frame)) => {
                        let reason = frame
                            .map(|f| f.reason.to_string())
                            .unwrap_or_else(|| "closed by server".into());
                        let _ = events.send(ChannelEvent::Closed { reason }).await;
                        return;
                    }
                    Ok(_) => {} // Binary, Frame, Pong: ignore
                    Err(e) => {
                        let _ = events
                            .send(ChannelEvent::Closed {
                                reason: e.to_string(),
                            })
                            .await;
                        return;
                    }
                }
            }
            let _ = events
                .send(ChannelEvent::Closed {
                    reason: "stream ended".into(),
                })
                .await;
        });

        Ok(Self { task })
    }
}

impl Drop for ConnectChannel {
    fn drop(&mut self) {
        self.task.abort();
    }
}
