//! WebSocket status feed.
//!
//! Keeps one connection to the push channel open, folds every message into
//! the [`StatusOverlay`] and mirrors connection health into the overlay's
//! connected flag. Lost connections are retried with exponential backoff
//! until the feed is shut down.

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, trace, warn};

use super::backoff::Backoff;
use super::message::handle_message;
use super::settings::ReconnectionConfig;
use crate::application::StatusOverlay;
use crate::error::Result;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Why a connected session ended.
enum SessionEnd {
    Shutdown,
    Lost(String),
}

/// Push-channel client feeding the status overlay.
pub struct StatusFeed {
    url: String,
    overlay: Arc<StatusOverlay>,
    reconnection: ReconnectionConfig,
}

impl StatusFeed {
    #[must_use]
    pub fn new(
        url: impl Into<String>,
        overlay: Arc<StatusOverlay>,
        reconnection: ReconnectionConfig,
    ) -> Self {
        Self {
            url: url.into(),
            overlay,
            reconnection,
        }
    }

    /// Run the feed on the current runtime until the handle shuts it down.
    #[must_use]
    pub fn spawn(self) -> FeedHandle {
        let (shutdown, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(self.run(shutdown_rx));
        FeedHandle {
            shutdown,
            task: Some(task),
        }
    }

    /// Connect, consume and reconnect until `shutdown` turns true.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut backoff = Backoff::new(self.reconnection);

        loop {
            if *shutdown.borrow() {
                break;
            }

            let connected = tokio::select! {
                _ = shutdown.changed() => break,
                result = self.connect() => result,
            };

            match connected {
                Ok(socket) => {
                    backoff.reset();
                    self.overlay.set_connected(true);
                    let end = self.consume(socket, &mut shutdown).await;
                    self.overlay.set_connected(false);
                    match end {
                        SessionEnd::Shutdown => break,
                        SessionEnd::Lost(reason) => {
                            warn!(
                                url = %self.url,
                                reason = %reason,
                                "Status stream lost, will reconnect"
                            );
                        }
                    }
                }
                Err(err) => {
                    warn!(
                        url = %self.url,
                        error = %err,
                        attempt = backoff.attempts() + 1,
                        "Status stream connection failed"
                    );
                }
            }

            let delay = backoff.next_delay();
            debug!(
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                "Reconnecting status stream after delay"
            );
            tokio::select! {
                _ = shutdown.changed() => break,
                () = sleep(delay) => {}
            }
        }

        self.overlay.set_connected(false);
        info!(url = %self.url, "Status stream stopped");
    }

    async fn connect(&self) -> Result<Socket> {
        info!(url = %self.url, "Connecting to status stream");
        let (socket, response) = connect_async(self.url.as_str()).await?;
        info!(status = %response.status(), "Status stream connected");
        Ok(socket)
    }

    async fn consume(
        &self,
        mut socket: Socket,
        shutdown: &mut watch::Receiver<bool>,
    ) -> SessionEnd {
        loop {
            let frame = tokio::select! {
                _ = shutdown.changed() => {
                    let _ = socket.close(None).await;
                    return SessionEnd::Shutdown;
                }
                frame = socket.next() => frame,
            };

            match frame {
                Some(Ok(Message::Text(text))) => {
                    trace!(bytes = text.len(), "Received status frame");
                    if let Err(err) = handle_message(&self.overlay, &text) {
                        warn!(
                            error = %err,
                            bytes = text.len(),
                            "Skipping malformed status message"
                        );
                    }
                }
                Some(Ok(Message::Ping(data))) => {
                    if let Err(err) = socket.send(Message::Pong(data)).await {
                        return SessionEnd::Lost(err.to_string());
                    }
                }
                Some(Ok(Message::Close(frame))) => {
                    let reason = frame.map_or_else(
                        || "closed by server".to_string(),
                        |f| f.reason.to_string(),
                    );
                    return SessionEnd::Lost(reason);
                }
                Some(Ok(_)) => {}
                Some(Err(err)) => return SessionEnd::Lost(err.to_string()),
                None => return SessionEnd::Lost("stream ended".into()),
            }
        }
    }
}

/// Handle to a running [`StatusFeed`].
pub struct FeedHandle {
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl FeedHandle {
    /// Close the connection and wait for the feed to exit.
    pub async fn shutdown(mut self) {
        self.shutdown.send_replace(true);
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                warn!(error = %err, "Status stream task ended abnormally");
            }
        }
    }
}

impl Drop for FeedHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
