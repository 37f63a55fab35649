//! WebSocket connection manager for push feeds.
//!
//! Handles the connection lifecycle and reconnection scheduling. Every text
//! frame is handed to the [`FeedHandler`] and awaited before the next frame is
//! read.

use crate::error::{TransportError, TransportResult};
use crate::handler::{FeedHandler, FeedPayload};
use crate::policy::{schedule_reconnect, ReconnectPolicy};
use futures_util::{SinkExt, StreamExt};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio_tungstenite::tungstenite::{Error as WsProtocolError, Message};
use tokio_tungstenite::connect_async_tls_with_config;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Connection configuration.
#[derive(Debug, Clone, Default)]
pub struct ConnectionConfig {
    /// WebSocket URL.
    pub url: String,
    /// Sent once after every successful connect, if set.
    pub subscribe_message: Option<String>,
    pub reconnect: ReconnectPolicy,
}

/// Connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Reconnecting,
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Reconnecting => "reconnecting",
        }
    }
}

/// How one connected session ended.
#[derive(Debug)]
enum SessionEnd {
    Shutdown,
    StreamEnded,
}

/// WebSocket connection manager.
pub struct ConnectionManager {
    config: ConnectionConfig,
    state: Arc<RwLock<ConnectionState>>,
    /// Shared run flag. Cancelled means stop after the current payload.
    shutdown_token: CancellationToken,
}

impl ConnectionManager {
    /// Create a new connection manager sharing the given run flag.
    pub fn new(config: ConnectionConfig, shutdown_token: CancellationToken) -> Self {
        Self {
            config,
            state: Arc::new(RwLock::new(ConnectionState::Disconnected)),
            shutdown_token,
        }
    }

    /// Get current connection state.
    pub fn state(&self) -> ConnectionState {
        *self.state.read()
    }

    fn is_shutdown(&self) -> bool {
        self.shutdown_token.is_cancelled()
    }

    /// Connect and feed `handler` until shutdown.
    ///
    /// Returns `Ok` on shutdown and `RetriesExhausted` when a configured
    /// reconnection ceiling is passed.
    pub async fn run<H: FeedHandler>(&self, handler: &mut H) -> TransportResult<()> {
        let mut attempt = 0u32;

        loop {
            if self.is_shutdown() {
                info!("Shutdown requested, exiting connect loop");
                self.set_state(ConnectionState::Disconnected, handler);
                return Ok(());
            }

            self.set_state(ConnectionState::Connecting, handler);

            match self.try_connect(handler).await {
                Ok(SessionEnd::Shutdown) => {
                    self.set_state(ConnectionState::Disconnected, handler);
                    return Ok(());
                }
                Ok(SessionEnd::StreamEnded) => {
                    info!("WebSocket stream ended");
                    attempt = 0;
                }
                Err(TransportError::ConnectionFailed(reason)) => {
                    warn!(%reason, "WebSocket unreachable");
                    handler
                        .on_payload(FeedPayload::Unreachable { reason })
                        .await;
                }
                Err(e) => {
                    error!(?e, "WebSocket connection error");
                    attempt = 0;
                }
            }

            self.set_state(ConnectionState::Disconnected, handler);

            attempt += 1;

            let Some(delay) = schedule_reconnect(!self.is_shutdown(), &self.config.reconnect, attempt)
            else {
                if self.is_shutdown() {
                    info!("Shutdown requested after disconnect, not reconnecting");
                    return Ok(());
                }
                error!(attempt, "Max reconnection attempts reached");
                return Err(TransportError::RetriesExhausted {
                    attempts: attempt - 1,
                });
            };

            self.set_state(ConnectionState::Reconnecting, handler);
            warn!(attempt, delay_ms = delay.as_millis() as u64, "Reconnecting");

            tokio::select! {
                () = tokio::time::sleep(delay) => {}
                () = self.shutdown_token.cancelled() => {
                    info!("Shutdown requested during reconnect delay, exiting");
                    self.set_state(ConnectionState::Disconnected, handler);
                    return Ok(());
                }
            }
        }
    }

    async fn try_connect<H: FeedHandler>(&self, handler: &mut H) -> TransportResult<SessionEnd> {
        info!(url = %self.config.url, "Connecting to WebSocket");

        let (ws_stream, _response) =
            connect_async_tls_with_config(&self.config.url, None, true, None)
                .await
                .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;
        let (mut write, mut read) = ws_stream.split();

        self.set_state(ConnectionState::Connected, handler);
        info!("WebSocket connected");

        if let Some(subscribe) = &self.config.subscribe_message {
            write.send(Message::Text(subscribe.clone())).await?;
            debug!(message = %subscribe, "Subscription sent");
        }

        loop {
            tokio::select! {
                biased;

                () = self.shutdown_token.cancelled() => {
                    info!("Shutdown signal received in message loop");
                    if let Err(e) = write.send(Message::Close(None)).await {
                        warn!(?e, "Failed to send Close frame during shutdown");
                    }
                    return Ok(SessionEnd::Shutdown);
                }

                msg = read.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            handler.on_payload(FeedPayload::Message(text)).await;
                        }
                        Some(Ok(Message::Binary(data))) => match String::from_utf8(data) {
                            Ok(text) => handler.on_payload(FeedPayload::Message(text)).await,
                            Err(_) => debug!("Ignoring non-UTF-8 binary frame"),
                        },
                        Some(Ok(Message::Ping(data))) => {
                            debug!("Received ping, sending pong");
                            write.send(Message::Pong(data)).await?;
                        }
                        Some(Ok(Message::Close(frame))) => {
                            let (code, reason): (u16, String) = frame
                                .map(|f| (f.code.into(), f.reason.to_string()))
                                .unwrap_or((1000, "Normal close".to_string()));
                            warn!(code, %reason, "WebSocket closed by server");
                            return Err(TransportError::ConnectionClosed { code, reason });
                        }
                        Some(Err(e)) if is_fatal(&e) => {
                            error!(?e, "WebSocket read error");
                            return Err(e.into());
                        }
                        Some(Err(e)) => {
                            warn!(?e, "WebSocket read error, continuing");
                        }
                        None => return Ok(SessionEnd::StreamEnded),
                        _ => {}
                    }
                }
            }
        }
    }

    fn set_state<H: FeedHandler>(&self, state: ConnectionState, handler: &mut H) {
        let previous = std::mem::replace(&mut *self.state.write(), state);
        if previous != state {
            debug!(from = previous.as_str(), to = state.as_str(), "Connection state change");
            handler.on_state_change(state);
        }
    }
}

/// Errors after which the socket cannot be read again.
fn is_fatal(e: &WsProtocolError) -> bool {
    matches!(
        e,
        WsProtocolError::ConnectionClosed
            | WsProtocolError::AlreadyClosed
            | WsProtocolError::Io(_)
            | WsProtocolError::Protocol(_)
    )
}
