//! CDP WebSocket client.
//!
//! A [`CdpClient`] owns one WebSocket to one debugging target. Commands are
//! correlated to responses through a pending-request map keyed by message ID;
//! events are fanned out to subscribers over a broadcast channel. The client
//! is destroyed and replaced wholesale when the session switches targets, so
//! dropping it must tear down both socket tasks.

pub mod discovery;

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::{Mutex, broadcast, mpsc, oneshot};
use tokio::time::timeout;
use tracing::{debug, error, info, instrument, trace, warn};

use crate::error::CdpError;
use crate::transport::{CdpEvent, CdpMessage, CdpRequest, CdpResponse};

/// Default deadline for a single CDP command round-trip.
const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// Buffer size for the event broadcast channel.
const EVENT_CHANNEL_SIZE: usize = 256;

type PendingMap = Arc<Mutex<HashMap<u64, oneshot::Sender<CdpResponse>>>>;

/// A client speaking CDP to a single debugging target.
#[derive(Debug)]
pub struct CdpClient {
    /// Sender feeding the write loop.
    tx: mpsc::Sender<CdpRequest>,
    /// Broadcast side of the event fan-out.
    event_tx: broadcast::Sender<CdpEvent>,
    /// Responses awaiting correlation.
    pending: PendingMap,
    /// Monotone message ID source.
    message_id: AtomicU64,
    /// Background read task, aborted on drop.
    read_handle: tokio::task::JoinHandle<()>,
    /// Background write task, aborted on drop.
    write_handle: tokio::task::JoinHandle<()>,
}

impl CdpClient {
    /// Connect to a CDP WebSocket endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the WebSocket handshake fails.
    #[instrument(level = "info", skip(ws_url), fields(ws_url = %ws_url))]
    pub async fn connect(ws_url: &str) -> Result<Self, CdpError> {
        info!("Connecting to CDP WebSocket endpoint");
        let (ws_stream, response) = tokio_tungstenite::connect_async(ws_url).await?;
        debug!(status = %response.status(), "WebSocket connection established");

        let (write, read) = ws_stream.split();

        let (tx, rx) = mpsc::channel::<CdpRequest>(64);
        let (event_tx, _) = broadcast::channel::<CdpEvent>(EVENT_CHANNEL_SIZE);
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));

        let write_handle = tokio::spawn(Self::write_loop(rx, write));
        let read_handle = tokio::spawn(Self::read_loop(read, pending.clone(), event_tx.clone()));

        Ok(Self {
            tx,
            event_tx,
            pending,
            message_id: AtomicU64::new(1),
            read_handle,
            write_handle,
        })
    }

    /// Background task serializing and writing command frames.
    async fn write_loop<S>(mut rx: mpsc::Receiver<CdpRequest>, mut sink: S)
    where
        S: futures_util::Sink<
                tokio_tungstenite::tungstenite::Message,
                Error = tokio_tungstenite::tungstenite::Error,
            > + Unpin,
    {
        while let Some(request) = rx.recv().await {
            let json = match serde_json::to_string(&request) {
                Ok(j) => j,
                Err(e) => {
                    error!(error = %e, method = %request.method, "Failed to serialize CDP request");
                    continue;
                }
            };

            trace!(id = request.id, method = %request.method, "Sending CDP request");

            if sink
                .send(tokio_tungstenite::tungstenite::Message::Text(json.into()))
                .await
                .is_err()
            {
                warn!("WebSocket sink closed, ending write loop");
                break;
            }
        }
        debug!("CDP write loop ended");
    }

    /// Background task reading frames and routing them to the pending map or
    /// the event channel.
    async fn read_loop<S>(mut stream: S, pending: PendingMap, event_tx: broadcast::Sender<CdpEvent>)
    where
        S: futures_util::Stream<
                Item = Result<
                    tokio_tungstenite::tungstenite::Message,
                    tokio_tungstenite::tungstenite::Error,
                >,
            > + Unpin,
    {
        while let Some(msg) = stream.next().await {
            let text = match msg {
                Ok(tokio_tungstenite::tungstenite::Message::Text(text)) => text,
                Ok(tokio_tungstenite::tungstenite::Message::Close(frame)) => {
                    info!(?frame, "WebSocket closed by remote");
                    break;
                }
                Err(e) => {
                    warn!(error = %e, "WebSocket error, ending read loop");
                    break;
                }
                Ok(_) => continue,
            };

            let message: CdpMessage = match serde_json::from_str(&text) {
                Ok(m) => m,
                Err(e) => {
                    error!(error = %e, "Failed to parse CDP frame");
                    continue;
                }
            };

            match message {
                CdpMessage::Response(resp) => {
                    let id = resp.id;
                    let mut pending = pending.lock().await;
                    if let Some(sender) = pending.remove(&id) {
                        let _ = sender.send(resp);
                    } else {
                        warn!(id = id, "Response for unknown request ID");
                    }
                }
                CdpMessage::Event(event) => {
                    trace!(method = %event.method, "Received CDP event");
                    // Broadcast to all subscribers; ignore when nobody listens.
                    let _ = event_tx.send(event);
                }
            }
        }

        // Unblock any caller still waiting for a response.
        pending.lock().await.clear();
        debug!("CDP read loop ended");
    }

    /// Send a CDP command and wait for its result.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be sent, the response times
    /// out, or the browser reports a protocol error.
    pub async fn send_command<P, R>(&self, method: &str, params: Option<P>) -> Result<R, CdpError>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        self.send_command_with_timeout(method, params, DEFAULT_COMMAND_TIMEOUT)
            .await
    }

    /// Send a CDP command with a custom response deadline.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be sent, the response times
    /// out, or the browser reports a protocol error.
    #[instrument(level = "debug", skip(self, params), fields(method = %method))]
    pub async fn send_command_with_timeout<P, R>(
        &self,
        method: &str,
        params: Option<P>,
        deadline: Duration,
    ) -> Result<R, CdpError>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let id = self.message_id.fetch_add(1, Ordering::Relaxed);
        let params_value = params.map(serde_json::to_value).transpose()?;

        let request = CdpRequest {
            id,
            method: method.to_string(),
            params: params_value,
            session_id: None,
        };

        let (resp_tx, resp_rx) = oneshot::channel();
        {
            let mut pending = self.pending.lock().await;
            pending.insert(id, resp_tx);
        }

        self.tx
            .send(request)
            .await
            .map_err(|_| CdpError::ConnectionLost)?;

        let response = timeout(deadline, resp_rx)
            .await
            .map_err(|_| {
                warn!(id = id, method = %method, "CDP command timed out");
                CdpError::CommandTimeout {
                    method: method.to_string(),
                    timeout: deadline,
                }
            })?
            .map_err(|_| CdpError::ConnectionLost)?;

        if let Some(error) = response.error {
            warn!(method = %method, code = error.code, message = %error.message, "CDP protocol error");
            return Err(CdpError::Protocol {
                method: method.to_string(),
                code: error.code,
                message: error.message,
            });
        }

        let result = response.result.unwrap_or(Value::Null);
        serde_json::from_value(result).map_err(CdpError::from)
    }

    /// Subscribe to events pushed by this target.
    pub fn subscribe_events(&self) -> broadcast::Receiver<CdpEvent> {
        self.event_tx.subscribe()
    }

    /// Number of live event subscribers.
    ///
    /// Useful for asserting that finished actions released their
    /// subscriptions.
    pub fn event_subscriber_count(&self) -> usize {
        self.event_tx.receiver_count()
    }
}

impl Drop for CdpClient {
    fn drop(&mut self) {
        // A replaced client must stop listening immediately; the session
        // reconnect loop relies on old listeners being gone.
        self.read_handle.abort();
        self.write_handle.abort();
    }
}

#[cfg(test)]
mod tests;
