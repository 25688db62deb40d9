//! CDP wire message types.
//!
//! The protocol is JSON-RPC 2.0 over WebSocket: outgoing requests carry a
//! monotonically increasing `id`, incoming frames are either a response
//! (correlated by `id`) or an unsolicited event.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An outgoing CDP command frame.
#[derive(Debug, Clone, Serialize)]
pub struct CdpRequest {
    /// Message ID used to correlate the response.
    pub id: u64,
    /// CDP method name (e.g., "Target.createTarget").
    pub method: String,
    /// Method parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    /// Session ID for commands scoped to an attached session.
    #[serde(rename = "sessionId", skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// A response frame to a previously sent command.
#[derive(Debug, Clone, Deserialize)]
pub struct CdpResponse {
    /// Message ID matching the request.
    pub id: u64,
    /// Result on success.
    pub result: Option<Value>,
    /// Error on failure.
    pub error: Option<CdpResponseError>,
}

/// Error payload carried in a response frame.
#[derive(Debug, Clone, Deserialize)]
pub struct CdpResponseError {
    /// JSON-RPC error code.
    pub code: i64,
    /// Human-readable message.
    pub message: String,
    /// Additional error data.
    pub data: Option<String>,
}

/// An event frame pushed by the browser.
#[derive(Debug, Clone, Deserialize)]
pub struct CdpEvent {
    /// Event method name (e.g., "Page.loadEventFired").
    pub method: String,
    /// Event parameters.
    pub params: Option<Value>,
    /// Session ID if the event originated from an attached session.
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

impl CdpEvent {
    /// Deserialize the event parameters into a typed payload.
    ///
    /// Returns `None` when the event carries no parameters or the payload
    /// does not match `T`.
    pub fn parsed_params<T: DeserializeOwned>(&self) -> Option<T> {
        self.params
            .as_ref()
            .and_then(|p| serde_json::from_value(p.clone()).ok())
    }
}

/// Any incoming frame: a response or an event.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CdpMessage {
    /// A response to a previous request.
    Response(CdpResponse),
    /// An event pushed by the browser.
    Event(CdpEvent),
}

#[cfg(test)]
mod tests;
