//! CDP error types.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur during CDP communication.
#[derive(Error, Debug)]
pub enum CdpError {
    /// WebSocket connection failed.
    #[error("WebSocket connection failed: {0}")]
    ConnectionFailed(String),

    /// WebSocket connection was lost during operation.
    #[error("WebSocket connection lost")]
    ConnectionLost,

    /// CDP protocol error returned by the browser, naming the failed method.
    #[error("CDP method {method} failed: {message} (code {code})")]
    Protocol {
        method: String,
        code: i64,
        message: String,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No response arrived within the command deadline.
    #[error("response to {method} timed out after {timeout:?}")]
    CommandTimeout { method: String, timeout: Duration },

    /// The endpoint URL could not be parsed or has an unsupported scheme.
    #[error("invalid CDP endpoint URL: {0}")]
    InvalidEndpointUrl(String),

    /// HTTP request to the discovery endpoint failed.
    #[error("HTTP request failed: {0}")]
    HttpRequestFailed(String),

    /// The discovery endpoint responded but did not yield a WebSocket URL.
    #[error("endpoint discovery failed for {url}: {reason}")]
    EndpointDiscoveryFailed { url: String, reason: String },

    /// Endpoint discovery did not complete within the deadline.
    #[error("endpoint discovery timed out after {0:?}")]
    DiscoveryTimeout(Duration),
}

impl From<tokio_tungstenite::tungstenite::Error> for CdpError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        match err {
            tokio_tungstenite::tungstenite::Error::ConnectionClosed
            | tokio_tungstenite::tungstenite::Error::AlreadyClosed => Self::ConnectionLost,
            other => Self::ConnectionFailed(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests;
