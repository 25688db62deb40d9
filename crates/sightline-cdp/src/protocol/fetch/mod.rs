//! Fetch domain types (request interception).

use serde::{Deserialize, Serialize};

use crate::protocol::network::Request;

/// A pattern selecting requests to pause.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RequestPattern {
    /// Wildcard URL pattern; `*` matches everything.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_pattern: Option<String>,
}

/// Parameters for Fetch.enable.
#[derive(Debug, Clone, Serialize, Default)]
pub struct EnableParams {
    /// Patterns to intercept; empty pauses nothing.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub patterns: Vec<RequestPattern>,
}

/// A response header name/value pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderEntry {
    /// Header name.
    pub name: String,
    /// Header value.
    pub value: String,
}

/// Payload of Fetch.requestPaused.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestPausedEvent {
    /// Interception identifier; all resolution commands take it.
    pub request_id: String,
    /// The paused request.
    pub request: Request,
    /// Resource type ("Document", "XHR", ...).
    pub resource_type: Option<String>,
    /// The Network domain request id, when available.
    pub network_id: Option<String>,
}

/// Network-level failure cause for Fetch.failRequest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorReason {
    /// Generic failure.
    Failed,
    /// Request aborted.
    Aborted,
    /// Request timed out.
    TimedOut,
    /// Access denied.
    AccessDenied,
    /// Connection failed.
    ConnectionFailed,
    /// Blocked by the client.
    BlockedByClient,
}

/// Parameters for Fetch.failRequest.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailRequestParams {
    /// Interception id.
    pub request_id: String,
    /// Failure cause reported to the page.
    pub error_reason: ErrorReason,
}

/// Parameters for Fetch.fulfillRequest.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FulfillRequestParams {
    /// Interception id.
    pub request_id: String,
    /// HTTP status code to answer with.
    pub response_code: i64,
    /// Response headers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_headers: Option<Vec<HeaderEntry>>,
    /// Base64-encoded response body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// Parameters for Fetch.continueRequest.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ContinueRequestParams {
    /// Interception id.
    pub request_id: String,
    /// Override the request URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Override the HTTP method.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Override the post data (base64-encoded).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_data: Option<String>,
    /// Override the request headers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<Vec<HeaderEntry>>,
}
