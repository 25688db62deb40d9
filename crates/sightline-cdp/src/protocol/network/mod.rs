//! Network domain types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An HTTP request description.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    /// Request URL.
    pub url: String,
    /// HTTP method.
    pub method: String,
    /// Request headers as a name/value object.
    pub headers: Option<Value>,
}

/// Payload of Network.requestWillBeSent.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestWillBeSentEvent {
    /// Request identifier.
    pub request_id: String,
    /// The request being sent.
    pub request: Request,
    /// Resource type ("Document", "XHR", "Fetch", ...).
    #[serde(rename = "type")]
    pub resource_type: Option<String>,
}

/// Payload of Network.loadingFinished.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadingFinishedEvent {
    /// Request identifier.
    pub request_id: String,
}

/// Payload of Network.loadingFailed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadingFailedEvent {
    /// Request identifier.
    pub request_id: String,
    /// Failure description.
    pub error_text: String,
    /// Whether the load was canceled.
    pub canceled: Option<bool>,
}

/// Parameters for Network.setExtraHTTPHeaders.
#[derive(Debug, Clone, Serialize)]
pub struct SetExtraHttpHeadersParams {
    /// Headers as a name/value object.
    pub headers: Value,
}
