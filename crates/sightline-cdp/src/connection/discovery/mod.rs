//! Debugging-endpoint discovery over HTTP.
//!
//! A Chromium debugging port exposes a JSON API next to the WebSocket
//! endpoint. `/json/version` yields the browser-level `webSocketDebuggerUrl`;
//! per-target endpoints follow the fixed `/devtools/page/<id>` shape.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info, instrument};
use url::Url;

use crate::error::CdpError;

/// Default deadline for HTTP endpoint discovery.
const DEFAULT_DISCOVERY_TIMEOUT: Duration = Duration::from_secs(15);

/// Response from the `/json/version` endpoint.
#[derive(Debug, Deserialize)]
pub struct BrowserVersion {
    /// Browser name and version.
    #[serde(rename = "Browser")]
    pub browser: Option<String>,
    /// Protocol version.
    #[serde(rename = "Protocol-Version")]
    pub protocol_version: Option<String>,
    /// User agent string.
    #[serde(rename = "User-Agent")]
    pub user_agent: Option<String>,
    /// The WebSocket URL for the browser-level CDP connection.
    #[serde(rename = "webSocketDebuggerUrl")]
    pub web_socket_debugger_url: Option<String>,
}

/// Build the per-target WebSocket URL for a page target.
///
/// Targets attach over `ws://<host>:<port>/devtools/page/<targetId>`.
pub fn page_ws_url(host: &str, port: u16, target_id: &str) -> String {
    format!("ws://{host}:{port}/devtools/page/{target_id}")
}

/// Discover the browser WebSocket URL from an HTTP endpoint.
///
/// Given a URL like `http://localhost:9222`, fetches `/json/version` and
/// returns the advertised `webSocketDebuggerUrl`. A `ws://`/`wss://` URL is
/// returned unchanged.
///
/// # Errors
///
/// Returns an error if the URL is invalid, the HTTP request fails, or the
/// response carries no WebSocket URL.
#[instrument(level = "info")]
pub async fn discover_websocket_url(
    endpoint_url: &str,
    timeout: Option<Duration>,
) -> Result<String, CdpError> {
    let base_url = Url::parse(endpoint_url)
        .map_err(|e| CdpError::InvalidEndpointUrl(format!("{endpoint_url}: {e}")))?;

    if base_url.scheme() == "ws" || base_url.scheme() == "wss" {
        debug!("URL is already a WebSocket URL, returning as-is");
        return Ok(endpoint_url.to_string());
    }

    if base_url.scheme() != "http" && base_url.scheme() != "https" {
        return Err(CdpError::InvalidEndpointUrl(format!(
            "expected http, https, ws, or wss scheme, got: {}",
            base_url.scheme()
        )));
    }

    let version_url = base_url
        .join("/json/version")
        .map_err(|e| CdpError::InvalidEndpointUrl(format!("failed to build version URL: {e}")))?;

    info!(url = %version_url, "Discovering WebSocket URL from HTTP endpoint");

    let timeout = timeout.unwrap_or(DEFAULT_DISCOVERY_TIMEOUT);
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| CdpError::HttpRequestFailed(e.to_string()))?;

    let response = client.get(version_url.as_str()).send().await.map_err(|e| {
        if e.is_timeout() {
            CdpError::DiscoveryTimeout(timeout)
        } else if e.is_connect() {
            CdpError::ConnectionFailed(format!("failed to connect to {endpoint_url}: {e}"))
        } else {
            CdpError::HttpRequestFailed(e.to_string())
        }
    })?;

    if !response.status().is_success() {
        return Err(CdpError::EndpointDiscoveryFailed {
            url: endpoint_url.to_string(),
            reason: format!("HTTP status {}", response.status()),
        });
    }

    let version: BrowserVersion =
        response
            .json()
            .await
            .map_err(|e| CdpError::EndpointDiscoveryFailed {
                url: endpoint_url.to_string(),
                reason: format!("failed to parse response: {e}"),
            })?;

    let ws_url = version
        .web_socket_debugger_url
        .ok_or_else(|| CdpError::EndpointDiscoveryFailed {
            url: endpoint_url.to_string(),
            reason: "response missing webSocketDebuggerUrl field".to_string(),
        })?;

    info!(ws_url = %ws_url, browser = ?version.browser, "Discovered WebSocket URL");
    Ok(ws_url)
}

#[cfg(test)]
mod tests;
