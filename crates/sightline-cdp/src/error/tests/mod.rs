use std::time::Duration;

use super::*;

#[test]
fn test_connection_failed_display() {
    let err = CdpError::ConnectionFailed("connection refused".to_string());
    assert_eq!(
        err.to_string(),
        "WebSocket connection failed: connection refused"
    );
}

#[test]
fn test_connection_lost_display() {
    assert_eq!(CdpError::ConnectionLost.to_string(), "WebSocket connection lost");
}

#[test]
fn test_protocol_error_names_the_method() {
    let err = CdpError::Protocol {
        method: "Page.navigate".to_string(),
        code: -32000,
        message: "Cannot navigate to invalid URL".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "CDP method Page.navigate failed: Cannot navigate to invalid URL (code -32000)"
    );
}

#[test]
fn test_command_timeout_display() {
    let err = CdpError::CommandTimeout {
        method: "DOM.getDocument".to_string(),
        timeout: Duration::from_secs(30),
    };
    assert_eq!(
        err.to_string(),
        "response to DOM.getDocument timed out after 30s"
    );
}

#[test]
fn test_json_error_from_serde() {
    let json_err: serde_json::Error = serde_json::from_str::<i32>("not a number").unwrap_err();
    let err: CdpError = json_err.into();
    assert!(err.to_string().starts_with("JSON error:"));
}

#[test]
fn test_discovery_failed_display() {
    let err = CdpError::EndpointDiscoveryFailed {
        url: "http://localhost:9222".to_string(),
        reason: "response missing webSocketDebuggerUrl field".to_string(),
    };
    assert!(err.to_string().contains("http://localhost:9222"));
    assert!(err.to_string().contains("webSocketDebuggerUrl"));
}

#[test]
fn test_tungstenite_closed_maps_to_connection_lost() {
    let err: CdpError = tokio_tungstenite::tungstenite::Error::ConnectionClosed.into();
    assert!(matches!(err, CdpError::ConnectionLost));
}
