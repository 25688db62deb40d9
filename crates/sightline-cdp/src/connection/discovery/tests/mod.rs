use super::*;

#[tokio::test]
async fn test_ws_url_is_returned_unchanged() {
    let url = "ws://localhost:9222/devtools/browser/abc";
    let discovered = discover_websocket_url(url, None).await.unwrap();
    assert_eq!(discovered, url);
}

#[tokio::test]
async fn test_invalid_url_is_rejected() {
    let result = discover_websocket_url("not a url", None).await;
    assert!(matches!(result, Err(CdpError::InvalidEndpointUrl(_))));
}

#[tokio::test]
async fn test_unsupported_scheme_is_rejected() {
    let result = discover_websocket_url("ftp://localhost:9222", None).await;
    let err = result.unwrap_err();
    assert!(err.to_string().contains("ftp"));
}

#[test]
fn test_page_ws_url_shape() {
    assert_eq!(
        page_ws_url("127.0.0.1", 9222, "TARGET1"),
        "ws://127.0.0.1:9222/devtools/page/TARGET1"
    );
}

#[test]
fn test_browser_version_parses_version_payload() {
    let json = r#"{
        "Browser": "Chrome/131.0.6778.85",
        "Protocol-Version": "1.3",
        "User-Agent": "Mozilla/5.0",
        "webSocketDebuggerUrl": "ws://localhost:9222/devtools/browser/uuid"
    }"#;
    let version: BrowserVersion = serde_json::from_str(json).unwrap();
    assert_eq!(
        version.web_socket_debugger_url.as_deref(),
        Some("ws://localhost:9222/devtools/browser/uuid")
    );
}
