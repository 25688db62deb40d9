use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;

use super::*;

/// Spawn a WebSocket server that answers every request with `respond` and
/// returns the address it listens on.
async fn spawn_stub_browser<F>(respond: F) -> String
where
    F: Fn(Value) -> Value + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        while let Some(Ok(Message::Text(text))) = ws.next().await {
            let request: Value = serde_json::from_str(&text).unwrap();
            let reply = respond(request);
            ws.send(Message::Text(reply.to_string().into()))
                .await
                .unwrap();
        }
    });

    format!("ws://{addr}")
}

#[tokio::test]
async fn test_send_command_correlates_response_by_id() {
    let url = spawn_stub_browser(|request| {
        json!({
            "id": request["id"],
            "result": { "frameId": "F1" }
        })
    })
    .await;

    let client = CdpClient::connect(&url).await.unwrap();

    #[derive(serde::Deserialize)]
    struct NavResult {
        #[serde(rename = "frameId")]
        frame_id: String,
    }

    let result: NavResult = client
        .send_command("Page.navigate", Some(json!({"url": "http://example.com"})))
        .await
        .unwrap();
    assert_eq!(result.frame_id, "F1");
}

#[tokio::test]
async fn test_protocol_error_names_the_method() {
    let url = spawn_stub_browser(|request| {
        json!({
            "id": request["id"],
            "error": { "code": -32000, "message": "Cannot find context" }
        })
    })
    .await;

    let client = CdpClient::connect(&url).await.unwrap();
    let result: Result<Value, _> = client.send_command("Runtime.evaluate", None::<Value>).await;

    match result.unwrap_err() {
        CdpError::Protocol {
            method,
            code,
            message,
        } => {
            assert_eq!(method, "Runtime.evaluate");
            assert_eq!(code, -32000);
            assert_eq!(message, "Cannot find context");
        }
        other => panic!("expected protocol error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_events_are_broadcast_to_subscribers() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        ws.send(Message::Text(
            json!({"method": "Page.loadEventFired", "params": {"timestamp": 1.0}})
                .to_string()
                .into(),
        ))
        .await
        .unwrap();
        // Keep the socket open until the client goes away.
        while ws.next().await.is_some() {}
    });

    let client = CdpClient::connect(&format!("ws://{addr}")).await.unwrap();
    let mut events = client.subscribe_events();
    let event = events.recv().await.unwrap();
    assert_eq!(event.method, "Page.loadEventFired");
}

#[tokio::test]
async fn test_subscriber_count_drops_with_receiver() {
    let url = spawn_stub_browser(|request| json!({"id": request["id"], "result": {}})).await;
    let client = CdpClient::connect(&url).await.unwrap();

    assert_eq!(client.event_subscriber_count(), 0);
    let rx = client.subscribe_events();
    assert_eq!(client.event_subscriber_count(), 1);
    drop(rx);
    assert_eq!(client.event_subscriber_count(), 0);
}

#[tokio::test]
async fn test_command_timeout_is_reported() {
    // A server that never answers.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        while ws.next().await.is_some() {}
    });

    let client = CdpClient::connect(&format!("ws://{addr}")).await.unwrap();
    let result: Result<Value, _> = client
        .send_command_with_timeout(
            "Page.navigate",
            None::<Value>,
            std::time::Duration::from_millis(50),
        )
        .await;

    match result.unwrap_err() {
        CdpError::CommandTimeout { method, .. } => assert_eq!(method, "Page.navigate"),
        other => panic!("expected timeout, got {other:?}"),
    }
}
