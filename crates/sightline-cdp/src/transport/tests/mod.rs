use serde_json::json;

use super::*;

#[test]
fn test_request_serializes_without_empty_fields() {
    let request = CdpRequest {
        id: 7,
        method: "Page.enable".to_string(),
        params: None,
        session_id: None,
    };
    let text = serde_json::to_string(&request).unwrap();
    assert_eq!(text, r#"{"id":7,"method":"Page.enable"}"#);
}

#[test]
fn test_request_serializes_session_id_camel_case() {
    let request = CdpRequest {
        id: 1,
        method: "DOM.getDocument".to_string(),
        params: Some(json!({"depth": -1})),
        session_id: Some("SESSION".to_string()),
    };
    let value: serde_json::Value = serde_json::from_str(&serde_json::to_string(&request).unwrap()).unwrap();
    assert_eq!(value["sessionId"], "SESSION");
    assert_eq!(value["params"]["depth"], -1);
}

#[test]
fn test_incoming_response_frame_parses_as_response() {
    let text = r#"{"id":3,"result":{"frameId":"F1"}}"#;
    let message: CdpMessage = serde_json::from_str(text).unwrap();
    match message {
        CdpMessage::Response(resp) => {
            assert_eq!(resp.id, 3);
            assert_eq!(resp.result.unwrap()["frameId"], "F1");
            assert!(resp.error.is_none());
        }
        CdpMessage::Event(_) => panic!("expected response frame"),
    }
}

#[test]
fn test_incoming_error_response_carries_code_and_message() {
    let text = r#"{"id":4,"error":{"code":-32601,"message":"'Page.bogus' wasn't found"}}"#;
    let message: CdpMessage = serde_json::from_str(text).unwrap();
    match message {
        CdpMessage::Response(resp) => {
            let error = resp.error.unwrap();
            assert_eq!(error.code, -32601);
            assert!(error.message.contains("Page.bogus"));
        }
        CdpMessage::Event(_) => panic!("expected response frame"),
    }
}

#[test]
fn test_incoming_event_frame_parses_as_event() {
    let text = r#"{"method":"Page.loadEventFired","params":{"timestamp":12.5}}"#;
    let message: CdpMessage = serde_json::from_str(text).unwrap();
    match message {
        CdpMessage::Event(event) => {
            assert_eq!(event.method, "Page.loadEventFired");
            assert!(event.session_id.is_none());
        }
        CdpMessage::Response(_) => panic!("expected event frame"),
    }
}

#[test]
fn test_parsed_params_deserializes_typed_payload() {
    #[derive(serde::Deserialize)]
    struct Fired {
        timestamp: f64,
    }

    let event = CdpEvent {
        method: "Page.loadEventFired".to_string(),
        params: Some(json!({"timestamp": 42.0})),
        session_id: None,
    };
    let fired: Fired = event.parsed_params().unwrap();
    assert!((fired.timestamp - 42.0).abs() < f64::EPSILON);
}

#[test]
fn test_parsed_params_is_none_on_shape_mismatch() {
    #[derive(serde::Deserialize)]
    struct Fired {
        #[allow(dead_code)]
        timestamp: f64,
    }

    let event = CdpEvent {
        method: "Page.loadEventFired".to_string(),
        params: Some(json!({"other": true})),
        session_id: None,
    };
    assert!(event.parsed_params::<Fired>().is_none());
}
