use super::*;

#[test]
fn test_mouse_event_type_serializes_camel_case() {
    let value = serde_json::to_value(MouseEventType::MousePressed).unwrap();
    assert_eq!(value, "mousePressed");
}

#[test]
fn test_mouse_down_carries_button_and_click_count() {
    let params = DispatchMouseEventParams::mouse_down(10.0, 20.0, MouseButton::Right, 1);
    let value = serde_json::to_value(&params).unwrap();
    assert_eq!(value["type"], "mousePressed");
    assert_eq!(value["button"], "right");
    assert_eq!(value["clickCount"], 1);
    assert_eq!(value["x"], 10.0);
}

#[test]
fn test_mouse_move_omits_button() {
    let params = DispatchMouseEventParams::mouse_move(1.0, 2.0);
    let value = serde_json::to_value(&params).unwrap();
    assert_eq!(value["type"], "mouseMoved");
    assert!(value.get("button").is_none());
}

#[test]
fn test_char_event_sets_both_text_fields() {
    let params = DispatchKeyEventParams::char_event("x");
    let value = serde_json::to_value(&params).unwrap();
    assert_eq!(value["type"], "char");
    assert_eq!(value["text"], "x");
    assert_eq!(value["unmodifiedText"], "x");
}
