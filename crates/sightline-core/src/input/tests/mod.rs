use super::*;

#[test]
fn test_write_options_defaults() {
    let options = WriteOptions::default();
    assert_eq!(options.delay, Duration::from_millis(10));
    assert_eq!(options.timeout, Duration::from_secs(10));
}

#[test]
fn test_key_down_uses_key_down_for_text_keys() {
    let def = key_definition("a").unwrap();
    let params = key_down_params(&def);
    let value = serde_json::to_value(&params).unwrap();
    assert_eq!(value["type"], "keyDown");
    assert_eq!(value["text"], "a");
    assert_eq!(value["windowsVirtualKeyCode"], 65);
}

#[test]
fn test_key_down_uses_raw_for_non_text_keys() {
    let def = key_definition("Backspace").unwrap();
    let params = key_down_params(&def);
    let value = serde_json::to_value(&params).unwrap();
    assert_eq!(value["type"], "rawKeyDown");
    assert!(value.get("text").is_none());
    assert_eq!(value["windowsVirtualKeyCode"], 8);
}

#[test]
fn test_key_up_never_carries_text() {
    let def = key_definition("Enter").unwrap();
    let params = key_up_params(&def);
    let value = serde_json::to_value(&params).unwrap();
    assert_eq!(value["type"], "keyUp");
    assert!(value.get("text").is_none());
}

#[test]
fn test_writable_info_parses_probe_shapes() {
    let info: WritableInfo = serde_json::from_value(serde_json::json!({
        "writable": true, "tag": "INPUT", "type": "password"
    }))
    .unwrap();
    assert!(info.writable);
    assert_eq!(info.input_type.as_deref(), Some("password"));

    let info: WritableInfo = serde_json::from_value(serde_json::json!({
        "writable": false, "tag": null, "type": null
    }))
    .unwrap();
    assert!(!info.writable);
    assert!(info.tag.is_none());
}
