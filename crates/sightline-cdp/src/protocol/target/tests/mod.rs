use super::*;

#[test]
fn test_target_info_parses_wire_shape() {
    let json = r#"{
        "targetId": "T1",
        "type": "page",
        "title": "Example Domain",
        "url": "http://example.com/",
        "attached": true
    }"#;
    let info: TargetInfo = serde_json::from_str(json).unwrap();
    assert_eq!(info.target_id, "T1");
    assert_eq!(info.target_type, "page");
    assert_eq!(info.attached, Some(true));
}

#[test]
fn test_target_equality_is_by_id_only() {
    let a = TargetInfo {
        target_id: "T1".to_string(),
        target_type: "page".to_string(),
        title: "before".to_string(),
        url: "http://a/".to_string(),
        attached: None,
    };
    let b = TargetInfo {
        target_id: "T1".to_string(),
        target_type: "page".to_string(),
        title: "after navigation".to_string(),
        url: "http://b/".to_string(),
        attached: Some(true),
    };
    assert_eq!(a, b);
}

#[test]
fn test_get_targets_result_parses_list() {
    let json = r#"{"targetInfos": [
        {"targetId": "T1", "type": "page", "title": "", "url": "about:blank"},
        {"targetId": "T2", "type": "service_worker", "title": "sw", "url": "http://x/sw.js"}
    ]}"#;
    let result: GetTargetsResult = serde_json::from_str(json).unwrap();
    assert_eq!(result.target_infos.len(), 2);
    assert_eq!(result.target_infos[1].target_type, "service_worker");
}
