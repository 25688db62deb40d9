use super::*;

#[test]
fn test_content_center_averages_quad_corners() {
    let model = BoxModel {
        content: vec![10.0, 20.0, 110.0, 20.0, 110.0, 60.0, 10.0, 60.0],
        border: vec![],
        width: 100.0,
        height: 40.0,
    };
    let (x, y) = model.content_center().unwrap();
    assert!((x - 60.0).abs() < f64::EPSILON);
    assert!((y - 40.0).abs() < f64::EPSILON);
}

#[test]
fn test_content_center_requires_full_quad() {
    let model = BoxModel {
        content: vec![1.0, 2.0],
        border: vec![],
        width: 0.0,
        height: 0.0,
    };
    assert!(model.content_center().is_none());
}

#[test]
fn test_search_params_serialize_camel_case() {
    let params = GetSearchResultsParams {
        search_id: "S1".to_string(),
        from_index: 0,
        to_index: 5,
    };
    let value = serde_json::to_value(&params).unwrap();
    assert_eq!(value["searchId"], "S1");
    assert_eq!(value["fromIndex"], 0);
    assert_eq!(value["toIndex"], 5);
}

#[test]
fn test_get_document_result_parses_root_node() {
    let json = r##"{"root": {"nodeId": 1, "nodeName": "#document"}}"##;
    let result: GetDocumentResult = serde_json::from_str(json).unwrap();
    assert_eq!(result.root.node_id, 1);
    assert_eq!(result.root.node_name.as_deref(), Some("#document"));
}
