use serde_json::json;

use super::*;

#[test]
fn test_plain_pattern_is_substring_match() {
    assert!(pattern_matches(
        "/api/users",
        "https://example.com/api/users?page=2"
    ));
    assert!(!pattern_matches("/api/users", "https://example.com/api/orders"));
}

#[test]
fn test_wildcard_pattern_matches_whole_url() {
    assert!(pattern_matches(
        "https://*/api/*",
        "https://example.com/api/users"
    ));
    assert!(!pattern_matches(
        "https://*/api/*",
        "http://example.com/api/users"
    ));
    assert!(pattern_matches("*analytics*", "https://cdn.analytics.io/x.js"));
}

#[test]
fn test_wildcard_backtracking() {
    assert!(pattern_matches("*a*b", "xaYYb"));
    assert!(pattern_matches("*a*b", "aabab"));
    assert!(!pattern_matches("*a*b", "bbbba"));
}

#[test]
fn test_last_matching_interceptor_wins() {
    let registry = InterceptorRegistry::default();
    registry.add("example.com", InterceptAction::Block);
    registry.add("example.com/api", InterceptAction::Redirect("http://mock/".to_string()));

    match registry.find("https://example.com/api/users") {
        Some(InterceptAction::Redirect(url)) => assert_eq!(url, "http://mock/"),
        other => panic!("expected redirect, got {other:?}"),
    }
    // Outside /api the earlier Block registration still applies.
    assert!(matches!(
        registry.find("https://example.com/index.html"),
        Some(InterceptAction::Block)
    ));
}

#[test]
fn test_unmatched_url_has_no_action() {
    let registry = InterceptorRegistry::default();
    registry.add("example.com", InterceptAction::Block);
    assert!(registry.find("https://other.org/").is_none());
}

#[test]
fn test_add_reports_first_registration() {
    let registry = InterceptorRegistry::default();
    assert!(registry.add("a", InterceptAction::Block));
    assert!(!registry.add("b", InterceptAction::Block));
    registry.clear();
    assert!(registry.is_empty());
}

#[test]
fn test_mock_response_body_encoding() {
    let mock = MockResponse::json(json!({"ok": true})).status(201);
    let params = mock.into_params("R1".to_string());
    assert_eq!(params.response_code, 201);
    let body = params.body.unwrap();
    assert_eq!(BASE64.decode(body).unwrap(), br#"{"ok":true}"#);
    let headers = params.response_headers.unwrap();
    assert_eq!(headers[0].name, "content-type");
}

#[test]
fn test_mock_string_body_is_not_requoted() {
    let mock = MockResponse::json(json!("hello"));
    let params = mock.into_params("R2".to_string());
    assert_eq!(BASE64.decode(params.body.unwrap()).unwrap(), b"hello");
}

#[test]
fn test_default_mock_has_no_body_or_headers() {
    let params = MockResponse::default().into_params("R3".to_string());
    assert_eq!(params.response_code, 200);
    assert!(params.body.is_none());
    assert!(params.response_headers.is_none());
}
