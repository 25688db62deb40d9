use super::*;

#[test]
fn test_normalize_prepends_http_scheme() {
    assert_eq!(normalize_url("example.com"), "http://example.com");
    assert_eq!(normalize_url("localhost:8080/app"), "http://localhost:8080/app");
}

#[test]
fn test_normalize_keeps_existing_schemes() {
    assert_eq!(normalize_url("https://example.com"), "https://example.com");
    assert_eq!(normalize_url("file:///tmp/page.html"), "file:///tmp/page.html");
    assert_eq!(normalize_url("about:blank"), "about:blank");
}

#[test]
fn test_normalize_is_a_fixed_point() {
    for input in ["example.com", "https://example.com", "file:///x", "about:blank", "localhost:9090"] {
        let once = normalize_url(input);
        assert_eq!(normalize_url(&once), once, "not idempotent for {input}");
    }
}

#[test]
fn test_normalize_trims_whitespace() {
    assert_eq!(normalize_url("  example.com  "), "http://example.com");
}

#[test]
fn test_goto_options_defaults() {
    let options = GotoOptions::default();
    assert_eq!(options.timeout, std::time::Duration::from_secs(30));
    assert!(options.headers.is_empty());
}
