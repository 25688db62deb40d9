use super::*;

#[test]
fn test_action_result_constructors() {
    let plain = ActionResult::new("Clicked button with label \"Submit\"");
    assert_eq!(plain.description, "Clicked button with label \"Submit\"");
    assert!(plain.url.is_none());

    let nav = ActionResult::with_url(
        "Navigated to url \"http://example.com\"",
        "http://example.com",
    );
    assert_eq!(nav.url.as_deref(), Some("http://example.com"));
}

#[test]
fn test_click_options_defaults() {
    let options = ClickOptions::default();
    assert_eq!(options.button, MouseButton::Left);
    assert_eq!(options.click_count, 1);
    assert!(options.wait.await_navigation);
}

#[test]
fn test_lowercase_first() {
    assert_eq!(lowercase_first("Clicked link"), "clicked link");
    assert_eq!(lowercase_first(""), "");
}

#[test]
fn test_scroll_expression_shape() {
    assert_eq!(js::scroll_by_expr(-100, 0), "window.scrollBy(-100, 0)");
    assert_eq!(js::scroll_by_expr(0, 250), "window.scrollBy(0, 250)");
}

#[test]
fn test_snippets_are_function_sources() {
    // Every callFunctionOn snippet must be a bare function expression and
    // every evaluate snippet a complete expression.
    for snippet in [
        js::IS_VISIBLE_FN,
        js::OCCLUSION_CHECK_FN,
        js::CONTAINS_HIT_FN,
        js::INNER_TEXT_FN,
        js::VALUE_FN,
        js::TAG_AND_TYPE_FN,
        js::IS_CHECKED_FN,
        js::SET_CHECKED_FN,
        js::SELECT_OPTION_FN,
    ] {
        assert!(snippet.trim_start().starts_with("function"), "{snippet}");
    }
    assert!(js::ACTIVE_WRITABLE_EXPR.trim_start().starts_with("(()"));
    assert!(js::ACTIVE_CENTER_EXPR.trim_start().starts_with("(()"));
    assert_eq!(js::SOURCE_REVISION, 1);
}

#[test]
fn test_occlusion_snippet_tolerates_transparency() {
    // The 0.1 opacity tolerance is observable behavior; keep it pinned.
    assert!(js::OCCLUSION_CHECK_FN.contains("< 0.1"));
}
