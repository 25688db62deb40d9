use super::xpath::{self, Query};
use super::*;

#[test]
fn test_bare_string_is_contains_lookup() {
    let spec: ElementSpec = "Sign in".into();
    match &spec.selector {
        Selector::Label { text, exact } => {
            assert_eq!(text, "Sign in");
            assert!(!exact);
        }
        other => panic!("unexpected selector: {other:?}"),
    }
}

#[test]
fn test_text_factory_is_exact() {
    let spec = text("Done");
    assert!(matches!(&spec.selector, Selector::Label { exact: true, .. }));
}

#[test]
fn test_label_queries_try_value_attribute_first() {
    let spec = contains("Search");
    let queries = xpath::queries_for(&spec.selector, spec.kind);
    assert_eq!(queries.len(), 2);
    assert_eq!(
        queries[0],
        Query::XPath("//*[contains(@value, 'Search')]".to_string())
    );
    match &queries[1] {
        Query::XPath(expr) => {
            assert!(expr.contains("not(descendant::div)"));
            assert!(expr.contains("'search'"), "needle must be lowercased: {expr}");
            assert!(expr.contains("translate(normalize-space(.)"));
        }
        Query::Css(_) => panic!("expected xpath"),
    }
}

#[test]
fn test_exact_text_uses_equality() {
    let spec = text("Done");
    let queries = xpath::queries_for(&spec.selector, spec.kind);
    match &queries[1] {
        Query::XPath(expr) => assert!(expr.contains("='done'")),
        Query::Css(_) => panic!("expected xpath"),
    }
}

#[test]
fn test_attrs_class_is_contains_others_equality() {
    let expr = xpath::attrs_xpath(
        "*",
        &[
            ("class".to_string(), "primary".to_string()),
            ("name".to_string(), "q".to_string()),
        ],
    );
    assert_eq!(expr, "//*[contains(@class, 'primary')][@name='q']");
}

#[test]
fn test_typed_factory_with_attrs_falls_back_to_css() {
    let spec = check_box(attrs([("name", "tos")]));
    let queries = xpath::queries_for(&spec.selector, spec.kind);
    assert_eq!(queries, vec![Query::Css("input[name=\"tos\"]".to_string())]);
}

#[test]
fn test_raw_expression_detection() {
    assert!(Selector::is_xpath("//a[1]"));
    assert!(Selector::is_xpath("(//a)[2]"));
    assert!(!Selector::is_xpath("#login .button"));

    let by_xpath = query("//a[1]");
    assert_eq!(
        xpath::queries_for(&by_xpath.selector, by_xpath.kind),
        vec![Query::XPath("//a[1]".to_string())]
    );
    let by_css = query("#login .button");
    assert_eq!(
        xpath::queries_for(&by_css.selector, by_css.kind),
        vec![Query::Css("#login .button".to_string())]
    );
}

#[test]
fn test_button_label_query_covers_inputs() {
    let spec = button("Submit");
    let queries = xpath::queries_for(&spec.selector, spec.kind);
    assert_eq!(queries.len(), 1);
    match &queries[0] {
        Query::XPath(expr) => {
            assert!(expr.contains("//button[contains(normalize-space(.), 'Submit')]"));
            assert!(expr.contains("@type='submit'"));
        }
        Query::Css(_) => panic!("expected xpath"),
    }
}

#[test]
fn test_text_field_label_join_order() {
    let spec = text_field("Email");
    let queries = xpath::queries_for(&spec.selector, spec.kind);
    assert_eq!(queries.len(), 3);
    match &queries[0] {
        Query::XPath(expr) => {
            assert!(expr.contains("@id=//label[contains(normalize-space(.), 'Email')]/@for"));
        }
        Query::Css(_) => panic!("expected xpath"),
    }
    match &queries[1] {
        Query::XPath(expr) => assert!(expr.starts_with("//label")),
        Query::Css(_) => panic!("expected xpath"),
    }
    match &queries[2] {
        Query::XPath(expr) => assert!(expr.contains("@placeholder")),
        Query::Css(_) => panic!("expected xpath"),
    }
}

#[test]
fn test_xpath_literal_handles_quotes() {
    assert_eq!(xpath::xpath_literal("plain"), "'plain'");
    assert_eq!(xpath::xpath_literal("it's"), "\"it's\"");
    assert_eq!(
        xpath::xpath_literal("a'b\"c"),
        "concat('a', \"'\", 'b\"c')"
    );
}

#[test]
fn test_composite_accumulates_constraints() {
    let spec = link("Delete").to_right_of(text("Bob")).near(text("Bob"));
    match &spec.selector {
        Selector::Composite { relatives, .. } => {
            assert_eq!(relatives.len(), 2);
            assert_eq!(relatives[0].position, relative::RelativePosition::RightOf);
            assert_eq!(relatives[1].position, relative::RelativePosition::Near);
        }
        other => panic!("expected composite, got {other:?}"),
    }
    // Queries come from the base selector.
    let queries = xpath::queries_for(&spec.selector, spec.kind);
    assert!(matches!(&queries[0], Query::XPath(expr) if expr.starts_with("//a")));
}

#[test]
fn test_description_names_kind_label_and_relatives() {
    assert_eq!(button("Submit").description(), "button with label \"Submit\"");
    assert_eq!(
        link("Delete").to_right_of(text("Bob")).description(),
        "link with label \"Delete\" to right of text with label \"Bob\""
    );
    assert_eq!(
        query("//a[1]").description(),
        "element matching \"//a[1]\""
    );
    assert_eq!(
        check_box(attrs([("name", "tos")])).description(),
        "checkbox with attributes [name=\"tos\"]"
    );
}

#[test]
fn test_capability_sets_by_kind() {
    assert!(ElementKind::TextField.supports_value());
    assert!(ElementKind::ComboBox.supports_value());
    assert!(!ElementKind::Link.supports_value());
    assert!(ElementKind::CheckBox.supports_check());
    assert!(ElementKind::RadioButton.supports_check());
    assert!(!ElementKind::CheckBox.supports_select());
    assert!(ElementKind::ComboBox.supports_select());
}
