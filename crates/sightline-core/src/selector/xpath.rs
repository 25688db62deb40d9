//! XPath and CSS query construction.
//!
//! Selectors compile to a prioritized list of queries; resolution runs them
//! in order and takes the first that matches anything. Labels try the
//! value-attribute route before visible-text matching; typed factories join
//! the control to a nearby `<label>` through `for`/`id` with a wrapping-label
//! and placeholder fallback.

use super::{ElementKind, Selector};

/// One query the DOM can answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Query {
    /// An XPath expression.
    XPath(String),
    /// A CSS selector.
    Css(String),
}

/// Escape arbitrary text into an XPath string literal.
///
/// XPath 1.0 has no escape syntax, so text containing both quote kinds is
/// built with concat().
pub(crate) fn xpath_literal(text: &str) -> String {
    if !text.contains('\'') {
        return format!("'{text}'");
    }
    if !text.contains('"') {
        return format!("\"{text}\"");
    }
    let mut parts = Vec::new();
    for (i, chunk) in text.split('\'').enumerate() {
        if i > 0 {
            parts.push("\"'\"".to_string());
        }
        if !chunk.is_empty() {
            parts.push(format!("'{chunk}'"));
        }
    }
    format!("concat({})", parts.join(", "))
}

/// Lower-case an XPath string expression for case-insensitive comparison.
fn lowered(expr: &str) -> String {
    format!("translate({expr}, 'ABCDEFGHIJKLMNOPQRSTUVWXYZ', 'abcdefghijklmnopqrstuvwxyz')")
}

/// Any element whose `value` attribute contains the text.
pub(crate) fn value_contains(text: &str) -> String {
    format!("//*[contains(@value, {})]", xpath_literal(text))
}

/// Elements with no descendant `<div>` whose normalized text matches.
///
/// Excluding div-bearing elements keeps the match on the leaf-most label
/// instead of every ancestor container that also "contains" the text.
pub(crate) fn text_match(text: &str, exact: bool) -> String {
    let needle = xpath_literal(&text.to_lowercase());
    let haystack = lowered("normalize-space(.)");
    if exact {
        format!("//*[not(descendant::div)][{haystack}={needle}]")
    } else {
        format!("//*[not(descendant::div)][contains({haystack}, {needle})]")
    }
}

/// Attribute-map XPath: `class` via contains, other attributes via equality.
pub(crate) fn attrs_xpath(tag: &str, pairs: &[(String, String)]) -> String {
    let mut expr = format!("//{tag}");
    for (name, value) in pairs {
        let literal = xpath_literal(value);
        if name == "class" {
            expr.push_str(&format!("[contains(@class, {literal})]"));
        } else {
            expr.push_str(&format!("[@{name}={literal}]"));
        }
    }
    expr
}

/// Attribute-map CSS fallback for typed factories.
pub(crate) fn attrs_css(tag: &str, pairs: &[(String, String)]) -> String {
    let mut expr = tag.to_string();
    for (name, value) in pairs {
        if name == "class" {
            expr.push_str(&format!("[class*=\"{value}\"]"));
        } else {
            expr.push_str(&format!("[{name}=\"{value}\"]"));
        }
    }
    expr
}

/// CSS tag (and type) selector for an element kind.
pub(crate) fn kind_tag(kind: ElementKind) -> &'static str {
    match kind {
        ElementKind::Generic | ElementKind::Text => "*",
        ElementKind::Button => "button",
        ElementKind::Link => "a",
        ElementKind::ListItem => "li",
        ElementKind::Image => "img",
        ElementKind::ComboBox => "select",
        ElementKind::TextField
        | ElementKind::InputField
        | ElementKind::FileField
        | ElementKind::CheckBox
        | ElementKind::RadioButton => "input",
    }
}

/// XPath predicate narrowing `<input>` to the kind's type.
fn input_type_predicate(kind: ElementKind) -> Option<&'static str> {
    match kind {
        ElementKind::TextField => {
            Some("[@type='text' or @type='email' or @type='password' or @type='search' or @type='url' or @type='tel' or @type='number' or not(@type)]")
        }
        ElementKind::FileField => Some("[@type='file']"),
        ElementKind::CheckBox => Some("[@type='checkbox']"),
        ElementKind::RadioButton => Some("[@type='radio']"),
        _ => None,
    }
}

/// Label-joined queries for a typed factory.
///
/// Returned in priority order; resolution stops at the first non-empty one.
pub(crate) fn typed_label_queries(kind: ElementKind, label: &str) -> Vec<Query> {
    let literal = xpath_literal(label);
    let contains_label = format!("contains(normalize-space(.), {literal})");

    match kind {
        ElementKind::Button => vec![Query::XPath(format!(
            "//button[{c}] | //input[@type='submit' or @type='button' or @type='reset'][contains(@value, {l})] | //button[contains(@value, {l})]",
            c = contains_label,
            l = literal,
        ))],
        ElementKind::Link => vec![Query::XPath(format!("//a[{contains_label}]"))],
        ElementKind::ListItem => vec![Query::XPath(format!("//li[{contains_label}]"))],
        ElementKind::Image => vec![Query::XPath(format!(
            "//img[contains(@alt, {literal})] | //img[contains(@src, {literal})]"
        ))],
        ElementKind::TextField
        | ElementKind::InputField
        | ElementKind::FileField
        | ElementKind::CheckBox
        | ElementKind::RadioButton => {
            let type_predicate = input_type_predicate(kind).unwrap_or("");
            vec![
                // Control referenced by a label's `for` attribute.
                Query::XPath(format!(
                    "//input{type_predicate}[@id=//label[{contains_label}]/@for]"
                )),
                // Control wrapped inside its label.
                Query::XPath(format!(
                    "//label[{contains_label}]//input{type_predicate}"
                )),
                // Placeholder text standing in for a label.
                Query::XPath(format!(
                    "//input{type_predicate}[contains(@placeholder, {literal})]"
                )),
            ]
        }
        ElementKind::ComboBox => vec![
            Query::XPath(format!("//select[@id=//label[{contains_label}]/@for]")),
            Query::XPath(format!("//label[{contains_label}]//select")),
        ],
        ElementKind::Generic | ElementKind::Text => vec![
            Query::XPath(value_contains(label)),
            Query::XPath(text_match(label, false)),
        ],
    }
}

/// Compile a selector (with its kind) into a prioritized query list.
pub(crate) fn queries_for(selector: &Selector, kind: ElementKind) -> Vec<Query> {
    match selector {
        Selector::Label { text, exact } => {
            if matches!(kind, ElementKind::Generic | ElementKind::Text) {
                vec![
                    Query::XPath(value_contains(text)),
                    Query::XPath(text_match(text, *exact)),
                ]
            } else {
                typed_label_queries(kind, text)
            }
        }
        Selector::Attrs { tag, pairs } => {
            if matches!(kind, ElementKind::Generic | ElementKind::Text) {
                vec![Query::XPath(attrs_xpath(tag, pairs))]
            } else {
                // Typed factory given only attributes: type-specific CSS.
                vec![Query::Css(attrs_css(kind_tag(kind), pairs))]
            }
        }
        Selector::XPathOrCss { expr } => {
            if Selector::is_xpath(expr) {
                vec![Query::XPath(expr.clone())]
            } else {
                vec![Query::Css(expr.clone())]
            }
        }
        Selector::Composite { base, .. } => queries_for(base, kind),
    }
}
