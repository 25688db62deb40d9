//! Semantic element selectors.
//!
//! Selectors are pure data: what to look for, not where it was found. They
//! are resolved against the live page by the session (see `resolve`), which
//! is also where visibility filtering and relative-constraint scoring
//! happen.

mod element;
pub mod relative;
mod resolve;
pub(crate) mod xpath;

use relative::{RelativeConstraint, RelativePosition};

pub use element::Element;

/// How many matching candidates an action will hit-test before giving up.
pub(crate) const ELEMENTS_TO_MATCH: usize = 10;

/// What the caller asked to match: a human-visible label or an attribute map.
#[derive(Debug, Clone, PartialEq)]
pub enum Match {
    /// Match by visible label text.
    Label(String),
    /// Match by attribute name/value pairs, in insertion order.
    Attrs(Vec<(String, String)>),
}

impl From<&str> for Match {
    fn from(text: &str) -> Self {
        Self::Label(text.to_string())
    }
}

impl From<String> for Match {
    fn from(text: String) -> Self {
        Self::Label(text)
    }
}

/// Build a [`Match`] from attribute pairs.
///
/// `class` is matched as contains; every other attribute as equality.
pub fn attrs<I, K, V>(pairs: I) -> Match
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    Match::Attrs(
        pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect(),
    )
}

/// A selector, as written by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    /// Human-visible label, matched via contains (or exact).
    Label {
        /// The label text.
        text: String,
        /// Whether to require an exact (normalized) match.
        exact: bool,
    },
    /// Attribute predicates on a tag.
    Attrs {
        /// Element tag, `*` for any.
        tag: String,
        /// Attribute name/value pairs in insertion order.
        pairs: Vec<(String, String)>,
    },
    /// A raw XPath or CSS expression; XPath iff it starts with `//` or `(`.
    XPathOrCss {
        /// The raw expression.
        expr: String,
    },
    /// A base selector narrowed by relative constraints.
    Composite {
        /// The base selector.
        base: Box<Selector>,
        /// Constraints relative to anchor elements.
        relatives: Vec<RelativeConstraint>,
    },
}

impl Selector {
    /// Whether a raw expression is XPath rather than CSS.
    pub(crate) fn is_xpath(expr: &str) -> bool {
        expr.starts_with("//") || expr.starts_with('(')
    }
}

/// The element family a selector was built for.
///
/// The kind decides which query shapes are generated and which wrapper
/// capabilities ([`Element::value`], check/uncheck, select) apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// Any element.
    Generic,
    /// Text matched by content.
    Text,
    /// `<button>` or button-like input.
    Button,
    /// `<a>`.
    Link,
    /// `<li>`.
    ListItem,
    /// `<img>`.
    Image,
    /// Free-text `<input>`.
    TextField,
    /// Any `<input>`.
    InputField,
    /// `<input type="file">`.
    FileField,
    /// `<input type="checkbox">`.
    CheckBox,
    /// `<input type="radio">`.
    RadioButton,
    /// `<select>`.
    ComboBox,
}

impl ElementKind {
    /// Whether the wrapper exposes `value()`.
    pub(crate) fn supports_value(self) -> bool {
        matches!(
            self,
            Self::TextField | Self::InputField | Self::FileField | Self::ComboBox
        )
    }

    /// Whether the wrapper exposes check/uncheck/is_checked.
    pub(crate) fn supports_check(self) -> bool {
        matches!(self, Self::CheckBox | Self::RadioButton)
    }

    /// Whether the wrapper exposes select/deselect.
    pub(crate) fn supports_select(self) -> bool {
        matches!(self, Self::ComboBox)
    }

    /// Human name used in descriptions and error messages.
    pub(crate) fn noun(self) -> &'static str {
        match self {
            Self::Generic => "element",
            Self::Text => "text",
            Self::Button => "button",
            Self::Link => "link",
            Self::ListItem => "list item",
            Self::Image => "image",
            Self::TextField => "text field",
            Self::InputField => "input field",
            Self::FileField => "file field",
            Self::CheckBox => "checkbox",
            Self::RadioButton => "radio button",
            Self::ComboBox => "combo box",
        }
    }
}

/// A selector plus the element family it targets.
///
/// This is what the selector factories return and what every verb accepts.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementSpec {
    pub(crate) selector: Selector,
    pub(crate) kind: ElementKind,
}

impl ElementSpec {
    fn new(selector: Selector, kind: ElementKind) -> Self {
        Self { selector, kind }
    }

    fn from_match(matcher: Match, kind: ElementKind) -> Self {
        let selector = match matcher {
            Match::Label(text) => Selector::Label { text, exact: false },
            Match::Attrs(pairs) => Selector::Attrs {
                tag: xpath::kind_tag(kind).to_string(),
                pairs,
            },
        };
        Self::new(selector, kind)
    }

    /// Require the match to sit left of the anchor.
    #[must_use]
    pub fn to_left_of(self, anchor: impl Into<ElementSpec>) -> Self {
        self.with_constraint(RelativePosition::LeftOf, anchor.into())
    }

    /// Require the match to sit right of the anchor.
    #[must_use]
    pub fn to_right_of(self, anchor: impl Into<ElementSpec>) -> Self {
        self.with_constraint(RelativePosition::RightOf, anchor.into())
    }

    /// Require the match to sit above the anchor.
    #[must_use]
    pub fn above(self, anchor: impl Into<ElementSpec>) -> Self {
        self.with_constraint(RelativePosition::Above, anchor.into())
    }

    /// Require the match to sit below the anchor.
    #[must_use]
    pub fn below(self, anchor: impl Into<ElementSpec>) -> Self {
        self.with_constraint(RelativePosition::Below, anchor.into())
    }

    /// Require the match to sit within 30px of the anchor.
    #[must_use]
    pub fn near(self, anchor: impl Into<ElementSpec>) -> Self {
        self.with_constraint(RelativePosition::Near, anchor.into())
    }

    fn with_constraint(self, position: RelativePosition, anchor: ElementSpec) -> Self {
        let kind = self.kind;
        let constraint = RelativeConstraint {
            position,
            anchor: Box::new(anchor),
        };
        let selector = match self.selector {
            Selector::Composite { base, mut relatives } => {
                relatives.push(constraint);
                Selector::Composite { base, relatives }
            }
            base => Selector::Composite {
                base: Box::new(base),
                relatives: vec![constraint],
            },
        };
        Self::new(selector, kind)
    }

    /// Human-readable description used in results and error messages.
    pub fn description(&self) -> String {
        fn selector_part(selector: &Selector, kind: ElementKind) -> String {
            match selector {
                Selector::Label { text, .. } => {
                    format!("{} with label \"{}\"", kind.noun(), text)
                }
                Selector::Attrs { pairs, .. } => {
                    let rendered: Vec<String> = pairs
                        .iter()
                        .map(|(k, v)| format!("{k}=\"{v}\""))
                        .collect();
                    format!("{} with attributes [{}]", kind.noun(), rendered.join(", "))
                }
                Selector::XPathOrCss { expr } => {
                    format!("{} matching \"{expr}\"", kind.noun())
                }
                Selector::Composite { base, relatives } => {
                    let mut description = selector_part(base, kind);
                    for constraint in relatives {
                        description.push(' ');
                        description.push_str(constraint.position.phrase());
                        description.push(' ');
                        description.push_str(&constraint.anchor.description());
                    }
                    description
                }
            }
        }
        selector_part(&self.selector, self.kind)
    }
}

impl From<&str> for ElementSpec {
    /// A bare string is contains-text lookup, like passing a string to a verb.
    fn from(text: &str) -> Self {
        contains(text)
    }
}

/// Raw XPath or CSS selector.
pub fn query(expr: impl Into<String>) -> ElementSpec {
    ElementSpec::new(
        Selector::XPathOrCss { expr: expr.into() },
        ElementKind::Generic,
    )
}

/// Element whose normalized text equals the given text (case-insensitive).
pub fn text(content: impl Into<String>) -> ElementSpec {
    ElementSpec::new(
        Selector::Label {
            text: content.into(),
            exact: true,
        },
        ElementKind::Text,
    )
}

/// Element whose text or value contains the given text (case-insensitive).
pub fn contains(content: impl Into<String>) -> ElementSpec {
    ElementSpec::new(
        Selector::Label {
            text: content.into(),
            exact: false,
        },
        ElementKind::Text,
    )
}

/// A button (or button-like input).
pub fn button(matcher: impl Into<Match>) -> ElementSpec {
    ElementSpec::from_match(matcher.into(), ElementKind::Button)
}

/// An anchor element.
pub fn link(matcher: impl Into<Match>) -> ElementSpec {
    ElementSpec::from_match(matcher.into(), ElementKind::Link)
}

/// A list item.
pub fn list_item(matcher: impl Into<Match>) -> ElementSpec {
    ElementSpec::from_match(matcher.into(), ElementKind::ListItem)
}

/// An image, matched by alt text or attributes.
pub fn image(matcher: impl Into<Match>) -> ElementSpec {
    ElementSpec::from_match(matcher.into(), ElementKind::Image)
}

/// A free-text input, matched through its label.
pub fn text_field(matcher: impl Into<Match>) -> ElementSpec {
    ElementSpec::from_match(matcher.into(), ElementKind::TextField)
}

/// Any input element, matched through its label.
pub fn input_field(matcher: impl Into<Match>) -> ElementSpec {
    ElementSpec::from_match(matcher.into(), ElementKind::InputField)
}

/// A file input, matched through its label.
pub fn file_field(matcher: impl Into<Match>) -> ElementSpec {
    ElementSpec::from_match(matcher.into(), ElementKind::FileField)
}

/// A checkbox, matched through its label.
pub fn check_box(matcher: impl Into<Match>) -> ElementSpec {
    ElementSpec::from_match(matcher.into(), ElementKind::CheckBox)
}

/// A radio button, matched through its label.
pub fn radio_button(matcher: impl Into<Match>) -> ElementSpec {
    ElementSpec::from_match(matcher.into(), ElementKind::RadioButton)
}

/// A select element, matched through its label.
pub fn combo_box(matcher: impl Into<Match>) -> ElementSpec {
    ElementSpec::from_match(matcher.into(), ElementKind::ComboBox)
}

#[cfg(test)]
mod tests;
