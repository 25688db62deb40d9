//! Key definitions for keyboard dispatch.
//!
//! Maps key names to the fields Input.dispatchKeyEvent needs. Named keys
//! cover the editing and navigation set; any single character maps to
//! itself with a `char`-producing definition.

/// Everything a key event needs to know about one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct KeyDefinition {
    /// DOM key value.
    pub(crate) key: String,
    /// Physical code.
    pub(crate) code: String,
    /// Windows virtual key code.
    pub(crate) key_code: i64,
    /// Text the key produces, when it produces any.
    pub(crate) text: Option<String>,
}

impl KeyDefinition {
    fn named(key: &str, code: &str, key_code: i64, text: Option<&str>) -> Self {
        Self {
            key: key.to_string(),
            code: code.to_string(),
            key_code,
            text: text.map(ToString::to_string),
        }
    }
}

/// Look up a key by name or single character.
pub(crate) fn key_definition(name: &str) -> Option<KeyDefinition> {
    let definition = match name {
        "Enter" => KeyDefinition::named("Enter", "Enter", 13, Some("\r")),
        "Tab" => KeyDefinition::named("Tab", "Tab", 9, None),
        "Backspace" => KeyDefinition::named("Backspace", "Backspace", 8, None),
        "Delete" => KeyDefinition::named("Delete", "Delete", 46, None),
        "Escape" => KeyDefinition::named("Escape", "Escape", 27, None),
        "Space" | " " => KeyDefinition::named(" ", "Space", 32, Some(" ")),
        "ArrowLeft" => KeyDefinition::named("ArrowLeft", "ArrowLeft", 37, None),
        "ArrowUp" => KeyDefinition::named("ArrowUp", "ArrowUp", 38, None),
        "ArrowRight" => KeyDefinition::named("ArrowRight", "ArrowRight", 39, None),
        "ArrowDown" => KeyDefinition::named("ArrowDown", "ArrowDown", 40, None),
        "Home" => KeyDefinition::named("Home", "Home", 36, None),
        "End" => KeyDefinition::named("End", "End", 35, None),
        "PageUp" => KeyDefinition::named("PageUp", "PageUp", 33, None),
        "PageDown" => KeyDefinition::named("PageDown", "PageDown", 34, None),
        "Shift" => KeyDefinition::named("Shift", "ShiftLeft", 16, None),
        "Control" => KeyDefinition::named("Control", "ControlLeft", 17, None),
        "Alt" => KeyDefinition::named("Alt", "AltLeft", 18, None),
        "Meta" => KeyDefinition::named("Meta", "MetaLeft", 91, None),
        other => return char_definition(other),
    };
    Some(definition)
}

/// Definition for a single printable character.
fn char_definition(name: &str) -> Option<KeyDefinition> {
    let mut chars = name.chars();
    let ch = chars.next()?;
    if chars.next().is_some() {
        return None;
    }

    let code = if ch.is_ascii_alphabetic() {
        format!("Key{}", ch.to_ascii_uppercase())
    } else if ch.is_ascii_digit() {
        format!("Digit{ch}")
    } else {
        String::new()
    };
    let key_code = if ch.is_ascii_alphanumeric() {
        i64::from(ch.to_ascii_uppercase() as u8)
    } else {
        0
    };

    Some(KeyDefinition {
        key: ch.to_string(),
        code,
        key_code,
        text: Some(ch.to_string()),
    })
}

#[cfg(test)]
mod tests;
