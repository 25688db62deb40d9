use super::*;

#[test]
fn test_enter_produces_carriage_return() {
    let def = key_definition("Enter").unwrap();
    assert_eq!(def.key, "Enter");
    assert_eq!(def.key_code, 13);
    assert_eq!(def.text.as_deref(), Some("\r"));
}

#[test]
fn test_named_keys_without_text() {
    for (name, key_code) in [("Tab", 9), ("Backspace", 8), ("Escape", 27), ("ArrowDown", 40)] {
        let def = key_definition(name).unwrap();
        assert_eq!(def.key_code, key_code, "{name}");
        assert!(def.text.is_none(), "{name} should not produce text");
    }
}

#[test]
fn test_letter_definition() {
    let def = key_definition("a").unwrap();
    assert_eq!(def.key, "a");
    assert_eq!(def.code, "KeyA");
    assert_eq!(def.key_code, 65);
    assert_eq!(def.text.as_deref(), Some("a"));
}

#[test]
fn test_digit_definition() {
    let def = key_definition("7").unwrap();
    assert_eq!(def.code, "Digit7");
    assert_eq!(def.key_code, 55);
}

#[test]
fn test_punctuation_maps_to_itself() {
    let def = key_definition("@").unwrap();
    assert_eq!(def.key, "@");
    assert_eq!(def.text.as_deref(), Some("@"));
    assert_eq!(def.key_code, 0);
}

#[test]
fn test_unknown_multi_char_name_is_rejected() {
    assert!(key_definition("NotAKey").is_none());
}

#[test]
fn test_space_by_name_and_literal() {
    assert_eq!(key_definition("Space"), key_definition(" "));
}
