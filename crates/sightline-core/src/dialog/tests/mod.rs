use super::*;

fn noop_handler() -> DialogHandler {
    Arc::new(|_dialog| Box::pin(async { Ok(()) }))
}

#[test]
fn test_find_matches_type_and_any_message() {
    let registry = DialogRegistry::default();
    registry.register(DialogType::Alert, None, noop_handler());

    assert!(registry.find(DialogType::Alert, "anything").is_some());
    assert!(registry.find(DialogType::Confirm, "anything").is_none());
}

#[test]
fn test_find_matches_exact_message() {
    let registry = DialogRegistry::default();
    registry.register(
        DialogType::Confirm,
        Some("Delete the file?".to_string()),
        noop_handler(),
    );

    assert!(registry.find(DialogType::Confirm, "Delete the file?").is_some());
    assert!(registry.find(DialogType::Confirm, "Something else").is_none());
}

#[test]
fn test_last_registered_wins() {
    // Two expectations match; registration order decides which handler runs.
    let registry = DialogRegistry::default();
    let first: DialogHandler = Arc::new(|_d| Box::pin(async { Ok(()) }));
    let second: DialogHandler = Arc::new(|_d| Box::pin(async { Ok(()) }));
    let second_ptr = Arc::as_ptr(&second);

    registry.register(DialogType::Prompt, None, first);
    registry.register(DialogType::Prompt, Some("Name?".to_string()), second);

    let found = registry.find(DialogType::Prompt, "Name?").unwrap();
    assert!(std::ptr::addr_eq(Arc::as_ptr(&found), second_ptr));
}

#[test]
fn test_clear_removes_expectations() {
    let registry = DialogRegistry::default();
    registry.register(DialogType::Beforeunload, None, noop_handler());
    registry.clear();
    assert!(registry.find(DialogType::Beforeunload, "").is_none());
}
