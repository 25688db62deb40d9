use std::path::PathBuf;
use std::time::Duration;

use super::*;

#[test]
fn test_navigation_failed_message_shape() {
    let err = NavigationError::Failed {
        url: "http://localhost:1".to_string(),
        reason: "net::ERR_CONNECTION_REFUSED".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Navigation to url \"http://localhost:1\" failed. REASON: net::ERR_CONNECTION_REFUSED"
    );
}

#[test]
fn test_navigation_timeout_names_the_budget() {
    let err = NavigationError::Timeout(Duration::from_secs(15));
    assert!(err.to_string().contains("15s"));
    assert!(err.to_string().contains("increasing the timeout"));
}

#[test]
fn test_too_many_matches_message() {
    let err = SelectorError::TooManyMatches { count: 24, cap: 10 };
    assert!(
        err.to_string()
            .starts_with("Please provide a better selector, too many matches")
    );
    assert!(err.to_string().contains("24"));
}

#[test]
fn test_not_found_names_the_selector() {
    let err = SelectorError::NotFound("button with label \"Submit\"".to_string());
    assert!(err.to_string().contains("button with label \"Submit\""));
}

#[test]
fn test_covered_message() {
    let err = SelectorError::Covered("link with label \"Next\"".to_string());
    assert!(err.to_string().ends_with("covered by other element"));
}

#[test]
fn test_file_not_found_carries_path() {
    let err = InputError::FileNotFound(PathBuf::from("/tmp/missing.pdf"));
    assert_eq!(err.to_string(), "file not found: /tmp/missing.pdf");
}

#[test]
fn test_not_launched_message() {
    let err = BrowserError::NotLaunched;
    assert_eq!(err.to_string(), "browser is not open; call launch() first");
}

#[test]
fn test_core_error_wraps_domains() {
    let err: CoreError = SelectorError::NotFound("x".to_string()).into();
    assert!(matches!(err, CoreError::Selector(_)));
    let err: CoreError = NavigationError::Timeout(Duration::from_secs(1)).into();
    assert!(matches!(err, CoreError::Navigation(_)));
}
