//! # Sightline Core - Tolerant Browser Automation
//!
//! High-level browser automation over the Chrome DevTools Protocol, built
//! for test authors: selectors that match by visible label rather than
//! brittle CSS paths, actions that transparently wait for navigation and
//! network quiescence, and relative spatial selectors ("to the left of",
//! "below").
//!
//! ## Quick Start
//!
//! ```no_run
//! use sightline_core::{Browser, button, link, text};
//!
//! # async fn example() -> Result<(), sightline_core::CoreError> {
//! let browser = Browser::launch().headless(true).launch().await?;
//!
//! let result = browser.goto("example.com").await?;
//! assert_eq!(result.description, "Navigated to url \"http://example.com\"");
//!
//! // Click by visible label; the click waits for any triggered navigation
//! // and for the network to go quiet.
//! browser.click(button("Submit")).await?;
//!
//! // Disambiguate with relative selectors.
//! browser.click(link("Delete").to_right_of(text("Bob"))).await?;
//!
//! browser.close().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Writing into fields
//!
//! ```no_run
//! use sightline_core::{Browser, text_field};
//!
//! # async fn example(browser: &Browser) -> Result<(), sightline_core::CoreError> {
//! browser.write_into("user@example.com", text_field("Email")).await?;
//! browser.press("Enter").await?;
//!
//! let value = browser.element(text_field("Email")).value().await?;
//! assert_eq!(value, "user@example.com");
//! # Ok(())
//! # }
//! ```
//!
//! ## Dialogs and interception
//!
//! ```no_run
//! use sightline_core::{Browser, InterceptAction, MockResponse};
//! use serde_json::json;
//!
//! # async fn example(browser: &Browser) -> Result<(), sightline_core::CoreError> {
//! browser.on_alert(Some("Are you sure?"), |dialog| async move {
//!     dialog.accept().await
//! });
//!
//! browser
//!     .intercept("/api/users", InterceptAction::Mock(MockResponse::json(json!([]))))
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`browser`] - Session lifecycle: launch, attach, tabs, close
//! - [`selector`] - Selector factories and the element wrapper
//! - [`action`] - The pointer-action pipeline
//! - [`input`] - Keyboard and file input
//! - [`wait`] - Navigation settling and network-idle tracking
//! - [`bus`] - The session event bus
//! - [`dialog`] - JavaScript dialog handling
//! - [`intercept`] - Network request interception
//! - [`error`] - Error types

pub mod action;
pub mod browser;
pub mod bus;
pub mod dialog;
pub mod error;
pub mod input;
pub mod intercept;
pub mod selector;
pub mod wait;

pub use action::{ActionResult, ClickOptions};
pub use browser::{Browser, BrowserBuilder, GotoOptions, normalize_url};
pub use bus::{BusEvent, EventBus};
pub use dialog::{Dialog, DialogType};
pub use error::{
    BrowserError, CoreError, InputError, NavigationError, SelectorError,
};
pub use input::{PressOptions, WriteOptions};
pub use intercept::{
    ContinueOverrides, InterceptAction, InterceptedRequest, MockResponse, rewrite,
};
pub use selector::{
    Element, ElementKind, ElementSpec, Match, attrs, button, check_box, combo_box, contains,
    file_field, image, input_field, link, list_item, query, radio_button, text, text_field,
};
pub use selector::relative::{Rect, RelativePosition};
pub use wait::navigation::{Settled, WaitOptions};

// Re-exported so callers can pattern-match wire errors without importing
// the CDP crate directly.
pub use sightline_cdp::CdpError;
