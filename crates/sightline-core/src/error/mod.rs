//! Core error types.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors that can occur in the core domain.
#[derive(Error, Debug)]
pub enum CoreError {
    /// CDP communication error.
    #[error("CDP error: {0}")]
    Cdp(#[from] sightline_cdp::CdpError),

    /// Browser/session error.
    #[error("browser error: {0}")]
    Browser(#[from] BrowserError),

    /// Navigation error.
    #[error("navigation error: {0}")]
    Navigation(#[from] NavigationError),

    /// Selector error.
    #[error("selector error: {0}")]
    Selector(#[from] SelectorError),

    /// Input error.
    #[error("input error: {0}")]
    Input(#[from] InputError),

    /// In-page evaluation failed.
    #[error("evaluation failed: {0}")]
    Evaluation(String),

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to the browser session lifecycle.
#[derive(Error, Debug)]
pub enum BrowserError {
    /// Chromium executable not found.
    #[error("Chromium not found. Set CHROMIUM_PATH environment variable or install Chromium.")]
    ChromiumNotFound,

    /// Failed to launch the browser process.
    #[error("failed to launch browser: {0}")]
    LaunchFailed(String),

    /// The browser did not publish a DevTools endpoint in time.
    #[error("browser did not publish a DevTools endpoint within {0:?}")]
    EndpointTimeout(Duration),

    /// An operation was attempted without an open browser.
    #[error("browser is not open; call launch() first")]
    NotLaunched,

    /// No target matched the requested url or title.
    #[error("no target found matching \"{0}\"")]
    TargetNotFound(String),

    /// The browser process exited while we still needed it.
    #[error("browser process exited unexpectedly")]
    ProcessExited,

    /// CDP error during a session operation.
    #[error("CDP error: {0}")]
    Cdp(#[from] sightline_cdp::CdpError),
}

/// Errors related to navigation and settling.
#[derive(Error, Debug)]
pub enum NavigationError {
    /// The page did not settle within the deadline.
    #[error("navigation timed out after {0:?}; consider increasing the timeout")]
    Timeout(Duration),

    /// The browser reported the navigation as failed.
    #[error("Navigation to url \"{url}\" failed. REASON: {reason}")]
    Failed { url: String, reason: String },

    /// CDP error during navigation.
    #[error("CDP error: {0}")]
    Cdp(#[from] sightline_cdp::CdpError),
}

/// Errors related to element lookup and actions.
#[derive(Error, Debug)]
pub enum SelectorError {
    /// No visible element matched.
    #[error("element not found for selector {0}")]
    NotFound(String),

    /// Every candidate failed the hit-test.
    #[error("element {0} is covered by other element")]
    Covered(String),

    /// Too many candidates and none of the checked ones was hittable.
    #[error("Please provide a better selector, too many matches ({count} found, first {cap} checked)")]
    TooManyMatches { count: usize, cap: usize },

    /// The requested operation does not apply to this element.
    #[error("{0}")]
    InvalidOperation(String),

    /// In-page evaluation failed.
    #[error("evaluation failed: {0}")]
    Evaluation(String),

    /// CDP error during element lookup.
    #[error("CDP error: {0}")]
    Cdp(#[from] sightline_cdp::CdpError),
}

/// Errors related to keyboard and file input.
#[derive(Error, Debug)]
pub enum InputError {
    /// The focused element cannot receive text.
    #[error("active element is not writable: {0}")]
    NotWritable(String),

    /// No element gained focus within the deadline.
    #[error("no focused element to write into after {0:?}")]
    FocusTimeout(Duration),

    /// The file to attach does not exist.
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    /// The key name is not in the key definition table.
    #[error("unknown key: {0}")]
    UnknownKey(String),

    /// CDP error during input dispatch.
    #[error("CDP error: {0}")]
    Cdp(#[from] sightline_cdp::CdpError),
}

#[cfg(test)]
mod tests;
