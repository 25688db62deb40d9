//! Page domain result types.

use serde::Deserialize;

/// Result of Page.navigate.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigateResult {
    /// Frame id that was navigated.
    pub frame_id: String,
    /// Loader identifier, absent for same-document navigations.
    pub loader_id: Option<String>,
    /// Populated when the navigation failed at the network layer.
    pub error_text: Option<String>,
}

/// Result of Page.captureScreenshot.
#[derive(Debug, Clone, Deserialize)]
pub struct CaptureScreenshotResult {
    /// Base64-encoded image data.
    pub data: String,
}
