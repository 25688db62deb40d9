//! Page domain shared types.

use serde::{Deserialize, Serialize};

/// Image compression format for screenshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenshotFormat {
    /// PNG (lossless).
    Png,
    /// JPEG (lossy).
    Jpeg,
    /// WebP.
    Webp,
}

/// JavaScript dialog type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialogType {
    /// `window.alert`.
    Alert,
    /// `window.confirm`.
    Confirm,
    /// `window.prompt`.
    Prompt,
    /// `beforeunload` confirmation.
    Beforeunload,
}

/// A rectangle clip region in CSS pixels.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    /// X offset.
    pub x: f64,
    /// Y offset.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
    /// Page scale factor.
    pub scale: f64,
}
