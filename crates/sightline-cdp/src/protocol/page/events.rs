//! Page domain event payloads.

use serde::Deserialize;

use super::types::DialogType;

/// Payload of Page.loadEventFired.
#[derive(Debug, Clone, Deserialize)]
pub struct LoadEventFiredEvent {
    /// Monotonic event timestamp.
    pub timestamp: f64,
}

/// Payload of Page.domContentEventFired.
#[derive(Debug, Clone, Deserialize)]
pub struct DomContentEventFiredEvent {
    /// Monotonic event timestamp.
    pub timestamp: f64,
}

/// Payload of Page.frameStartedLoading.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameStartedLoadingEvent {
    /// Frame that started loading.
    pub frame_id: String,
}

/// Payload of Page.frameStoppedLoading.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameStoppedLoadingEvent {
    /// Frame that stopped loading.
    pub frame_id: String,
}

/// Payload of Page.lifecycleEvent.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleEventEvent {
    /// Frame the lifecycle event belongs to.
    pub frame_id: String,
    /// Loader identifier.
    pub loader_id: Option<String>,
    /// Lifecycle event name (e.g. "firstMeaningfulPaint").
    pub name: String,
    /// Monotonic event timestamp.
    pub timestamp: f64,
}

/// Payload of Page.javascriptDialogOpening.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JavascriptDialogOpeningEvent {
    /// URL of the frame that opened the dialog.
    pub url: String,
    /// Dialog message text.
    pub message: String,
    /// Dialog type.
    #[serde(rename = "type")]
    pub dialog_type: DialogType,
    /// Default value for prompt dialogs.
    pub default_prompt: Option<String>,
}
