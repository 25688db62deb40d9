//! Target domain types.
//!
//! Targets are debuggable units: pages, iframes, workers. The session layer
//! scans the target list by url or title when switching tabs.

use serde::{Deserialize, Serialize};

/// Description of a debuggable target.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetInfo {
    /// Target identifier.
    pub target_id: String,
    /// Target type ("page", "service_worker", ...).
    #[serde(rename = "type")]
    pub target_type: String,
    /// Page title.
    pub title: String,
    /// Current URL.
    pub url: String,
    /// Whether a debugger is attached.
    pub attached: Option<bool>,
}

impl PartialEq for TargetInfo {
    fn eq(&self, other: &Self) -> bool {
        self.target_id == other.target_id
    }
}

impl Eq for TargetInfo {}

/// Result of Target.getTargets.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTargetsResult {
    /// All known targets.
    pub target_infos: Vec<TargetInfo>,
}

/// Parameters for Target.createTarget.
#[derive(Debug, Clone, Serialize)]
pub struct CreateTargetParams {
    /// Initial URL for the new target.
    pub url: String,
}

/// Result of Target.createTarget.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTargetResult {
    /// Identifier of the created target.
    pub target_id: String,
}

/// Parameters for Target.closeTarget.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseTargetParams {
    /// Target to close.
    pub target_id: String,
}

/// Parameters for Target.activateTarget.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivateTargetParams {
    /// Target to bring to the foreground.
    pub target_id: String,
}

/// Parameters for Target.setDiscoverTargets.
#[derive(Debug, Clone, Serialize)]
pub struct SetDiscoverTargetsParams {
    /// Whether to report created/destroyed/changed targets.
    pub discover: bool,
}

/// Payload of Target.targetCreated.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetCreatedEvent {
    /// The created target.
    pub target_info: TargetInfo,
}

/// Payload of Target.targetDestroyed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetDestroyedEvent {
    /// Identifier of the destroyed target.
    pub target_id: String,
}

/// Payload of Target.targetInfoChanged.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetInfoChangedEvent {
    /// The updated target description.
    pub target_info: TargetInfo,
}

#[cfg(test)]
mod tests;
