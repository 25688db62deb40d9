//! Emulation domain types.

use serde::Serialize;

/// Parameters for Emulation.setDeviceMetricsOverride.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetDeviceMetricsOverrideParams {
    /// Viewport width in CSS pixels.
    pub width: i64,
    /// Viewport height in CSS pixels.
    pub height: i64,
    /// Device scale factor (0 keeps the current value).
    pub device_scale_factor: f64,
    /// Whether to emulate a mobile device.
    pub mobile: bool,
}
