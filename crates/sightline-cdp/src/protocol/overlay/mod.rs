//! Overlay domain types.

use serde::Serialize;

use crate::protocol::dom::NodeId;

/// An RGBA color.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Rgba {
    /// Red channel (0-255).
    pub r: u8,
    /// Green channel (0-255).
    pub g: u8,
    /// Blue channel (0-255).
    pub b: u8,
    /// Alpha channel (0-1).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub a: Option<f64>,
}

/// Highlight rendering configuration.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct HighlightConfig {
    /// Whether to show element info tooltips.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_info: Option<bool>,
    /// Content box fill color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_color: Option<Rgba>,
    /// Border box fill color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<Rgba>,
}

/// Parameters for Overlay.highlightNode.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightNodeParams {
    /// How to render the highlight.
    pub highlight_config: HighlightConfig,
    /// Node to highlight.
    pub node_id: NodeId,
}
