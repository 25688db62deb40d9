//! DOM domain types.
//!
//! Node ids are scoped to the DOM agent of the attached target; they are
//! invalidated by target switches and by document re-parses.

use serde::{Deserialize, Serialize};

use crate::protocol::runtime::RemoteObject;

/// Identifier of a DOM node within the current DOM session.
pub type NodeId = i64;

/// A DOM node as returned by DOM.getDocument.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Node id.
    pub node_id: NodeId,
    /// Node name (e.g. "#document", "DIV").
    pub node_name: Option<String>,
    /// Child nodes when requested depth covers them.
    pub children: Option<Vec<Node>>,
}

/// Parameters for DOM.getDocument.
#[derive(Debug, Clone, Serialize, Default)]
pub struct GetDocumentParams {
    /// Depth of the subtree to retrieve (-1 for the entire tree).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<i64>,
}

/// Result of DOM.getDocument.
#[derive(Debug, Clone, Deserialize)]
pub struct GetDocumentResult {
    /// The root document node.
    pub root: Node,
}

/// Parameters for DOM.performSearch.
///
/// The query may be plain text, a CSS selector, or an XPath expression.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformSearchParams {
    /// Search query.
    pub query: String,
    /// Whether to include user-agent shadow roots.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_user_agent_shadow_dom: Option<bool>,
}

/// Result of DOM.performSearch.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformSearchResult {
    /// Handle for fetching and discarding the results.
    pub search_id: String,
    /// Number of matches.
    pub result_count: i64,
}

/// Parameters for DOM.getSearchResults.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetSearchResultsParams {
    /// Search handle from DOM.performSearch.
    pub search_id: String,
    /// Start index (inclusive).
    pub from_index: i64,
    /// End index (exclusive).
    pub to_index: i64,
}

/// Result of DOM.getSearchResults.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetSearchResultsResult {
    /// Matching node ids.
    pub node_ids: Vec<NodeId>,
}

/// Parameters for DOM.discardSearchResults.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscardSearchResultsParams {
    /// Search handle to release.
    pub search_id: String,
}

/// Parameters for DOM.querySelectorAll.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuerySelectorAllParams {
    /// Node to query under (usually the document root).
    pub node_id: NodeId,
    /// CSS selector.
    pub selector: String,
}

/// Result of DOM.querySelectorAll.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuerySelectorAllResult {
    /// Matching node ids in document order.
    pub node_ids: Vec<NodeId>,
}

/// Parameters for DOM.resolveNode.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ResolveNodeParams {
    /// Node to resolve.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<NodeId>,
    /// Object group name for releasing the resolved objects.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_group: Option<String>,
}

/// Result of DOM.resolveNode.
#[derive(Debug, Clone, Deserialize)]
pub struct ResolveNodeResult {
    /// JavaScript object wrapper for the node.
    pub object: RemoteObject,
}

/// Parameters for DOM.getBoxModel.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetBoxModelParams {
    /// Node to measure.
    pub node_id: NodeId,
}

/// Box model quads for a node.
///
/// Each quad is 8 numbers: x/y pairs for the four corners, clockwise from
/// top-left.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxModel {
    /// Content box quad.
    pub content: Vec<f64>,
    /// Border box quad.
    pub border: Vec<f64>,
    /// Node width.
    pub width: f64,
    /// Node height.
    pub height: f64,
}

impl BoxModel {
    /// Center point of the content quad.
    pub fn content_center(&self) -> Option<(f64, f64)> {
        if self.content.len() < 8 {
            return None;
        }
        let xs = [self.content[0], self.content[2], self.content[4], self.content[6]];
        let ys = [self.content[1], self.content[3], self.content[5], self.content[7]];
        Some((xs.iter().sum::<f64>() / 4.0, ys.iter().sum::<f64>() / 4.0))
    }
}

/// Result of DOM.getBoxModel.
#[derive(Debug, Clone, Deserialize)]
pub struct GetBoxModelResult {
    /// The node's box model.
    pub model: BoxModel,
}

/// Parameters for DOM.scrollIntoViewIfNeeded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollIntoViewIfNeededParams {
    /// Node to bring into view.
    pub node_id: NodeId,
}

/// Parameters for DOM.focus.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusParams {
    /// Node to focus.
    pub node_id: NodeId,
}

/// Parameters for DOM.setFileInputFiles.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetFileInputFilesParams {
    /// Absolute paths of the files to select.
    pub files: Vec<String>,
    /// The file input node.
    pub node_id: NodeId,
}

#[cfg(test)]
mod tests;
