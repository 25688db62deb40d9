//! Selector resolution against the live page.
//!
//! Queries run over the DOM domain: XPath through performSearch, CSS through
//! querySelectorAll. Matches are filtered by visibility (offsetParent
//! non-null, evaluated in-page) and, for composite selectors, narrowed and
//! ranked by the relative-position engine. Node ids are only ever held for
//! the duration of one resolution; every later action re-resolves.

use std::cmp::Ordering as CmpOrdering;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::Ordering;

use serde::de::DeserializeOwned;
use serde_json::Value;
use sightline_cdp::CdpClient;
use sightline_cdp::protocol::dom::{
    DiscardSearchResultsParams, GetBoxModelParams, GetBoxModelResult, GetDocumentParams,
    GetDocumentResult, GetSearchResultsParams, GetSearchResultsResult, NodeId,
    PerformSearchParams, PerformSearchResult, QuerySelectorAllParams, QuerySelectorAllResult,
    ResolveNodeParams, ResolveNodeResult,
};
use sightline_cdp::protocol::runtime::{
    CallArgument, CallFunctionOnParams, CallFunctionOnResult, ReleaseObjectParams,
};
use tracing::trace;

use super::relative::{self, Rect, RelativeConstraint, RelativePosition};
use super::xpath::{self, Query};
use super::{ElementSpec, Selector};
use crate::action::js;
use crate::browser::Browser;
use crate::error::{CoreError, SelectorError};

/// Object group for element handles resolved during lookups.
const OBJECT_GROUP: &str = "sightline-resolve";

impl Browser {
    /// Resolve a selector to the visible matching node ids, in match order
    /// (or ascending relative-distance order for composite selectors).
    pub(crate) async fn resolve_visible(
        &self,
        spec: &ElementSpec,
    ) -> Result<Vec<NodeId>, CoreError> {
        let client = self.client().await?;
        self.resolve_visible_on(&client, spec).await
    }

    fn resolve_boxed<'a>(
        &'a self,
        client: &'a Arc<CdpClient>,
        spec: &'a ElementSpec,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<NodeId>, CoreError>> + Send + 'a>> {
        Box::pin(self.resolve_visible_on(client, spec))
    }

    async fn resolve_visible_on(
        &self,
        client: &Arc<CdpClient>,
        spec: &ElementSpec,
    ) -> Result<Vec<NodeId>, CoreError> {
        let raw = self.query_nodes(client, spec).await?;
        trace!(raw = raw.len(), selector = %spec.description(), "raw matches");

        let mut visible = Vec::with_capacity(raw.len());
        for node_id in raw {
            if self.node_is_visible(client, node_id).await {
                visible.push(node_id);
            }
        }

        if let Selector::Composite { relatives, .. } = &spec.selector {
            if !visible.is_empty() {
                visible = self.apply_relatives(client, visible, relatives).await?;
            }
        }
        Ok(visible)
    }

    /// Run the selector's queries in priority order; first non-empty wins.
    async fn query_nodes(
        &self,
        client: &Arc<CdpClient>,
        spec: &ElementSpec,
    ) -> Result<Vec<NodeId>, CoreError> {
        for query in xpath::queries_for(&spec.selector, spec.kind) {
            let nodes = match query {
                Query::XPath(expr) => self.perform_search(client, &expr).await?,
                Query::Css(expr) => self.query_selector_all(client, &expr).await?,
            };
            if !nodes.is_empty() {
                return Ok(nodes);
            }
        }
        Ok(Vec::new())
    }

    async fn perform_search(
        &self,
        client: &Arc<CdpClient>,
        query: &str,
    ) -> Result<Vec<NodeId>, CoreError> {
        let search: PerformSearchResult = client
            .send_command(
                "DOM.performSearch",
                Some(PerformSearchParams {
                    query: query.to_string(),
                    include_user_agent_shadow_dom: Some(false),
                }),
            )
            .await?;

        let nodes = if search.result_count > 0 {
            let results: GetSearchResultsResult = client
                .send_command(
                    "DOM.getSearchResults",
                    Some(GetSearchResultsParams {
                        search_id: search.search_id.clone(),
                        from_index: 0,
                        to_index: search.result_count,
                    }),
                )
                .await?;
            results.node_ids
        } else {
            Vec::new()
        };

        let _ = client
            .send_command::<_, Value>(
                "DOM.discardSearchResults",
                Some(DiscardSearchResultsParams {
                    search_id: search.search_id,
                }),
            )
            .await;

        Ok(nodes)
    }

    async fn query_selector_all(
        &self,
        client: &Arc<CdpClient>,
        selector: &str,
    ) -> Result<Vec<NodeId>, CoreError> {
        let root = self.current_root(client).await?;
        let result: QuerySelectorAllResult = client
            .send_command(
                "DOM.querySelectorAll",
                Some(QuerySelectorAllParams {
                    node_id: root,
                    selector: selector.to_string(),
                }),
            )
            .await?;
        Ok(result.node_ids)
    }

    /// The root node id, re-fetched when the cached one is unavailable.
    async fn current_root(&self, client: &Arc<CdpClient>) -> Result<NodeId, CoreError> {
        let cached = self.root_handle().load(Ordering::Acquire);
        if cached != 0 {
            return Ok(cached);
        }
        let result: GetDocumentResult = client
            .send_command(
                "DOM.getDocument",
                Some(GetDocumentParams::default()),
            )
            .await?;
        self.root_handle()
            .store(result.root.node_id, Ordering::Release);
        Ok(result.root.node_id)
    }

    /// Visibility filter; nodes that no longer resolve count as invisible.
    pub(crate) async fn node_is_visible(&self, client: &Arc<CdpClient>, node_id: NodeId) -> bool {
        (self.call_on_node::<bool>(client, node_id, js::IS_VISIBLE_FN, vec![]).await)
            .unwrap_or(false)
    }

    /// Call an in-page function with `this` bound to the node.
    ///
    /// The resolved object handle is released before returning regardless of
    /// the call outcome.
    pub(crate) async fn call_on_node<T: DeserializeOwned>(
        &self,
        client: &Arc<CdpClient>,
        node_id: NodeId,
        function: &str,
        args: Vec<Value>,
    ) -> Result<T, CoreError> {
        let resolved: ResolveNodeResult = client
            .send_command(
                "DOM.resolveNode",
                Some(ResolveNodeParams {
                    node_id: Some(node_id),
                    object_group: Some(OBJECT_GROUP.to_string()),
                }),
            )
            .await?;
        let object_id = resolved.object.object_id.ok_or_else(|| {
            SelectorError::Evaluation("node did not resolve to an object".to_string())
        })?;

        let call: Result<CallFunctionOnResult, _> = client
            .send_command(
                "Runtime.callFunctionOn",
                Some(CallFunctionOnParams {
                    function_declaration: function.to_string(),
                    object_id: Some(object_id.clone()),
                    arguments: Some(
                        args.into_iter()
                            .map(|value| CallArgument {
                                value: Some(value),
                                object_id: None,
                            })
                            .collect(),
                    ),
                    return_by_value: Some(true),
                }),
            )
            .await;

        let _ = client
            .send_command::<_, Value>(
                "Runtime.releaseObject",
                Some(ReleaseObjectParams { object_id }),
            )
            .await;

        let call = call?;
        if let Some(exception) = call.exception_details {
            return Err(SelectorError::Evaluation(exception.message()).into());
        }
        serde_json::from_value(call.result.value.unwrap_or(Value::Null))
            .map_err(|e| SelectorError::Evaluation(e.to_string()).into())
    }

    /// The node's viewport rectangle, or `None` when it has no box.
    pub(crate) async fn node_rect(
        &self,
        client: &Arc<CdpClient>,
        node_id: NodeId,
    ) -> Result<Option<Rect>, CoreError> {
        match client
            .send_command::<_, GetBoxModelResult>(
                "DOM.getBoxModel",
                Some(GetBoxModelParams { node_id }),
            )
            .await
        {
            Ok(result) => Ok(Rect::from_quad(&result.model.content)),
            // Elements without layout have no box model; that is not an error.
            Err(sightline_cdp::CdpError::Protocol { .. }) => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    /// Filter candidates by the relative constraints and rank by summed
    /// planar distance.
    async fn apply_relatives(
        &self,
        client: &Arc<CdpClient>,
        candidates: Vec<NodeId>,
        relatives: &[RelativeConstraint],
    ) -> Result<Vec<NodeId>, CoreError> {
        // Anchor rectangles are computed once per lookup and shared across
        // all candidates.
        let mut constraint_rects: Vec<(RelativePosition, Vec<Rect>)> = Vec::new();
        for constraint in relatives {
            let anchor_nodes = self.resolve_boxed(client, &constraint.anchor).await?;
            let mut rects = Vec::new();
            for node_id in anchor_nodes {
                if let Some(rect) = self.node_rect(client, node_id).await? {
                    rects.push(rect);
                }
            }
            if rects.is_empty() {
                return Err(SelectorError::NotFound(constraint.anchor.description()).into());
            }
            constraint_rects.push((constraint.position, rects));
        }

        let mut scored: Vec<(f64, NodeId)> = Vec::new();
        for node_id in candidates {
            let Some(rect) = self.node_rect(client, node_id).await? else {
                continue;
            };
            if let Some(score) = relative::score_candidate(&rect, &constraint_rects) {
                scored.push((score, node_id));
            }
        }
        scored.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(CmpOrdering::Equal));
        Ok(scored.into_iter().map(|(_, node_id)| node_id).collect())
    }
}
