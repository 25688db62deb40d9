//! The resilient action pipeline.
//!
//! Every pointer verb runs the same stages: resolve candidates (with
//! relatives), cap the candidate list, scroll each candidate into view,
//! hit-test its center against `document.elementFromPoint`, dispatch real
//! input events to the first candidate that passes, then hand off to the
//! navigation waiter. The waiter's bus subscription is taken out before the
//! input is dispatched so no settle signal can be missed.

pub(crate) mod js;

use serde::Deserialize;
use serde_json::Value;
use sightline_cdp::CdpClient;
use sightline_cdp::protocol::dom::{NodeId, ScrollIntoViewIfNeededParams};
use sightline_cdp::protocol::input::{DispatchMouseEventParams, MouseButton};
use sightline_cdp::protocol::overlay::{HighlightConfig, HighlightNodeParams, Rgba};
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::browser::Browser;
use crate::error::{CoreError, SelectorError};
use crate::selector::{ELEMENTS_TO_MATCH, ElementSpec};
use crate::wait::navigation::WaitOptions;

/// Uniform result of every public verb.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResult {
    /// What happened, in the words the verb would log.
    pub description: String,
    /// The URL involved, for navigation verbs.
    pub url: Option<String>,
}

impl ActionResult {
    pub(crate) fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            url: None,
        }
    }

    pub(crate) fn with_url(description: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            url: Some(url.into()),
        }
    }
}

/// Options for pointer actions.
#[derive(Debug, Clone, Copy)]
pub struct ClickOptions {
    /// Mouse button to press.
    pub button: MouseButton,
    /// Click count (2 for double-click).
    pub click_count: i64,
    /// Navigation-wait behavior.
    pub wait: WaitOptions,
}

impl Default for ClickOptions {
    fn default() -> Self {
        Self {
            button: MouseButton::Left,
            click_count: 1,
            wait: WaitOptions::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TagAndType {
    tag: String,
    #[serde(rename = "type")]
    input_type: Option<String>,
}

impl Browser {
    /// Click the element the selector matches.
    pub async fn click(&self, target: impl Into<ElementSpec>) -> Result<ActionResult, CoreError> {
        self.click_with(target, ClickOptions::default()).await
    }

    /// Click with explicit options.
    #[instrument(level = "info", skip(self, target, options))]
    pub async fn click_with(
        &self,
        target: impl Into<ElementSpec>,
        options: ClickOptions,
    ) -> Result<ActionResult, CoreError> {
        self.pace().await;
        self.ensure_open()?;
        let spec = target.into();
        let client = self.client().await?;

        let (node_id, x, y) = self.hit_point_for(&client, &spec).await?;

        // File inputs do not react to synthetic clicks; the file chooser
        // never reaches the page.
        let info: TagAndType = self
            .call_on_node(&client, node_id, js::TAG_AND_TYPE_FN, vec![])
            .await?;
        if info.tag.eq_ignore_ascii_case("input") && info.input_type.as_deref() == Some("file") {
            return Err(SelectorError::InvalidOperation(
                "Unsupported operation, use `attach`".to_string(),
            )
            .into());
        }

        let waiter = self.navigation_waiter(options.wait);

        debug!(x, y, ?options.button, options.click_count, "dispatching click");
        self.dispatch_mouse(&client, DispatchMouseEventParams::mouse_move(x, y))
            .await?;
        self.dispatch_mouse(
            &client,
            DispatchMouseEventParams::mouse_down(x, y, options.button, options.click_count),
        )
        .await?;
        self.dispatch_mouse(
            &client,
            DispatchMouseEventParams::mouse_up(x, y, options.button, options.click_count),
        )
        .await?;

        if options.wait.await_navigation {
            waiter.settle().await?;
        } else {
            drop(waiter);
        }

        Ok(ActionResult::new(format!("Clicked {}", spec.description())))
    }

    /// Double-click the element. Does not wait for navigation by default.
    pub async fn double_click(
        &self,
        target: impl Into<ElementSpec>,
    ) -> Result<ActionResult, CoreError> {
        let result = self
            .click_with(
                target,
                ClickOptions {
                    click_count: 2,
                    wait: WaitOptions {
                        await_navigation: false,
                        ..WaitOptions::default()
                    },
                    ..ClickOptions::default()
                },
            )
            .await?;
        Ok(ActionResult::new(format!("Double {}", lowercase_first(&result.description))))
    }

    /// Right-click the element. Does not wait for navigation by default.
    pub async fn right_click(
        &self,
        target: impl Into<ElementSpec>,
    ) -> Result<ActionResult, CoreError> {
        let result = self
            .click_with(
                target,
                ClickOptions {
                    button: MouseButton::Right,
                    wait: WaitOptions {
                        await_navigation: false,
                        ..WaitOptions::default()
                    },
                    ..ClickOptions::default()
                },
            )
            .await?;
        Ok(ActionResult::new(format!("Right {}", lowercase_first(&result.description))))
    }

    /// Move the pointer over the element.
    ///
    /// The mouse-move itself is fire-and-forget; the navigation waiter still
    /// runs, so a hover that does trigger loading settles like any action.
    #[instrument(level = "info", skip(self, target))]
    pub async fn hover(&self, target: impl Into<ElementSpec>) -> Result<ActionResult, CoreError> {
        self.pace().await;
        self.ensure_open()?;
        let spec = target.into();
        let client = self.client().await?;

        let nodes = self.element(spec.clone()).get().await?;
        let node_id = nodes[0];
        self.scroll_into_view(&client, node_id).await?;
        let rect = self
            .node_rect(&client, node_id)
            .await?
            .ok_or_else(|| SelectorError::NotFound(spec.description()))?;
        let (x, y) = rect.center();

        let waiter = self.navigation_waiter(WaitOptions::default());

        let move_client = client.clone();
        tokio::spawn(async move {
            let _ = move_client
                .send_command::<_, Value>(
                    "Input.dispatchMouseEvent",
                    Some(DispatchMouseEventParams::mouse_move(x, y)),
                )
                .await;
        });

        waiter.settle().await?;
        Ok(ActionResult::new(format!(
            "Hovered over {}",
            spec.description()
        )))
    }

    /// Give keyboard focus to the element.
    #[instrument(level = "info", skip(self, target))]
    pub async fn focus(&self, target: impl Into<ElementSpec>) -> Result<ActionResult, CoreError> {
        self.pace().await;
        self.ensure_open()?;
        let spec = target.into();
        let client = self.client().await?;
        let nodes = self.element(spec.clone()).get().await?;
        client
            .send_command::<_, Value>(
                "DOM.focus",
                Some(sightline_cdp::protocol::dom::FocusParams { node_id: nodes[0] }),
            )
            .await?;
        Ok(ActionResult::new(format!(
            "Focused on {}",
            spec.description()
        )))
    }

    /// Draw the browser's overlay highlight over the element.
    pub async fn highlight(&self, target: impl Into<ElementSpec>) -> Result<ActionResult, CoreError> {
        self.pace().await;
        self.ensure_open()?;
        let spec = target.into();
        let client = self.client().await?;
        let nodes = self.element(spec.clone()).get().await?;
        client
            .send_command::<_, Value>(
                "Overlay.highlightNode",
                Some(HighlightNodeParams {
                    highlight_config: HighlightConfig {
                        show_info: Some(false),
                        content_color: Some(Rgba {
                            r: 233,
                            g: 30,
                            b: 99,
                            a: Some(0.4),
                        }),
                        border_color: None,
                    },
                    node_id: nodes[0],
                }),
            )
            .await?;
        Ok(ActionResult::new(format!(
            "Highlighted {}",
            spec.description()
        )))
    }

    /// Scroll the element into the viewport.
    pub async fn scroll_to(&self, target: impl Into<ElementSpec>) -> Result<ActionResult, CoreError> {
        self.pace().await;
        self.ensure_open()?;
        let spec = target.into();
        let client = self.client().await?;
        let nodes = self.element(spec.clone()).get().await?;
        client
            .send_command::<_, Value>(
                "DOM.scrollIntoViewIfNeeded",
                Some(ScrollIntoViewIfNeededParams { node_id: nodes[0] }),
            )
            .await?;
        Ok(ActionResult::new(format!(
            "Scrolled to {}",
            spec.description()
        )))
    }

    /// Scroll the page right by `pixels` (default 100).
    pub async fn scroll_right(&self, pixels: Option<i64>) -> Result<ActionResult, CoreError> {
        self.scroll_window(pixels.unwrap_or(100), 0, "right").await
    }

    /// Scroll the page left by `pixels` (default 100).
    pub async fn scroll_left(&self, pixels: Option<i64>) -> Result<ActionResult, CoreError> {
        self.scroll_window(-pixels.unwrap_or(100), 0, "left").await
    }

    /// Scroll the page up by `pixels` (default 100).
    pub async fn scroll_up(&self, pixels: Option<i64>) -> Result<ActionResult, CoreError> {
        self.scroll_window(0, -pixels.unwrap_or(100), "up").await
    }

    /// Scroll the page down by `pixels` (default 100).
    pub async fn scroll_down(&self, pixels: Option<i64>) -> Result<ActionResult, CoreError> {
        self.scroll_window(0, pixels.unwrap_or(100), "down").await
    }

    async fn scroll_window(
        &self,
        dx: i64,
        dy: i64,
        direction: &str,
    ) -> Result<ActionResult, CoreError> {
        self.pace().await;
        self.evaluate(&js::scroll_by_expr(dx, dy)).await?;
        let amount = dx.abs().max(dy.abs());
        Ok(ActionResult::new(format!(
            "Scrolled {direction} by {amount} pixels"
        )))
    }

    pub(crate) async fn scroll_into_view(
        &self,
        client: &Arc<CdpClient>,
        node_id: NodeId,
    ) -> Result<(), CoreError> {
        client
            .send_command::<_, Value>(
                "DOM.scrollIntoViewIfNeeded",
                Some(ScrollIntoViewIfNeededParams { node_id }),
            )
            .await?;
        Ok(())
    }

    pub(crate) async fn dispatch_mouse(
        &self,
        client: &Arc<CdpClient>,
        params: DispatchMouseEventParams,
    ) -> Result<(), CoreError> {
        client
            .send_command::<_, Value>("Input.dispatchMouseEvent", Some(params))
            .await?;
        Ok(())
    }

    /// Resolve candidates and find the first hit-testable center point.
    ///
    /// Candidates are capped at [`ELEMENTS_TO_MATCH`]. A candidate passes
    /// when the element at its center is itself or a descendant (with
    /// near-transparent elements treated as hit-transparent), or when the
    /// hit element belongs to a sibling candidate — ambiguity between
    /// equally valid matches is tolerated.
    pub(crate) async fn hit_point_for(
        &self,
        client: &Arc<CdpClient>,
        spec: &ElementSpec,
    ) -> Result<(NodeId, f64, f64), CoreError> {
        let nodes = self.element(spec.clone()).get().await?;
        let total = nodes.len();
        let capped: Vec<NodeId> = nodes.into_iter().take(ELEMENTS_TO_MATCH).collect();

        let mut centers: Vec<(NodeId, f64, f64)> = Vec::with_capacity(capped.len());
        for node_id in capped {
            // Scroll failures (e.g. a node detached since resolution) just
            // remove that candidate.
            if self.scroll_into_view(client, node_id).await.is_err() {
                continue;
            }
            let Some(rect) = self.node_rect(client, node_id).await? else {
                continue;
            };
            let (x, y) = rect.center();
            centers.push((node_id, x, y));
        }

        for &(node_id, x, y) in &centers {
            let passes: bool = self
                .call_on_node(
                    client,
                    node_id,
                    js::OCCLUSION_CHECK_FN,
                    vec![x.into(), y.into()],
                )
                .await
                .unwrap_or(false);
            if passes {
                return Ok((node_id, x, y));
            }

            // The hit element may belong to a sibling candidate.
            for &(sibling, _, _) in &centers {
                if sibling == node_id {
                    continue;
                }
                let contains: bool = self
                    .call_on_node(client, sibling, js::CONTAINS_HIT_FN, vec![x.into(), y.into()])
                    .await
                    .unwrap_or(false);
                if contains {
                    debug!(node_id, sibling, "hit point resolved to sibling candidate");
                    return Ok((node_id, x, y));
                }
            }
        }

        if total > ELEMENTS_TO_MATCH {
            Err(SelectorError::TooManyMatches {
                count: total,
                cap: ELEMENTS_TO_MATCH,
            }
            .into())
        } else {
            Err(SelectorError::Covered(spec.description()).into())
        }
    }
}

fn lowercase_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests;
