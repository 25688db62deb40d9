//! The wrapped-element record.
//!
//! An [`Element`] binds a selector to a session lazily: nothing talks to the
//! browser until a query method runs, and every query re-resolves from
//! scratch, so node ids never leak across navigations or target switches.

use std::time::Duration;

use serde_json::Value;
use sightline_cdp::protocol::dom::NodeId;
use tokio::time::{Instant, sleep};
use tracing::debug;

use super::ElementSpec;
use crate::action::js;
use crate::browser::Browser;
use crate::error::{CoreError, SelectorError};

/// Default polling interval for implicit waits.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Default overall deadline for implicit waits.
const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_millis(10000);

/// A lazy handle to the elements a selector matches.
#[derive(Debug)]
pub struct Element<'b> {
    browser: &'b Browser,
    spec: ElementSpec,
}

impl Browser {
    /// Wrap a selector for querying against this session.
    pub fn element(&self, spec: impl Into<ElementSpec>) -> Element<'_> {
        Element {
            browser: self,
            spec: spec.into(),
        }
    }
}

impl Element<'_> {
    /// The selector description.
    pub fn description(&self) -> String {
        self.spec.description()
    }

    /// Visible matching node ids, polling with the default implicit wait
    /// (1s interval, 10s deadline).
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError::NotFound`] naming the selector when nothing
    /// matches before the deadline.
    pub async fn get(&self) -> Result<Vec<NodeId>, CoreError> {
        self.get_with(DEFAULT_POLL_INTERVAL, DEFAULT_POLL_TIMEOUT)
            .await
    }

    /// Visible matching node ids with an explicit polling interval and
    /// deadline.
    pub async fn get_with(
        &self,
        interval: Duration,
        timeout: Duration,
    ) -> Result<Vec<NodeId>, CoreError> {
        let nodes = self.poll(interval, timeout).await;
        if nodes.is_empty() {
            return Err(SelectorError::NotFound(self.description()).into());
        }
        Ok(nodes)
    }

    /// Whether at least one visible match exists before the deadline.
    pub async fn exists(&self, interval: Duration, timeout: Duration) -> bool {
        !self.poll(interval, timeout).await.is_empty()
    }

    /// Poll resolution until something matches or the deadline passes.
    ///
    /// Transient resolution failures (mid-navigation DOM churn, a target
    /// switch under way) count as "no match yet" and are retried.
    async fn poll(&self, interval: Duration, timeout: Duration) -> Vec<NodeId> {
        let deadline = Instant::now() + timeout;
        loop {
            match self.browser.resolve_visible(&self.spec).await {
                Ok(nodes) if !nodes.is_empty() => return nodes,
                Ok(_) => {}
                Err(error) => {
                    debug!(%error, "resolution failed, retrying");
                }
            }
            let now = Instant::now();
            if now >= deadline {
                return Vec::new();
            }
            sleep(interval.min(deadline - now)).await;
        }
    }

    /// The rendered text of every match.
    pub async fn text(&self) -> Result<Vec<String>, CoreError> {
        let client = self.browser.client().await?;
        let nodes = self.get().await?;
        let mut texts = Vec::with_capacity(nodes.len());
        for node_id in nodes {
            let text: Value = self
                .browser
                .call_on_node(&client, node_id, js::INNER_TEXT_FN, vec![])
                .await?;
            texts.push(text.as_str().unwrap_or_default().to_string());
        }
        Ok(texts)
    }

    /// The value of the first matching form control.
    ///
    /// Supported for text/input/file fields and combo boxes.
    pub async fn value(&self) -> Result<String, CoreError> {
        self.require_capability(self.spec.kind.supports_value(), "value()")?;
        let client = self.browser.client().await?;
        let nodes = self.get().await?;
        let value: Value = self
            .browser
            .call_on_node(&client, nodes[0], js::VALUE_FN, vec![])
            .await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    /// Whether the first matching checkbox or radio button is checked.
    pub async fn is_checked(&self) -> Result<bool, CoreError> {
        self.require_capability(self.spec.kind.supports_check(), "is_checked()")?;
        let client = self.browser.client().await?;
        let nodes = self.get().await?;
        self.browser
            .call_on_node(&client, nodes[0], js::IS_CHECKED_FN, vec![])
            .await
    }

    /// Check the first matching checkbox or radio button.
    pub async fn check(&self) -> Result<(), CoreError> {
        self.set_checked(true).await
    }

    /// Uncheck the first matching checkbox.
    pub async fn uncheck(&self) -> Result<(), CoreError> {
        self.set_checked(false).await
    }

    async fn set_checked(&self, checked: bool) -> Result<(), CoreError> {
        self.require_capability(self.spec.kind.supports_check(), "check()/uncheck()")?;
        let client = self.browser.client().await?;
        let nodes = self.get().await?;
        let _: bool = self
            .browser
            .call_on_node(&client, nodes[0], js::SET_CHECKED_FN, vec![Value::Bool(checked)])
            .await?;
        Ok(())
    }

    /// Select a combo-box option by value, label, or visible text.
    pub async fn select(&self, option: &str) -> Result<(), CoreError> {
        self.require_capability(self.spec.kind.supports_select(), "select()")?;
        let client = self.browser.client().await?;
        let nodes = self.get().await?;
        let selected: bool = self
            .browser
            .call_on_node(
                &client,
                nodes[0],
                js::SELECT_OPTION_FN,
                vec![Value::String(option.to_string())],
            )
            .await?;
        if !selected {
            return Err(SelectorError::InvalidOperation(format!(
                "no option \"{option}\" in {}",
                self.description()
            ))
            .into());
        }
        Ok(())
    }

    fn require_capability(&self, supported: bool, operation: &str) -> Result<(), SelectorError> {
        if supported {
            Ok(())
        } else {
            Err(SelectorError::InvalidOperation(format!(
                "{} does not support {operation}",
                self.description()
            )))
        }
    }
}
