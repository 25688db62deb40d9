//! Page-level operations: navigation, evaluation, screenshots, viewport.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::Value;
use sightline_cdp::protocol::emulation::SetDeviceMetricsOverrideParams;
use sightline_cdp::protocol::network::SetExtraHttpHeadersParams;
use sightline_cdp::protocol::page::{
    CaptureScreenshotParams, CaptureScreenshotResult, NavigateParams, NavigateResult, ReloadParams,
    ScreenshotFormat,
};
use sightline_cdp::protocol::runtime::{EvaluateParams, EvaluateResult};
use tracing::{debug, info, instrument};

use super::Browser;
use crate::action::ActionResult;
use crate::error::{CoreError, NavigationError};
use crate::wait::navigation::{PAGE_LOAD_TIMEOUT, SettleSignal, WaitOptions};

/// Options for [`Browser::goto_with`].
#[derive(Debug, Clone)]
pub struct GotoOptions {
    /// Navigation deadline. Default is 30 seconds.
    pub timeout: Duration,
    /// Extra HTTP headers sent with every request on this page.
    pub headers: Vec<(String, String)>,
}

impl Default for GotoOptions {
    fn default() -> Self {
        Self {
            timeout: PAGE_LOAD_TIMEOUT,
            headers: Vec::new(),
        }
    }
}

/// Normalize a user-supplied URL.
///
/// Prepends `http://` when no scheme is present; `file:` and `about:` URLs
/// pass through. Idempotent: normalizing twice equals normalizing once.
pub fn normalize_url(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.starts_with("file:") || trimmed.starts_with("about:") || trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    }
}

impl Browser {
    /// Navigate to a URL and wait for the page to settle.
    pub async fn goto(&self, url: &str) -> Result<ActionResult, CoreError> {
        self.goto_with(url, GotoOptions::default()).await
    }

    /// Navigate with explicit options.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::Failed`] when the browser reports a
    /// network-level failure and [`NavigationError::Timeout`] when the page
    /// does not settle within the deadline.
    #[instrument(level = "info", skip(self, options))]
    pub async fn goto_with(&self, url: &str, options: GotoOptions) -> Result<ActionResult, CoreError> {
        self.pace().await;
        self.ensure_open()?;
        let url = normalize_url(url);
        let client = self.client().await?;

        if !options.headers.is_empty() {
            let headers: serde_json::Map<String, Value> = options
                .headers
                .iter()
                .map(|(name, value)| (name.clone(), Value::String(value.clone())))
                .collect();
            client
                .send_command::<_, Value>(
                    "Network.setExtraHTTPHeaders",
                    Some(SetExtraHttpHeadersParams {
                        headers: Value::Object(headers),
                    }),
                )
                .await?;
        }

        // Explicit loads pre-arm their signals; frame events extend the set
        // further while the load runs.
        let mut waiter = self.navigation_waiter(WaitOptions {
            timeout: options.timeout,
            ..WaitOptions::default()
        });
        waiter.arm(SettleSignal::LoadEventFired);
        waiter.arm(SettleSignal::DomContentEventFired);

        let result: NavigateResult = client
            .send_command("Page.navigate", Some(NavigateParams::url(url.clone())))
            .await?;

        if let Some(reason) = result.error_text.filter(|text| !text.is_empty()) {
            return Err(NavigationError::Failed { url, reason }.into());
        }

        waiter.settle().await?;

        info!(url = %url, "navigation complete");
        Ok(ActionResult::with_url(
            format!("Navigated to url \"{url}\""),
            url,
        ))
    }

    /// Reload the current page.
    ///
    /// A URL may be passed for call-site symmetry with `goto`, but reload
    /// always reloads the current page; the protocol takes no URL.
    #[instrument(level = "info", skip(self))]
    pub async fn reload(&self, url: Option<&str>) -> Result<ActionResult, CoreError> {
        let _ = url;
        self.pace().await;
        self.ensure_open()?;
        let client = self.client().await?;

        let mut waiter = self.navigation_waiter(WaitOptions::default());
        waiter.arm(SettleSignal::LoadEventFired);

        client
            .send_command::<_, Value>("Page.reload", Some(ReloadParams::default()))
            .await?;
        waiter.settle().await?;

        Ok(ActionResult::new("Reloaded page"))
    }

    /// The current page title.
    pub async fn title(&self) -> Result<String, CoreError> {
        let value = self.evaluate("document.title").await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    /// Evaluate a JavaScript expression in the page, by value.
    ///
    /// # Errors
    ///
    /// Returns an evaluation error when the expression throws.
    pub async fn evaluate(&self, expression: &str) -> Result<Value, CoreError> {
        self.ensure_open()?;
        let client = self.client().await?;
        let result: EvaluateResult = client
            .send_command(
                "Runtime.evaluate",
                Some(EvaluateParams::by_value(expression)),
            )
            .await?;
        if let Some(exception) = result.exception_details {
            return Err(CoreError::Evaluation(exception.message()));
        }
        Ok(result.result.value.unwrap_or(Value::Null))
    }

    /// Capture a screenshot to a file.
    ///
    /// Without a path, writes `Screenshot-<unixMs>.png` in the current
    /// directory.
    #[instrument(level = "info", skip(self))]
    pub async fn screenshot(&self, path: Option<&Path>) -> Result<ActionResult, CoreError> {
        let data = self.screenshot_bytes().await?;
        let path: PathBuf = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let millis = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .unwrap_or_default()
                    .as_millis();
                PathBuf::from(format!("Screenshot-{millis}.png"))
            }
        };
        tokio::fs::write(&path, data).await?;
        debug!(path = %path.display(), "screenshot written");
        Ok(ActionResult::new(format!(
            "Screenshot saved to {}",
            path.display()
        )))
    }

    /// Capture a screenshot and return the PNG bytes without writing.
    pub async fn screenshot_bytes(&self) -> Result<Vec<u8>, CoreError> {
        self.pace().await;
        self.ensure_open()?;
        let client = self.client().await?;
        let result: CaptureScreenshotResult = client
            .send_command(
                "Page.captureScreenshot",
                Some(CaptureScreenshotParams {
                    format: Some(ScreenshotFormat::Png),
                    ..CaptureScreenshotParams::default()
                }),
            )
            .await?;
        BASE64
            .decode(result.data)
            .map_err(|e| CoreError::Evaluation(format!("invalid screenshot payload: {e}")))
    }

    /// Override the viewport size.
    #[instrument(level = "info", skip(self))]
    pub async fn set_viewport(&self, width: i64, height: i64) -> Result<ActionResult, CoreError> {
        self.ensure_open()?;
        let client = self.client().await?;
        client
            .send_command::<_, Value>(
                "Emulation.setDeviceMetricsOverride",
                Some(SetDeviceMetricsOverrideParams {
                    width,
                    height,
                    device_scale_factor: 1.0,
                    mobile: false,
                }),
            )
            .await?;
        Ok(ActionResult::new(format!(
            "Viewport set to {width}x{height}"
        )))
    }
}

#[cfg(test)]
mod tests;
