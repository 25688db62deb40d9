//! Keyboard and file input verbs.
//!
//! `write` types character by character into the focused element (or one it
//! focuses first), `clear` empties it with a select-all-and-backspace,
//! `press` holds key sequences down in order and releases them in reverse,
//! and `attach_file` feeds a file input without opening the chooser.

mod keys;

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use sightline_cdp::protocol::dom::{FocusParams, SetFileInputFilesParams};
use sightline_cdp::protocol::input::{
    DispatchKeyEventParams, DispatchMouseEventParams, KeyEventType, MouseButton,
};
use tokio::time::{Instant, sleep};
use tracing::{debug, instrument};

use crate::action::{ActionResult, js};
use crate::browser::Browser;
use crate::error::{CoreError, InputError, SelectorError};
use crate::selector::ElementSpec;
use crate::wait::navigation::WaitOptions;

use keys::{KeyDefinition, key_definition};

/// How often the focus poll re-checks `document.hasFocus()`.
const FOCUS_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Options for [`Browser::write_with`].
#[derive(Debug, Clone, Copy)]
pub struct WriteOptions {
    /// Pause between characters.
    pub delay: Duration,
    /// Deadline for an element to hold focus when no target is given.
    pub timeout: Duration,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(10),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Options for [`Browser::press_with`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PressOptions {
    /// How long to hold the keys down before releasing.
    pub delay: Option<Duration>,
}

#[derive(Debug, Deserialize)]
struct WritableInfo {
    writable: bool,
    tag: Option<String>,
    #[serde(rename = "type")]
    input_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PagePoint {
    x: f64,
    y: f64,
}

impl Browser {
    /// Type text into the element that currently holds focus.
    pub async fn write(&self, text: &str) -> Result<ActionResult, CoreError> {
        self.write_with(text, None, WriteOptions::default()).await
    }

    /// Focus the given field, then type text into it.
    pub async fn write_into(
        &self,
        text: &str,
        target: impl Into<ElementSpec>,
    ) -> Result<ActionResult, CoreError> {
        self.write_with(text, Some(target.into()), WriteOptions::default())
            .await
    }

    /// Type with explicit options.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::NotWritable`] when the focused element cannot
    /// receive text, and [`InputError::FocusTimeout`] when no element takes
    /// focus in time.
    #[instrument(level = "info", skip_all)]
    pub async fn write_with(
        &self,
        text: &str,
        target: Option<ElementSpec>,
        options: WriteOptions,
    ) -> Result<ActionResult, CoreError> {
        self.pace().await;
        self.ensure_open()?;
        let client = self.client().await?;

        if let Some(ref spec) = target {
            let nodes = self.element(spec.clone()).get().await?;
            client
                .send_command::<_, Value>("DOM.focus", Some(FocusParams { node_id: nodes[0] }))
                .await?;
        } else {
            self.wait_for_document_focus(options.timeout).await?;
        }

        let info = self.active_writable_info().await?;
        if !info.writable {
            return Err(InputError::NotWritable(
                info.tag.unwrap_or_else(|| "no active element".to_string()),
            )
            .into());
        }
        let masked = info.input_type.as_deref() == Some("password");

        let waiter = self.navigation_waiter(WaitOptions::default());

        for ch in text.chars() {
            client
                .send_command::<_, Value>(
                    "Input.dispatchKeyEvent",
                    Some(DispatchKeyEventParams::char_event(ch.to_string())),
                )
                .await?;
            if !options.delay.is_zero() {
                sleep(options.delay).await;
            }
        }

        waiter.settle().await?;

        // Password fields never echo what was typed.
        let echoed = if masked {
            "*".repeat(text.chars().count())
        } else {
            text.to_string()
        };
        let into = target.map_or_else(
            || "focused element".to_string(),
            |spec| spec.description(),
        );
        Ok(ActionResult::new(format!("Wrote {echoed} into {into}")))
    }

    /// Clear the element that currently holds focus.
    pub async fn clear_focused(&self) -> Result<ActionResult, CoreError> {
        self.clear_impl(None).await
    }

    /// Focus the given field, then clear it.
    pub async fn clear(&self, target: impl Into<ElementSpec>) -> Result<ActionResult, CoreError> {
        self.clear_impl(Some(target.into())).await
    }

    /// Select-all (triple click) then backspace.
    #[instrument(level = "info", skip_all)]
    async fn clear_impl(&self, target: Option<ElementSpec>) -> Result<ActionResult, CoreError> {
        self.pace().await;
        self.ensure_open()?;
        let client = self.client().await?;

        if let Some(ref spec) = target {
            let nodes = self.element(spec.clone()).get().await?;
            client
                .send_command::<_, Value>("DOM.focus", Some(FocusParams { node_id: nodes[0] }))
                .await?;
        }

        let info = self.active_writable_info().await?;
        if !info.writable {
            return Err(InputError::NotWritable(
                info.tag.unwrap_or_else(|| "no active element".to_string()),
            )
            .into());
        }

        let center = self.evaluate(js::ACTIVE_CENTER_EXPR).await?;
        let point: PagePoint = serde_json::from_value(center)
            .map_err(|_| InputError::NotWritable("no active element".to_string()))?;

        let waiter = self.navigation_waiter(WaitOptions::default());

        // Triple click selects the whole value.
        self.dispatch_mouse(&client, DispatchMouseEventParams::mouse_move(point.x, point.y))
            .await?;
        self.dispatch_mouse(
            &client,
            DispatchMouseEventParams::mouse_down(point.x, point.y, MouseButton::Left, 3),
        )
        .await?;
        self.dispatch_mouse(
            &client,
            DispatchMouseEventParams::mouse_up(point.x, point.y, MouseButton::Left, 3),
        )
        .await?;

        let backspace = key_definition("Backspace").expect("Backspace is defined");
        self.dispatch_key(&client, key_down_params(&backspace)).await?;
        self.dispatch_key(&client, key_up_params(&backspace)).await?;

        waiter.settle().await?;

        let what = target.map_or_else(
            || "focused element".to_string(),
            |spec| spec.description(),
        );
        Ok(ActionResult::new(format!("Cleared {what}")))
    }

    /// Press and release a single key or combination member.
    pub async fn press(&self, key: &str) -> Result<ActionResult, CoreError> {
        self.press_with(&[key], PressOptions::default()).await
    }

    /// Press a key sequence: down in order, release in reverse order.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::UnknownKey`] for names outside the key table.
    #[instrument(level = "info", skip(self, options))]
    pub async fn press_with(
        &self,
        sequence: &[&str],
        options: PressOptions,
    ) -> Result<ActionResult, CoreError> {
        self.pace().await;
        self.ensure_open()?;
        let client = self.client().await?;

        let definitions: Vec<KeyDefinition> = sequence
            .iter()
            .map(|name| key_definition(name).ok_or_else(|| InputError::UnknownKey((*name).to_string())))
            .collect::<Result<_, _>>()?;

        let waiter = self.navigation_waiter(WaitOptions::default());

        for definition in &definitions {
            self.dispatch_key(&client, key_down_params(definition)).await?;
        }
        if let Some(delay) = options.delay {
            sleep(delay).await;
        }
        for definition in definitions.iter().rev() {
            self.dispatch_key(&client, key_up_params(definition)).await?;
        }

        waiter.settle().await?;
        Ok(ActionResult::new(format!(
            "Pressed {}",
            sequence.join(" + ")
        )))
    }

    /// Select a file in a file input.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::FileNotFound`] with the absolute path when the
    /// file does not exist, and an invalid-operation error when the target
    /// is not a file input.
    #[instrument(level = "info", skip_all)]
    pub async fn attach_file(
        &self,
        file_path: impl AsRef<Path>,
        target: impl Into<ElementSpec>,
    ) -> Result<ActionResult, CoreError> {
        self.pace().await;
        self.ensure_open()?;
        let spec = target.into();
        let client = self.client().await?;

        let file_path = file_path.as_ref();
        let absolute = std::fs::canonicalize(file_path).map_err(|_| {
            let shown = std::env::current_dir()
                .map(|cwd| cwd.join(file_path))
                .unwrap_or_else(|_| file_path.to_path_buf());
            InputError::FileNotFound(shown)
        })?;

        let nodes = self.element(spec.clone()).get().await?;
        let node_id = nodes[0];

        #[derive(Debug, Deserialize)]
        struct TagAndType {
            tag: String,
            #[serde(rename = "type")]
            input_type: Option<String>,
        }
        let info: TagAndType = self
            .call_on_node(&client, node_id, js::TAG_AND_TYPE_FN, vec![])
            .await?;
        if !info.tag.eq_ignore_ascii_case("input") || info.input_type.as_deref() != Some("file") {
            return Err(SelectorError::InvalidOperation(format!(
                "{} is not a file input; `attach` needs one",
                spec.description()
            ))
            .into());
        }

        client
            .send_command::<_, Value>(
                "DOM.setFileInputFiles",
                Some(SetFileInputFilesParams {
                    files: vec![absolute.to_string_lossy().into_owned()],
                    node_id,
                }),
            )
            .await?;

        Ok(ActionResult::new(format!(
            "Attached {} to {}",
            absolute.display(),
            spec.description()
        )))
    }

    /// Poll `document.hasFocus()` until it reports true.
    async fn wait_for_document_focus(&self, timeout: Duration) -> Result<(), CoreError> {
        let deadline = Instant::now() + timeout;
        loop {
            let focused = self
                .evaluate(js::DOCUMENT_HAS_FOCUS_EXPR)
                .await?
                .as_bool()
                .unwrap_or(false);
            if focused {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(InputError::FocusTimeout(timeout).into());
            }
            debug!("document not focused yet, polling");
            sleep(FOCUS_POLL_INTERVAL).await;
        }
    }

    async fn active_writable_info(&self) -> Result<WritableInfo, CoreError> {
        let value = self.evaluate(js::ACTIVE_WRITABLE_EXPR).await?;
        serde_json::from_value(value)
            .map_err(|e| CoreError::Evaluation(format!("bad writability probe result: {e}")))
    }

    async fn dispatch_key(
        &self,
        client: &std::sync::Arc<sightline_cdp::CdpClient>,
        params: DispatchKeyEventParams,
    ) -> Result<(), CoreError> {
        client
            .send_command::<_, Value>("Input.dispatchKeyEvent", Some(params))
            .await?;
        Ok(())
    }
}

fn key_down_params(definition: &KeyDefinition) -> DispatchKeyEventParams {
    let event_type = if definition.text.is_some() {
        KeyEventType::KeyDown
    } else {
        KeyEventType::RawKeyDown
    };
    DispatchKeyEventParams {
        key: Some(definition.key.clone()),
        code: Some(definition.code.clone()),
        text: definition.text.clone(),
        unmodified_text: definition.text.clone(),
        windows_virtual_key_code: Some(definition.key_code),
        native_virtual_key_code: Some(definition.key_code),
        ..DispatchKeyEventParams::of_type(event_type)
    }
}

fn key_up_params(definition: &KeyDefinition) -> DispatchKeyEventParams {
    DispatchKeyEventParams {
        key: Some(definition.key.clone()),
        code: Some(definition.code.clone()),
        windows_virtual_key_code: Some(definition.key_code),
        native_virtual_key_code: Some(definition.key_code),
        ..DispatchKeyEventParams::of_type(KeyEventType::KeyUp)
    }
}

#[cfg(test)]
mod tests;
