//! JavaScript dialog handling.
//!
//! Handlers are registered per dialog type, optionally narrowed to an exact
//! message. When a matching dialog opens, the handler runs with a [`Dialog`]
//! handle that can accept or dismiss it. An unhandled dialog is left open,
//! which blocks the page the same way it blocks a real user.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use parking_lot::Mutex;
use sightline_cdp::CdpClient;
use sightline_cdp::protocol::page::HandleJavaScriptDialogParams;
use tracing::{debug, instrument};

pub use sightline_cdp::protocol::page::DialogType;

use crate::error::CoreError;

/// A registered dialog handler.
pub(crate) type DialogHandler =
    Arc<dyn Fn(Dialog) -> Pin<Box<dyn Future<Output = Result<(), CoreError>> + Send>> + Send + Sync>;

struct DialogExpectation {
    dialog_type: DialogType,
    message: Option<String>,
    handler: DialogHandler,
}

/// Registry of dialog expectations, shared with the event pump.
#[derive(Clone, Default)]
pub(crate) struct DialogRegistry {
    entries: Arc<Mutex<Vec<DialogExpectation>>>,
}

impl DialogRegistry {
    pub(crate) fn register(
        &self,
        dialog_type: DialogType,
        message: Option<String>,
        handler: DialogHandler,
    ) {
        self.entries.lock().push(DialogExpectation {
            dialog_type,
            message,
            handler,
        });
    }

    /// Find the handler for an opening dialog; the most recently registered
    /// matching expectation wins.
    pub(crate) fn find(&self, dialog_type: DialogType, message: &str) -> Option<DialogHandler> {
        self.entries
            .lock()
            .iter()
            .rev()
            .find(|entry| {
                entry.dialog_type == dialog_type
                    && entry.message.as_deref().is_none_or(|m| m == message)
            })
            .map(|entry| entry.handler.clone())
    }

    pub(crate) fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl std::fmt::Debug for DialogRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogRegistry")
            .field("len", &self.entries.lock().len())
            .finish()
    }
}

/// An open JavaScript dialog.
///
/// The page is frozen until the dialog is accepted or dismissed.
#[derive(Debug)]
pub struct Dialog {
    client: Arc<CdpClient>,
    dialog_type: DialogType,
    message: String,
    default_prompt: Option<String>,
}

impl Dialog {
    pub(crate) fn new(
        client: Arc<CdpClient>,
        dialog_type: DialogType,
        message: String,
        default_prompt: Option<String>,
    ) -> Self {
        Self {
            client,
            dialog_type,
            message,
            default_prompt,
        }
    }

    /// The dialog type.
    pub fn dialog_type(&self) -> DialogType {
        self.dialog_type
    }

    /// The dialog message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Default prompt text, for prompt dialogs.
    pub fn default_prompt(&self) -> Option<&str> {
        self.default_prompt.as_deref()
    }

    /// Accept the dialog.
    #[instrument(level = "debug", skip(self), fields(dialog_type = ?self.dialog_type))]
    pub async fn accept(self) -> Result<(), CoreError> {
        debug!(message = %self.message, "accepting dialog");
        self.handle(true, None).await
    }

    /// Accept a prompt dialog with the given text.
    pub async fn accept_with_text(self, text: impl Into<String>) -> Result<(), CoreError> {
        self.handle(true, Some(text.into())).await
    }

    /// Dismiss the dialog.
    #[instrument(level = "debug", skip(self), fields(dialog_type = ?self.dialog_type))]
    pub async fn dismiss(self) -> Result<(), CoreError> {
        debug!(message = %self.message, "dismissing dialog");
        self.handle(false, None).await
    }

    async fn handle(self, accept: bool, prompt_text: Option<String>) -> Result<(), CoreError> {
        self.client
            .send_command::<_, serde_json::Value>(
                "Page.handleJavaScriptDialog",
                Some(HandleJavaScriptDialogParams {
                    accept,
                    prompt_text,
                }),
            )
            .await?;
        Ok(())
    }
}

impl crate::browser::Browser {
    /// Register a handler for JavaScript dialogs of the given type.
    ///
    /// With a message, only dialogs carrying exactly that message match.
    /// The most recently registered matching handler wins. Handlers do not
    /// survive a browser close.
    pub fn on_dialog<F, Fut>(&self, dialog_type: DialogType, message: Option<&str>, handler: F)
    where
        F: Fn(Dialog) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), CoreError>> + Send + 'static,
    {
        let handler: DialogHandler = Arc::new(move |dialog| Box::pin(handler(dialog)));
        self.dialogs()
            .register(dialog_type, message.map(ToString::to_string), handler);
    }

    /// Handle `window.alert` dialogs.
    pub fn on_alert<F, Fut>(&self, message: Option<&str>, handler: F)
    where
        F: Fn(Dialog) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), CoreError>> + Send + 'static,
    {
        self.on_dialog(DialogType::Alert, message, handler);
    }

    /// Handle `window.confirm` dialogs.
    pub fn on_confirm<F, Fut>(&self, message: Option<&str>, handler: F)
    where
        F: Fn(Dialog) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), CoreError>> + Send + 'static,
    {
        self.on_dialog(DialogType::Confirm, message, handler);
    }

    /// Handle `window.prompt` dialogs.
    pub fn on_prompt<F, Fut>(&self, message: Option<&str>, handler: F)
    where
        F: Fn(Dialog) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), CoreError>> + Send + 'static,
    {
        self.on_dialog(DialogType::Prompt, message, handler);
    }

    /// Handle `beforeunload` confirmation dialogs.
    pub fn on_beforeunload<F, Fut>(&self, handler: F)
    where
        F: Fn(Dialog) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), CoreError>> + Send + 'static,
    {
        self.on_dialog(DialogType::Beforeunload, None, handler);
    }
}

#[cfg(test)]
mod tests;
