//! CDP event re-publishers.
//!
//! Two pumps translate raw CDP events into bus events: the control pump
//! handles Target.* traffic on the browser connection for the whole session;
//! the page pump handles everything else on the per-target connection and is
//! torn down and re-installed on every target switch.
//!
//! The page pump also owns the side effects that must happen exactly where
//! the events arrive: feeding the network-idle tracker, refreshing the root
//! node id on load, dispatching dialogs, and resolving paused requests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use sightline_cdp::protocol::dom::{GetDocumentParams, GetDocumentResult};
use sightline_cdp::protocol::fetch::RequestPausedEvent;
use sightline_cdp::protocol::network::{
    LoadingFailedEvent, LoadingFinishedEvent, RequestWillBeSentEvent,
};
use sightline_cdp::protocol::page::JavascriptDialogOpeningEvent;
use sightline_cdp::protocol::target::{TargetCreatedEvent, TargetInfoChangedEvent};
use sightline_cdp::{CdpClient, CdpEvent};
use tokio::sync::broadcast;
use tracing::{debug, trace, warn};

use crate::bus::{BusEvent, EventBus};
use crate::dialog::{Dialog, DialogRegistry};
use crate::intercept::InterceptorRegistry;
use crate::wait::idle::NetworkIdleTracker;

/// Everything the page pump needs.
pub(crate) struct PageAdapterContext {
    pub(crate) client: Arc<CdpClient>,
    pub(crate) bus: EventBus,
    pub(crate) idle: Arc<NetworkIdleTracker>,
    pub(crate) dialogs: DialogRegistry,
    pub(crate) interceptors: InterceptorRegistry,
    pub(crate) root_node_id: Arc<AtomicI64>,
}

/// Spawn the re-publisher for a page connection.
pub(crate) fn spawn_page_pump(ctx: PageAdapterContext) -> tokio::task::JoinHandle<()> {
    let mut events = ctx.client.subscribe_events();
    tokio::spawn(async move {
        loop {
            let event = match events.recv().await {
                Ok(event) => event,
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    warn!(missed, "page pump lagged behind CDP events");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => break,
            };
            handle_page_event(&ctx, &event).await;
        }
        trace!("page pump ended");
    })
}

async fn handle_page_event(ctx: &PageAdapterContext, event: &CdpEvent) {
    match event.method.as_str() {
        "Network.requestWillBeSent" => {
            if let Some(payload) = event.parsed_params::<RequestWillBeSentEvent>() {
                ctx.idle.request_started(payload.request_id.clone());
                ctx.bus.emit(BusEvent::XhrActivity {
                    request_id: payload.request_id,
                });
            }
        }
        "Network.loadingFinished" => {
            if let Some(payload) = event.parsed_params::<LoadingFinishedEvent>() {
                ctx.idle.request_finished(payload.request_id);
            }
        }
        "Network.loadingFailed" => {
            if let Some(payload) = event.parsed_params::<LoadingFailedEvent>() {
                ctx.idle.request_finished(payload.request_id);
            }
        }
        "Page.loadEventFired" => {
            ctx.bus.emit(BusEvent::LoadEventFired);
            refresh_root(ctx).await;
        }
        "Page.domContentEventFired" => {
            ctx.bus.emit(BusEvent::DomContentEventFired);
        }
        "Page.frameStartedLoading" => {
            ctx.bus.emit(BusEvent::FrameStartedLoading);
        }
        "Page.frameStoppedLoading" => {
            ctx.bus.emit(BusEvent::FrameStoppedLoading);
        }
        "Page.lifecycleEvent" => {
            if let Some(payload) =
                event.parsed_params::<sightline_cdp::protocol::page::LifecycleEventEvent>()
            {
                if payload.name == "firstMeaningfulPaint" {
                    ctx.bus.emit(BusEvent::FirstMeaningfulPaint);
                }
            }
        }
        "Page.javascriptDialogOpening" => {
            if let Some(payload) = event.parsed_params::<JavascriptDialogOpeningEvent>() {
                dispatch_dialog(ctx, payload);
            }
        }
        "Fetch.requestPaused" => {
            if let Some(payload) = event.parsed_params::<RequestPausedEvent>() {
                ctx.interceptors.handle_paused(ctx.client.clone(), payload);
            }
        }
        _ => {}
    }
}

/// Re-fetch the root DOM node id after a load.
///
/// The id is zeroed first so waiters observe "root unavailable" until the
/// new document answers.
async fn refresh_root(ctx: &PageAdapterContext) {
    ctx.root_node_id.store(0, Ordering::Release);
    match ctx
        .client
        .send_command::<_, GetDocumentResult>(
            "DOM.getDocument",
            Some(GetDocumentParams::default()),
        )
        .await
    {
        Ok(result) => {
            debug!(node_id = result.root.node_id, "root node id refreshed");
            ctx.root_node_id
                .store(result.root.node_id, Ordering::Release);
        }
        Err(error) => warn!(%error, "failed to refresh root node id"),
    }
}

fn dispatch_dialog(ctx: &PageAdapterContext, payload: JavascriptDialogOpeningEvent) {
    let Some(handler) = ctx.dialogs.find(payload.dialog_type, &payload.message) else {
        debug!(
            dialog_type = ?payload.dialog_type,
            message = %payload.message,
            "no handler registered for dialog"
        );
        return;
    };
    let dialog = Dialog::new(
        ctx.client.clone(),
        payload.dialog_type,
        payload.message,
        payload.default_prompt,
    );
    tokio::spawn(async move {
        if let Err(error) = handler(dialog).await {
            warn!(%error, "dialog handler failed");
        }
    });
}

/// Spawn the re-publisher for the browser (control) connection.
///
/// Emits `TargetCreated` for new page targets and `TargetNavigated` when a
/// known target's URL changes.
pub(crate) fn spawn_control_pump(
    client: Arc<CdpClient>,
    bus: EventBus,
) -> tokio::task::JoinHandle<()> {
    let mut events = client.subscribe_events();
    tokio::spawn(async move {
        let mut known_urls: HashMap<String, String> = HashMap::new();
        loop {
            let event = match events.recv().await {
                Ok(event) => event,
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    warn!(missed, "control pump lagged behind CDP events");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => break,
            };
            match event.method.as_str() {
                "Target.targetCreated" => {
                    if let Some(payload) = event.parsed_params::<TargetCreatedEvent>() {
                        let info = payload.target_info;
                        // Seed with an empty URL so the first
                        // targetInfoChanged always reads as a navigation,
                        // even when creation already carried the final URL.
                        known_urls.insert(info.target_id.clone(), String::new());
                        if info.target_type == "page" {
                            bus.emit(BusEvent::TargetCreated {
                                target_id: info.target_id,
                            });
                        }
                    }
                }
                "Target.targetInfoChanged" => {
                    if let Some(payload) = event.parsed_params::<TargetInfoChangedEvent>() {
                        let info = payload.target_info;
                        let previous = known_urls.insert(info.target_id.clone(), info.url.clone());
                        if previous.as_deref() != Some(info.url.as_str()) {
                            bus.emit(BusEvent::TargetNavigated { url: info.url });
                        }
                    }
                }
                "Target.targetDestroyed" => {
                    if let Some(payload) =
                        event.parsed_params::<sightline_cdp::protocol::target::TargetDestroyedEvent>()
                    {
                        known_urls.remove(&payload.target_id);
                    }
                }
                _ => {}
            }
        }
        trace!("control pump ended");
    })
}
