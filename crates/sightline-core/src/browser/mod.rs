//! Browser session management.
//!
//! A [`Browser`] is an explicit session value: it owns the child process,
//! the control connection to the browser endpoint, and the page connection
//! to the currently attached target. Target switches destroy and replace
//! the page connection wholesale, which is also what invalidates all
//! previously held DOM node ids.

mod adapters;
mod launcher;
mod page;
mod process;

use std::process::Child;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use serde_json::Value;
use sightline_cdp::protocol::dom::{GetDocumentParams, GetDocumentResult};
use sightline_cdp::protocol::fetch::{EnableParams as FetchEnableParams, RequestPattern};
use sightline_cdp::protocol::page::SetLifecycleEventsEnabledParams;
use sightline_cdp::protocol::security::SetIgnoreCertificateErrorsParams;
use sightline_cdp::protocol::target::{
    ActivateTargetParams, CloseTargetParams, CreateTargetParams, CreateTargetResult,
    GetTargetsResult, SetDiscoverTargetsParams, TargetInfo,
};
use sightline_cdp::{CdpClient, page_ws_url};
use tempfile::TempDir;
use tokio::sync::RwLock;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

use crate::action::ActionResult;
use crate::bus::EventBus;
use crate::dialog::DialogRegistry;
use crate::error::{BrowserError, CoreError};
use crate::intercept::InterceptorRegistry;
use crate::wait::idle::NetworkIdleTracker;
use crate::wait::navigation::{NavigationWaiter, SettleSignal, WaitOptions};

pub use launcher::BrowserBuilder;
pub use page::{GotoOptions, normalize_url};

/// Delay between CDP connection attempts.
const RECONNECT_INTERVAL: Duration = Duration::from_secs(1);

/// Session lifecycle. `Launching` covers the span between process spawn and
/// the first successful attach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Launching,
    Attached,
    Detached,
    Closed,
}

/// Session-wide knobs carried from the builder.
#[derive(Debug, Clone)]
pub(crate) struct SessionOptions {
    pub(crate) ignore_certificate_errors: bool,
    pub(crate) observe: bool,
    pub(crate) observe_time: Duration,
}

impl SessionOptions {
    pub(crate) fn defaults() -> Self {
        Self {
            ignore_certificate_errors: false,
            observe: false,
            observe_time: Duration::from_secs(3),
        }
    }
}

/// A browser session.
pub struct Browser {
    host: String,
    port: u16,
    options: SessionOptions,
    state: parking_lot::Mutex<Lifecycle>,
    /// Child process, present only for launched (not connected) sessions.
    process: parking_lot::Mutex<Option<Child>>,
    /// Temporary profile directory, removed when the session closes.
    profile_dir: parking_lot::Mutex<Option<TempDir>>,
    /// Browser-endpoint connection; carries Target.* traffic for the whole
    /// session.
    control: Arc<CdpClient>,
    /// Page-endpoint connection to the attached target.
    client: RwLock<Option<Arc<CdpClient>>>,
    current_target: parking_lot::Mutex<Option<TargetInfo>>,
    root_node_id: Arc<AtomicI64>,
    bus: EventBus,
    idle: Arc<NetworkIdleTracker>,
    dialogs: DialogRegistry,
    interceptors: InterceptorRegistry,
    page_pump: parking_lot::Mutex<Option<tokio::task::JoinHandle<()>>>,
    control_pump: parking_lot::Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl std::fmt::Debug for Browser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Browser")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("state", &*self.state.lock())
            .finish_non_exhaustive()
    }
}

impl Browser {
    /// Create a builder for launching a new browser process.
    pub fn launch() -> BrowserBuilder {
        BrowserBuilder::new()
    }

    /// Attach to an already-running browser.
    ///
    /// `endpoint` is either the HTTP debugging endpoint
    /// (`http://localhost:9222`) or a browser WebSocket URL.
    ///
    /// # Errors
    ///
    /// Returns an error if discovery or the initial attach fails.
    pub async fn connect(endpoint: &str) -> Result<Self, CoreError> {
        let ws_url = sightline_cdp::discover_websocket_url(endpoint, None)
            .await
            .map_err(BrowserError::from)?;
        let browser = Self::new_session(&ws_url, None, None, SessionOptions::defaults())
            .await
            .map_err(CoreError::from)?;
        browser.attach_default().await?;
        Ok(browser)
    }

    /// Build a session around a browser WebSocket URL.
    pub(crate) async fn new_session(
        browser_ws_url: &str,
        mut process: Option<Child>,
        profile_dir: Option<TempDir>,
        options: SessionOptions,
    ) -> Result<Self, BrowserError> {
        // A spawned browser must not outlive a failed session setup.
        async fn terminate_on_error(process: &mut Option<Child>) {
            if let Some(child) = process.take() {
                process::terminate_and_reap_async(child).await;
            }
        }

        let parsed = match url::Url::parse(browser_ws_url) {
            Ok(parsed) => parsed,
            Err(e) => {
                terminate_on_error(&mut process).await;
                return Err(BrowserError::LaunchFailed(format!("bad WebSocket URL: {e}")));
            }
        };
        let host = parsed.host_str().unwrap_or("127.0.0.1").to_string();
        let Some(port) = parsed.port() else {
            terminate_on_error(&mut process).await;
            return Err(BrowserError::LaunchFailed(
                "WebSocket URL has no port".to_string(),
            ));
        };

        let control = match CdpClient::connect(browser_ws_url).await {
            Ok(client) => Arc::new(client),
            Err(error) => {
                terminate_on_error(&mut process).await;
                return Err(error.into());
            }
        };
        let bus = EventBus::new();
        let idle = Arc::new(NetworkIdleTracker::new(bus.clone()));

        let browser = Self {
            host,
            port,
            options,
            state: parking_lot::Mutex::new(Lifecycle::Launching),
            process: parking_lot::Mutex::new(process),
            profile_dir: parking_lot::Mutex::new(profile_dir),
            control,
            client: RwLock::new(None),
            current_target: parking_lot::Mutex::new(None),
            root_node_id: Arc::new(AtomicI64::new(0)),
            bus,
            idle,
            dialogs: DialogRegistry::default(),
            interceptors: InterceptorRegistry::default(),
            page_pump: parking_lot::Mutex::new(None),
            control_pump: parking_lot::Mutex::new(None),
        };

        // Target discovery feeds targetCreated/targetNavigated onto the bus
        // for the whole session.
        browser
            .control
            .send_command::<_, Value>(
                "Target.setDiscoverTargets",
                Some(SetDiscoverTargetsParams { discover: true }),
            )
            .await?;
        let pump = adapters::spawn_control_pump(browser.control.clone(), browser.bus.clone());
        *browser.control_pump.lock() = Some(pump);

        Ok(browser)
    }

    /// The low-level client for the attached target.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::NotLaunched`] when the session is closed or
    /// no target is attached.
    pub async fn client(&self) -> Result<Arc<CdpClient>, BrowserError> {
        self.ensure_open()?;
        self.client
            .read()
            .await
            .clone()
            .ok_or(BrowserError::NotLaunched)
    }

    /// Handle to the current root DOM node id (0 while unavailable).
    pub(crate) fn root_handle(&self) -> Arc<AtomicI64> {
        self.root_node_id.clone()
    }

    pub(crate) fn dialogs(&self) -> &DialogRegistry {
        &self.dialogs
    }

    pub(crate) fn interceptors(&self) -> &InterceptorRegistry {
        &self.interceptors
    }

    /// Build a navigation waiter subscribed to the bus.
    ///
    /// Call this BEFORE dispatching the action it should observe.
    pub(crate) fn navigation_waiter(&self, options: WaitOptions) -> NavigationWaiter {
        NavigationWaiter::new(self.bus.subscribe(), self.root_node_id.clone(), options)
    }

    /// Observability-mode delay, run at the top of every public verb.
    pub(crate) async fn pace(&self) {
        if self.options.observe {
            sleep(self.options.observe_time).await;
        }
    }

    pub(crate) fn ensure_open(&self) -> Result<(), BrowserError> {
        if *self.state.lock() == Lifecycle::Closed {
            return Err(BrowserError::NotLaunched);
        }
        Ok(())
    }

    fn set_state(&self, state: Lifecycle) {
        *self.state.lock() = state;
    }

    fn process_exited(&self) -> bool {
        let mut guard = self.process.lock();
        match guard.as_mut() {
            Some(child) => matches!(child.try_wait(), Ok(Some(_))),
            None => false,
        }
    }

    fn detach_page_pump(&self) {
        if let Some(handle) = self.page_pump.lock().take() {
            handle.abort();
        }
    }

    /// All page-type targets known to the browser.
    pub async fn targets(&self) -> Result<Vec<TargetInfo>, CoreError> {
        self.ensure_open()?;
        let result: GetTargetsResult = self
            .control
            .send_command("Target.getTargets", None::<Value>)
            .await
            .map_err(BrowserError::from)?;
        Ok(result
            .target_infos
            .into_iter()
            .filter(|target| target.target_type == "page")
            .collect())
    }

    /// The descriptor of the currently attached target.
    pub fn current_target(&self) -> Option<TargetInfo> {
        self.current_target.lock().clone()
    }

    /// Attach to the first page target, creating one if none exists.
    pub(crate) async fn attach_default(&self) -> Result<(), CoreError> {
        let targets = self.targets().await?;
        let target_id = match targets.first() {
            Some(target) => target.target_id.clone(),
            None => {
                let created: CreateTargetResult = self
                    .control
                    .send_command(
                        "Target.createTarget",
                        Some(CreateTargetParams {
                            url: "about:blank".to_string(),
                        }),
                    )
                    .await
                    .map_err(BrowserError::from)?;
                created.target_id
            }
        };
        self.attach_to(&target_id).await
    }

    /// Attach to a target: connect, enable domains, install re-publishers,
    /// and refresh the root node id.
    #[instrument(level = "info", skip(self))]
    pub(crate) async fn attach_to(&self, target_id: &str) -> Result<(), CoreError> {
        self.ensure_open()?;
        self.set_state(Lifecycle::Detached);

        // Prior listeners must be gone before any (re)connection attempt.
        self.detach_page_pump();
        self.client.write().await.take();
        self.root_node_id.store(0, Ordering::Release);

        let ws_url = page_ws_url(&self.host, self.port, target_id);
        let client = self.connect_with_retry(&ws_url).await?;

        tokio::try_join!(
            client.send_command::<_, Value>("Network.enable", None::<Value>),
            client.send_command::<_, Value>("Page.enable", None::<Value>),
            client.send_command::<_, Value>("DOM.enable", None::<Value>),
            client.send_command::<_, Value>("Overlay.enable", None::<Value>),
            client.send_command::<_, Value>("Security.enable", None::<Value>),
        )
        .map_err(BrowserError::from)?;

        client
            .send_command::<_, Value>(
                "Page.setLifecycleEventsEnabled",
                Some(SetLifecycleEventsEnabledParams { enabled: true }),
            )
            .await
            .map_err(BrowserError::from)?;

        if self.options.ignore_certificate_errors {
            client
                .send_command::<_, Value>(
                    "Security.setIgnoreCertificateErrors",
                    Some(SetIgnoreCertificateErrorsParams { ignore: true }),
                )
                .await
                .map_err(BrowserError::from)?;
        }

        // Interception outlives target switches; re-enable on the new client.
        if !self.interceptors.is_empty() {
            client
                .send_command::<_, Value>(
                    "Fetch.enable",
                    Some(FetchEnableParams {
                        patterns: vec![RequestPattern {
                            url_pattern: Some("*".to_string()),
                        }],
                    }),
                )
                .await
                .map_err(BrowserError::from)?;
        }

        // Start the pump before fetching the root so a load finishing right
        // now cannot slip between the two.
        let pump = adapters::spawn_page_pump(adapters::PageAdapterContext {
            client: client.clone(),
            bus: self.bus.clone(),
            idle: self.idle.clone(),
            dialogs: self.dialogs.clone(),
            interceptors: self.interceptors.clone(),
            root_node_id: self.root_node_id.clone(),
        });
        *self.page_pump.lock() = Some(pump);

        let root: GetDocumentResult = client
            .send_command(
                "DOM.getDocument",
                Some(GetDocumentParams::default()),
            )
            .await
            .map_err(BrowserError::from)?;
        self.root_node_id
            .store(root.root.node_id, Ordering::Release);

        let _ = self
            .control
            .send_command::<_, Value>(
                "Target.activateTarget",
                Some(ActivateTargetParams {
                    target_id: target_id.to_string(),
                }),
            )
            .await;

        *self.client.write().await = Some(client);
        let targets = self.targets().await?;
        *self.current_target.lock() = targets
            .into_iter()
            .find(|target| target.target_id == target_id);
        self.set_state(Lifecycle::Attached);

        info!(target_id, "attached to target");
        Ok(())
    }

    /// Connect to a WebSocket endpoint, retrying every second until the
    /// connection succeeds or the browser process dies.
    async fn connect_with_retry(&self, ws_url: &str) -> Result<Arc<CdpClient>, BrowserError> {
        loop {
            match CdpClient::connect(ws_url).await {
                Ok(client) => return Ok(Arc::new(client)),
                Err(error) => {
                    if self.process_exited() {
                        return Err(BrowserError::ProcessExited);
                    }
                    warn!(%error, "CDP connection failed, retrying");
                    sleep(RECONNECT_INTERVAL).await;
                }
            }
        }
    }

    /// Switch to the tab whose URL or title matches exactly.
    #[instrument(level = "info", skip(self))]
    pub async fn switch_to(&self, url_or_title: &str) -> Result<ActionResult, CoreError> {
        self.pace().await;
        let targets = self.targets().await?;
        let target = targets
            .iter()
            .find(|t| t.url == url_or_title || t.title == url_or_title)
            .ok_or_else(|| BrowserError::TargetNotFound(url_or_title.to_string()))?;
        let target_id = target.target_id.clone();
        self.attach_to(&target_id).await?;
        Ok(ActionResult::new(format!(
            "Switched to tab matching \"{url_or_title}\""
        )))
    }

    /// Open a new tab and attach to it.
    #[instrument(level = "info", skip(self))]
    pub async fn open_tab(&self, url: &str) -> Result<ActionResult, CoreError> {
        self.pace().await;
        self.ensure_open()?;
        let url = normalize_url(url);

        let mut waiter = self.navigation_waiter(WaitOptions::page_load());
        waiter.arm(SettleSignal::TargetNavigated);

        let created: CreateTargetResult = self
            .control
            .send_command(
                "Target.createTarget",
                Some(CreateTargetParams { url: url.clone() }),
            )
            .await
            .map_err(BrowserError::from)?;

        waiter.settle().await?;
        self.attach_to(&created.target_id).await?;

        Ok(ActionResult::with_url(
            format!("Opened tab with URL \"{url}\""),
            url,
        ))
    }

    /// Close a tab.
    ///
    /// With a URL (or title), closes that tab; without, closes the current
    /// one. Closing the last remaining tab closes the whole browser.
    #[instrument(level = "info", skip(self))]
    pub async fn close_tab(&self, url_or_title: Option<&str>) -> Result<ActionResult, CoreError> {
        self.pace().await;
        let targets = self.targets().await?;

        let victim = match url_or_title {
            Some(locator) => targets
                .iter()
                .find(|t| t.url == locator || t.title == locator)
                .ok_or_else(|| BrowserError::TargetNotFound(locator.to_string()))?
                .clone(),
            None => self
                .current_target
                .lock()
                .clone()
                .ok_or(BrowserError::NotLaunched)?,
        };

        if targets.len() <= 1 {
            self.close().await?;
            return Ok(ActionResult::new("Closing last target and browser."));
        }

        self.control
            .send_command::<_, Value>(
                "Target.closeTarget",
                Some(CloseTargetParams {
                    target_id: victim.target_id.clone(),
                }),
            )
            .await
            .map_err(BrowserError::from)?;

        let attached_to_victim = self
            .current_target
            .lock()
            .as_ref()
            .is_none_or(|current| current.target_id == victim.target_id);
        if attached_to_victim {
            let survivor = targets
                .iter()
                .find(|t| t.target_id != victim.target_id)
                .expect("more than one target exists")
                .target_id
                .clone();
            self.attach_to(&survivor).await?;
        }

        Ok(ActionResult::new(format!(
            "Closed tab with URL \"{}\"",
            victim.url
        )))
    }

    /// Close the browser and clean up the session.
    ///
    /// A second close fails with [`BrowserError::NotLaunched`].
    #[instrument(level = "info", skip(self))]
    pub async fn close(&self) -> Result<ActionResult, CoreError> {
        {
            let mut state = self.state.lock();
            if *state == Lifecycle::Closed {
                return Err(BrowserError::NotLaunched.into());
            }
            *state = Lifecycle::Closed;
        }

        // Best-effort page close before tearing the wires down.
        if let Some(client) = self.client.write().await.take() {
            let _ = client
                .send_command_with_timeout::<_, Value>(
                    "Page.close",
                    None::<Value>,
                    Duration::from_secs(2),
                )
                .await;
        }

        self.detach_page_pump();
        if let Some(handle) = self.control_pump.lock().take() {
            handle.abort();
        }
        self.interceptors.clear();
        self.dialogs.clear();
        self.root_node_id.store(0, Ordering::Release);
        *self.current_target.lock() = None;

        let child = self.process.lock().take();
        if let Some(child) = child {
            // SIGTERM with a grace window, SIGKILL escalation, then reap.
            process::terminate_and_reap_async(child).await;
            debug!("browser process terminated");
        } else {
            let _ = self
                .control
                .send_command_with_timeout::<_, Value>(
                    "Browser.close",
                    None::<Value>,
                    Duration::from_secs(2),
                )
                .await;
        }

        // Profile removal is asynchronous and best-effort.
        if let Some(profile) = self.profile_dir.lock().take() {
            tokio::task::spawn_blocking(move || {
                if let Err(error) = profile.close() {
                    debug!(%error, "failed to remove temporary profile");
                }
            });
        }

        info!("browser closed");
        Ok(ActionResult::new("Browser closed"))
    }
}

impl Drop for Browser {
    fn drop(&mut self) {
        // A dropped-without-close session must not leave a browser process
        // or event pumps behind.
        if let Some(handle) = self.page_pump.lock().take() {
            handle.abort();
        }
        if let Some(handle) = self.control_pump.lock().take() {
            handle.abort();
        }
        if let Some(mut child) = self.process.lock().take() {
            process::kill_and_reap_sync(&mut child, 5, Duration::from_millis(100));
        }
    }
}
