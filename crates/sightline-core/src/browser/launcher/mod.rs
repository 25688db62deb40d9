//! Browser launching.

use std::env;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::time::Duration;

use tempfile::TempDir;
use tokio::time::timeout;
use tracing::{debug, info, instrument, trace, warn};

use super::{Browser, SessionOptions, process};
use crate::error::{BrowserError, CoreError};

/// Deadline for the browser to publish its DevTools endpoint.
const ENDPOINT_DEADLINE: Duration = Duration::from_secs(15);

/// Prefix for temporary profile directories under the OS temp dir.
const PROFILE_PREFIX: &str = "sightline-profile-";

/// Common Chromium paths on different platforms.
const CHROMIUM_PATHS: &[&str] = &[
    // Linux
    "chromium",
    "chromium-browser",
    "/usr/bin/chromium",
    "/usr/bin/chromium-browser",
    "/snap/bin/chromium",
    "/usr/bin/google-chrome",
    // macOS
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    // Windows
    r"C:\Program Files\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
];

/// Builder for launching a browser session.
#[derive(Debug, Clone)]
pub struct BrowserBuilder {
    /// Path to the Chromium executable.
    executable_path: Option<PathBuf>,
    /// Whether to run headless. Default is `true`.
    headless: bool,
    /// Debugging port; 0 picks an ephemeral port.
    port: u16,
    /// Additional command line arguments.
    args: Vec<String>,
    /// Whether to ignore certificate errors.
    ignore_certificate_errors: bool,
    /// Whether to delay every verb for human observation.
    observe: bool,
    /// The observation delay.
    observe_time: Duration,
}

impl Default for BrowserBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BrowserBuilder {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        Self {
            executable_path: None,
            headless: true,
            port: 0,
            args: Vec::new(),
            ignore_certificate_errors: false,
            observe: false,
            observe_time: Duration::from_secs(3),
        }
    }

    /// Set the path to the Chromium executable.
    ///
    /// If not set, the launcher searches common paths and the
    /// `CHROMIUM_PATH` environment variable.
    #[must_use]
    pub fn executable_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.executable_path = Some(path.into());
        self
    }

    /// Set whether to run in headless mode. Default is `true`.
    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set the remote debugging port. `0` (the default) picks an ephemeral
    /// port; the actual endpoint is read back from the browser.
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Add additional command line arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Ignore certificate errors (self-signed test servers).
    #[must_use]
    pub fn ignore_certificate_errors(mut self, ignore: bool) -> Self {
        self.ignore_certificate_errors = ignore;
        self
    }

    /// Delay every verb by the observation time, for watching a headful run.
    #[must_use]
    pub fn observe(mut self, observe: bool) -> Self {
        self.observe = observe;
        self
    }

    /// Set the observation delay. Default is 3 seconds.
    #[must_use]
    pub fn observe_time(mut self, observe_time: Duration) -> Self {
        self.observe_time = observe_time;
        self
    }

    /// Launch the browser and attach to its first page.
    ///
    /// # Errors
    ///
    /// Returns an error if Chromium is not found, the process fails to
    /// spawn, or no DevTools endpoint appears within 15 seconds.
    #[instrument(level = "info", skip(self), fields(headless = self.headless))]
    pub async fn launch(self) -> Result<Browser, CoreError> {
        let executable = self.find_executable()?;
        info!(executable = %executable.display(), "found Chromium executable");

        let profile_dir = TempDir::with_prefix(PROFILE_PREFIX).map_err(|e| {
            BrowserError::LaunchFailed(format!("failed to create profile directory: {e}"))
        })?;

        let mut cmd = Command::new(&executable);
        cmd.arg(format!("--remote-debugging-port={}", self.port));
        cmd.arg(format!("--user-data-dir={}", profile_dir.path().display()));
        cmd.arg("--use-mock-keychain");
        if self.headless {
            cmd.arg("--headless");
            cmd.arg("--window-size=1440,900");
        }
        if !self.args.is_empty() {
            cmd.args(&self.args);
            debug!(user_args = ?self.args, "added user arguments");
        }

        // The DevTools endpoint is announced on stderr.
        cmd.stderr(Stdio::piped());
        cmd.stdout(Stdio::null());

        info!("spawning browser process");
        let mut child = cmd
            .spawn()
            .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;
        let pid = child.id();
        debug!(pid, "browser process spawned");

        let ws_url = match timeout(ENDPOINT_DEADLINE, read_ws_url(&mut child)).await {
            Ok(Ok(ws_url)) => ws_url,
            Ok(Err(error)) => {
                process::terminate_and_reap_async(child).await;
                return Err(error.into());
            }
            Err(_) => {
                warn!("no DevTools endpoint within deadline, terminating browser");
                process::terminate_and_reap_async(child).await;
                return Err(BrowserError::EndpointTimeout(ENDPOINT_DEADLINE).into());
            }
        };
        info!(ws_url = %ws_url, "got DevTools endpoint");

        let options = SessionOptions {
            ignore_certificate_errors: self.ignore_certificate_errors,
            observe: self.observe,
            observe_time: self.observe_time,
        };
        let browser =
            Browser::new_session(&ws_url, Some(child), Some(profile_dir), options).await?;
        browser.attach_default().await?;
        Ok(browser)
    }

    /// Find the Chromium executable.
    fn find_executable(&self) -> Result<PathBuf, BrowserError> {
        if let Some(ref path) = self.executable_path {
            if path.exists() {
                return Ok(path.clone());
            }
            warn!(path = %path.display(), "explicit executable path does not exist");
            return Err(BrowserError::ChromiumNotFound);
        }

        if let Ok(path_str) = env::var("CHROMIUM_PATH") {
            let path = PathBuf::from(&path_str);
            if path.exists() {
                debug!(path = %path.display(), "using CHROMIUM_PATH");
                return Ok(path);
            }
            warn!(path = %path.display(), "CHROMIUM_PATH does not exist");
        }

        for path_str in CHROMIUM_PATHS {
            let path = PathBuf::from(path_str);
            if path.exists() {
                return Ok(path);
            }
            if let Ok(output) = Command::new("which").arg(path_str).output() {
                if output.status.success() {
                    let found = String::from_utf8_lossy(&output.stdout).trim().to_string();
                    if !found.is_empty() {
                        return Ok(PathBuf::from(found));
                    }
                }
            }
        }

        warn!("Chromium not found in any expected location");
        Err(BrowserError::ChromiumNotFound)
    }
}

/// Scrape the DevTools WebSocket URL from the browser's stderr.
///
/// Fails when stderr closes (the process exited) before the endpoint line
/// appears.
async fn read_ws_url(child: &mut Child) -> Result<String, BrowserError> {
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| BrowserError::LaunchFailed("failed to capture stderr".into()))?;

    let handle = tokio::task::spawn_blocking(move || {
        let reader = BufReader::new(stderr);
        for line in reader.lines() {
            let Ok(line) = line else { continue };
            trace!(line = %line, "browser stderr");
            if let Some(pos) = line.find("DevTools listening on ") {
                return Some(line[pos + 22..].trim().to_string());
            }
        }
        None
    });

    handle
        .await
        .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?
        .ok_or_else(|| {
            BrowserError::LaunchFailed(
                "browser exited before publishing a DevTools endpoint".into(),
            )
        })
}
