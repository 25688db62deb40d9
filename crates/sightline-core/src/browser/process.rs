//! Browser process termination.
//!
//! Closing a session asks the browser to exit with SIGTERM and escalates to
//! SIGKILL only when the grace window runs out. Both the async and the
//! Drop-time path reap the process with a `wait` so it cannot linger as a
//! zombie.

use std::process::Child;
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

/// How long a terminated browser gets to exit before SIGKILL.
const TERM_GRACE: Duration = Duration::from_secs(5);

/// Poll interval while waiting out the grace window.
const REAP_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Ask the process to terminate gracefully.
#[cfg(unix)]
pub(super) fn send_sigterm(child: &Child) {
    use nix::sys::signal::{Signal, kill};
    use nix::unistd::Pid;

    let pid = Pid::from_raw(child.id() as i32);
    if let Err(error) = kill(pid, Signal::SIGTERM) {
        debug!(%error, "failed to send SIGTERM to browser process");
    }
}

/// No SIGTERM off Unix; the caller's SIGKILL escalation does the work.
#[cfg(not(unix))]
pub(super) fn send_sigterm(child: &Child) {
    let _ = child;
}

/// Terminate and reap a child process from an async context.
///
/// Sends SIGTERM, polls for exit until the grace window closes, then
/// escalates to SIGKILL. The final `wait` runs on the blocking pool and
/// reaps the process either way.
pub(super) async fn terminate_and_reap_async(mut child: Child) {
    send_sigterm(&child);

    let deadline = tokio::time::Instant::now() + TERM_GRACE;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                info!(?status, "browser process exited after SIGTERM");
                return;
            }
            Ok(None) => {}
            Err(error) => {
                warn!(%error, "failed to check browser process status");
                break;
            }
        }
        if tokio::time::Instant::now() >= deadline {
            debug!("browser ignored SIGTERM, escalating to SIGKILL");
            break;
        }
        tokio::time::sleep(REAP_POLL_INTERVAL).await;
    }

    let _ = child.kill();
    match tokio::task::spawn_blocking(move || child.wait()).await {
        Ok(Ok(status)) => info!(?status, "browser process reaped"),
        Ok(Err(error)) => warn!(%error, "failed to reap browser process"),
        Err(error) => warn!(%error, "browser reap task failed"),
    }
}

/// Kill and reap a child process synchronously (for use in Drop).
///
/// Drop cannot block on `wait`, so this retries the non-blocking
/// `try_wait` a bounded number of times with a small delay and warns when
/// the process is still unreaped afterwards.
pub(super) fn kill_and_reap_sync(child: &mut Child, max_attempts: u32, retry_delay: Duration) {
    let _ = child.kill();

    for attempt in 1..=max_attempts {
        match child.try_wait() {
            Ok(Some(status)) => {
                info!(?status, attempt, "browser process reaped in Drop");
                return;
            }
            Ok(None) => {
                if attempt < max_attempts {
                    thread::sleep(retry_delay);
                }
            }
            Err(error) => {
                warn!(%error, "failed to check browser process status in Drop");
                return;
            }
        }
    }

    warn!(
        max_attempts,
        "browser process still running after kill, will become zombie until parent exits"
    );
}
