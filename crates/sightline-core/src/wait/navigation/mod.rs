//! Navigation settling.
//!
//! An action that may navigate arms a waiter with a growing set of settle
//! signals. The set is conditionally extended as browser events arrive, so
//! an action that caused no navigation settles immediately, while one that
//! kicked off a page load waits for every signal the load produced.
//!
//! The two-phase protocol:
//!
//! 1. For up to `wait_for_start`, watch the bus for anything that arms a
//!    signal. If the armed set is still empty when the window closes, the
//!    action caused no navigation and the wait returns at once. Becoming
//!    non-empty is the "did anything arm?" answer; satisfaction is phase 2's
//!    business.
//! 2. Wait until every armed signal is satisfied and the root DOM node id is
//!    available again, bounded by `timeout`. Individual signals are best
//!    effort; only the deadline is authoritative.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use tokio::time::{Instant, sleep, timeout};
use tracing::{debug, trace};

use crate::bus::{BusEvent, BusRecv, BusSubscription};
use crate::error::NavigationError;

/// Default window in which an action's navigation must announce itself.
pub const DEFAULT_WAIT_FOR_START: Duration = Duration::from_millis(500);

/// Default deadline for a triggered navigation to settle.
pub const DEFAULT_NAVIGATION_TIMEOUT: Duration = Duration::from_secs(15);

/// Deadline for explicit page loads (goto, open_tab).
pub const PAGE_LOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// How often to re-check the root node id once all signals are satisfied.
const ROOT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A signal contributing to "the page has settled".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettleSignal {
    /// The load event fired.
    LoadEventFired,
    /// DOMContentLoaded fired.
    DomContentEventFired,
    /// The loading frame stopped.
    FrameStoppedLoading,
    /// The network went quiet.
    NetworkIdle,
    /// A target reached its new URL.
    TargetNavigated,
    /// First meaningful paint was reported.
    FirstMeaningfulPaint,
}

/// Waiting knobs for one action.
#[derive(Debug, Clone, Copy)]
pub struct WaitOptions {
    /// Whether to wait for a triggered navigation at all.
    pub await_navigation: bool,
    /// Window in which the navigation must announce itself.
    pub wait_for_start: Duration,
    /// Overall settling deadline.
    pub timeout: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            await_navigation: true,
            wait_for_start: DEFAULT_WAIT_FOR_START,
            timeout: DEFAULT_NAVIGATION_TIMEOUT,
        }
    }
}

impl WaitOptions {
    /// Options for explicit page loads, with the longer deadline.
    pub fn page_load() -> Self {
        Self {
            timeout: PAGE_LOAD_TIMEOUT,
            ..Self::default()
        }
    }
}

/// Outcome of a settle wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    /// Nothing armed within the start window; the action did not navigate.
    NoNavigation,
    /// Every armed signal resolved before the deadline.
    Navigated,
}

/// Waiter over the session bus for one action.
///
/// Holds its [`BusSubscription`] by value: every exit path from
/// [`NavigationWaiter::settle`] drops the subscription, so a finished action
/// leaves no listeners on the bus.
#[derive(Debug)]
pub struct NavigationWaiter {
    subscription: BusSubscription,
    armed: HashSet<SettleSignal>,
    satisfied: HashSet<SettleSignal>,
    options: WaitOptions,
    root_node_id: Arc<AtomicI64>,
}

impl NavigationWaiter {
    /// Create a waiter.
    ///
    /// The subscription must be taken out BEFORE the action is dispatched so
    /// no signal can slip between dispatch and wait.
    pub fn new(
        subscription: BusSubscription,
        root_node_id: Arc<AtomicI64>,
        options: WaitOptions,
    ) -> Self {
        Self {
            subscription,
            armed: HashSet::new(),
            satisfied: HashSet::new(),
            options,
            root_node_id,
        }
    }

    /// Arm a signal up front.
    ///
    /// Explicit page loads pre-arm their load signals instead of waiting for
    /// the frame events to announce them.
    pub fn arm(&mut self, signal: SettleSignal) {
        self.armed.insert(signal);
    }

    /// Feed one bus event through the arming and satisfaction rules.
    fn observe(&mut self, event: &BusEvent) {
        match event {
            BusEvent::FrameStartedLoading => {
                // A fresh load cycle: both completion signals are required
                // again even if an earlier cycle satisfied them.
                self.armed.insert(SettleSignal::LoadEventFired);
                self.armed.insert(SettleSignal::FrameStoppedLoading);
                self.satisfied.remove(&SettleSignal::LoadEventFired);
                self.satisfied.remove(&SettleSignal::FrameStoppedLoading);
            }
            BusEvent::TargetCreated { .. } => {
                self.armed.insert(SettleSignal::TargetNavigated);
            }
            BusEvent::XhrActivity { .. } => {
                // The new request invalidates any idle observed before it.
                self.armed.insert(SettleSignal::NetworkIdle);
                self.satisfied.remove(&SettleSignal::NetworkIdle);
            }
            BusEvent::LoadEventFired => {
                self.satisfied.insert(SettleSignal::LoadEventFired);
            }
            BusEvent::DomContentEventFired => {
                self.satisfied.insert(SettleSignal::DomContentEventFired);
            }
            BusEvent::FrameStoppedLoading => {
                self.satisfied.insert(SettleSignal::FrameStoppedLoading);
            }
            BusEvent::NetworkIdle => {
                self.satisfied.insert(SettleSignal::NetworkIdle);
            }
            BusEvent::TargetNavigated { .. } => {
                self.satisfied.insert(SettleSignal::TargetNavigated);
            }
            BusEvent::FirstMeaningfulPaint => {
                self.satisfied.insert(SettleSignal::FirstMeaningfulPaint);
            }
        }
        trace!(armed = ?self.armed, satisfied = ?self.satisfied, "waiter observed event");
    }

    fn all_satisfied(&self) -> bool {
        self.armed.is_subset(&self.satisfied)
    }

    fn root_available(&self) -> bool {
        self.root_node_id.load(Ordering::Acquire) != 0
    }

    /// Wait for the page to settle.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::Timeout`] when armed signals are still
    /// outstanding at the deadline.
    pub async fn settle(mut self) -> Result<Settled, NavigationError> {
        let start = Instant::now();
        let arm_deadline = start + self.options.wait_for_start;
        let deadline = start + self.options.timeout;

        // Phase 1: did anything arm? The set becoming non-empty is the
        // signal; returning here when it stays empty is deliberate and is
        // what makes non-navigating actions cheap.
        let mut closed = false;
        while self.armed.is_empty() {
            let now = Instant::now();
            if now >= arm_deadline || closed {
                debug!("no navigation armed within start window");
                return Ok(Settled::NoNavigation);
            }
            match timeout(arm_deadline - now, self.subscription.recv()).await {
                Ok(BusRecv::Event(event)) => self.observe(&event),
                Ok(BusRecv::Lagged) => continue,
                Ok(BusRecv::Closed) => closed = true,
                Err(_) => return Ok(Settled::NoNavigation),
            }
        }

        debug!(armed = ?self.armed, "navigation armed, waiting to settle");

        // Phase 2: wait for every armed signal, then for the root node id.
        loop {
            if self.all_satisfied() {
                if self.root_available() {
                    debug!("navigation settled");
                    return Ok(Settled::Navigated);
                }
                if Instant::now() >= deadline {
                    return Err(NavigationError::Timeout(self.options.timeout));
                }
                sleep(ROOT_POLL_INTERVAL).await;
                continue;
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(NavigationError::Timeout(self.options.timeout));
            }

            if closed {
                // No further events can arrive; poll until satisfied state
                // changes (it will not) or the deadline reports the truth.
                sleep(ROOT_POLL_INTERVAL.min(deadline - now)).await;
                continue;
            }

            match timeout(deadline - now, self.subscription.recv()).await {
                Ok(BusRecv::Event(event)) => self.observe(&event),
                Ok(BusRecv::Lagged) => continue,
                Ok(BusRecv::Closed) => closed = true,
                Err(_) => return Err(NavigationError::Timeout(self.options.timeout)),
            }
        }
    }
}

#[cfg(test)]
mod tests;
