//! Network-idle tracking.
//!
//! The tracker holds the set of in-flight request ids. When the set becomes
//! empty a quiet-window timer is armed; if no new request starts before it
//! expires, `NetworkIdle` is emitted on the bus. A request starting during
//! the window disarms it. The tracker is passive: it only emits, and
//! consumers decide whether idleness matters for their current wait.

use std::collections::HashSet;

use tokio::sync::mpsc;
use tokio::time::{Duration, Instant, sleep_until};
use tracing::{debug, trace};

use crate::bus::{BusEvent, EventBus};

/// How long the in-flight set must stay empty before idle is reported.
const IDLE_QUIET_WINDOW: Duration = Duration::from_millis(500);

#[derive(Debug)]
enum TrackerMessage {
    Started(String),
    Finished(String),
}

/// Tracks outstanding network requests and emits [`BusEvent::NetworkIdle`].
#[derive(Debug)]
pub struct NetworkIdleTracker {
    tx: mpsc::UnboundedSender<TrackerMessage>,
    handle: tokio::task::JoinHandle<()>,
}

impl NetworkIdleTracker {
    /// Spawn a tracker emitting onto the given bus.
    pub fn new(bus: EventBus) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(Self::run(rx, bus));
        Self { tx, handle }
    }

    /// Record a request entering flight.
    pub fn request_started(&self, request_id: impl Into<String>) {
        let _ = self.tx.send(TrackerMessage::Started(request_id.into()));
    }

    /// Record a request leaving flight (finished or failed).
    pub fn request_finished(&self, request_id: impl Into<String>) {
        let _ = self.tx.send(TrackerMessage::Finished(request_id.into()));
    }

    async fn run(mut rx: mpsc::UnboundedReceiver<TrackerMessage>, bus: EventBus) {
        let mut inflight: HashSet<String> = HashSet::new();
        let mut quiet_deadline: Option<Instant> = None;

        loop {
            let sleep_target = quiet_deadline.unwrap_or_else(|| {
                // Far-future placeholder; the branch below is gated on
                // quiet_deadline being set.
                Instant::now() + Duration::from_secs(3600)
            });

            tokio::select! {
                message = rx.recv() => {
                    let Some(message) = message else { break };
                    match message {
                        TrackerMessage::Started(id) => {
                            trace!(request_id = %id, "request in flight");
                            inflight.insert(id);
                            quiet_deadline = None;
                        }
                        TrackerMessage::Finished(id) => {
                            inflight.remove(&id);
                            if inflight.is_empty() {
                                quiet_deadline = Some(Instant::now() + IDLE_QUIET_WINDOW);
                            }
                        }
                    }
                }
                () = sleep_until(sleep_target), if quiet_deadline.is_some() => {
                    debug!("network idle");
                    bus.emit(BusEvent::NetworkIdle);
                    quiet_deadline = None;
                }
            }
        }
    }
}

impl Drop for NetworkIdleTracker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests;
