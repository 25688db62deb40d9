//! Session event bus.
//!
//! Browser-originated signals are republished here as a closed set of typed
//! events. Consumers subscribe through [`EventBus::subscribe`]; dropping the
//! returned [`BusSubscription`] releases the listener, which is how actions
//! guarantee they leave no listeners behind.

use tokio::sync::broadcast;
use tracing::trace;

/// Buffer size for the bus broadcast channel.
const BUS_CHANNEL_SIZE: usize = 256;

/// A browser-originated signal on the session bus.
#[derive(Debug, Clone, PartialEq)]
pub enum BusEvent {
    /// A network request started.
    XhrActivity {
        /// Network request id.
        request_id: String,
    },
    /// The page fired its load event.
    LoadEventFired,
    /// The page fired DOMContentLoaded.
    DomContentEventFired,
    /// A frame began loading.
    FrameStartedLoading,
    /// A frame finished loading.
    FrameStoppedLoading,
    /// The renderer reported first meaningful paint.
    FirstMeaningfulPaint,
    /// No network requests were in flight for the quiet window.
    NetworkIdle,
    /// A new target appeared.
    TargetCreated {
        /// Identifier of the new target.
        target_id: String,
    },
    /// An existing target navigated to a new URL.
    TargetNavigated {
        /// The target's new URL.
        url: String,
    },
}

/// The session-wide event bus.
///
/// Cloning shares the underlying channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<BusEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    /// Create a new, empty bus.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BUS_CHANNEL_SIZE);
        Self { tx }
    }

    /// Publish an event to all current subscribers.
    ///
    /// Events published while nobody listens are dropped; the bus never
    /// buffers for future subscribers.
    pub fn emit(&self, event: BusEvent) {
        trace!(?event, "bus emit");
        let _ = self.tx.send(event);
    }

    /// Subscribe to events published after this call.
    pub fn subscribe(&self) -> BusSubscription {
        BusSubscription {
            rx: self.tx.subscribe(),
        }
    }

    /// Number of live subscriptions.
    ///
    /// Actions assert this returns to its pre-action value once they finish.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// A scoped bus listener.
///
/// Dropping the subscription detaches the listener on every exit path, so a
/// panicking or timed-out action cannot leak listeners into the next action.
#[derive(Debug)]
pub struct BusSubscription {
    rx: broadcast::Receiver<BusEvent>,
}

/// Outcome of waiting for the next bus event.
#[derive(Debug)]
pub enum BusRecv {
    /// An event arrived.
    Event(BusEvent),
    /// The subscriber fell behind and missed events.
    Lagged,
    /// The bus was dropped; no further events will arrive.
    Closed,
}

impl BusSubscription {
    /// Wait for the next event.
    pub async fn recv(&mut self) -> BusRecv {
        match self.rx.recv().await {
            Ok(event) => BusRecv::Event(event),
            Err(broadcast::error::RecvError::Lagged(_)) => BusRecv::Lagged,
            Err(broadcast::error::RecvError::Closed) => BusRecv::Closed,
        }
    }
}

#[cfg(test)]
mod tests;
