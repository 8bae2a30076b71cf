//! Broadcast channel fanning status events out to viewer connections.

use crate::core::{PipelineStatus, StatusEvent};
use crate::events::EventSink;
use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::sync::broadcast;

/// Default capacity of the per-subscriber event buffer.
const DEFAULT_CAPACITY: usize = 64;

/// The notifier channel: fans each status event out to every currently
/// subscribed viewer and remembers the most recent status.
///
/// There is no acknowledgement, no buffering for absent viewers, and no
/// replay: an event emitted while nobody is subscribed is dropped, and a
/// viewer that subscribes later only sees events from that point on. The
/// current-status cell exists so late joiners can query where the
/// pipeline stands right now.
#[derive(Debug)]
pub struct StatusChannel {
    tx: broadcast::Sender<StatusEvent>,
    current: RwLock<PipelineStatus>,
}

impl StatusChannel {
    /// Creates a channel with the given per-subscriber buffer capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            current: RwLock::new(PipelineStatus::Idle),
        }
    }

    /// Opens a viewer connection. The receiver yields every event
    /// broadcast after this call (no replay of past events).
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StatusEvent> {
        self.tx.subscribe()
    }

    /// Sends the event to all current subscribers and updates the
    /// current-status cell. Returns the number of receivers the event
    /// reached; zero means it was dropped.
    pub fn broadcast(&self, event: StatusEvent) -> usize {
        *self.current.write() = event.status;
        self.tx.send(event).unwrap_or(0)
    }

    /// The most recently broadcast status.
    #[must_use]
    pub fn current(&self) -> PipelineStatus {
        *self.current.read()
    }

    /// Number of currently open viewer connections.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for StatusChannel {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[async_trait]
impl EventSink for StatusChannel {
    async fn emit(&self, event: StatusEvent) {
        self.broadcast(event);
    }

    fn try_emit(&self, event: StatusEvent) {
        self.broadcast(event);
    }
}
