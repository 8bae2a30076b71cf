//! Event sink trait and implementations.

use crate::core::{PipelineStatus, StatusEvent};
use async_trait::async_trait;
use tracing::{debug, info, Level};

/// Trait for sinks that receive status events.
///
/// Sinks have no acknowledgement or delivery guarantee: an emit that
/// reaches nobody is silently dropped.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Emits an event asynchronously.
    async fn emit(&self, event: StatusEvent);

    /// Emits an event without blocking.
    ///
    /// This method must never panic; errors are logged and suppressed.
    fn try_emit(&self, event: StatusEvent);
}

/// A no-op event sink that discards all events.
///
/// Used as the default when no sink is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpEventSink;

#[async_trait]
impl EventSink for NoOpEventSink {
    async fn emit(&self, _event: StatusEvent) {
        // Intentionally empty - discards all events
    }

    fn try_emit(&self, _event: StatusEvent) {
        // Intentionally empty - discards all events
    }
}

/// An event sink that logs events using the tracing framework.
#[derive(Debug, Clone)]
pub struct LoggingEventSink {
    /// The log level to use.
    level: Level,
}

impl Default for LoggingEventSink {
    fn default() -> Self {
        Self { level: Level::INFO }
    }
}

impl LoggingEventSink {
    /// Creates a new logging event sink with the specified level.
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self { level }
    }

    fn log_event(&self, event: &StatusEvent) {
        match self.level {
            Level::DEBUG => {
                debug!(
                    status = %event.status,
                    run_id = %event.run_id,
                    "status event"
                );
            }
            _ => {
                info!(
                    status = %event.status,
                    run_id = %event.run_id,
                    "status event"
                );
            }
        }
    }
}

#[async_trait]
impl EventSink for LoggingEventSink {
    async fn emit(&self, event: StatusEvent) {
        self.log_event(&event);
    }

    fn try_emit(&self, event: StatusEvent) {
        self.log_event(&event);
    }
}

/// A collecting event sink for testing purposes.
#[derive(Debug, Default)]
pub struct CollectingEventSink {
    events: parking_lot::RwLock<Vec<StatusEvent>>,
}

impl CollectingEventSink {
    /// Creates a new collecting sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected events.
    #[must_use]
    pub fn events(&self) -> Vec<StatusEvent> {
        self.events.read().clone()
    }

    /// Returns just the statuses of the collected events, in order.
    #[must_use]
    pub fn statuses(&self) -> Vec<PipelineStatus> {
        self.events.read().iter().map(|e| e.status).collect()
    }

    /// Returns the number of collected events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// Returns true if no events have been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Clears all collected events.
    pub fn clear(&self) {
        self.events.write().clear();
    }
}

#[async_trait]
impl EventSink for CollectingEventSink {
    async fn emit(&self, event: StatusEvent) {
        self.events.write().push(event);
    }

    fn try_emit(&self, event: StatusEvent) {
        self.events.write().push(event);
    }
}
