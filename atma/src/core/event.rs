//! Status event pushed to every viewer connection.

use crate::core::PipelineStatus;
use crate::utils::iso_timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Wire name shared by every status event.
pub const EVENT_NAME: &str = "atma_status";

/// A single status notification pushed to all viewer connections.
///
/// Every event is tagged with the run id of the request that produced it
/// so observers can tell interleaved runs apart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusEvent {
    /// The event name on the wire; always [`EVENT_NAME`].
    #[serde(rename = "event", default = "default_event_name")]
    pub name: String,

    /// The pipeline stage being announced.
    pub status: PipelineStatus,

    /// Correlation id of the run that emitted this event.
    pub run_id: Uuid,

    /// When the event was emitted (ISO 8601).
    pub timestamp: String,
}

fn default_event_name() -> String {
    EVENT_NAME.to_string()
}

impl StatusEvent {
    /// Creates a new status event stamped with the current time.
    #[must_use]
    pub fn new(status: PipelineStatus, run_id: Uuid) -> Self {
        Self {
            name: default_event_name(),
            status,
            run_id,
            timestamp: iso_timestamp(),
        }
    }
}
