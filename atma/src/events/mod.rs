//! Status event emission and broadcasting.
//!
//! The pipeline emits through the [`EventSink`] seam; the server wires
//! that seam to a [`StatusChannel`] so every open viewer connection
//! receives a copy of each event, and tests wire it to a
//! [`CollectingEventSink`] to observe the sequence.

mod channel;
mod sink;

pub use channel::StatusChannel;
pub use sink::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};
