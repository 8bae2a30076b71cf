//! Test support: scripted clients and assertion helpers.
//!
//! These are compiled into the library so downstream crates (the server's
//! route tests in particular) can share them.

mod mocks;

pub use mocks::{MockDeliveryClient, MockGenerationClient};

use crate::core::PipelineStatus;
use crate::events::CollectingEventSink;

/// Asserts that the collected events carry exactly the expected statuses,
/// in order.
///
/// # Panics
///
/// Panics with both sequences when they differ.
pub fn assert_status_sequence(sink: &CollectingEventSink, expected: &[PipelineStatus]) {
    let actual = sink.statuses();
    assert_eq!(
        actual, expected,
        "status sequence mismatch: got {actual:?}, expected {expected:?}"
    );
}
