//! Shared server state.

use atma::events::StatusChannel;
use atma::pipeline::RequestPipeline;
use std::sync::Arc;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// The one pipeline instance all requests run through.
    pub pipeline: Arc<RequestPipeline>,
    /// Broadcast channel viewer connections subscribe to.
    pub channel: Arc<StatusChannel>,
}
