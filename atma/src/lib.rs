//! # Atma
//!
//! Atma relays a text prompt through an external generative-language
//! service and emails the completion back to the requester, broadcasting
//! coarse-grained pipeline status to every connected viewer along the way.
//!
//! The crate provides:
//!
//! - **Status broadcasting**: a notifier channel that fans status events
//!   out to all current viewer connections, with no delivery guarantee
//! - **External clients**: thin wrappers around the text-generation and
//!   email-relay services, pluggable behind traits
//! - **Request pipeline**: the linear validate → generate → deliver run
//!   that emits a status event at every stage boundary
//! - **Status display**: a derived three-node view of the current status
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use atma::prelude::*;
//!
//! let channel = Arc::new(StatusChannel::default());
//! let pipeline = RequestPipeline::new(
//!     Arc::new(GeminiClient::new(generation_config)?),
//!     Arc::new(EmailJsClient::new(delivery_config)?),
//!     channel.clone(),
//!     PipelineTiming::default(),
//! );
//!
//! let report = pipeline.handle_request(request).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod clients;
pub mod config;
pub mod core;
pub mod display;
pub mod errors;
pub mod events;
pub mod pipeline;
pub mod testing;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::clients::{
        DeliveryClient, EmailJsClient, EmailJsConfig, GeminiClient,
        GenerationClient, GenerationConfig, OutboundEmail,
    };
    pub use crate::config::AtmaConfig;
    pub use crate::core::{PipelineStatus, ProcessRequest, StatusEvent};
    pub use crate::display::{BoardConnector, BoardNode, NodeState, StatusBoard};
    pub use crate::errors::{
        AtmaError, ConfigError, DeliveryError, GenerationError, ValidationError,
    };
    pub use crate::events::{
        CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink,
        StatusChannel,
    };
    pub use crate::pipeline::{PipelineReport, PipelineTiming, RequestPipeline};
    pub use crate::utils::{generate_uuid, iso_timestamp};
}
