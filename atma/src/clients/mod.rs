//! Clients wrapping the external generation and delivery services.
//!
//! Both services sit behind traits so the pipeline never sees more than
//! success or failure; concrete transports are configuration.

mod delivery;
mod generation;

pub use delivery::{DeliveryClient, EmailJsClient, EmailJsConfig, OutboundEmail};
pub use generation::{GeminiClient, GenerationClient, GenerationConfig, DEFAULT_MODEL};
