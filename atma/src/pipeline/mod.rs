//! The request pipeline: one linear run per validated request.
//!
//! A run walks the fixed stage sequence, broadcasting a status event at
//! every boundary. There is no retry, no queueing, and no cancellation of
//! a started run; the only timer is the delayed reset back to idle.

mod runner;
mod timing;

pub use runner::{PipelineReport, RequestPipeline};
pub use timing::PipelineTiming;
