//! Pipeline status enum.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The stage the request pipeline is currently in.
///
/// This is the payload of every broadcast status event. Only the current
/// value matters to observers; no history is kept, and a newly connected
/// viewer sees events from this point forward only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStatus {
    /// No run in progress. Also the state broadcast after any failure.
    Idle,
    /// The generation client is synthesizing a completion.
    AiProcessing,
    /// Generated text is in transit to the delivery stage.
    AiTransfer,
    /// The delivery client is relaying the email.
    EmailProcessing,
    /// The email is in transit to the recipient.
    EmailTransfer,
    /// The run finished and the response was delivered.
    Success,
}

impl Default for PipelineStatus {
    fn default() -> Self {
        Self::Idle
    }
}

impl fmt::Display for PipelineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PipelineStatus {
    /// The snake_case wire name of this status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::AiProcessing => "ai_processing",
            Self::AiTransfer => "ai_transfer",
            Self::EmailProcessing => "email_processing",
            Self::EmailTransfer => "email_transfer",
            Self::Success => "success",
        }
    }

    /// Returns true if no run is in progress.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Returns true once the generation stage has finished for the
    /// current run.
    #[must_use]
    pub fn generation_complete(&self) -> bool {
        matches!(
            self,
            Self::AiTransfer | Self::EmailProcessing | Self::EmailTransfer | Self::Success
        )
    }

    /// Returns true once the delivery stage has finished for the
    /// current run.
    #[must_use]
    pub fn delivery_complete(&self) -> bool {
        matches!(self, Self::EmailTransfer | Self::Success)
    }
}
