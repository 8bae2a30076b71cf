//! Incoming process request and its validation.

use crate::errors::ValidationError;
use serde::{Deserialize, Serialize};

/// How much of the prompt is carried into the email subject line.
const SUBJECT_SNIPPET_CHARS: usize = 30;

/// A prompt-and-recipient pair submitted for one pipeline run.
///
/// Requests are not persisted; the struct is dropped when the run ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessRequest {
    /// The prompt forwarded to the generation service. A missing field
    /// deserializes to empty and is rejected by [`ProcessRequest::validate`].
    #[serde(default)]
    pub prompt: String,
    /// Recipient address for the generated response.
    #[serde(default)]
    pub email: String,
}

impl ProcessRequest {
    /// Creates a new process request.
    #[must_use]
    pub fn new(prompt: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            email: email.into(),
        }
    }

    /// Rejects requests with a blank prompt or email.
    ///
    /// Validation happens before any status event is broadcast, so a
    /// rejected request leaves no trace on the notifier channel.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.prompt.trim().is_empty() || self.email.trim().is_empty() {
            return Err(ValidationError::missing_fields());
        }
        Ok(())
    }

    /// Derives the subject line shown to the recipient: the leading
    /// prompt characters with a trailing ellipsis.
    #[must_use]
    pub fn subject_snippet(&self) -> String {
        let mut snippet: String = self.prompt.chars().take(SUBJECT_SNIPPET_CHARS).collect();
        snippet.push_str("...");
        snippet
    }
}
