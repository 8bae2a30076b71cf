//! Scripted generation and delivery clients.

use crate::clients::{DeliveryClient, GenerationClient, OutboundEmail};
use crate::errors::{DeliveryError, GenerationError};
use async_trait::async_trait;
use parking_lot::Mutex;

/// A generation client that returns a scripted completion or failure and
/// records every prompt it is asked for.
#[derive(Debug)]
pub struct MockGenerationClient {
    outcome: Mutex<Result<String, String>>,
    prompts: Mutex<Vec<String>>,
}

impl MockGenerationClient {
    /// Creates a mock that completes with the given text.
    #[must_use]
    pub fn completing(text: impl Into<String>) -> Self {
        Self {
            outcome: Mutex::new(Ok(text.into())),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Creates a mock that fails with a service rejection.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Mutex::new(Err(message.into())),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Replaces the scripted outcome with a completion.
    pub fn set_completion(&self, text: impl Into<String>) {
        *self.outcome.lock() = Ok(text.into());
    }

    /// Replaces the scripted outcome with a failure.
    pub fn set_failure(&self, message: impl Into<String>) {
        *self.outcome.lock() = Err(message.into());
    }

    /// Returns the number of times the client was invoked.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.prompts.lock().len()
    }

    /// Returns the prompts from each invocation.
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl GenerationClient for MockGenerationClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts.lock().push(prompt.to_string());
        match &*self.outcome.lock() {
            Ok(text) => Ok(text.clone()),
            Err(message) => Err(GenerationError::Service {
                status: 503,
                message: message.clone(),
            }),
        }
    }
}

/// A delivery client that accepts or rejects every message and records
/// what it is asked to send.
#[derive(Debug, Default)]
pub struct MockDeliveryClient {
    rejection: Mutex<Option<String>>,
    sent: Mutex<Vec<OutboundEmail>>,
}

impl MockDeliveryClient {
    /// Creates a mock that accepts every message.
    #[must_use]
    pub fn accepting() -> Self {
        Self::default()
    }

    /// Creates a mock that rejects every message.
    #[must_use]
    pub fn rejecting(body: impl Into<String>) -> Self {
        Self {
            rejection: Mutex::new(Some(body.into())),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Switches the mock to accepting.
    pub fn set_accepting(&self) {
        *self.rejection.lock() = None;
    }

    /// Switches the mock to rejecting.
    pub fn set_rejecting(&self, body: impl Into<String>) {
        *self.rejection.lock() = Some(body.into());
    }

    /// Returns the number of times the client was invoked.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.sent.lock().len()
    }

    /// Returns every message the client was asked to deliver.
    #[must_use]
    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl DeliveryClient for MockDeliveryClient {
    async fn deliver(&self, message: &OutboundEmail) -> Result<(), DeliveryError> {
        self.sent.lock().push(message.clone());
        match &*self.rejection.lock() {
            None => Ok(()),
            Some(body) => Err(DeliveryError::Rejected {
                status: 500,
                body: body.clone(),
            }),
        }
    }
}
