//! Error types for the relay.
//!
//! Three failure classes reach the caller: invalid input, a generation
//! failure, and a delivery failure. All of them are logged at the
//! pipeline boundary and collapsed to a short user-facing string there;
//! nothing is retried.

use thiserror::Error;

/// The main error type for pipeline operations.
#[derive(Debug, Error)]
pub enum AtmaError {
    /// The incoming request failed validation.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The text-generation service call failed.
    #[error("{0}")]
    Generation(#[from] GenerationError),

    /// The email delivery call failed.
    #[error("{0}")]
    Delivery(#[from] DeliveryError),

    /// Configuration was missing or malformed.
    #[error("{0}")]
    Config(#[from] ConfigError),
}

impl AtmaError {
    /// Returns true if the error is the caller's fault rather than an
    /// upstream failure.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Error raised when a request is missing required input.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// The user-facing message.
    pub message: String,
}

impl ValidationError {
    /// Creates a new validation error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The rejection for a blank prompt or email.
    #[must_use]
    pub fn missing_fields() -> Self {
        Self::new("Prompt and email required")
    }
}

/// Errors from the external text-generation service.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The HTTP call itself failed (connect, DNS, timeout).
    #[error("generation transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("generation service rejected the prompt ({status}): {message}")]
    Service {
        /// HTTP status code returned by the service.
        status: u16,
        /// Response body, as far as it could be read.
        message: String,
    },

    /// The service returned a well-formed response with no completion.
    #[error("generation service returned no completion")]
    EmptyCompletion,
}

/// Errors from the external email transport.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The HTTP call itself failed (connect, DNS, timeout).
    #[error("delivery transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The relay answered with a non-success status.
    #[error("email relay rejected the message ({status}): {body}")]
    Rejected {
        /// HTTP status code returned by the relay.
        status: u16,
        /// Response body, as far as it could be read.
        body: String,
    },
}

/// Error raised when required configuration is absent or malformed.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("missing required environment variable: {name}")]
    MissingVar {
        /// The variable name.
        name: String,
    },

    /// A variable was present but could not be parsed.
    #[error("invalid value for {name}: {reason}")]
    InvalidVar {
        /// The variable name.
        name: String,
        /// Why the value was rejected.
        reason: String,
    },
}

impl ConfigError {
    /// Creates a missing-variable error.
    #[must_use]
    pub fn missing(name: impl Into<String>) -> Self {
        Self::MissingVar { name: name.into() }
    }

    /// Creates an invalid-value error.
    #[must_use]
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidVar {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
