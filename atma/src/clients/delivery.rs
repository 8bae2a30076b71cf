//! Client for the external email relay.

use crate::errors::DeliveryError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout() -> u64 {
    30
}

/// An email ready for handoff to the delivery transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundEmail {
    /// Recipient address.
    pub to: String,
    /// Subject line (the prompt snippet).
    pub subject: String,
    /// Message body (the generated text).
    pub body: String,
}

impl OutboundEmail {
    /// Creates a new outbound email.
    #[must_use]
    pub fn new(
        to: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }
}

/// Trait for email delivery transports.
///
/// An HTTP relay and a direct mail-transport session are interchangeable
/// behind this trait; the pipeline only sees success or failure, with no
/// delivery confirmation beyond that.
#[async_trait]
pub trait DeliveryClient: Send + Sync {
    /// Delivers the message, returning once the transport has accepted
    /// or rejected it.
    async fn deliver(&self, message: &OutboundEmail) -> Result<(), DeliveryError>;
}

/// Configuration for the EmailJS relay client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailJsConfig {
    /// Service identifier of the configured relay.
    pub service_id: String,
    /// Template identifier the relay renders.
    pub template_id: String,
    /// Public key, sent as `user_id`.
    pub public_key: String,
    /// Private key, sent as `accessToken`.
    pub private_key: String,
    /// Relay endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl EmailJsConfig {
    /// Creates a configuration with the default endpoint.
    #[must_use]
    pub fn new(
        service_id: impl Into<String>,
        template_id: impl Into<String>,
        public_key: impl Into<String>,
        private_key: impl Into<String>,
    ) -> Self {
        Self {
            service_id: service_id.into(),
            template_id: template_id.into(),
            public_key: public_key.into(),
            private_key: private_key.into(),
            endpoint: default_endpoint(),
            timeout_seconds: default_timeout(),
        }
    }

    /// Sets the relay endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }
}

/// EmailJS relay client.
///
/// Delivers via an HTTP POST to the relay's API rather than an SMTP
/// session, so blocked outbound mail ports do not matter.
#[derive(Debug, Clone)]
pub struct EmailJsClient {
    config: EmailJsConfig,
    http: reqwest::Client,
}

impl EmailJsClient {
    /// Creates a client from configuration.
    pub fn new(config: EmailJsConfig) -> Result<Self, DeliveryError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self { config, http })
    }
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    #[serde(rename = "accessToken")]
    access_token: &'a str,
    template_params: TemplateParams<'a>,
}

#[derive(Debug, Serialize)]
struct TemplateParams<'a> {
    to_email: &'a str,
    prompt: &'a str,
    ai_response: &'a str,
}

#[async_trait]
impl DeliveryClient for EmailJsClient {
    async fn deliver(&self, message: &OutboundEmail) -> Result<(), DeliveryError> {
        let body = SendRequest {
            service_id: &self.config.service_id,
            template_id: &self.config.template_id,
            user_id: &self.config.public_key,
            access_token: &self.config.private_key,
            template_params: TemplateParams {
                to_email: &message.to,
                prompt: &message.subject,
                ai_response: &message.body,
            },
        };

        let response = self
            .http
            .post(&self.config.endpoint)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}
