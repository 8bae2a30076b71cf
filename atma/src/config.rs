//! Environment-sourced configuration.
//!
//! Everything the process needs arrives through environment variables
//! (loaded from a `.env` file by the server binary before this module
//! runs). Lookup is injectable so tests never touch the process
//! environment.

use crate::clients::{EmailJsConfig, GenerationConfig};
use crate::errors::ConfigError;
use crate::pipeline::PipelineTiming;

/// Default listening port.
const DEFAULT_PORT: u16 = 5001;

/// Full runtime configuration.
#[derive(Debug, Clone)]
pub struct AtmaConfig {
    /// TCP port the HTTP server listens on.
    pub port: u16,
    /// Origins allowed by the CORS layer.
    pub allowed_origins: Vec<String>,
    /// Generation client settings.
    pub generation: GenerationConfig,
    /// Delivery client settings.
    pub delivery: EmailJsConfig,
    /// Pipeline pacing.
    pub timing: PipelineTiming,
}

impl AtmaConfig {
    /// Loads configuration from the process environment.
    ///
    /// Recognized variables: `GEMINI_API_KEY` (required), `GEMINI_MODEL`,
    /// `EMAILJS_SERVICE_ID` / `EMAILJS_TEMPLATE_ID` / `EMAILJS_PUBLIC_KEY`
    /// / `EMAILJS_PRIVATE_KEY` (required), `PORT`, `ALLOWED_ORIGINS`
    /// (comma-separated), `TRANSFER_PAUSE_MS`, `IDLE_RESET_MS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through an injectable variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            None => DEFAULT_PORT,
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::invalid("PORT", format!("not a port number: {raw}")))?,
        };

        let allowed_origins = lookup("ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let mut generation = GenerationConfig::new(require(&lookup, "GEMINI_API_KEY")?);
        if let Some(model) = lookup("GEMINI_MODEL") {
            generation = generation.with_model(model);
        }

        let delivery = EmailJsConfig::new(
            require(&lookup, "EMAILJS_SERVICE_ID")?,
            require(&lookup, "EMAILJS_TEMPLATE_ID")?,
            require(&lookup, "EMAILJS_PUBLIC_KEY")?,
            require(&lookup, "EMAILJS_PRIVATE_KEY")?,
        );

        let mut timing = PipelineTiming::default();
        if let Some(raw) = lookup("TRANSFER_PAUSE_MS") {
            timing.transfer_pause_ms = parse_millis("TRANSFER_PAUSE_MS", &raw)?;
        }
        if let Some(raw) = lookup("IDLE_RESET_MS") {
            timing.idle_reset_ms = parse_millis("IDLE_RESET_MS", &raw)?;
        }

        Ok(Self {
            port,
            allowed_origins,
            generation,
            delivery,
            timing,
        })
    }
}

fn require<F>(lookup: &F, name: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| ConfigError::missing(name))
}

fn parse_millis(name: &str, raw: &str) -> Result<u64, ConfigError> {
    raw.parse()
        .map_err(|_| ConfigError::invalid(name, format!("not a millisecond count: {raw}")))
}
