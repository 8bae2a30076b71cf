//! Named pacing parameters for the pipeline.

use serde::{Deserialize, Serialize};
use std::time::Duration;

fn default_transfer_pause() -> u64 {
    1500
}

fn default_idle_reset() -> u64 {
    5000
}

/// Pacing for the visual stage transitions.
///
/// These delays exist purely so the status display can animate the
/// transfer between nodes; they carry no functional requirement. Headless
/// consumers (and the test suites) zero them with [`PipelineTiming::immediate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineTiming {
    /// Pause after each transfer broadcast, in milliseconds.
    #[serde(default = "default_transfer_pause")]
    pub transfer_pause_ms: u64,
    /// Delay between the success broadcast and the idle reset, in
    /// milliseconds.
    #[serde(default = "default_idle_reset")]
    pub idle_reset_ms: u64,
}

impl Default for PipelineTiming {
    fn default() -> Self {
        Self {
            transfer_pause_ms: default_transfer_pause(),
            idle_reset_ms: default_idle_reset(),
        }
    }
}

impl PipelineTiming {
    /// Creates the default pacing (1.5 s transfers, 5 s idle reset).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero pacing for tests and non-visual consumers.
    #[must_use]
    pub fn immediate() -> Self {
        Self {
            transfer_pause_ms: 0,
            idle_reset_ms: 0,
        }
    }

    /// Sets the transfer pause.
    #[must_use]
    pub fn with_transfer_pause_ms(mut self, ms: u64) -> Self {
        self.transfer_pause_ms = ms;
        self
    }

    /// Sets the idle-reset delay.
    #[must_use]
    pub fn with_idle_reset_ms(mut self, ms: u64) -> Self {
        self.idle_reset_ms = ms;
        self
    }

    /// The transfer pause as a [`Duration`].
    #[must_use]
    pub fn transfer_pause(&self) -> Duration {
        Duration::from_millis(self.transfer_pause_ms)
    }

    /// The idle-reset delay as a [`Duration`].
    #[must_use]
    pub fn idle_reset(&self) -> Duration {
        Duration::from_millis(self.idle_reset_ms)
    }
}
