//! Passive status display: a derived view of the broadcast status.
//!
//! The display holds no state machine of its own. Each node's visual
//! state is a pure function of the most recently received status, so a
//! viewer only ever stores one value.

use crate::core::{PipelineStatus, StatusEvent};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// The three fixed nodes of the status board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardNode {
    /// The generation stage (AI synthesis).
    Generation,
    /// The delivery stage (email relay).
    Delivery,
    /// The final transmission confirmation.
    Transmission,
}

/// Visual state of a board node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeState {
    /// Waiting for work.
    Standby,
    /// Currently working (or, for the transmission node, celebrating).
    Active,
    /// Finished for the current run.
    Complete,
}

impl BoardNode {
    /// Derives this node's visual state from the current status.
    #[must_use]
    pub fn state(self, status: PipelineStatus) -> NodeState {
        match self {
            Self::Generation => {
                if status == PipelineStatus::AiProcessing {
                    NodeState::Active
                } else if status.generation_complete() {
                    NodeState::Complete
                } else {
                    NodeState::Standby
                }
            }
            Self::Delivery => {
                if status == PipelineStatus::EmailProcessing {
                    NodeState::Active
                } else if status.delivery_complete() {
                    NodeState::Complete
                } else {
                    NodeState::Standby
                }
            }
            // The transmission node lights up on success and never
            // reports "complete"; the next event it sees is the reset.
            Self::Transmission => {
                if status == PipelineStatus::Success {
                    NodeState::Active
                } else {
                    NodeState::Standby
                }
            }
        }
    }
}

/// The connectors between adjacent board nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardConnector {
    /// Generation → delivery.
    GenerationToDelivery,
    /// Delivery → transmission.
    DeliveryToTransmission,
}

impl BoardConnector {
    /// Whether data is visually flowing through this connector.
    #[must_use]
    pub fn is_flowing(self, status: PipelineStatus) -> bool {
        match self {
            Self::GenerationToDelivery => status == PipelineStatus::AiTransfer,
            Self::DeliveryToTransmission => status == PipelineStatus::EmailTransfer,
        }
    }
}

/// A viewer-side board holding only the most recent status.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusBoard {
    current: PipelineStatus,
}

impl StatusBoard {
    /// Creates a board in the idle state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The status the board currently reflects.
    #[must_use]
    pub fn current(&self) -> PipelineStatus {
        self.current
    }

    /// Applies one incoming event, keeping only its status.
    pub fn apply(&mut self, event: &StatusEvent) {
        self.current = event.status;
    }

    /// This board's state for the given node.
    #[must_use]
    pub fn node_state(&self, node: BoardNode) -> NodeState {
        node.state(self.current)
    }

    /// Consumes events from a viewer subscription until the channel
    /// closes, keeping the board in sync. A lagged receiver skips ahead
    /// to the newest events; only the latest value matters anyway.
    pub async fn follow(&mut self, rx: &mut broadcast::Receiver<StatusEvent>) {
        loop {
            match rx.recv().await {
                Ok(event) => self.apply(&event),
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }
}
