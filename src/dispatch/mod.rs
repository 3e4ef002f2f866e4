//! Sends compiled action lists to robots through the command relay.
//!
//! Each call is one independent attempt: the whole action list goes out as a
//! single request, and whatever the relay answers is final. Nothing is retried.

mod relay;
mod wire;

pub use relay::{HttpRelay, RelayTransport};
pub use wire::{AckStatus, COMMAND_TYPE, CommandData, CommandEnvelope, RelayAck};

use crate::action::ActionCommand;
use tracing::{info, warn};

/// How a dispatch attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A connected robot client received the command.
    Sent { active_clients: Option<u64> },
    /// The relay could not deliver the command.
    Failed,
    /// The relay answered without a recognizable status.
    Indeterminate { status: Option<String> },
    /// The relay could not be reached or rejected the request.
    NetworkError(String),
    /// No serial was given, so nothing was sent.
    Unaddressed,
}

impl DispatchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DispatchOutcome::Sent { .. })
    }

    /// The status line shown to the user for this attempt.
    pub fn message(&self) -> String {
        match self {
            DispatchOutcome::Sent { .. } => "Program sent to the robot.".to_string(),
            DispatchOutcome::Failed => {
                "The robot did not receive the program. Is it switched on and connected?"
                    .to_string()
            }
            DispatchOutcome::Indeterminate { .. } => {
                "Could not confirm that the robot received the program.".to_string()
            }
            DispatchOutcome::NetworkError(_) => {
                "Could not reach the robot server. Please try again.".to_string()
            }
            DispatchOutcome::Unaddressed => "No robot is selected.".to_string(),
        }
    }
}

/// Posts action lists to a relay and interprets its acknowledgement.
pub struct Dispatcher<T: RelayTransport> {
    relay: T,
}

impl<T: RelayTransport> Dispatcher<T> {
    pub fn new(relay: T) -> Self {
        Self { relay }
    }

    pub fn relay(&self) -> &T {
        &self.relay
    }

    /// Sends `actions`, in order and unmodified, to the robot `serial`.
    pub async fn dispatch(&self, actions: &[ActionCommand], serial: &str) -> DispatchOutcome {
        if serial.trim().is_empty() {
            warn!("dispatch refused: no robot serial");
            return DispatchOutcome::Unaddressed;
        }

        let envelope = CommandEnvelope::new(actions);
        info!(serial, actions = actions.len(), "dispatching program");

        let ack = match self.relay.post_command(serial, &envelope).await {
            Ok(ack) => ack,
            Err(error) => {
                warn!(serial, %error, "relay unreachable");
                return DispatchOutcome::NetworkError(error.to_string());
            }
        };

        match ack.status() {
            AckStatus::Sent => {
                info!(serial, active_clients = ?ack.active_clients, "robot acknowledged program");
                DispatchOutcome::Sent {
                    active_clients: ack.active_clients,
                }
            }
            AckStatus::Failed => {
                warn!(serial, "relay could not deliver program");
                DispatchOutcome::Failed
            }
            AckStatus::Other(status) => {
                warn!(serial, status = ?status, "relay returned an unrecognized status");
                DispatchOutcome::Indeterminate { status }
            }
        }
    }
}
