use crate::action::ActionCommand;
use serde::{Deserialize, Serialize};

/// Envelope type the relay forwards to robot clients.
pub const COMMAND_TYPE: &str = "coding_block";

/// Request body posted to `/command/{serial}`.
#[derive(Debug, Clone, Serialize)]
pub struct CommandEnvelope<'a> {
    #[serde(rename = "type")]
    pub command_type: &'static str,
    pub data: CommandData<'a>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommandData<'a> {
    pub actions: &'a [ActionCommand],
}

impl<'a> CommandEnvelope<'a> {
    pub fn new(actions: &'a [ActionCommand]) -> Self {
        Self {
            command_type: COMMAND_TYPE,
            data: CommandData { actions },
        }
    }
}

/// The relay's synchronous acknowledgement. Every field is optional; a
/// missing `status` is reported as indeterminate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelayAck {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub command: Option<serde_json::Value>,
    #[serde(default)]
    pub active_clients: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AckStatus {
    /// A connected robot client received the command.
    Sent,
    /// The relay accepted the request but could not deliver it.
    Failed,
    /// Anything else, including no status at all.
    Other(Option<String>),
}

impl RelayAck {
    pub fn status(&self) -> AckStatus {
        match self.status.as_deref() {
            Some("sent") => AckStatus::Sent,
            Some("failed") => AckStatus::Failed,
            other => AckStatus::Other(other.map(str::to_string)),
        }
    }
}
