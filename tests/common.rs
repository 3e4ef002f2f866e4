//! Common test utilities for building catalogs, workspaces and relays.
use async_trait::async_trait;
use blockbot::dispatch::CommandEnvelope;
use blockbot::workspace::BlockConnection;
use blockbot::prelude::*;
use std::sync::Mutex;

pub const MODEL: &str = "alpha";
pub const SERIAL: &str = "R-001";

/// A catalog with one entry in every category except skills.
#[allow(dead_code)]
pub fn create_catalog() -> Catalog {
    Catalog {
        actions: vec![Primitive::new("Wave", "wave"), Primitive::new("Bow", "bow")],
        extended_actions: vec![Primitive::new("Dance", "dance_1")],
        expressions: vec![Primitive::new("Smile", "smile")],
        skills: vec![],
    }
}

/// One `action` block (wave) followed by one `speak_native` block (Hello).
#[allow(dead_code)]
pub const TWO_ACTION_WORKSPACE_JSON: &str = r#"{
    "blocks": {
        "languageVersion": 0,
        "blocks": [
            {
                "type": "alpha.action",
                "id": "b1",
                "x": 20,
                "y": 20,
                "fields": { "ACTION": "wave", "TIMES": 1 },
                "next": {
                    "block": {
                        "type": "alpha.speak_native",
                        "id": "b2",
                        "fields": { "TEXT": "Hello" }
                    }
                }
            }
        ]
    },
    "variables": [{ "name": "count", "id": "v1" }]
}"#;

/// A chain of three blocks whose second block belongs to another robot model.
#[allow(dead_code)]
pub const FOREIGN_BLOCK_WORKSPACE_JSON: &str = r#"{
    "blocks": {
        "languageVersion": 0,
        "blocks": [
            {
                "type": "alpha.action",
                "id": "a",
                "fields": { "ACTION": "wave" },
                "next": { "block": {
                    "type": "beta.action",
                    "id": "b",
                    "fields": { "ACTION": "jump" },
                    "next": { "block": {
                        "type": "alpha.expression",
                        "id": "c",
                        "fields": { "EXPRESSION": "smile" }
                    } }
                } }
            }
        ]
    }
}"#;

#[allow(dead_code)]
pub fn action(code: &str) -> Block {
    Block::new(format!("{}.action", MODEL)).with_field("ACTION", code)
}

#[allow(dead_code)]
pub fn speak(text: &str) -> Block {
    Block::new(format!("{}.speak_native", MODEL)).with_field("TEXT", text)
}

/// `len` action blocks (`a0`, `a1`, ...) linked through `next`, built from the
/// tail up.
#[allow(dead_code)]
pub fn action_chain(len: usize) -> Block {
    let last = action(&format!("a{}", len.saturating_sub(1)));
    (0..len.saturating_sub(1)).rev().fold(last, |tail, i| {
        let mut block = action(&format!("a{}", i));
        block.next = Some(BlockConnection {
            block: Some(Box::new(tail)),
            shadow: None,
        });
        block
    })
}

/// A workspace holding a single stack.
#[allow(dead_code)]
pub fn workspace_with(stack: Block) -> Workspace {
    let mut workspace = Workspace::new();
    workspace.add_block(stack);
    workspace
}

#[allow(dead_code)]
pub fn compile(workspace: &Workspace) -> CompiledProgramResult {
    let generator = workspace.bind_generator(MODEL, SERIAL);
    Executor::default().run(&generator.generate(&workspace.serialize()))
}

#[allow(dead_code)]
pub fn sent_ack(active_clients: u64) -> RelayAck {
    RelayAck {
        status: Some("sent".to_string()),
        to: Some(SERIAL.to_string()),
        command: None,
        active_clients: Some(active_clients),
    }
}

/// A relay that records every request and answers with a fixed reply.
#[allow(dead_code)]
pub struct RecordingRelay {
    reply: Option<RelayAck>,
    pub calls: Mutex<Vec<(String, serde_json::Value)>>,
}

#[allow(dead_code)]
impl RecordingRelay {
    pub fn replying(ack: RelayAck) -> Self {
        Self {
            reply: Some(ack),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A relay that is unreachable.
    pub fn offline() -> Self {
        Self {
            reply: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl RelayTransport for RecordingRelay {
    async fn post_command(
        &self,
        serial: &str,
        envelope: &CommandEnvelope<'_>,
    ) -> std::result::Result<RelayAck, DispatchError> {
        self.calls
            .lock()
            .unwrap()
            .push((serial.to_string(), serde_json::to_value(envelope).unwrap()));
        self.reply.clone().ok_or(DispatchError::HttpStatus(503))
    }
}
