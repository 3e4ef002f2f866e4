//! The live block graph and its persisted form.

mod document;

pub use document::*;

use crate::compiler::CodeGenerator;
use serde_json::{Map, Value};
use tracing::debug;

/// Owns the block graph currently being edited.
///
/// The controller does not track which robot it is editing for; callers bind a
/// fresh [`CodeGenerator`] whenever the model or serial changes.
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    language_version: u32,
    top_blocks: Vec<Block>,
    extra: Map<String, Value>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Captures the full graph. An empty workspace serializes to `{}`.
    pub fn serialize(&self) -> WorkspaceDocument {
        let blocks = (!self.top_blocks.is_empty()).then(|| BlockStacks {
            language_version: self.language_version,
            blocks: self.top_blocks.clone(),
        });
        WorkspaceDocument {
            blocks,
            extra: self.extra.clone(),
        }
    }

    /// Replaces the graph with `document`. Loading `{}` clears the workspace.
    pub fn load(&mut self, document: WorkspaceDocument) {
        let WorkspaceDocument { blocks, extra } = document;
        let stacks = blocks.unwrap_or_default();
        self.language_version = stacks.language_version;
        self.top_blocks = stacks.blocks;
        self.extra = extra;
        debug!(top_blocks = self.top_blocks.len(), "loaded workspace");
    }

    pub fn clear(&mut self) {
        self.load(WorkspaceDocument::default());
    }

    /// Places a new top-level stack.
    pub fn add_block(&mut self, block: Block) {
        self.top_blocks.push(block);
    }

    pub fn top_blocks(&self) -> &[Block] {
        &self.top_blocks
    }

    pub fn is_empty(&self) -> bool {
        self.top_blocks.is_empty()
    }

    /// A code generator for `model_id`'s vocabulary, addressed to `serial`.
    pub fn bind_generator(&self, model_id: &str, serial: &str) -> CodeGenerator {
        CodeGenerator::builder(model_id, serial).build()
    }
}
