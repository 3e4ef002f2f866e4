//! Compiles a block graph into an executable [`Program`].
//!
//! The generator never fails. A block it cannot understand becomes a
//! [`Step::Fault`], and executing a program with a fault yields no actions at
//! all, so a single bad block can never produce a partial command list.

use crate::error::CompileError;
use crate::toolbox::{NUMBER_BLOCK, REPEAT_BLOCK};
use crate::workspace::{Block, WorkspaceDocument};
use ahash::AHashMap;
use tracing::debug;

pub mod parsing;
mod program;

pub use parsing::{BlockParser, ParseContext};
pub use program::{Program, Step};

use parsing::register_default_parsers;

pub const DEFAULT_NATIVE_LANG: &str = "vi";
pub const DEFAULT_FOREIGN_LANG: &str = "en";

/// A code generator bound to one robot model's vocabulary and one robot serial.
pub struct CodeGenerator {
    model_id: String,
    serial: String,
    prefix: String,
    context: ParseContext,
    registry: AHashMap<String, Box<dyn BlockParser>>,
}

pub struct CodeGeneratorBuilder {
    model_id: String,
    serial: String,
    context: ParseContext,
    registry: AHashMap<String, Box<dyn BlockParser>>,
}

impl CodeGeneratorBuilder {
    pub fn new(model_id: &str, serial: &str) -> Self {
        let mut registry: AHashMap<String, Box<dyn BlockParser>> = AHashMap::new();
        register_default_parsers(&mut registry);
        Self {
            model_id: model_id.to_string(),
            serial: serial.to_string(),
            context: ParseContext {
                native_lang: DEFAULT_NATIVE_LANG.to_string(),
                foreign_lang: DEFAULT_FOREIGN_LANG.to_string(),
            },
            registry,
        }
    }
    pub fn with_languages(mut self, native_lang: &str, foreign_lang: &str) -> Self {
        self.context.native_lang = native_lang.to_string();
        self.context.foreign_lang = foreign_lang.to_string();
        self
    }
    pub fn with_custom_parser(mut self, parser: Box<dyn BlockParser>) -> Self {
        self.registry.insert(parser.base_type().to_string(), parser);
        self
    }
    pub fn build(self) -> CodeGenerator {
        CodeGenerator {
            prefix: format!("{}.", self.model_id),
            model_id: self.model_id,
            serial: self.serial,
            context: self.context,
            registry: self.registry,
        }
    }
}

impl CodeGenerator {
    pub fn builder(model_id: &str, serial: &str) -> CodeGeneratorBuilder {
        CodeGeneratorBuilder::new(model_id, serial)
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn serial(&self) -> &str {
        &self.serial
    }

    /// Compiles every stack of `document`, in reading order, into one program.
    pub fn generate(&self, document: &WorkspaceDocument) -> Program {
        let steps: Vec<Step> = document
            .ordered_top_blocks()
            .into_iter()
            .flat_map(|block| self.compile_chain(block))
            .collect();
        let program = Program::new(&self.model_id, &self.serial, steps);

        debug!(
            model_id = %self.model_id,
            serial = %self.serial,
            blocks = document.block_count(),
            steps = program.step_count(),
            faults = program.has_faults(),
            "generated program"
        );
        program
    }

    fn compile_chain(&self, first: &Block) -> Vec<Step> {
        first
            .chain()
            .filter(|block| block.is_enabled())
            .filter_map(|block| match self.compile_block(block) {
                Ok(step) => step,
                Err(error) => Some(Step::Fault(error)),
            })
            .collect()
    }

    /// Value-only blocks outside an input produce nothing.
    fn compile_block(&self, block: &Block) -> Result<Option<Step>, CompileError> {
        match block.block_type.as_str() {
            REPEAT_BLOCK => {
                let times = match block.input("TIMES") {
                    Some(count) => self.number_value(count)?,
                    None => 0,
                };
                let body = block
                    .input("DO")
                    .map(|first| self.compile_chain(first))
                    .unwrap_or_default();
                Ok(Some(Step::Repeat { times, body }))
            }
            NUMBER_BLOCK => Ok(None),
            other => {
                let parser = other
                    .strip_prefix(self.prefix.as_str())
                    .and_then(|base| self.registry.get(base))
                    .ok_or_else(|| CompileError::UnknownBlockType {
                        block_id: block.id_or_type().to_string(),
                        type_name: other.to_string(),
                        model_id: self.model_id.clone(),
                    })?;
                parser.parse(block, &self.context).map(Some)
            }
        }
    }

    fn number_value(&self, block: &Block) -> Result<u32, CompileError> {
        if block.block_type != NUMBER_BLOCK {
            return Err(CompileError::InvalidRepeatCount {
                block_id: block.id_or_type().to_string(),
                message: format!("'{}' does not produce a number", block.block_type),
            });
        }
        let value = block.field("NUM").ok_or_else(|| CompileError::MissingField {
            block_id: block.id_or_type().to_string(),
            field: "NUM".to_string(),
        })?;
        parsing::count_from_value(block, value)
    }
}
