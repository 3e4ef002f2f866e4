//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and functions of the
//! blockbot crate.
//!
//! # Example
//!
//! ```rust
//! use blockbot::prelude::*;
//!
//! let mut workspace = Workspace::new();
//! workspace.add_block(Block::new("alpha.action").with_field("ACTION", "wave"));
//!
//! let generator = workspace.bind_generator("alpha", "R-001");
//! let result = Executor::default().run(&generator.generate(&workspace.serialize()));
//! assert_eq!(result.actions, vec![ActionCommand::with_code("action", "wave")]);
//! ```

// Vocabulary
pub use crate::catalog::{Catalog, IntoCatalog, Primitive};
pub use crate::schema::{BaseType, BlockArg, BlockTypeDefinition, build_schema};
pub use crate::toolbox::{ToolboxDefinition, ToolboxItem, default_toolbox, toolbox_for_model};

// Programs
pub use crate::action::ActionCommand;
pub use crate::compiler::{CodeGenerator, Program, Step};
pub use crate::executor::{CompiledProgramResult, Executor};
pub use crate::workspace::{Block, Workspace, WorkspaceDocument};

// Dispatch
pub use crate::dispatch::{DispatchOutcome, Dispatcher, HttpRelay, RelayAck, RelayTransport};

// Sessions and persistence
pub use crate::config::Settings;
pub use crate::session::{RobotSelection, RunOutcome, Session};
pub use crate::store::{FileStore, MemoryStore, ProgramStore};

// Error types
pub use crate::error::{
    CompileError, ConfigError, DispatchError, ExecutionError, SessionError, StoreError,
};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
