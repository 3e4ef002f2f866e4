//! # Blockbot - Block Program Compiler and Robot Command Dispatch
//!
//! **Blockbot** turns block-based programs assembled in a visual editor into
//! ordered robot command lists, and relays them to a physical robot addressed
//! by its serial number.
//!
//! ## Core Workflow
//!
//! 1.  **Describe the robot**: Load the robot model's [`catalog::Catalog`] (its actions,
//!     expressions, extended actions and skills).
//! 2.  **Build the vocabulary**: [`schema::build_schema`] produces the model's namespaced
//!     block definitions and [`toolbox::toolbox_for_model`] the matching palette.
//! 3.  **Compile**: Bind a [`compiler::CodeGenerator`] to the model and serial, and
//!     generate a [`compiler::Program`] from the serialized workspace.
//! 4.  **Execute**: [`executor::Executor::run`] evaluates the program into an action list.
//!     Any fault yields an empty, failed result, never a partial list.
//! 5.  **Dispatch**: [`dispatch::Dispatcher::dispatch`] posts the list to the relay and
//!     reports the robot's acknowledgement.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use blockbot::prelude::*;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let catalog = Catalog {
//!         actions: vec![Primitive::new("Wave", "wave")],
//!         ..Catalog::default()
//!     };
//!     let schema = build_schema("alpha", &catalog);
//!     println!("{} block types", schema.len());
//!
//!     let mut workspace = Workspace::new();
//!     workspace.add_block(
//!         Block::new("alpha.action")
//!             .with_field("ACTION", "wave")
//!             .then(Block::new("alpha.speak_native").with_field("TEXT", "Hello")),
//!     );
//!
//!     let generator = workspace.bind_generator("alpha", "R-001");
//!     let program = generator.generate(&workspace.serialize());
//!     let result = Executor::default().run(&program);
//!     assert!(result.success);
//!
//!     let relay = HttpRelay::new("http://localhost:8000", Duration::from_secs(10))?;
//!     let outcome = Dispatcher::new(relay).dispatch(&result.actions, "R-001").await;
//!     println!("{}", outcome.message());
//!     Ok(())
//! }
//! ```

pub mod action;
pub mod catalog;
pub mod compiler;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod executor;
pub mod prelude;
pub mod schema;
pub mod session;
pub mod store;
pub mod toolbox;
pub mod workspace;
