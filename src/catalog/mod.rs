//! Capability catalog data consumed by the schema builder.
//!
//! The catalog itself lives in an external service. This module only models
//! what the core reads from it: four collections of primitives per robot model.

pub mod conversion;
pub mod primitive;

pub use conversion::*;
pub use primitive::*;
