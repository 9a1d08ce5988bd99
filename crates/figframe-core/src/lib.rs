//! Core types for the figframe layout engine.
//!
//! This crate provides the foundational types used across all other figframe crates:
//! - Size specifiers and the axes they apply to
//! - The panel tree and its validated mutation API
//! - Geometry value types for resolved boxes
//! - Error types

pub mod errors;
pub mod panel;
pub mod spec;
pub mod tree;
pub mod types;
mod validate;

pub use errors::*;
pub use panel::*;
pub use spec::*;
pub use tree::*;
pub use types::*;
