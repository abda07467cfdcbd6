//! Lit (workspace facade crate).
//!
//! Re-exports the workspace crates as `lit::{core,input,term,types}` and
//! carries the built-in level set shared by the binaries.

pub mod levels;

pub use lit_core as core;
pub use lit_input as input;
pub use lit_term as term;
pub use lit_types as types;
