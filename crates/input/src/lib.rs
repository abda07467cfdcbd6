//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`crate::types::PlayerAction`] and turns
//! keys and mouse events into one [`lit_core::PlayerInput`] per frame. Held
//! cursor keys repeat with DAS/ARR, including on terminals without
//! key-release events.

pub mod handler;
pub mod map;

pub use lit_core as core;
pub use lit_types as types;

pub use handler::InputHandler;
pub use map::{handle_key_event, should_quit};
