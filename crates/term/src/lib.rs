//! Terminal renderer for light puzzles.
//!
//! Renders a [`lit_core::World`] into a simple framebuffer of styled cells and
//! flushes it to a terminal backend, diffing against the previous frame. No
//! widget or layout library is involved.
//!
//! Goals:
//! - Keep `core` deterministic and testable
//! - Shade the field from the same light queries the sensors use
//! - Allow precise control over aspect ratio (2 chars wide per field row)

pub mod fb;
pub mod renderer;
pub mod scene_view;

pub use lit_core as core;
pub use lit_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
pub use scene_view::{FieldLayout, HudView, SceneView, Viewport};
