//! `mdscope-core` provides the terminal UI primitives the mdscope viewer is
//! built from.
//!
//! Markdown parsing and layout live in `mdscope-markdown`; syntax highlighting
//! backends live in `mdscope-syntax`. This crate stays dependency-light so the
//! widgets can be reused and tested without a real terminal.
//!
//! ## Design goals
//!
//! - Event-loop agnostic: the application drives input and rendering.
//! - No async runtime: everything runs on the main thread; timers are
//!   deadline-checked by the caller's tick.
//! - Rendering targets a `ratatui` [`ratatui::buffer::Buffer`], so widget
//!   output can be asserted in tests without a backend.

pub mod help;
pub mod input;
pub mod keymap;
pub mod render;
pub mod scroll;
pub mod text;
pub mod textarea;
pub mod theme;
pub mod viewport;

#[cfg(feature = "crossterm")]
pub mod crossterm_input;
