//! Configurable keyboard mapping system
//!
//! This module provides a data-driven keybinding system that:
//! - Maps keystrokes to grid commands
//! - Supports platform-specific modifier handling (Cmd on macOS, Ctrl elsewhere)
//! - Picks between bindings on the same key using grid state (`when:` conditions)
//! - Enables user customization via YAML config files
//!
//! # Architecture
//!
//! ```text
//! Keystroke + KeyContext → Keymap::handle_keystroke() → Command → Vec<Msg>
//! ```
//!
//! A keystroke with no binding that types a printable character becomes a
//! `GridMsg::TypeChar` in the runtime.

mod binding;
mod command;
mod config;
mod context;
mod defaults;
#[allow(clippy::module_inception)]
mod keymap;
mod types;

pub use binding::Keybinding;
pub use command::Command;
pub use config::{load_keymap_file, parse_keymap_yaml, KeymapError};
pub use context::{Condition, KeyContext};
pub use defaults::{
    default_bindings, get_default_keymap_yaml, load_default_keymap, merge_bindings,
};
pub use keymap::{KeyAction, Keymap};
pub use types::{KeyCode, Keystroke, Modifiers};
