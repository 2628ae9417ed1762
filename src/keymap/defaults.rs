//! Default keybindings for the grid
//!
//! The shipped keymap.yaml is compiled in; a project-local keymap.yaml and the
//! user's config file are layered on top. Hardcoded bindings are the last resort.

use std::path::Path;

use super::binding::Keybinding;
use super::command::Command;
use super::config::{load_keymap_file, parse_keymap_yaml};
use super::context::Condition;
use super::types::{KeyCode, Keystroke, Modifiers};
use crate::config_paths;

/// Default keymap YAML embedded at compile time
const DEFAULT_KEYMAP_YAML: &str = include_str!("../../keymap.yaml");

pub fn get_default_keymap_yaml() -> &'static str {
    DEFAULT_KEYMAP_YAML
}

/// Load and merge keymaps: defaults + user overrides
///
/// Loading order (each layer overrides the previous):
/// 1. Embedded default keymap (compiled into binary)
/// 2. keymap.yaml in current directory (project-local overrides)
/// 3. User config at ~/.config/assetgrid/keymap.yaml
pub fn load_default_keymap() -> Vec<Keybinding> {
    let mut bindings = match parse_keymap_yaml(DEFAULT_KEYMAP_YAML) {
        Ok(b) => {
            tracing::info!("Loaded embedded default keymap ({} bindings)", b.len());
            b
        }
        Err(e) => {
            tracing::warn!("Failed to parse embedded keymap: {}, using hardcoded defaults", e);
            default_bindings()
        }
    };

    let local = Path::new("keymap.yaml");
    if local.exists() {
        match load_keymap_file(local) {
            Ok(local_bindings) => {
                tracing::info!("Merging project keymap.yaml ({} bindings)", local_bindings.len());
                bindings = merge_bindings(bindings, local_bindings);
            }
            Err(e) => tracing::warn!("Ignoring project keymap.yaml: {}", e),
        }
    }

    if let Some(user_path) = config_paths::keymap_file().filter(|p| p.exists()) {
        match load_keymap_file(&user_path) {
            Ok(user_bindings) => {
                tracing::info!(
                    "Merging user keymap from {} ({} bindings)",
                    user_path.display(),
                    user_bindings.len()
                );
                bindings = merge_bindings(bindings, user_bindings);
            }
            Err(e) => {
                tracing::warn!("Failed to load user keymap from {}: {}", user_path.display(), e);
            }
        }
    }

    bindings
}

/// Merge user bindings into base bindings
///
/// - `Unbound` removes every base binding for that keystroke
/// - same keystroke and conditions replaces the base binding
/// - anything else is appended
pub fn merge_bindings(base: Vec<Keybinding>, user: Vec<Keybinding>) -> Vec<Keybinding> {
    let mut result = base;

    for user_binding in user {
        if user_binding.command == Command::Unbound {
            result.retain(|b| b.keystroke != user_binding.keystroke);
            continue;
        }

        match result.iter().position(|b| b.overrides(&user_binding)) {
            Some(idx) => result[idx] = user_binding,
            None => result.push(user_binding),
        }
    }

    result
}

/// Hardcoded bindings matching the shipped keymap.yaml
pub fn default_bindings() -> Vec<Keybinding> {
    let cmd = Modifiers::cmd();
    let shift = Modifiers::SHIFT;
    let none = Modifiers::NONE;

    vec![
        bind(KeyCode::Up, none, Command::MoveUp),
        bind(KeyCode::Down, none, Command::MoveDown),
        bind(KeyCode::Left, none, Command::MoveLeft),
        bind(KeyCode::Right, none, Command::MoveRight),
        bind(KeyCode::Up, shift, Command::ExtendUp),
        bind(KeyCode::Down, shift, Command::ExtendDown),
        bind(KeyCode::Left, shift, Command::ExtendLeft),
        bind(KeyCode::Right, shift, Command::ExtendRight),
        bind(KeyCode::Tab, none, Command::NextCell),
        bind(KeyCode::Tab, shift, Command::PrevCell),
        bind(KeyCode::Enter, none, Command::NextRow).when(vec![Condition::MassEdit]),
        bind(KeyCode::Enter, none, Command::EnterMassEdit).when(vec![Condition::Browsing]),
        bind(KeyCode::Char('a'), cmd, Command::SelectAll),
        bind(KeyCode::Escape, none, Command::CollapseSelection)
            .when(vec![Condition::MassEdit, Condition::HasRange]),
        bind(KeyCode::Escape, none, Command::ExitMassEdit).when(vec![Condition::MassEdit]),
        bind(KeyCode::Delete, none, Command::ClearCells),
        bind(KeyCode::Backspace, none, Command::ClearCells),
        bind(KeyCode::Backspace, cmd, Command::DiscardSelected),
        bind(KeyCode::Backspace, cmd | shift, Command::DiscardAll),
        bind(KeyCode::Char('c'), cmd, Command::Copy),
        bind(KeyCode::Char('v'), cmd, Command::Paste),
        bind(KeyCode::Char('e'), cmd, Command::EnterMassEdit),
        bind(KeyCode::Char('s'), cmd, Command::Commit).when(vec![Condition::CommitIdle]),
        bind(KeyCode::Char('r'), cmd, Command::Refresh),
        bind(KeyCode::F(5), none, Command::Refresh),
    ]
}

fn bind(key: KeyCode, mods: Modifiers, command: Command) -> Keybinding {
    Keybinding::new(Keystroke::new(key, mods), command)
}
