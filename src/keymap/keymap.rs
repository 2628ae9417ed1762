//! Keymap struct for storing and looking up keybindings

use std::collections::HashMap;

use super::binding::Keybinding;
use super::command::Command;
use super::context::{Condition, KeyContext};
use super::types::Keystroke;

/// Result of handling a keystroke
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Execute this command
    Execute(Command),
    /// No binding matches this keystroke
    NoMatch,
}

/// The keymap stores all keybindings and handles lookup
#[derive(Debug, Clone, Default)]
pub struct Keymap {
    bindings: Vec<Keybinding>,
    /// Indices into `bindings`; one keystroke may carry several conditional bindings
    lookup: HashMap<Keystroke, Vec<usize>>,
}

impl Keymap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a keymap with the given bindings
    pub fn with_bindings(bindings: Vec<Keybinding>) -> Self {
        let mut keymap = Self::new();
        for binding in bindings {
            keymap.add_binding(binding);
        }
        keymap
    }

    pub fn add_binding(&mut self, binding: Keybinding) {
        let idx = self.bindings.len();
        self.lookup.entry(binding.keystroke).or_default().push(idx);
        self.bindings.push(binding);
    }

    /// Resolve a keystroke against the current grid context
    ///
    /// Bindings with conditions are checked before unconditional ones; within
    /// each group the first registered binding wins. Passing `None` as the
    /// context only considers unconditional bindings.
    pub fn handle_keystroke(
        &self,
        keystroke: Keystroke,
        context: Option<&KeyContext>,
    ) -> KeyAction {
        match self.lookup_with_context(&keystroke, context) {
            Some(Command::Unbound) | None => KeyAction::NoMatch,
            Some(command) => KeyAction::Execute(command),
        }
    }

    /// Look up a keystroke, ignoring conditional bindings
    pub fn lookup(&self, keystroke: &Keystroke) -> Option<Command> {
        self.lookup_with_context(keystroke, None)
    }

    pub fn lookup_with_context(
        &self,
        keystroke: &Keystroke,
        context: Option<&KeyContext>,
    ) -> Option<Command> {
        let indices = self.lookup.get(keystroke)?;

        let conditional = indices.iter().map(|&i| &self.bindings[i]).find(|b| {
            match (&b.when, context) {
                (Some(conditions), Some(ctx)) => Condition::evaluate_all(conditions, ctx),
                _ => false,
            }
        });

        conditional
            .or_else(|| {
                indices
                    .iter()
                    .map(|&i| &self.bindings[i])
                    .find(|b| b.when.is_none())
            })
            .map(|b| b.command)
    }

    pub fn bindings(&self) -> &[Keybinding] {
        &self.bindings
    }

    /// Get the keybinding for a command (first match)
    pub fn binding_for(&self, command: Command) -> Option<&Keybinding> {
        self.bindings.iter().find(|b| b.command == command)
    }

    /// Get display string for a command's keybinding
    pub fn display_for(&self, command: Command) -> Option<String> {
        self.binding_for(command).map(|b| b.display_string())
    }
}
