//! Keybinding struct representing a mapping from a keystroke to a command

use super::command::Command;
use super::context::Condition;
use super::types::Keystroke;

/// A single keybinding mapping a keystroke to a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keybinding {
    pub keystroke: Keystroke,
    pub command: Command,
    /// Conditions that must be true for this binding to activate
    pub when: Option<Vec<Condition>>,
}

impl Keybinding {
    pub fn new(keystroke: Keystroke, command: Command) -> Self {
        Self {
            keystroke,
            command,
            when: None,
        }
    }

    /// Add conditions to this binding (builder pattern)
    pub fn when(mut self, conditions: Vec<Condition>) -> Self {
        self.when = (!conditions.is_empty()).then_some(conditions);
        self
    }

    /// Same keystroke and same conditions: the later binding replaces the earlier
    pub fn overrides(&self, other: &Keybinding) -> bool {
        self.keystroke == other.keystroke && self.when == other.when
    }

    pub fn display_string(&self) -> String {
        self.keystroke.display_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::types::{KeyCode, Modifiers};

    #[test]
    fn test_empty_conditions_are_unconditional() {
        let stroke = Keystroke::key(KeyCode::Escape);
        let binding = Keybinding::new(stroke, Command::ExitMassEdit).when(vec![]);
        assert_eq!(binding.when, None);
    }

    #[test]
    fn test_overrides_needs_matching_conditions() {
        let stroke = Keystroke::new(KeyCode::Char('s'), Modifiers::CTRL);
        let plain = Keybinding::new(stroke, Command::Commit);
        let guarded = Keybinding::new(stroke, Command::Unbound).when(vec![Condition::MassEdit]);

        assert!(plain.overrides(&Keybinding::new(stroke, Command::Unbound)));
        assert!(!guarded.overrides(&plain));
    }
}
