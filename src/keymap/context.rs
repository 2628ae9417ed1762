//! Context system for conditional keybindings
//!
//! Lets one key do different things depending on grid state, such as
//! "Escape collapses a range, but leaves mass-edit on a single cell".

use serde::Deserialize;

use crate::model::GridModel;

/// Grid state relevant to keybinding evaluation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyContext {
    /// Whether the grid is in mass-edit mode
    pub mass_edit: bool,
    /// Whether the selection spans more than one cell
    pub has_range: bool,
    /// Whether a commit batch is outstanding
    pub commit_in_flight: bool,
}

impl KeyContext {
    pub fn from_model(model: &GridModel) -> Self {
        let state = model.mass_edit();
        Self {
            mass_edit: state.is_some(),
            has_range: state.is_some_and(|s| s.selection.is_range()),
            commit_in_flight: model.commit.is_in_flight(),
        }
    }
}

/// Conditions that can be attached to keybindings
///
/// Multiple conditions on a binding are ANDed together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    MassEdit,
    Browsing,
    /// More than one cell selected
    HasRange,
    /// Exactly one cell selected (or none)
    SingleCell,
    CommitInFlight,
    CommitIdle,
}

impl Condition {
    /// Evaluate this condition against the current context
    pub fn evaluate(self, ctx: &KeyContext) -> bool {
        match self {
            Condition::MassEdit => ctx.mass_edit,
            Condition::Browsing => !ctx.mass_edit,
            Condition::HasRange => ctx.has_range,
            Condition::SingleCell => !ctx.has_range,
            Condition::CommitInFlight => ctx.commit_in_flight,
            Condition::CommitIdle => !ctx.commit_in_flight,
        }
    }

    /// Evaluate all conditions (AND logic)
    pub fn evaluate_all(conditions: &[Condition], ctx: &KeyContext) -> bool {
        conditions.iter().all(|c| c.evaluate(ctx))
    }
}
