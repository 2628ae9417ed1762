//! Command enum - what a keybinding triggers

use std::str::FromStr;

use super::config::KeymapError;
use crate::messages::{CommitMsg, Direction, GridMsg, Msg, SessionMsg};

/// A command that can be bound to a key
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    // Active cell movement
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,

    // Range extension
    ExtendUp,
    ExtendDown,
    ExtendLeft,
    ExtendRight,

    NextCell,
    PrevCell,
    NextRow,
    SelectAll,
    CollapseSelection,

    ClearCells,
    DiscardSelected,
    DiscardAll,

    Copy,
    Paste,

    EnterMassEdit,
    ExitMassEdit,
    Commit,
    Refresh,

    /// Removes a default binding when used in a user keymap
    Unbound,
}

impl Command {
    /// Convert this command to the messages it dispatches
    pub fn to_msgs(self) -> Vec<Msg> {
        let msg = match self {
            Command::MoveUp => Msg::move_active(Direction::Up),
            Command::MoveDown => Msg::move_active(Direction::Down),
            Command::MoveLeft => Msg::move_active(Direction::Left),
            Command::MoveRight => Msg::move_active(Direction::Right),

            Command::ExtendUp => Msg::extend(Direction::Up),
            Command::ExtendDown => Msg::extend(Direction::Down),
            Command::ExtendLeft => Msg::extend(Direction::Left),
            Command::ExtendRight => Msg::extend(Direction::Right),

            Command::NextCell => Msg::Grid(GridMsg::NextCell),
            Command::PrevCell => Msg::Grid(GridMsg::PrevCell),
            Command::NextRow => Msg::Grid(GridMsg::NextRow),
            Command::SelectAll => Msg::Grid(GridMsg::SelectAll),
            Command::CollapseSelection => Msg::Grid(GridMsg::CollapseSelection),

            Command::ClearCells => Msg::Grid(GridMsg::ClearCells),
            Command::DiscardSelected => Msg::Grid(GridMsg::DiscardSelected),
            Command::DiscardAll => Msg::Grid(GridMsg::DiscardAll),

            Command::Copy => Msg::Grid(GridMsg::Copy),
            Command::Paste => Msg::Grid(GridMsg::RequestPaste),

            Command::EnterMassEdit => Msg::Session(SessionMsg::EnterMassEdit),
            Command::ExitMassEdit => Msg::Session(SessionMsg::ExitMassEdit),
            Command::Commit => Msg::Commit(CommitMsg::Commit),
            Command::Refresh => Msg::Session(SessionMsg::Refresh),

            Command::Unbound => return Vec::new(),
        };
        vec![msg]
    }

    /// Human-readable name for help listings
    pub fn display_name(self) -> &'static str {
        match self {
            Command::MoveUp => "Move Up",
            Command::MoveDown => "Move Down",
            Command::MoveLeft => "Move Left",
            Command::MoveRight => "Move Right",
            Command::ExtendUp => "Extend Selection Up",
            Command::ExtendDown => "Extend Selection Down",
            Command::ExtendLeft => "Extend Selection Left",
            Command::ExtendRight => "Extend Selection Right",
            Command::NextCell => "Next Cell",
            Command::PrevCell => "Previous Cell",
            Command::NextRow => "Next Row",
            Command::SelectAll => "Select All",
            Command::CollapseSelection => "Collapse Selection",
            Command::ClearCells => "Clear Cells",
            Command::DiscardSelected => "Discard Selected Edits",
            Command::DiscardAll => "Discard All Edits",
            Command::Copy => "Copy",
            Command::Paste => "Paste",
            Command::EnterMassEdit => "Enter Mass Edit",
            Command::ExitMassEdit => "Exit Mass Edit",
            Command::Commit => "Commit",
            Command::Refresh => "Refresh",
            Command::Unbound => "Unbound",
        }
    }
}

impl FromStr for Command {
    type Err = KeymapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let command = match s {
            "MoveUp" => Command::MoveUp,
            "MoveDown" => Command::MoveDown,
            "MoveLeft" => Command::MoveLeft,
            "MoveRight" => Command::MoveRight,
            "ExtendUp" => Command::ExtendUp,
            "ExtendDown" => Command::ExtendDown,
            "ExtendLeft" => Command::ExtendLeft,
            "ExtendRight" => Command::ExtendRight,
            "NextCell" => Command::NextCell,
            "PrevCell" => Command::PrevCell,
            "NextRow" => Command::NextRow,
            "SelectAll" => Command::SelectAll,
            "CollapseSelection" => Command::CollapseSelection,
            "ClearCells" => Command::ClearCells,
            "DiscardSelected" => Command::DiscardSelected,
            "DiscardAll" => Command::DiscardAll,
            "Copy" => Command::Copy,
            "Paste" => Command::Paste,
            "EnterMassEdit" => Command::EnterMassEdit,
            "ExitMassEdit" => Command::ExitMassEdit,
            "Commit" => Command::Commit,
            "Refresh" => Command::Refresh,
            "Unbound" => Command::Unbound,
            _ => return Err(KeymapError::UnknownCommand(s.to_string())),
        };
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paste_requests_clipboard() {
        assert_eq!(
            Command::Paste.to_msgs(),
            vec![Msg::Grid(GridMsg::RequestPaste)]
        );
    }

    #[test]
    fn test_unbound_dispatches_nothing() {
        assert!(Command::Unbound.to_msgs().is_empty());
    }

    #[test]
    fn test_parse_command_names() {
        assert_eq!("ExtendLeft".parse::<Command>().unwrap(), Command::ExtendLeft);
        assert_eq!("Commit".parse::<Command>().unwrap(), Command::Commit);
        assert!(matches!(
            "SaveFile".parse::<Command>(),
            Err(KeymapError::UnknownCommand(name)) if name == "SaveFile"
        ));
    }
}
