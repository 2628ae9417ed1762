//! assetgrid - spreadsheet-style mass editing for asset records
//!
//! The core is an Elm-style loop: `Msg` → `update(&mut GridModel)` → `Cmd`.
//! The `runtime` executes commands (store calls, clipboard access) and feeds
//! results back as messages. Edits live in an overlay on top of the fetched
//! baseline until a commit settles them.

pub mod clipboard;
pub mod commands;
pub mod commit;
pub mod config;
pub mod config_paths;
pub mod grid;
pub mod keymap;
pub mod messages;
pub mod model;
pub mod runtime;
pub mod store;
pub mod tracing;
pub mod update;

// Re-export commonly used types
pub use commands::Cmd;
pub use config::GridConfig;
pub use messages::Msg;
pub use model::GridModel;
pub use runtime::Runtime;
pub use store::RecordStore;
