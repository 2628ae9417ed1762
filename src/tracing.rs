//! Tracing setup and state snapshots for development diagnostics
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=commit=debug,selection=trace` - scoped filtering
//! - `RUST_LOG=assetgrid::update=debug` - module-level filtering
//!
//! # Log Files
//!
//! Logs are written to `~/.config/assetgrid/logs/assetgrid.log` with daily
//! rotation, always at debug level.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config_paths::LOG_FILE_PREFIX;
use crate::model::GridModel;

/// Initialize tracing subscriber with console and file logging
///
/// Console output respects RUST_LOG (default `warn`) and goes to stderr so it
/// never interleaves with the grid printed on stdout.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE_PREFIX);
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}

/// Lightweight snapshot of selection/overlay state for diffing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSnapshot {
    pub mass_edit: bool,
    pub anchor: Option<String>,
    pub focus: Option<String>,
    pub selected: usize,
    pub pending: usize,
    pub visible_rows: usize,
}

impl SelectionSnapshot {
    pub fn from_model(model: &GridModel) -> Self {
        let state = model.mass_edit();
        let label = |c: &crate::grid::CellCoord| format!("{}:{}", c.record, c.column);
        Self {
            mass_edit: state.is_some(),
            anchor: state.and_then(|s| s.selection.anchor()).map(label),
            focus: state.and_then(|s| s.selection.focus()).map(label),
            selected: state.map_or(0, |s| s.selection.len()),
            pending: state.map_or(0, |s| s.overlay.len()),
            visible_rows: model.view().row_count(),
        }
    }

    /// Describe what changed between two snapshots
    pub fn diff(&self, other: &SelectionSnapshot) -> Option<String> {
        let mut changes = Vec::new();

        if self.mass_edit != other.mass_edit {
            changes.push(format!("mass_edit: {} → {}", self.mass_edit, other.mass_edit));
        }
        if self.anchor != other.anchor || self.focus != other.focus {
            changes.push(format!(
                "selection: {:?}..{:?} → {:?}..{:?}",
                self.anchor, self.focus, other.anchor, other.focus
            ));
        }
        if self.selected != other.selected {
            changes.push(format!("cells: {} → {}", self.selected, other.selected));
        }
        if self.pending != other.pending {
            changes.push(format!("pending: {} → {}", self.pending, other.pending));
        }
        if self.visible_rows != other.visible_rows {
            changes.push(format!(
                "rows: {} → {}",
                self.visible_rows, other.visible_rows
            ));
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}
