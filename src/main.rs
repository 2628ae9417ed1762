//! assetgrid - line-driven shell around the mass-edit grid
//!
//! Reads one command per line from stdin, runs it through the runtime and
//! prints the grid. Useful for scripting edits against a seed file and for
//! poking at the engine without a GUI.

mod cli;

use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;

use assetgrid::config::GridConfig;
use assetgrid::grid::{CellCoord, SortKey};
use assetgrid::keymap::{Command, Keystroke};
use assetgrid::messages::{GridMsg, Msg, SessionMsg};
use assetgrid::model::{GridModel, RecordId};
use assetgrid::runtime::Runtime;
use assetgrid::store::{load_seed, MemoryStore};

use cli::CliArgs;

const ASYNC_TIMEOUT: Duration = Duration::from_secs(30);

/// One parsed shell line
#[derive(Debug, Clone, PartialEq)]
enum ShellCommand {
    Key(Keystroke),
    Type(String),
    Set(CellCoord, String),
    Select(CellCoord),
    Extend(CellCoord),
    Paste(String),
    Filter(String, String),
    ClearFilters,
    Sort(Option<SortKey>),
    Run(Command),
    Show,
    Keys,
    Help,
    Quit,
}

fn parse_line(line: &str) -> Result<Option<ShellCommand>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    let cell = |rest: &str| -> Result<(CellCoord, String)> {
        let mut parts = rest.splitn(3, ' ');
        match (parts.next(), parts.next()) {
            (Some(record), Some(column)) if !record.is_empty() => Ok((
                CellCoord::new(RecordId::new(record), column),
                parts.next().unwrap_or("").to_string(),
            )),
            _ => bail!("expected RECORD COLUMN"),
        }
    };

    let command = match word {
        "key" => ShellCommand::Key(rest.parse()?),
        "type" => ShellCommand::Type(unescape(rest)),
        "set" => {
            let (coord, value) = cell(rest)?;
            ShellCommand::Set(coord, unescape(&value))
        }
        "select" => ShellCommand::Select(cell(rest)?.0),
        "extend" => ShellCommand::Extend(cell(rest)?.0),
        "paste" => ShellCommand::Paste(unescape(rest)),
        "filter" => {
            let (column, needle) = rest.split_once(' ').unwrap_or((rest, ""));
            if column.is_empty() {
                bail!("expected COLUMN [TEXT]");
            }
            ShellCommand::Filter(column.to_string(), needle.to_string())
        }
        "unfilter" => ShellCommand::ClearFilters,
        "sort" => match rest.split_once(' ').unwrap_or((rest, "")) {
            ("" | "off", _) => ShellCommand::Sort(None),
            (column, "desc") => ShellCommand::Sort(Some(SortKey::descending(column))),
            (column, "" | "asc") => ShellCommand::Sort(Some(SortKey::ascending(column))),
            (_, other) => bail!("unknown sort direction `{}`", other),
        },
        "edit" | "mass-edit" => ShellCommand::Run(Command::EnterMassEdit),
        "done" => ShellCommand::Run(Command::ExitMassEdit),
        "copy" => ShellCommand::Run(Command::Copy),
        "clear" => ShellCommand::Run(Command::ClearCells),
        "discard" => ShellCommand::Run(Command::DiscardSelected),
        "discard-all" => ShellCommand::Run(Command::DiscardAll),
        "commit" => ShellCommand::Run(Command::Commit),
        "refresh" => ShellCommand::Run(Command::Refresh),
        "show" => ShellCommand::Show,
        "keys" => ShellCommand::Keys,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => bail!("unknown command `{}` (try `help`)", other),
    };
    Ok(Some(command))
}

/// `\t`, `\n` and `\\` escapes so pasted grids fit on one line
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

fn execute(rt: &mut Runtime, command: ShellCommand, out: &mut impl Write) -> Result<bool> {
    match command {
        ShellCommand::Key(stroke) => {
            rt.handle_keystroke(stroke);
        }
        ShellCommand::Type(text) => {
            for ch in text.chars() {
                rt.handle_keystroke(Keystroke::char(ch));
            }
        }
        ShellCommand::Set(coord, value) => {
            rt.dispatch(Msg::set_value(coord, value));
        }
        ShellCommand::Select(coord) => {
            rt.dispatch(Msg::Grid(GridMsg::SelectCell(coord)));
        }
        ShellCommand::Extend(coord) => {
            rt.dispatch(Msg::Grid(GridMsg::ExtendTo(coord)));
        }
        ShellCommand::Paste(text) => {
            rt.dispatch(Msg::Grid(GridMsg::Paste(text)));
        }
        ShellCommand::Filter(column, needle) => {
            rt.dispatch(Msg::set_filter(column, needle));
        }
        ShellCommand::ClearFilters => {
            rt.dispatch(Msg::Session(SessionMsg::ClearFilters));
        }
        ShellCommand::Sort(key) => {
            rt.dispatch(Msg::Session(SessionMsg::SortBy(key)));
        }
        ShellCommand::Run(command) => {
            rt.dispatch_command(command);
        }
        ShellCommand::Show => {}
        ShellCommand::Keys => {
            for binding in rt.keymap().bindings() {
                writeln!(
                    out,
                    "{:<16} {}",
                    binding.display_string(),
                    binding.command.display_name()
                )?;
            }
            return Ok(true);
        }
        ShellCommand::Help => {
            writeln!(out, "{}", HELP)?;
            return Ok(true);
        }
        ShellCommand::Quit => return Ok(false),
    }

    if !rt.wait_idle(ASYNC_TIMEOUT) {
        tracing::warn!(pending = rt.pending(), "timed out waiting for the store");
    }
    render(rt.model(), out)?;
    Ok(true)
}

const HELP: &str = "\
commands:
  edit | mass-edit | done     enter / leave mass-edit
  key KEYS                    press a key, e.g. `key shift+down`, `key cmd+s`
  type TEXT                   type into the active cell
  set RECORD COLUMN VALUE     write a value (broadcasts across a selected range)
  select RECORD COLUMN        select one cell
  extend RECORD COLUMN        extend the selection to a cell
  paste TEXT                  paste a grid, use \\t and \\n as separators
  copy | clear | discard | discard-all
  filter COLUMN [TEXT]        filter rows (empty TEXT removes the filter)
  unfilter                    clear all filters
  sort COLUMN [asc|desc] | sort off
  commit | refresh | show | keys | quit";

/// Plain-text table: `*` marks a pending edit, `[...]` the selection
fn render(model: &GridModel, out: &mut impl Write) -> io::Result<()> {
    let view = model.view();
    let state = model.mass_edit();

    let mut table: Vec<Vec<String>> = Vec::with_capacity(view.row_count() + 1);
    let mut header = vec!["id".to_string()];
    header.extend(view.columns().iter().cloned());
    table.push(header);

    for record in view.rows() {
        let mut row = vec![record.to_string()];
        for column in view.columns() {
            let coord = CellCoord::new(record.clone(), column.as_str());
            let mut cell = model.display_value(&coord);
            if model.pending_value(&coord).is_some() {
                cell.push('*');
            }
            if state.is_some_and(|s| s.selection.contains(&coord)) {
                cell = format!("[{}]", cell);
            }
            row.push(cell);
        }
        table.push(row);
    }

    let widths: Vec<usize> = (0..table[0].len())
        .map(|i| {
            table
                .iter()
                .map(|row| row[i].chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    for row in &table {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect();
        writeln!(out, "{}", line.join(" | ").trim_end())?;
    }

    let mode = if state.is_some() { "MASS EDIT" } else { "BROWSE" };
    let pending = state.map_or(0, |s| s.overlay.len());
    write!(out, "-- {} | {} row(s) | {} pending", mode, view.row_count(), pending)?;
    if let Some(status) = model.status_text() {
        write!(out, " | {}", status)?;
    }
    writeln!(out)
}

fn main() -> Result<()> {
    assetgrid::tracing::init();

    let startup = CliArgs::parse()
        .into_config()
        .map_err(anyhow::Error::msg)?;

    let config = match &startup.config_path {
        Some(path) => GridConfig::load_from(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GridConfig::load(),
    };

    let records = load_seed(&startup.seed, &config.date_format)
        .with_context(|| format!("loading seed {}", startup.seed.display()))?;
    let store = Arc::new(MemoryStore::new(records));

    let mut rt = Runtime::open(store, config, startup.query.clone())
        .context("initial fetch failed")?;
    for (column, needle) in &startup.filters {
        rt.dispatch(Msg::set_filter(column.as_str(), needle.as_str()));
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    render(rt.model(), &mut out)?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                writeln!(out, "error: {}", e)?;
                continue;
            }
        };
        if startup.echo {
            writeln!(out, "> {}", line.trim())?;
        }
        if !execute(&mut rt, command, &mut out)? {
            break;
        }
        out.flush()?;
    }

    Ok(())
}
