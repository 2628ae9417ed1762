//! Command-line argument parsing for the grid shell
//!
//! Supports:
//! - Seeding the in-memory store from a JSON, CSV or TSV file
//! - Server-side query filters (`--query`) sent with every fetch
//! - Local column filters (`--filter`) applied to the loaded baseline
//! - An alternate config file

use std::path::PathBuf;

use clap::Parser;

use assetgrid::grid::ColumnFilters;

/// Mass-edit asset records in a spreadsheet-style grid
#[derive(Parser, Debug)]
#[command(
    name = "assetgrid",
    version,
    about = "Mass-edit asset records in a spreadsheet-style grid"
)]
pub struct CliArgs {
    /// Seed file with the records to edit (.json, .csv or .tsv)
    #[arg(value_name = "SEED")]
    pub seed: PathBuf,

    /// Local column filter, COLUMN=TEXT (repeatable)
    #[arg(short = 'f', long = "filter", value_name = "COLUMN=TEXT")]
    pub filters: Vec<String>,

    /// Server-side filter sent with every fetch, COLUMN=TEXT (repeatable)
    #[arg(short = 'q', long = "query", value_name = "COLUMN=TEXT")]
    pub query: Vec<String>,

    /// Config file to use instead of ~/.config/assetgrid/config.yaml
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the grid after every command
    #[arg(long)]
    pub echo: bool,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub seed: PathBuf,
    pub filters: Vec<(String, String)>,
    pub query: Option<ColumnFilters>,
    pub config_path: Option<PathBuf>,
    pub echo: bool,
}

impl CliArgs {
    /// Convert parsed CLI args into startup configuration
    pub fn into_config(self) -> Result<StartupConfig, String> {
        let filters = self
            .filters
            .iter()
            .map(|f| parse_filter(f))
            .collect::<Result<Vec<_>, _>>()?;

        let mut query = ColumnFilters::new();
        for raw in &self.query {
            let (column, needle) = parse_filter(raw)?;
            query.set(column, &needle);
        }

        Ok(StartupConfig {
            seed: self.seed,
            filters,
            query: (!query.is_empty()).then_some(query),
            config_path: self.config,
            echo: self.echo,
        })
    }
}

/// Split `COLUMN=TEXT`; the text may be empty but the column may not
pub fn parse_filter(raw: &str) -> Result<(String, String), String> {
    let (column, needle) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected COLUMN=TEXT, got `{}`", raw))?;
    let column = column.trim();
    if column.is_empty() {
        return Err(format!("missing column name in `{}`", raw));
    }
    Ok((column.to_string(), needle.to_string()))
}
