//! CLI argument definitions for tradeboard.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `options` | List the years, regions, categories and trade types in the dataset |
//! | `summary` | Export, import and net trade cards |
//! | `composition` | Per-category treemap breakdown |
//! | `trend` | Multi-year bars with the net-trade line |
//! | `map` | Per-province choropleth values |
//! | `dashboard` | All four views for one selection |
//! | `prepare` | Convert a raw statistical export into the clean dataset |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, ndjson, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--strict` | `false` | Treat warnings and errors as failures |
//! | `--stream` | `false` | Emit NDJSON stream events |
//! | `--config` | none | JSON configuration file |
//! | `--data` | config | Clean dataset path override |
//! | `--offline` | `false` | Use cached boundaries only |
//!
//! # Examples
//!
//! ```bash
//! tradeboard summary --year 2024 --geo Ontario
//! tradeboard map --trade "net trade" --pretty
//! tradeboard dashboard --geo Quebec --stream
//! tradeboard prepare raw.csv --output data/clean/clean.csv
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tradeboard_core::CacheMode;

/// Canada–US trade dashboard views from the command line.
#[derive(Debug, Parser)]
#[command(
    name = "tradeboard",
    author,
    version,
    about = "Canada–US trade dashboard views",
    long_about = "tradeboard turns the clean Canada–US trade dataset into the data behind \
each dashboard panel: summary cards, category composition, multi-year trend and the \
per-province map.\n\
\n\
Use 'tradeboard <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Treat warnings and errors as failures (exit code 5).
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    /// Emit NDJSON stream events (start, chunk per view, end).
    #[arg(long, global = true, default_value_t = false)]
    pub stream: bool,

    /// JSON configuration file; defaults apply when omitted.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Clean dataset to read instead of the configured one.
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Skip the boundary download and read the disk cache only.
    #[arg(long, global = true, default_value_t = false)]
    pub offline: bool,

    /// How view computations use the in-process cache.
    #[arg(long, global = true, value_enum, default_value_t = CacheArg::Use)]
    pub cache: CacheArg,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary of the envelope.
    Table,
    /// Single JSON object output.
    Json,
    /// Newline-delimited JSON (one object per line).
    Ndjson,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CacheArg {
    Use,
    Refresh,
    Bypass,
}

impl From<CacheArg> for CacheMode {
    fn from(value: CacheArg) -> Self {
        match value {
            CacheArg::Use => Self::Use,
            CacheArg::Refresh => Self::Refresh,
            CacheArg::Bypass => Self::Bypass,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the filter values present in the dataset.
    Options,

    /// Export, import and net trade totals for a year, region and category.
    ///
    ///   tradeboard summary --year 2024 --geo Ontario
    Summary(SelectionArgs),

    /// Breakdown of one trade type across categories.
    ///
    ///   tradeboard composition --trade import --geo Alberta
    Composition(SelectionArgs),

    /// Export/import bars by year with the net-trade line.
    ///
    ///   tradeboard trend --geo "British Columbia" --category "Energy products"
    Trend(SelectionArgs),

    /// Per-province values and color scale for the choropleth.
    ///
    ///   tradeboard map --trade "net trade" --year 2023
    Map(MapArgs),

    /// Render every panel for one selection.
    ///
    ///   tradeboard dashboard --geo Quebec --stream
    Dashboard(SelectionArgs),

    /// Convert a raw statistical export into the clean dataset.
    ///
    ///   tradeboard prepare data/raw/raw.csv
    Prepare(PrepareArgs),
}

/// The four dashboard dropdowns.
#[derive(Debug, Clone, Args)]
pub struct SelectionArgs {
    /// Reference year; defaults to the latest year in the dataset.
    #[arg(long)]
    pub year: Option<i32>,

    /// Province, territory or Canada.
    #[arg(long, default_value = "Canada")]
    pub geo: String,

    #[arg(long, default_value = "All sections")]
    pub category: String,

    /// Export, Import or Net trade.
    #[arg(long = "trade", default_value = "Export")]
    pub trade_type: String,
}

#[derive(Debug, Clone, Args)]
pub struct MapArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Attach each region's GeoJSON geometry to the output.
    #[arg(long, default_value_t = false)]
    pub with_geometry: bool,
}

#[derive(Debug, Clone, Args)]
pub struct PrepareArgs {
    /// Raw export with REF_DATE, GEO, NAPCS, Trade and VALUE columns.
    pub input: PathBuf,

    /// Destination for the clean file; defaults to the configured data path.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "tradeboard",
            "summary",
            "--year",
            "2024",
            "--geo",
            "Quebec",
            "--pretty",
            "--cache",
            "bypass",
        ])
        .expect("parse");

        assert!(cli.pretty);
        assert_eq!(CacheMode::from(cli.cache), CacheMode::Bypass);
        let Command::Summary(selection) = cli.command else {
            panic!("expected summary command");
        };
        assert_eq!(selection.year, Some(2024));
        assert_eq!(selection.geo, "Quebec");
        assert_eq!(selection.category, "All sections");
    }

    #[test]
    fn prepare_requires_input() {
        assert!(Cli::try_parse_from(["tradeboard", "prepare"]).is_err());
    }
}
