//! Raw statistical export to clean dataset conversion.
//!
//! The raw table holds one row per (reference year, region, NAPCS category,
//! trade flow) in thousands of dollars with imports positive. The clean table
//! holds dollars, negative imports and a derived `Net trade` row.

use std::collections::BTreeMap;
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tradeboard_core::{normalize_category, Region, TradeType, ValidationError};

/// Column order of the statistical agency export.
pub const RAW_COLUMNS: [&str; 17] = [
    "REF_DATE",
    "GEO",
    "DGUID",
    "Trading partner",
    "North American Product Classification System (NAPCS)",
    "Trade",
    "UOM",
    "UOM_ID",
    "SCALAR_FACTOR",
    "SCALAR_ID",
    "VECTOR",
    "COORDINATE",
    "VALUE",
    "STATUS",
    "SYMBOL",
    "TERMINATED",
    "DECIMALS",
];

const YEAR: &str = "REF_DATE";
const GEO: &str = "GEO";
const CATEGORY: &str = "North American Product Classification System (NAPCS)";
const TRADE: &str = "Trade";
const VALUE: &str = "VALUE";

/// Raw values are reported in thousands of dollars.
const SCALE: f64 = 1e3;

#[derive(Debug, Error)]
pub enum PrepareError {
    #[error("failed to read raw export '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write clean dataset '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("raw export is missing required column(s): {}", missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    #[error("raw export contains no data rows")]
    Empty,

    #[error("line {line}: {message}")]
    InvalidRow { line: u64, message: String },
}

/// Counters describing one conversion.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PrepareReport {
    pub rows_read: usize,
    /// Rows without a usable value (suppressed or blank).
    pub rows_skipped: usize,
    pub groups: usize,
    /// Groups missing either flow; they get no `Net trade` row.
    pub incomplete_groups: usize,
    pub rows_written: usize,
    /// True when the header is not exactly the expected export layout.
    pub unexpected_layout: bool,
}

#[derive(Debug, Default)]
struct FlowTotals {
    export: Option<Mean>,
    import: Option<Mean>,
}

#[derive(Debug, Clone, Copy)]
struct Mean {
    sum: f64,
    count: u32,
}

impl Mean {
    fn add(slot: &mut Option<Self>, value: f64) {
        let mean = slot.get_or_insert(Self { sum: 0.0, count: 0 });
        mean.sum += value;
        mean.count += 1;
    }

    fn value(self) -> f64 {
        self.sum / f64::from(self.count)
    }
}

/// Convert a raw export file and write the clean CSV, creating parent dirs.
pub fn prepare_file(input: &Path, output: &Path) -> Result<PrepareReport, PrepareError> {
    let raw = fs::File::open(input).map_err(|source| PrepareError::Read {
        path: input.to_path_buf(),
        source,
    })?;

    let mut buffer = Vec::new();
    let report = prepare(raw, &mut buffer)?;

    if let Some(parent) = output.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| PrepareError::Write {
            path: output.to_path_buf(),
            source,
        })?;
    }
    fs::write(output, buffer).map_err(|source| PrepareError::Write {
        path: output.to_path_buf(),
        source,
    })?;

    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        rows = report.rows_written,
        "prepared clean dataset"
    );
    Ok(report)
}

/// Convert raw export rows from `reader` into clean rows on `writer`.
pub fn prepare<R: Read, W: Write>(reader: R, writer: W) -> Result<PrepareReport, PrepareError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let position = |name: &str| headers.iter().position(|header| header == name);
    let missing = [YEAR, GEO, CATEGORY, TRADE, VALUE]
        .into_iter()
        .filter(|name| position(*name).is_none())
        .map(str::to_owned)
        .collect::<Vec<_>>();
    if !missing.is_empty() {
        return Err(PrepareError::MissingColumns { missing });
    }
    let columns = [YEAR, GEO, CATEGORY, TRADE, VALUE].map(|name| position(name).unwrap_or(0));

    let mut report = PrepareReport {
        unexpected_layout: !headers.iter().eq(RAW_COLUMNS),
        ..PrepareReport::default()
    };
    if report.unexpected_layout {
        tracing::warn!("raw export header differs from the expected column layout");
    }

    let mut groups: BTreeMap<(i32, Region, String), FlowTotals> = BTreeMap::new();
    for result in reader.records() {
        let row = result?;
        report.rows_read += 1;
        let line = row.position().map_or(report.rows_read as u64 + 1, |pos| pos.line());
        let cell = |index: usize| row.get(columns[index]).unwrap_or_default();

        let value = cell(4);
        if value.is_empty() {
            report.rows_skipped += 1;
            continue;
        }
        let value = value.parse::<f64>().map_err(|_| PrepareError::InvalidRow {
            line,
            message: format!("VALUE '{value}' is not a number"),
        })?;

        let year = parse_ref_year(cell(0)).ok_or_else(|| PrepareError::InvalidRow {
            line,
            message: format!("REF_DATE '{}' does not start with a year", cell(0)),
        })?;
        let geo = Region::parse(cell(1)).map_err(|error| invalid_row(line, error))?;
        let category = normalize_category(cell(2));
        if category.is_empty() {
            return Err(invalid_row(line, ValidationError::EmptyCategory));
        }
        let trade = cell(3)
            .parse::<TradeType>()
            .map_err(|error| invalid_row(line, error))?;

        let totals = groups.entry((year, geo, category)).or_default();
        match trade {
            TradeType::Export => Mean::add(&mut totals.export, value * SCALE),
            TradeType::Import => Mean::add(&mut totals.import, value * SCALE),
            TradeType::NetTrade => {
                return Err(PrepareError::InvalidRow {
                    line,
                    message: String::from("raw export must not contain net trade rows"),
                })
            }
        }
    }

    if groups.is_empty() {
        return Err(PrepareError::Empty);
    }

    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(["YEAR", "GEO", "CATEGORY", "TRADE", "VALUE"])?;

    report.groups = groups.len();
    for ((year, geo, category), totals) in &groups {
        let export = totals.export.map(Mean::value);
        let import = totals.import.map(|mean| -mean.value());
        let net_trade = export.zip(import).map(|(export, import)| export + import);
        if net_trade.is_none() {
            report.incomplete_groups += 1;
        }

        let flows = [
            (TradeType::Export, export),
            (TradeType::Import, import),
            (TradeType::NetTrade, net_trade),
        ];
        for (trade, value) in flows {
            let Some(value) = value else { continue };
            writer.write_record([
                year.to_string(),
                geo.to_string(),
                category.clone(),
                trade.to_string(),
                value.to_string(),
            ])?;
            report.rows_written += 1;
        }
    }
    writer.flush().map_err(csv::Error::from)?;

    if report.incomplete_groups > 0 {
        tracing::warn!(
            groups = report.incomplete_groups,
            "groups without both flows have no net trade row"
        );
    }

    Ok(report)
}

fn parse_ref_year(value: &str) -> Option<i32> {
    let digits = value.get(..4)?;
    if !digits.chars().all(|ch| ch.is_ascii_digit()) {
        return None;
    }
    match value.as_bytes().get(4) {
        None | Some(b'-') => digits.parse().ok(),
        Some(_) => None,
    }
}

fn invalid_row(line: u64, error: ValidationError) -> PrepareError {
    PrepareError::InvalidRow {
        line,
        message: error.to_string(),
    }
}
