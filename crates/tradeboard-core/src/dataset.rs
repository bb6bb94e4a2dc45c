//! Clean dataset loading and filter option discovery.

use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use serde::Serialize;

use crate::error::FilterField;
use crate::{Category, CoreError, DataLoadError, Region, TradeKey, TradeRecord, TradeType};

/// Columns every clean dataset must carry (matched case-insensitively).
pub const REQUIRED_COLUMNS: [&str; 5] = ["year", "geo", "category", "trade", "value"];

/// Parsing options for the clean dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    pub delimiter: u8,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl LoadOptions {
    /// Pick the delimiter from the file extension (`.tsv` → tab).
    pub fn for_path(path: &Path) -> Self {
        let is_tsv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("tsv"));
        if is_tsv {
            Self { delimiter: b'\t' }
        } else {
            Self::default()
        }
    }
}

/// What happened while loading a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub source: String,
    pub rows_read: usize,
    pub rows_loaded: usize,
    /// Rows with an empty value cell, treated as missing combinations.
    pub rows_skipped: usize,
}

/// Distinct values used to populate the dashboard dropdowns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOptions {
    pub years: Vec<i32>,
    pub geos: Vec<Region>,
    pub categories: Vec<Category>,
    pub trade_types: Vec<TradeType>,
}

/// Immutable in-memory trade table.
#[derive(Debug, Clone)]
pub struct TradeTable {
    records: Vec<TradeRecord>,
    index: HashMap<TradeKey, usize>,
    report: LoadReport,
}

#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    year: usize,
    geo: usize,
    category: usize,
    trade: usize,
    value: usize,
}

impl TradeTable {
    /// Load a clean dataset from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DataLoadError> {
        let path = path.as_ref();
        Self::load_with(path, LoadOptions::for_path(path))
    }

    pub fn load_with(path: impl AsRef<Path>, options: LoadOptions) -> Result<Self, DataLoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| DataLoadError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file, &path.display().to_string(), options)
    }

    /// Parse a clean dataset from any reader; `source_name` is used in reports.
    pub fn from_reader<R: Read>(
        reader: R,
        source_name: &str,
        options: LoadOptions,
    ) -> Result<Self, DataLoadError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        if headers.iter().all(|header| header.is_empty()) {
            return Err(DataLoadError::Empty {
                source_name: source_name.to_owned(),
            });
        }
        let columns = resolve_columns(&headers)?;

        let mut categories: HashMap<String, Category> = HashMap::new();
        let mut records = Vec::new();
        let mut index = HashMap::new();
        let mut rows_read = 0usize;
        let mut rows_skipped = 0usize;

        for result in reader.records() {
            let row = result?;
            rows_read += 1;
            let line = row.position().map_or(rows_read as u64 + 1, |pos| pos.line());

            let Some(record) = parse_row(&row, columns, line)? else {
                rows_skipped += 1;
                continue;
            };

            let category = categories
                .entry(record.category.key().to_owned())
                .or_insert_with(|| record.category.clone())
                .clone();
            let record = TradeRecord { category, ..record };

            let key = record.key();
            if index.contains_key(&key) {
                return Err(DataLoadError::DuplicateRecord {
                    line,
                    key: key.to_string(),
                });
            }
            index.insert(key, records.len());
            records.push(record);
        }

        if records.is_empty() {
            return Err(DataLoadError::Empty {
                source_name: source_name.to_owned(),
            });
        }

        if rows_skipped > 0 {
            tracing::warn!(
                source = source_name,
                rows_skipped,
                "skipped rows with an empty value cell"
            );
        }

        let report = LoadReport {
            source: source_name.to_owned(),
            rows_read,
            rows_loaded: records.len(),
            rows_skipped,
        };
        tracing::info!(
            source = source_name,
            rows = report.rows_loaded,
            "loaded trade dataset"
        );

        Ok(Self {
            records,
            index,
            report,
        })
    }

    /// Build a table from already-typed records; duplicate keys and
    /// non-finite values are rejected.
    pub fn from_records(records: Vec<TradeRecord>) -> Result<Self, DataLoadError> {
        if records.is_empty() {
            return Err(DataLoadError::Empty {
                source_name: String::from("<memory>"),
            });
        }

        let mut index = HashMap::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            if !record.value.is_finite() {
                return Err(DataLoadError::InvalidRow {
                    line: position as u64 + 1,
                    message: format!("value '{}' is not a finite number", record.value),
                });
            }
            let key = record.key();
            if index.insert(key.clone(), position).is_some() {
                return Err(DataLoadError::DuplicateRecord {
                    line: position as u64 + 1,
                    key: key.to_string(),
                });
            }
        }

        let report = LoadReport {
            source: String::from("<memory>"),
            rows_read: records.len(),
            rows_loaded: records.len(),
            rows_skipped: 0,
        };

        Ok(Self {
            records,
            index,
            report,
        })
    }

    pub fn records(&self) -> &[TradeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    /// Exact lookup of one record.
    pub fn get(
        &self,
        year: i32,
        geo: &Region,
        category: &Category,
        trade: TradeType,
    ) -> Option<&TradeRecord> {
        let key = TradeKey {
            year,
            geo: geo.clone(),
            category: category.clone(),
            trade,
        };
        self.index.get(&key).map(|&position| &self.records[position])
    }

    /// Years present in the data, newest first.
    pub fn distinct_years(&self) -> Vec<i32> {
        let years = self
            .records
            .iter()
            .map(|record| record.year)
            .collect::<BTreeSet<_>>();
        years.into_iter().rev().collect()
    }

    /// Regions present in the data, `Canada` first then alphabetical.
    pub fn distinct_geos(&self) -> Vec<Region> {
        let geos = self
            .records
            .iter()
            .map(|record| record.geo.clone())
            .collect::<BTreeSet<_>>();

        let (national, mut provinces): (Vec<_>, Vec<_>) =
            geos.into_iter().partition(Region::is_canada);
        provinces.sort();

        national.into_iter().chain(provinces).collect()
    }

    /// Categories present in the data, the rollup first then alphabetical.
    pub fn distinct_categories(&self) -> Vec<Category> {
        let categories = self
            .records
            .iter()
            .map(|record| record.category.clone())
            .collect::<BTreeSet<_>>();

        let (rollup, detail): (Vec<_>, Vec<_>) =
            categories.into_iter().partition(Category::is_rollup);

        rollup.into_iter().chain(detail).collect()
    }

    pub fn distinct_trade_types(&self) -> Vec<TradeType> {
        let mut trade_types = self
            .records
            .iter()
            .map(|record| record.trade)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect::<Vec<_>>();
        trade_types.sort_by_key(|trade| trade.as_str());
        trade_types
    }

    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions {
            years: self.distinct_years(),
            geos: self.distinct_geos(),
            categories: self.distinct_categories(),
            trade_types: self.distinct_trade_types(),
        }
    }

    pub fn ensure_year(&self, year: i32) -> Result<(), CoreError> {
        if self.records.iter().any(|record| record.year == year) {
            Ok(())
        } else {
            Err(CoreError::UnknownFilterValue {
                field: FilterField::Year,
                value: year.to_string(),
            })
        }
    }

    pub fn ensure_geo(&self, geo: &Region) -> Result<(), CoreError> {
        if self.records.iter().any(|record| &record.geo == geo) {
            Ok(())
        } else {
            Err(CoreError::UnknownFilterValue {
                field: FilterField::Geo,
                value: geo.to_string(),
            })
        }
    }

    pub fn ensure_category(&self, category: &Category) -> Result<(), CoreError> {
        if self.records.iter().any(|record| &record.category == category) {
            Ok(())
        } else {
            Err(CoreError::UnknownFilterValue {
                field: FilterField::Category,
                value: category.to_string(),
            })
        }
    }
}

fn resolve_columns(headers: &StringRecord) -> Result<ColumnMap, DataLoadError> {
    let position = |name: &str| {
        headers
            .iter()
            .position(|header| header.trim().eq_ignore_ascii_case(name))
    };

    let found = REQUIRED_COLUMNS.map(position);
    let missing = REQUIRED_COLUMNS
        .iter()
        .zip(found.iter())
        .filter(|(_, index)| index.is_none())
        .map(|(name, _)| (*name).to_owned())
        .collect::<Vec<_>>();

    match found {
        [Some(year), Some(geo), Some(category), Some(trade), Some(value)] => Ok(ColumnMap {
            year,
            geo,
            category,
            trade,
            value,
        }),
        _ => Err(DataLoadError::MissingColumns { missing }),
    }
}

fn parse_row(
    row: &StringRecord,
    columns: ColumnMap,
    line: u64,
) -> Result<Option<TradeRecord>, DataLoadError> {
    let invalid = |message: String| DataLoadError::InvalidRow { line, message };
    let cell = |index: usize, name: &str| {
        row.get(index).ok_or_else(|| {
            invalid(format!(
                "row has {} field(s), missing the '{name}' column",
                row.len()
            ))
        })
    };

    let raw_year = cell(columns.year, "year")?;
    let raw_geo = cell(columns.geo, "geo")?;
    let raw_category = cell(columns.category, "category")?;
    let raw_trade = cell(columns.trade, "trade")?;
    let raw_value = cell(columns.value, "value")?;
    if raw_value.is_empty() {
        return Ok(None);
    }

    let year = parse_year(raw_year)
        .ok_or_else(|| invalid(format!("year '{raw_year}' is not an integer")))?;
    let geo = Region::parse(raw_geo).map_err(|error| invalid(error.to_string()))?;
    let category = Category::parse(raw_category).map_err(|error| invalid(error.to_string()))?;
    let trade = raw_trade
        .parse::<TradeType>()
        .map_err(|error| invalid(error.to_string()))?;
    let value = raw_value
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| invalid(format!("value '{raw_value}' is not a finite number")))?;

    Ok(Some(TradeRecord {
        year,
        geo,
        category,
        trade,
        value,
    }))
}

fn parse_year(raw: &str) -> Option<i32> {
    if let Ok(year) = raw.parse::<i32>() {
        return Some(year);
    }

    // pandas writes integer columns holding NaN as floats ("2024.0")
    raw.parse::<f64>()
        .ok()
        .filter(|year| year.fract() == 0.0 && year.abs() < f64::from(i32::MAX))
        .map(|year| year as i32)
}
