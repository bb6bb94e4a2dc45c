mod composition;
mod dashboard;
mod map;
mod options;
mod prepare;
mod summary;
mod trend;

use std::path::PathBuf;
use std::time::Instant;

use serde_json::Value;
use tradeboard_core::{
    CacheMode, CoreError, Dashboard, DashboardConfig, Envelope, EnvelopeError, EnvelopeMeta,
    FilterSelection, Panel, ShapeSet, TradeTable,
};
use tradeboard_geo::{BoundaryLoader, BoundarySource, ReqwestHttpClient};
use uuid::Uuid;

use crate::cli::{Cli, Command, SelectionArgs};
use crate::error::CliError;

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
    pub cache_hit: bool,
    pub dataset: String,
}

impl CommandResult {
    pub fn ok(data: Value, dataset: impl Into<String>) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            errors: Vec::new(),
            cache_hit: false,
            dataset: dataset.into(),
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    pub fn with_errors(mut self, errors: Vec<EnvelopeError>) -> Self {
        self.errors.extend(errors);
        self
    }

    pub fn with_cache_hit(mut self, cache_hit: bool) -> Self {
        self.cache_hit = cache_hit;
        self
    }
}

/// Loaded dataset, boundaries and render service shared by the view commands.
pub struct AppContext {
    pub dashboard: Dashboard,
    pub mode: CacheMode,
    pub dataset: String,
    pub warnings: Vec<String>,
}

impl AppContext {
    async fn open(cli: &Cli, config: &DashboardConfig, with_boundaries: bool) -> Result<Self, CliError> {
        let data_path = cli.data.clone().unwrap_or_else(|| config.data_path.clone());
        let table = TradeTable::load(&data_path)?;

        let mut warnings = Vec::new();
        let shapes = if with_boundaries {
            load_boundaries(config, cli.offline, &mut warnings).await
        } else {
            ShapeSet::new()
        };

        Ok(Self {
            dashboard: Dashboard::new(table, shapes, config),
            mode: cli.cache.into(),
            dataset: data_path.display().to_string(),
            warnings,
        })
    }

    /// Resolve dropdown strings; the year defaults to the latest in the dataset.
    pub fn selection(&self, args: &SelectionArgs) -> Result<FilterSelection, CliError> {
        let year = match args.year {
            Some(year) => year,
            None => self
                .dashboard
                .landing_selection()
                .map(|selection| selection.year)
                .ok_or(CliError::EmptySelection)?,
        };
        Ok(FilterSelection::parse(
            year,
            &args.geo,
            &args.category,
            &args.trade_type,
        )?)
    }

    pub fn result(&self, data: Value) -> CommandResult {
        CommandResult::ok(data, self.dataset.clone()).with_warnings(self.warnings.clone())
    }

    /// Single-view failure: missing data becomes an envelope error, anything
    /// else aborts the command.
    pub fn failure(&self, panel: Panel, error: CoreError) -> Result<CommandResult, CliError> {
        if !matches!(error, CoreError::NoData { .. }) {
            return Err(error.into());
        }
        let error = EnvelopeError::new(error.code(), error.to_string())?.with_view(panel.as_str());
        Ok(self.result(Value::Null).with_errors(vec![error]))
    }
}

pub async fn run(cli: &Cli) -> Result<Envelope<Value>, CliError> {
    let started = Instant::now();
    let config = load_config(cli.config.as_ref())?;

    let command_result = match &cli.command {
        Command::Prepare(args) => prepare::run(args, &config)?,
        Command::Options => options::run(&AppContext::open(cli, &config, false).await?)?,
        Command::Summary(args) => {
            summary::run(args, &AppContext::open(cli, &config, false).await?).await?
        }
        Command::Composition(args) => {
            composition::run(args, &AppContext::open(cli, &config, false).await?).await?
        }
        Command::Trend(args) => {
            trend::run(args, &AppContext::open(cli, &config, false).await?).await?
        }
        Command::Map(args) => map::run(args, &AppContext::open(cli, &config, true).await?).await?,
        Command::Dashboard(args) => {
            dashboard::run(args, &AppContext::open(cli, &config, true).await?).await?
        }
    };

    let CommandResult {
        data,
        warnings,
        errors,
        cache_hit,
        dataset,
    } = command_result;

    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    let mut meta = EnvelopeMeta::new(Uuid::new_v4().to_string(), dataset, latency_ms, cache_hit)?;
    for warning in warnings {
        meta.push_warning(warning);
    }

    Envelope::with_errors(meta, data, errors).map_err(CliError::from)
}

fn load_config(path: Option<&PathBuf>) -> Result<DashboardConfig, CliError> {
    match path {
        Some(path) => Ok(DashboardConfig::load(path)?),
        None => Ok(DashboardConfig::default()),
    }
}

/// Boundaries are optional: without them the map still carries values.
async fn load_boundaries(
    config: &DashboardConfig,
    offline: bool,
    warnings: &mut Vec<String>,
) -> ShapeSet {
    let loader = BoundaryLoader::new(ReqwestHttpClient::new(), BoundarySource::from_config(config));
    let loaded = if offline {
        loader.load_cached()
    } else {
        loader.load().await
    };

    match loaded {
        Ok(loaded) => {
            warnings.extend(loaded.warnings);
            loaded.shapes
        }
        Err(error) => {
            tracing::warn!(code = error.code(), error = %error, "rendering map without boundaries");
            warnings.push(format!("map regions have no geometry: {error}"));
            ShapeSet::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use clap::Parser;
    use tempfile::tempdir;

    use super::*;

    const RAW: &str = "\
REF_DATE,GEO,DGUID,Trading partner,North American Product Classification System (NAPCS),Trade,UOM,UOM_ID,SCALAR_FACTOR,SCALAR_ID,VECTOR,COORDINATE,VALUE,STATUS,SYMBOL,TERMINATED,DECIMALS
2024,Canada,2016A000011124,United States,All sections,Export,Dollars,81,thousands,3,v1,1.1.1,500,,,,0
2024,Canada,2016A000011124,United States,All sections,Import,Dollars,81,thousands,3,v2,1.1.2,300,,,,0
2024,Canada,2016A000011124,United States,Energy products [C12],Export,Dollars,81,thousands,3,v3,1.2.1,320,,,,0
2024,Canada,2016A000011124,United States,Energy products [C12],Import,Dollars,81,thousands,3,v4,1.2.2,40,,,,0
2024,Yukon,2016A000260,United States,All sections,Export,Dollars,81,thousands,3,v5,13.1.1,4,,,,0
2024,Yukon,2016A000260,United States,All sections,Import,Dollars,81,thousands,3,v6,13.1.2,,x,,,0
";

    fn cli(home: &Path, args: &[&str]) -> Cli {
        let config = home.join("config.json");
        fs::write(
            &config,
            serde_json::json!({ "home": home, "dataPath": home.join("clean.csv") }).to_string(),
        )
        .expect("write config");

        let config = config.display().to_string();
        let mut argv = vec!["tradeboard", "--config", config.as_str(), "--offline"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).expect("parse")
    }

    async fn prepared_home() -> tempfile::TempDir {
        let home = tempdir().expect("tempdir");
        let raw = home.path().join("raw.csv");
        fs::write(&raw, RAW).expect("write raw");

        let raw = raw.display().to_string();
        let envelope = run(&cli(home.path(), &["prepare", raw.as_str()]))
            .await
            .expect("prepare");
        assert_eq!(envelope.data["report"]["rows_written"], 7);
        home
    }

    #[tokio::test]
    async fn prepared_dataset_feeds_the_summary_view() {
        let home = prepared_home().await;

        let envelope = run(&cli(home.path(), &["summary", "--year", "2024"]))
            .await
            .expect("summary");

        assert!(envelope.errors.is_empty());
        assert_eq!(envelope.data["values"]["exports"], 500_000.0);
        assert_eq!(envelope.data["values"]["imports"], -300_000.0);
        assert_eq!(envelope.data["labels"]["net_trade"], "CA$ 200K");
    }

    #[tokio::test]
    async fn missing_flow_is_reported_as_a_view_error() {
        let home = prepared_home().await;

        let envelope = run(&cli(home.path(), &["summary", "--geo", "Yukon"]))
            .await
            .expect("envelope with error");

        assert!(envelope.data.is_null());
        assert_eq!(envelope.errors.len(), 1);
        assert_eq!(envelope.errors[0].code, "no_data");
        assert_eq!(envelope.errors[0].view.as_deref(), Some("summary"));
    }

    #[tokio::test]
    async fn dashboard_renders_remaining_panels_when_one_fails() {
        let home = prepared_home().await;

        let envelope = run(&cli(home.path(), &["dashboard", "--geo", "Yukon"]))
            .await
            .expect("dashboard");

        assert!(envelope.data["panels"]["summary"].is_null());
        assert_eq!(envelope.data["panels"]["map"]["regions"].as_array().map(Vec::len), Some(1));
        assert!(envelope.data["panels"]["trend"].is_object());
        assert_eq!(envelope.errors.len(), 1);
        assert!(envelope
            .meta
            .warnings
            .iter()
            .any(|warning| warning.starts_with("map regions have no geometry")));
    }

    #[tokio::test]
    async fn unknown_category_aborts_with_validation_exit_code() {
        let home = prepared_home().await;

        let err = run(&cli(home.path(), &["trend", "--category", "Aircraft"]))
            .await
            .expect_err("must fail");

        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn missing_dataset_is_a_load_error() {
        let home = tempdir().expect("tempdir");

        let err = run(&cli(home.path(), &["options"]))
            .await
            .expect_err("must fail");

        assert_eq!(err.exit_code(), 4);
    }
}
