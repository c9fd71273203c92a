//! Trip Explorer: filter a static taxi-trip dataset and watch KPIs,
//! distributions and maps recompute.
//!
//! Without `--summary` a desktop window opens; with it the results for the
//! given filters are printed as JSON and the process exits.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use eframe::egui;
use serde::Serialize;

use trip_explorer::app::TripExplorerApp;
use trip_explorer::config::{Config, DATA_ENV_VAR, DEFAULT_CONFIG_FILE};
use trip_explorer::dashboard::DashboardSnapshot;
use trip_explorer::data::filter::{FilterCriteria, Selection};
use trip_explorer::data::loader::DatasetHandle;
use trip_explorer::data::model::Label;
use trip_explorer::state::AppState;

/// Interactive explorer for taxi-trip datasets
///
/// Examples:
///   trip-explorer --data trips.csv
///   trip-explorer --summary --country Spain --month 3 --hour 8 --hour 9
///   trip-explorer --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Dataset file to try first (repeatable, tried in order)
    ///
    /// Tried before TRIP_EXPLORER_DATA, the config file's sources and the
    /// built-in defaults.
    #[arg(short, long = "data", value_name = "FILE")]
    data: Vec<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for trip-explorer.toml in the current directory
    #[arg(short, long, value_name = "FILE", env = "TRIP_EXPLORER_CONFIG")]
    config: Option<PathBuf>,

    /// Print the dashboard results as JSON instead of opening a window
    #[arg(long)]
    summary: bool,

    /// Origin country filter (headless mode)
    #[arg(long, requires = "summary")]
    country: Option<String>,

    /// Origin city filter (headless mode)
    #[arg(long, requires = "summary")]
    city: Option<String>,

    /// Pickup month to keep (repeatable; default: all)
    #[arg(long = "month", value_name = "MONTH", requires = "summary")]
    months: Vec<String>,

    /// Pickup hour to keep, 0-23 (repeatable; default: all)
    #[arg(
        long = "hour",
        value_name = "HOUR",
        requires = "summary",
        value_parser = clap::value_parser!(u8).range(0..24)
    )]
    hours: Vec<u8>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Write a default trip-explorer.toml and exit
    #[arg(long)]
    init_config: bool,
}

/// What `--summary` prints.
#[derive(Debug, Serialize)]
struct Summary<'a> {
    source: Option<&'a Path>,
    diagnostic: Option<&'a str>,
    total_trips: usize,
    criteria: &'a FilterCriteria,
    filtered_trips: usize,
    snapshot: &'a DashboardSnapshot,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.init_config {
        return handle_init_config();
    }

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?.unwrap_or_default(),
    };
    let candidates = config.candidate_sources(&cli.data, std::env::var_os(DATA_ENV_VAR));
    log::debug!("Dataset candidates: {candidates:?}");

    let state = AppState::new(DatasetHandle::new(candidates), config.dashboard.clone());

    if cli.summary {
        return print_summary(state, &cli);
    }

    run_gui(state)
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

/// Handle --init-config: generate a default trip-explorer.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(DEFAULT_CONFIG_FILE);
    if path.exists() {
        anyhow::bail!("{DEFAULT_CONFIG_FILE} already exists. Remove it first or edit it manually.");
    }
    std::fs::write(path, Config::default_toml())
        .with_context(|| format!("Failed to write {DEFAULT_CONFIG_FILE}"))?;
    println!("Created {DEFAULT_CONFIG_FILE} with default settings.");
    Ok(())
}

fn print_summary(mut state: AppState, cli: &Cli) -> Result<()> {
    if cli.country.is_some() {
        state.set_country(Selection::from_option(cli.country.clone()));
    }
    if cli.city.is_some() {
        state.set_city(Selection::from_option(cli.city.clone()));
    }
    if !cli.months.is_empty() {
        let months: BTreeSet<Label> = cli.months.iter().filter_map(|m| Label::parse(m)).collect();
        state.criteria.months = months;
    }
    if !cli.hours.is_empty() {
        state.criteria.hours = cli.hours.iter().copied().collect();
    }
    state.refilter();

    let outcome = state.outcome();
    let summary = Summary {
        source: outcome.source.as_deref(),
        diagnostic: outcome.diagnostic.as_deref(),
        total_trips: outcome.dataset.len(),
        criteria: &state.criteria,
        filtered_trips: state.filtered_count,
        snapshot: &state.snapshot,
    };
    let json = serde_json::to_string_pretty(&summary).context("serializing summary")?;
    println!("{json}");
    Ok(())
}

fn run_gui(state: AppState) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Trip Explorer",
        options,
        Box::new(move |_cc| Ok(Box::new(TripExplorerApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("failed to start the window: {e}"))
}
