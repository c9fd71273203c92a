use std::cell::OnceCell;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
    StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use thiserror::Error;

use super::model::{Dataset, GeoPoint, Label, TripRecord, Weekday};

/// Column names of the trip table, as written by the cleaning pipeline.
pub const COLUMNS: [&str; 17] = [
    "raw_orig_country",
    "raw_orig_city_clean",
    "raw_dest_country",
    "raw_dest_city_clean",
    "orig_airport_code",
    "dest_airport_code",
    "pickup_month_local",
    "pickup_hour_local",
    "pickup_day_local",
    "raw_driving_dist_km",
    "raw_passengers",
    "is_from_airport",
    "is_to_airport",
    "raw_orig_latitude",
    "raw_orig_longitude",
    "raw_dest_latitude",
    "raw_dest_longitude",
];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Why a single candidate source could not be used.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{} does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("{}: unsupported file extension .{ext}", path.display())]
    UnsupportedExtension { path: PathBuf, ext: String },

    #[error("{}: {message}", path.display())]
    Unreadable { path: PathBuf, message: String },
}

/// Result of resolving the configured candidates.
///
/// Exactly one of `source` / `diagnostic` is set. On failure the dataset is
/// empty, so callers never need to special-case a missing table.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub dataset: Arc<Dataset>,
    pub source: Option<PathBuf>,
    pub diagnostic: Option<String>,
}

impl LoadOutcome {
    pub fn loaded(dataset: Dataset, source: PathBuf) -> Self {
        LoadOutcome {
            dataset: Arc::new(dataset),
            source: Some(source),
            diagnostic: None,
        }
    }

    pub fn failed(diagnostic: String) -> Self {
        LoadOutcome {
            dataset: Arc::new(Dataset::empty()),
            source: None,
            diagnostic: Some(diagnostic),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.source.is_some()
    }
}

/// Try every candidate in order and keep the first one that exists and parses.
pub fn load(candidates: &[PathBuf]) -> LoadOutcome {
    if candidates.is_empty() {
        log::error!("No dataset sources configured");
        return LoadOutcome::failed("No dataset sources are configured.".to_string());
    }

    let mut failures = Vec::with_capacity(candidates.len());
    for path in candidates {
        log::debug!("Trying dataset source {}", path.display());
        match try_source(path) {
            Ok(dataset) => {
                log::info!("Loaded {} trips from {}", dataset.len(), path.display());
                return LoadOutcome::loaded(dataset, path.clone());
            }
            Err(e) => {
                log::warn!("Skipping dataset source: {e}");
                failures.push(e.to_string());
            }
        }
    }

    let diagnostic = format!(
        "The trip dataset could not be found or read. Tried: {}",
        failures.join("; ")
    );
    log::error!("{diagnostic}");
    LoadOutcome::failed(diagnostic)
}

/// Load a single candidate, classifying the failure.
pub fn try_source(path: &Path) -> Result<Dataset, SourceError> {
    if !path.is_file() {
        return Err(SourceError::NotFound(path.to_path_buf()));
    }
    let ext = extension(path);
    if !matches!(ext.as_str(), "csv" | "txt" | "parquet" | "pq") {
        return Err(SourceError::UnsupportedExtension {
            path: path.to_path_buf(),
            ext,
        });
    }
    load_file(path).map_err(|e| SourceError::Unreadable {
        path: path.to_path_buf(),
        message: format!("{e:#}"),
    })
}

/// Load a trip dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.txt` – comma-delimited with a header row
/// * `.parquet`      – flat columns with the same names as the CSV header
pub fn load_file(path: &Path) -> Result<Dataset> {
    match extension(path).as_str() {
        "csv" | "txt" => load_csv(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

// ---------------------------------------------------------------------------
// DatasetHandle – load once per session
// ---------------------------------------------------------------------------

/// Lazily loaded, immutable dataset for one session.
///
/// The first call to [`DatasetHandle::get`] reads the sources; later calls
/// return the memoised outcome without touching the filesystem.
#[derive(Debug)]
pub struct DatasetHandle {
    candidates: Vec<PathBuf>,
    outcome: OnceCell<LoadOutcome>,
}

impl DatasetHandle {
    pub fn new(candidates: Vec<PathBuf>) -> Self {
        DatasetHandle {
            candidates,
            outcome: OnceCell::new(),
        }
    }

    /// A handle whose outcome is already known, e.g. a file picked in the UI.
    pub fn with_outcome(candidates: Vec<PathBuf>, outcome: LoadOutcome) -> Self {
        DatasetHandle {
            candidates,
            outcome: OnceCell::from(outcome),
        }
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    pub fn get(&self) -> &LoadOutcome {
        self.outcome.get_or_init(|| load(&self.candidates))
    }

    pub fn is_loaded(&self) -> bool {
        self.outcome.get().is_some()
    }
}

// ---------------------------------------------------------------------------
// Raw row → TripRecord
// ---------------------------------------------------------------------------

/// One undecoded row. Every cell is kept as text so CSV and Parquet share
/// the same conversion.
#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
struct RawTrip {
    raw_orig_country: Option<String>,
    raw_orig_city_clean: Option<String>,
    raw_dest_country: Option<String>,
    raw_dest_city_clean: Option<String>,
    orig_airport_code: Option<String>,
    dest_airport_code: Option<String>,
    pickup_month_local: Option<String>,
    pickup_hour_local: Option<String>,
    pickup_day_local: Option<String>,
    raw_driving_dist_km: Option<String>,
    raw_passengers: Option<String>,
    is_from_airport: Option<String>,
    is_to_airport: Option<String>,
    raw_orig_latitude: Option<String>,
    raw_orig_longitude: Option<String>,
    raw_dest_latitude: Option<String>,
    raw_dest_longitude: Option<String>,
}

impl RawTrip {
    /// The cell for `COLUMNS[index]`.
    fn slot(&mut self, index: usize) -> Option<&mut Option<String>> {
        let cell = match index {
            0 => &mut self.raw_orig_country,
            1 => &mut self.raw_orig_city_clean,
            2 => &mut self.raw_dest_country,
            3 => &mut self.raw_dest_city_clean,
            4 => &mut self.orig_airport_code,
            5 => &mut self.dest_airport_code,
            6 => &mut self.pickup_month_local,
            7 => &mut self.pickup_hour_local,
            8 => &mut self.pickup_day_local,
            9 => &mut self.raw_driving_dist_km,
            10 => &mut self.raw_passengers,
            11 => &mut self.is_from_airport,
            12 => &mut self.is_to_airport,
            13 => &mut self.raw_orig_latitude,
            14 => &mut self.raw_orig_longitude,
            15 => &mut self.raw_dest_latitude,
            16 => &mut self.raw_dest_longitude,
            _ => return None,
        };
        Some(cell)
    }

    /// Decode row `row`. Cells that are not numbers fail the row; numbers
    /// outside their column's domain are logged and read as absent.
    fn into_trip(self, row: usize) -> Result<TripRecord> {
        let pickup_hour = parse_whole(&self.pickup_hour_local, "pickup_hour_local")?
            .and_then(|h| {
                let hour = u8::try_from(h).ok().filter(|h| *h < 24);
                in_domain(row, "pickup_hour_local", h, hour)
            });
        let passengers = parse_whole(&self.raw_passengers, "raw_passengers")?
            .and_then(|p| in_domain(row, "raw_passengers", p, u32::try_from(p).ok()));
        let driving_distance_km = parse_float(&self.raw_driving_dist_km, "raw_driving_dist_km")?
            .and_then(|d| {
                let distance = (d.is_finite() && d >= 0.0).then_some(d);
                in_domain(row, "raw_driving_dist_km", d, distance)
            });

        Ok(TripRecord {
            origin_country: text(self.raw_orig_country),
            origin_city: text(self.raw_orig_city_clean),
            destination_country: text(self.raw_dest_country),
            destination_city: text(self.raw_dest_city_clean),
            origin_airport: text(self.orig_airport_code),
            destination_airport: text(self.dest_airport_code),
            pickup_month: self.pickup_month_local.as_deref().and_then(Label::parse),
            pickup_hour,
            pickup_day: self.pickup_day_local.as_deref().and_then(Weekday::parse),
            driving_distance_km,
            passengers,
            from_airport: parse_flag(&self.is_from_airport, "is_from_airport")?,
            to_airport: parse_flag(&self.is_to_airport, "is_to_airport")?,
            origin: GeoPoint::new(
                parse_float(&self.raw_orig_latitude, "raw_orig_latitude")?,
                parse_float(&self.raw_orig_longitude, "raw_orig_longitude")?,
            ),
            destination: GeoPoint::new(
                parse_float(&self.raw_dest_latitude, "raw_dest_latitude")?,
                parse_float(&self.raw_dest_longitude, "raw_dest_longitude")?,
            ),
        })
    }
}

fn in_domain<T>(
    row: usize,
    column: &str,
    raw: impl std::fmt::Display,
    value: Option<T>,
) -> Option<T> {
    if value.is_none() {
        log::warn!("Row {row}: {column} value {raw} is out of range, reading it as missing");
    }
    value
}

fn text(cell: Option<String>) -> Option<String> {
    cell.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn non_empty<'a>(cell: &'a Option<String>) -> Option<&'a str> {
    cell.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn parse_float(cell: &Option<String>, column: &str) -> Result<Option<f64>> {
    let Some(s) = non_empty(cell) else {
        return Ok(None);
    };
    if s.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    s.parse::<f64>()
        .map(Some)
        .with_context(|| format!("{column}: '{s}' is not a number"))
}

/// Integers may be written as whole floats (`"14.0"`) by dataframe exports.
fn parse_whole(cell: &Option<String>, column: &str) -> Result<Option<i64>> {
    match parse_float(cell, column)? {
        None => Ok(None),
        Some(v) if v.is_finite() && v.fract() == 0.0 => Ok(Some(v as i64)),
        Some(v) => bail!("{column}: '{v}' is not a whole number"),
    }
}

fn parse_flag(cell: &Option<String>, column: &str) -> Result<Option<bool>> {
    let Some(s) = non_empty(cell) else {
        return Ok(None);
    };
    match s.to_ascii_lowercase().as_str() {
        "1" | "1.0" | "true" => Ok(Some(true)),
        "0" | "0.0" | "false" => Ok(Some(false)),
        "nan" => Ok(None),
        other => bail!("{column}: '{other}' is not a 0/1 flag"),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with the names in [`COLUMNS`]. Unknown columns are
/// ignored and missing ones read as absent.
fn load_csv(path: &Path) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(false)
        .from_path(path)
        .context("opening CSV")?;

    let headers = reader.headers().context("reading CSV headers")?.clone();
    if !COLUMNS.iter().any(|c| headers.iter().any(|h| h == *c)) {
        bail!("CSV header has none of the expected trip columns");
    }

    let mut trips = Vec::new();
    for (row_no, result) in reader.deserialize::<RawTrip>().enumerate() {
        let raw = result.with_context(|| format!("CSV row {row_no}"))?;
        let trip = raw.into_trip(row_no).with_context(|| format!("CSV row {row_no}"))?;
        trips.push(trip);
    }

    Ok(Dataset::new(trips))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with flat trip columns.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut trips = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        // (batch column, trip column) pairs, resolved once per batch.
        let present: Vec<(usize, usize)> = COLUMNS
            .iter()
            .enumerate()
            .filter_map(|(column, name)| schema.index_of(name).ok().map(|i| (i, column)))
            .collect();
        if present.is_empty() {
            bail!("Parquet file has none of the expected trip columns");
        }

        for row in 0..batch.num_rows() {
            let row_no = trips.len();
            let mut raw = RawTrip::default();
            for &(col_idx, column) in &present {
                let value = cell_text(batch.column(col_idx), row)
                    .with_context(|| format!("Row {row_no}, column '{}'", COLUMNS[column]))?;
                if let Some(cell) = raw.slot(column) {
                    *cell = value;
                }
            }
            trips.push(raw.into_trip(row_no).with_context(|| format!("Row {row_no}"))?);
        }
    }

    Ok(Dataset::new(trips))
}

/// Render one Arrow cell as text; `None` for nulls.
fn cell_text(col: &Arc<dyn Array>, row: usize) -> Result<Option<String>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let text = match col.data_type() {
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .context("expected StringArray")?;
            arr.value(row).to_string()
        }
        DataType::LargeUtf8 => col.as_string::<i64>().value(row).to_string(),
        DataType::Int32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int32Array>()
                .context("expected Int32Array")?;
            arr.value(row).to_string()
        }
        DataType::Int64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int64Array>()
                .context("expected Int64Array")?;
            arr.value(row).to_string()
        }
        DataType::Float32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float32Array>()
                .context("expected Float32Array")?;
            arr.value(row).to_string()
        }
        DataType::Float64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float64Array>()
                .context("expected Float64Array")?;
            arr.value(row).to_string()
        }
        DataType::Boolean => {
            let arr = col
                .as_any()
                .downcast_ref::<BooleanArray>()
                .context("expected BooleanArray")?;
            arr.value(row).to_string()
        }
        other => bail!("unsupported column type {other:?}"),
    };
    Ok(Some(text))
}
