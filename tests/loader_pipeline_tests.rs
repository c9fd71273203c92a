//! End-to-end tests: files on disk → loader → filter → metrics.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use trip_explorer::config::DashboardConfig;
use trip_explorer::dashboard::DashboardSnapshot;
use trip_explorer::data::filter::{apply, FilterCriteria, Selection};
use trip_explorer::data::loader::{load, try_source, DatasetHandle, SourceError, COLUMNS};
use trip_explorer::metrics::total_trip_count;

/// 100 trips: rows 0..60 from Spain, the rest from Portugal.
fn write_trips_csv(path: &Path) {
    let mut text = COLUMNS.join(",");
    text.push('\n');
    for i in 0..100 {
        let (country, city, airport, lat, lon) = if i < 60 {
            ("Spain", if i % 2 == 0 { "Madrid" } else { "Barcelona" }, "MAD", 40.41, -3.70)
        } else {
            ("Portugal", "Lisboa", "LIS", 38.72, -9.13)
        };
        let month = i % 12 + 1;
        let hour = i % 24;
        let day = ["Lunedì", "Martedì", "Giovedì"][i % 3];
        let from_airport = if i % 10 == 0 { 1 } else { 0 };
        let row = format!(
            "{country},{city},{country},{city},{ap},,{month},{hour}.0,{day},{dist},{pax},{from_airport},0,{lat},{lon},{lat},{lon}\n",
            ap = if from_airport == 1 { airport } else { "" },
            dist = 5 + i % 7,
            pax = 1 + i % 3,
        );
        text.push_str(&row);
    }
    fs::write(path, text).unwrap();
}

#[test]
fn spain_selects_sixty_of_one_hundred() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trips.csv");
    write_trips_csv(&path);

    let outcome = load(&[path.clone()]);
    assert_eq!(outcome.source.as_deref(), Some(path.as_path()));
    assert_eq!(outcome.dataset.len(), 100);

    let mut criteria = FilterCriteria::all(&outcome.dataset);
    criteria.country = Selection::Only("Spain".into());
    let view = apply(&outcome.dataset, &criteria);
    assert_eq!(view.len(), 60);
    assert_eq!(total_trip_count(&view), 60);
}

#[test]
fn snapshot_over_loaded_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trips.csv");
    write_trips_csv(&path);

    let outcome = load(&[path]);
    let view = apply(&outcome.dataset, &FilterCriteria::all(&outcome.dataset));
    let snapshot = DashboardSnapshot::compute(&view, &DashboardConfig::default());

    assert_eq!(snapshot.kpis.trip_count, 100);
    assert_eq!(snapshot.kpis.from_airport, 10);
    assert_eq!(snapshot.origin_countries[0].category, "Spain");
    assert_eq!(snapshot.origin_countries[0].count, 60);
    assert_eq!(snapshot.hour_histogram.iter().map(|b| b.count).sum::<usize>(), 100);
    // Wednesday ("Mercoledì") never appears but keeps its slot.
    assert_eq!(snapshot.weekday_histogram[2].bucket.label(), "Mercoledì");
    assert_eq!(snapshot.weekday_histogram[2].count, 0);
    assert_eq!(snapshot.origin_points.len(), 100);
}

#[test]
fn falls_through_missing_and_malformed_candidates() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.csv");
    let malformed = dir.path().join("malformed.csv");
    fs::write(
        &malformed,
        "raw_orig_country,raw_driving_dist_km\nSpain,not-a-number\n",
    )
    .unwrap();
    let good = dir.path().join("good.csv");
    write_trips_csv(&good);

    let outcome = load(&[missing, malformed, good.clone()]);
    assert!(outcome.is_loaded());
    assert_eq!(outcome.source, Some(good));
    assert!(outcome.diagnostic.is_none());
}

#[test]
fn nothing_loadable_gives_empty_dataset_and_one_diagnostic() {
    let dir = tempfile::tempdir().unwrap();
    let unsupported = dir.path().join("trips.xlsx");
    fs::write(&unsupported, "whatever").unwrap();

    let outcome = load(&[dir.path().join("nope.csv"), unsupported.clone()]);
    assert!(outcome.dataset.is_empty());
    let diagnostic = outcome.diagnostic.expect("diagnostic");
    assert!(diagnostic.contains("nope.csv"));
    assert!(diagnostic.contains("xlsx"));

    assert!(matches!(
        try_source(&unsupported),
        Err(SourceError::UnsupportedExtension { .. })
    ));

    let view = apply(&outcome.dataset, &FilterCriteria::all(&outcome.dataset));
    let snapshot = DashboardSnapshot::compute(&view, &DashboardConfig::default());
    assert_eq!(snapshot.kpis.trip_count, 0);
    assert_eq!(snapshot.kpis.total_distance_km, 0.0);
}

#[test]
fn header_without_trip_columns_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("other.csv");
    fs::write(&path, "a,b\n1,2\n").unwrap();
    assert!(matches!(try_source(&path), Err(SourceError::Unreadable { .. })));
}

#[test]
fn handle_reads_the_source_only_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trips.csv");
    write_trips_csv(&path);

    let handle = DatasetHandle::new(vec![path.clone()]);
    assert!(!handle.is_loaded());
    let first = Arc::clone(&handle.get().dataset);
    assert!(handle.is_loaded());

    fs::remove_file(&path).unwrap();
    let second = Arc::clone(&handle.get().dataset);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.len(), 100);
}

#[test]
fn apply_is_idempotent_and_hours_are_monotone() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trips.csv");
    write_trips_csv(&path);
    let outcome = load(&[path]);
    let ds = &outcome.dataset;

    let mut criteria = FilterCriteria::all(ds);
    assert_eq!(apply(ds, &criteria), apply(ds, &criteria));

    let mut previous = apply(ds, &criteria).len();
    for hour in 0..24u8 {
        criteria.hours.remove(&hour);
        let now = apply(ds, &criteria).len();
        assert!(now <= previous);
        previous = now;
    }
    assert_eq!(previous, 0);
}

#[test]
fn candidates_are_reported_in_order() {
    let a = PathBuf::from("/nowhere/a.csv");
    let b = PathBuf::from("/nowhere/b.parquet");
    let handle = DatasetHandle::new(vec![a.clone(), b.clone()]);
    assert_eq!(handle.candidates(), &[a, b]);
    let diagnostic = handle.get().diagnostic.clone().unwrap_or_default();
    let first = diagnostic.find("a.csv").unwrap();
    let second = diagnostic.find("b.parquet").unwrap();
    assert!(first < second);
}

/// A Madrid trip with the given hour and passenger cells.
fn madrid_row(hour: &str, passengers: &str) -> String {
    format!(
        "Spain,Madrid,Spain,Madrid,,,3,{hour},Lunedì,7.5,{passengers},0,0,40.41,-3.70,40.42,-3.69\n"
    )
}

fn write_rows(path: &Path, rows: impl IntoIterator<Item = String>) {
    let mut text = COLUMNS.join(",");
    text.push('\n');
    text.extend(rows);
    fs::write(path, text).unwrap();
}

#[test]
fn out_of_range_cells_keep_the_rest_of_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trips.csv");
    let mut rows: Vec<String> = (0..1000)
        .map(|i| madrid_row(&(i % 24).to_string(), "1"))
        .collect();
    rows.push(madrid_row("24", "-1"));
    write_rows(&path, rows);

    let outcome = load(&[path]);
    assert!(outcome.is_loaded(), "{:?}", outcome.diagnostic);
    assert_eq!(outcome.dataset.len(), 1001);

    let odd = &outcome.dataset.trips()[1000];
    assert_eq!(odd.pickup_hour, None);
    assert_eq!(odd.passengers, None);
    assert_eq!(odd.origin_city.as_deref(), Some("Madrid"));

    // Without an hour the row never passes the hour filter.
    let view = apply(&outcome.dataset, &FilterCriteria::all(&outcome.dataset));
    assert_eq!(view.len(), 1000);
}

#[test]
fn huge_passenger_count_does_not_blow_up_the_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trips.csv");
    write_rows(&path, [madrid_row("8", "2"), madrid_row("9", "20000000")]);

    let outcome = load(&[path]);
    let view = apply(&outcome.dataset, &FilterCriteria::all(&outcome.dataset));
    let snapshot = DashboardSnapshot::compute(&view, &DashboardConfig::default());

    assert!(snapshot.passenger_histogram.len() <= 50);
    assert_eq!(snapshot.passenger_histogram.iter().map(|b| b.count).sum::<usize>(), 2);
    let json = serde_json::to_string(&snapshot).unwrap();
    assert!(json.len() < 100_000);
}
